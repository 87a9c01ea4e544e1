// File: crates/pulse-core/tests/render.rs
// Purpose: Draw list contents per layer for static, animated and configured frames.

use pulse_core::controls::{layout_controls, PlaybackControl};
use pulse_core::render::{layers, Shape};
use pulse_core::{CategoricalPayload, Insets, PlaybackState, PointId, PulseChart, SettingsOverrides, Viewport};

fn viewport() -> Viewport {
    Viewport::new(400.0, 300.0).with_insets(Insets::new(40, 10, 40, 20))
}

fn events_payload() -> CategoricalPayload {
    CategoricalPayload::temporal(
        vec![Some(0.0), Some(60_000.0), Some(120_000.0), Some(180_000.0)],
        vec![Some(1.0), Some(3.0), Some(2.0), Some(4.0)],
    )
    .with_titles(vec![None, Some("Deploy".into()), None, Some("Peak".into())])
    .with_descriptions(vec![None, Some("Rolled out build 42 to every region".into()), None, None])
}

fn chart_with(payload: &CategoricalPayload, json: &str) -> PulseChart {
    let overrides = SettingsOverrides::from_json(json).expect("overrides");
    let mut chart = PulseChart::default();
    chart.update(payload, &overrides, viewport()).expect("update");
    chart
}

#[test]
fn static_frame_draws_every_layer() {
    let chart = chart_with(&events_payload(), "{}");
    let frame = chart.frame();
    assert_eq!(frame.background, skia_safe::Color::WHITE);
    assert_eq!(frame.count(layers::CLEAR_CATCHER), 1);
    assert_eq!(frame.count(layers::LINE), 1);
    assert_eq!(frame.count(layers::DOT), 2);
    assert_eq!(frame.count(layers::MARKER), 0);
    assert_eq!(frame.count(layers::POPUP), 0);
    assert_eq!(frame.count(layers::GAP), 0);
    assert!(frame.count(layers::X_AXIS) > 1);
    // Axis line plus five levels, each a tick and a label.
    assert_eq!(frame.count(layers::Y_AXIS), 11);

    let Some(Shape::Polyline { points, width, .. }) = frame.in_layer(layers::LINE).next() else {
        panic!("expected a polyline");
    };
    assert_eq!(points.len(), 4);
    assert_eq!(*width, 2.0);
    assert_eq!(points[0].x, 40.0);
    assert_eq!(points[3].x, 390.0);
}

#[test]
fn dots_use_transparency_and_event_radius() {
    let payload = events_payload().with_sizes(vec![None, Some(1.0), None, Some(2.0)]);
    let chart = chart_with(&payload, r#"{ "dots": { "transparency": 50, "minSize": 4, "maxSize": 9 } }"#);
    let radii: Vec<f32> = chart
        .frame()
        .in_layer(layers::DOT)
        .map(|s| match s {
            Shape::Circle { radius, fill, .. } => {
                assert_eq!(fill.a(), 128);
                *radius
            }
            other => panic!("unexpected dot shape {other:?}"),
        })
        .collect();
    assert_eq!(radii, vec![4.0, 9.0]);
}

#[test]
fn gaps_draw_double_ticks_between_series() {
    let payload = CategoricalPayload::temporal(
        vec![Some(0.0), Some(60_000.0), Some(600_000.0), Some(660_000.0), Some(720_000.0)],
        vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
    );
    let chart = chart_with(&payload, r#"{ "gaps": { "show": true, "visibleGaps": 100 } }"#);
    let frame = chart.frame();
    assert_eq!(chart.data().map(|d| d.series.len()), Some(2));
    assert_eq!(frame.count(layers::LINE), 2);
    assert_eq!(frame.count(layers::GAP), 2);
}

#[test]
fn hidden_axes_and_popups_draw_nothing() {
    let mut chart = chart_with(
        &events_payload(),
        r#"{ "xAxis": { "show": false }, "yAxis": { "show": false }, "popup": { "showType": "hide" } }"#,
    );
    chart.click_point(PointId(1), false);
    let frame = chart.frame();
    assert_eq!(frame.count(layers::X_AXIS), 0);
    assert_eq!(frame.count(layers::Y_AXIS), 0);
    assert_eq!(frame.count(layers::POPUP), 0);
}

#[test]
fn selected_event_gets_a_popup_and_a_highlight() {
    let mut chart = chart_with(&events_payload(), "{}");
    chart.click_point(PointId(1), false);
    let frame = chart.frame();

    let highlighted = frame
        .in_layer(layers::DOT)
        .filter(|s| matches!(s, Shape::Circle { stroke: Some(_), .. }))
        .count();
    assert_eq!(highlighted, 1);

    let texts: Vec<&str> = frame
        .in_layer(layers::POPUP)
        .filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts.first(), Some(&"01/01/1970 00:01"));
    assert!(texts.contains(&"Deploy"));
    assert!(texts.len() >= 4, "description should wrap onto several lines: {texts:?}");
}

#[test]
fn playing_frame_reveals_progressively() {
    let mut chart = chart_with(&events_payload(), "{}");
    chart.play();
    let frame = chart.frame();
    assert_eq!(frame.count(layers::MARKER), 1);
    assert_eq!(frame.count(layers::DOT), 0);

    chart.advance(std::time::Duration::from_millis(100));
    let frame = chart.frame();
    let Some(Shape::Polyline { points, .. }) = frame.in_layer(layers::LINE).next() else {
        panic!("expected a partial line");
    };
    // First point plus the interpolated marker.
    assert_eq!(points.len(), 2);
    assert!(points[1].x > 40.0 && points[1].x < 40.0 + 350.0 / 3.0);
}

#[test]
fn control_strip_reflects_state() {
    let buttons = layout_controls(&viewport(), PlaybackState::Ready);
    assert_eq!(buttons.len(), 4);
    let enabled: Vec<PlaybackControl> = buttons.iter().filter(|b| b.enabled).map(|b| b.control).collect();
    assert_eq!(enabled, vec![PlaybackControl::Play]);

    let playing = layout_controls(&viewport(), PlaybackState::Playing);
    let enabled: Vec<PlaybackControl> = playing.iter().filter(|b| b.enabled).map(|b| b.control).collect();
    assert_eq!(enabled, vec![PlaybackControl::ToStart, PlaybackControl::Pause, PlaybackControl::ToEnd]);

    let chart = chart_with(&events_payload(), "{}");
    let frame = chart.frame();
    let control = chart.settings().playback.color;
    let dimmed = frame
        .in_layer(layers::CONTROLS)
        .filter(|s| match s {
            Shape::Polygon { fill, .. } | Shape::Rect { fill, .. } => *fill != control,
            _ => false,
        })
        .count();
    // Everything except the play triangle is dimmed while ready.
    assert_eq!(dimmed, frame.count(layers::CONTROLS) - 1);
}
