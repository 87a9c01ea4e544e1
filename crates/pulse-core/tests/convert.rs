// File: crates/pulse-core/tests/convert.rs
// Purpose: Payload -> series conversion: gap detection, partitioning, popups and validation errors.

use pulse_core::convert::{gap_threshold, gap_widths, is_significant_gap, MIN_GAP_WIDTH};
use pulse_core::payload::CategoryColumn;
use pulse_core::series::{DataPoint, Series, SeriesStyle};
use pulse_core::settings::GapsSettings;
use pulse_core::{convert, CategoricalPayload, ColumnKind, ConvertError, MonospaceMeasure, PointId, Settings};

fn settings_with_gaps(visible_gaps: f64) -> Settings {
    let mut s = Settings::default();
    s.gaps = GapsSettings { show: true, visible_gaps };
    s
}

fn ts(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

fn ids(data: &pulse_core::ChartData) -> Vec<usize> {
    data.points().map(|p| p.id.0).collect()
}

#[test]
fn end_to_end_gap_scenario() {
    let payload = CategoricalPayload::temporal(ts(&[0.0, 60_000.0, 125_000.0, 190_000.0]), ts(&[1.0, 2.0, 3.0, 4.0]));
    assert_eq!(gap_widths(&payload), vec![0.0, 60_000.0, 65_000.0, 65_000.0]);
    assert_eq!(gap_threshold(65_000.0, 100.0), MIN_GAP_WIDTH);

    let data = convert(&payload, &settings_with_gaps(100.0), &MonospaceMeasure::default()).expect("convert");
    let lens: Vec<usize> = data.series.iter().map(|s| s.len()).collect();
    assert_eq!(lens, vec![2, 1, 1]);
    assert_eq!(data.series[0].points()[1].id, PointId(1));
    assert_eq!(data.series[1].first().id, PointId(2));
    assert_eq!(data.series[1].width_of_gap, 65_000.0);
    assert_eq!(data.series.last().map(|s| s.width_of_gap), Some(0.0));
    assert!(!data.is_scalar);
}

#[test]
fn gaps_disabled_keeps_one_series() {
    let payload = CategoricalPayload::temporal(ts(&[0.0, 60_000.0, 600_000.0, 660_000.0]), ts(&[1.0, 2.0, 3.0, 4.0]));
    let data = convert(&payload, &Settings::default(), &MonospaceMeasure::default()).expect("convert");
    assert_eq!(data.series.len(), 1);
    assert_eq!(data.series[0].width_of_gap, 0.0);
}

#[test]
fn only_the_widest_gap_splits_at_low_visibility() {
    let payload = CategoricalPayload::temporal(
        ts(&[0.0, 120_000.0, 240_000.0, 1_240_000.0, 1_300_000.0]),
        ts(&[1.0, 2.0, 3.0, 4.0, 5.0]),
    );
    let data = convert(&payload, &settings_with_gaps(1.0), &MonospaceMeasure::default()).expect("convert");
    assert_eq!(data.series.len(), 2);
    assert_eq!(data.series[0].len(), 3);
    assert_eq!(data.series[0].width_of_gap, 1_000_000.0);
}

#[test]
fn significant_gaps_grow_with_visibility_percentage() {
    let widths = [0.0, 30_000.0, 61_000.0, 90_000.0, 150_000.0, 400_000.0, 1_000_000.0];
    let max = 1_000_000.0;
    let significant = |pct: f64| -> Vec<bool> {
        let gaps = GapsSettings { show: true, visible_gaps: pct };
        widths.iter().map(|&w| is_significant_gap(w, max, &gaps)).collect()
    };
    let mut previous = significant(1.0);
    for pct in 2..=100 {
        let current = significant(f64::from(pct));
        for (was, is) in previous.iter().zip(&current) {
            assert!(!was || *is, "gap lost when raising visibility to {pct}%");
        }
        previous = current;
    }
    assert!(!previous[1], "gaps at or under the floor never count");
}

#[test]
fn hidden_gaps_are_never_significant() {
    let gaps = GapsSettings { show: false, visible_gaps: 100.0 };
    assert!(!is_significant_gap(10_000_000.0, 10_000_000.0, &gaps));
}

#[test]
fn temporal_series_partition_every_row_in_order() {
    let stamps = ts(&[0.0, 60_000.0, 500_000.0, 560_000.0, 2_000_000.0, 2_060_000.0, 2_120_000.0]);
    let values = ts(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0]);
    let payload = CategoricalPayload::temporal(stamps, values);
    let data = convert(&payload, &settings_with_gaps(100.0), &MonospaceMeasure::default()).expect("convert");
    assert!(data.series.len() > 1);
    assert!(data.series.iter().all(|s| !s.is_empty()));
    assert_eq!(ids(&data), (0..7).collect::<Vec<_>>());
}

#[test]
fn scalar_rows_with_missing_category_or_value_are_dropped() {
    let payload = CategoricalPayload::scalar(
        vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)],
        vec![Some(10.0), None, Some(30.0), Some(40.0), Some(50.0)],
    );
    let data = convert(&payload, &Settings::default(), &MonospaceMeasure::default()).expect("convert");
    assert!(data.is_scalar);
    assert_eq!(ids(&data), vec![0, 3, 4]);
}

#[test]
fn temporal_missing_value_holds_previous_and_missing_time_is_skipped() {
    let payload = CategoricalPayload::temporal(
        vec![Some(0.0), Some(60_000.0), None, Some(180_000.0)],
        vec![Some(5.0), None, Some(7.0), Some(8.0)],
    );
    let data = convert(&payload, &Settings::default(), &MonospaceMeasure::default()).expect("convert");
    assert_eq!(ids(&data), vec![0, 1, 3]);
    let (_, _, p) = data.find_point(PointId(1)).expect("row 1");
    assert_eq!((p.value, p.group_index), (5.0, 0));
}

#[test]
fn leading_missing_values_do_not_pull_the_scale_to_zero() {
    let payload = CategoricalPayload::temporal(
        ts(&[0.0, 60_000.0, 120_000.0, 180_000.0]),
        vec![None, Some(50.0), None, Some(70.0)],
    );
    let data = convert(&payload, &Settings::default(), &MonospaceMeasure::default()).expect("convert");
    assert_eq!(ids(&data), vec![1, 2, 3]);
    let min = data.points().map(|p| p.value).fold(f64::INFINITY, f64::min);
    assert_eq!(min, 50.0);
}

#[test]
fn second_group_fills_in_missing_first_group_values() {
    let payload = CategoricalPayload::temporal(ts(&[0.0, 60_000.0, 120_000.0]), vec![Some(1.0), None, Some(3.0)])
        .with_value_group(vec![Some(100.0), Some(200.0), Some(300.0)]);
    let data = convert(&payload, &Settings::default(), &MonospaceMeasure::default()).expect("convert");
    assert_eq!(data.group_count, 2);
    let (_, _, p) = data.find_point(PointId(1)).expect("row 1");
    assert_eq!((p.value, p.group_index), (200.0, 1));
    let (_, _, p) = data.find_point(PointId(2)).expect("row 2");
    assert_eq!((p.value, p.group_index), (3.0, 0));
}

#[test]
fn event_rows_carry_popups_with_scaled_sizes() {
    let payload = CategoricalPayload::temporal(ts(&[0.0, 60_000.0, 120_000.0, 180_000.0]), ts(&[1.0, 2.0, 3.0, 4.0]))
        .with_titles(vec![None, Some("Deploy".into()), Some("Rollback".into()), Some(String::new())])
        .with_descriptions(vec![None, None, Some("Error rate spiked".into()), Some("Quiet".into())])
        .with_sizes(vec![None, Some(1.0), Some(3.0), None]);
    let settings = Settings::default();
    let data = convert(&payload, &settings, &MonospaceMeasure::default()).expect("convert");
    let points: Vec<_> = data.points().collect();

    assert!(points[0].popup.is_none());
    let deploy = points[1].popup.as_ref().expect("popup on row 1");
    assert_eq!(deploy.title.as_deref(), Some("Deploy"));
    assert_eq!(deploy.time.as_deref(), Some("01/01/1970 00:01"));
    assert_eq!(deploy.size, settings.dots.min_size);

    let rollback = points[2].popup.as_ref().expect("popup on row 2");
    assert_eq!(rollback.description.as_deref(), Some("Error rate spiked"));
    assert_eq!(rollback.size, settings.dots.max_size);

    // Empty title, but a description: still an event; no size column value.
    let quiet = points[3].popup.as_ref().expect("popup on row 3");
    assert!(quiet.title.is_none());
    assert_eq!(quiet.size, settings.dots.size);
}

#[test]
fn equal_sizes_map_to_the_minimum_dot_size() {
    let payload = CategoricalPayload::temporal(ts(&[0.0, 60_000.0]), ts(&[1.0, 2.0]))
        .with_titles(vec![Some("a".into()), Some("b".into())])
        .with_sizes(vec![Some(7.0), Some(7.0)]);
    let settings = Settings::default();
    let data = convert(&payload, &settings, &MonospaceMeasure::default()).expect("convert");
    for p in data.points() {
        assert_eq!(p.popup.as_ref().map(|e| e.size), Some(settings.dots.min_size));
    }
}

#[test]
fn scalar_popups_have_no_time() {
    let payload = CategoricalPayload::scalar(ts(&[1.0, 2.0]), ts(&[1.0, 2.0])).with_titles(vec![Some("x".into()), None]);
    let data = convert(&payload, &Settings::default(), &MonospaceMeasure::default()).expect("convert");
    let popup = data.series[0].first().popup.as_ref().expect("popup");
    assert!(popup.time.is_none());
    assert_eq!(data.labels.time_label_width, 0.0);
}

#[test]
fn label_metrics_are_measured() {
    let payload = CategoricalPayload::temporal(ts(&[0.0, 60_000.0]), ts(&[1.0, 2.0]))
        .with_titles(vec![Some("a".into()), None]);
    let measure = MonospaceMeasure::default();
    let data = convert(&payload, &Settings::default(), &measure).expect("convert");
    // "01/01/1970 00:00" is 16 glyphs at the default popup font size 10.
    assert!((data.labels.time_label_width - 16.0 * 0.6 * 10.0).abs() < 1e-3);
    assert!(data.labels.axis_label_width > 0.0);
    assert!((data.labels.description_line_height - 12.5).abs() < 1e-6);
    assert_eq!(data.max_progress(), 60_000.0);
}

#[test]
fn malformed_payloads_are_rejected() {
    let measure = MonospaceMeasure::default();
    let settings = Settings::default();
    let run = |p: &CategoricalPayload| convert(p, &settings, &measure).unwrap_err();

    assert_eq!(run(&CategoricalPayload::default()), ConvertError::MissingCategory);

    let mut no_values = CategoricalPayload::temporal(ts(&[0.0]), ts(&[1.0]));
    no_values.value_groups.clear();
    assert_eq!(run(&no_values), ConvertError::MissingValues);

    let mut text = CategoricalPayload::temporal(ts(&[0.0]), ts(&[1.0]));
    text.category = Some(CategoryColumn { kind: ColumnKind::Text, values: ts(&[0.0]) });
    assert_eq!(run(&text), ConvertError::UnsupportedCategory(ColumnKind::Text));

    assert_eq!(run(&CategoricalPayload::temporal(vec![], vec![])), ConvertError::EmptyCategory);

    let mismatch = CategoricalPayload::temporal(ts(&[0.0, 1.0]), ts(&[1.0]));
    assert_eq!(run(&mismatch), ConvertError::LengthMismatch { group: 0, categories: 2, values: 1 });

    let empty = CategoricalPayload::scalar(vec![None, Some(1.0)], vec![Some(1.0), None]);
    assert_eq!(run(&empty), ConvertError::NoPoints);
}

#[test]
fn payload_deserializes_from_json() {
    let payload: CategoricalPayload = serde_json::from_str(
        r#"{
            "category": { "kind": "DateTime", "values": [0, 60000, null] },
            "valueGroups": [[1, 2, 3]],
            "titles": [null, "Launch", null]
        }"#,
    )
    .expect("payload json");
    assert_eq!(payload.row_count(), 3);
    assert_eq!(payload.title_at(1), Some("Launch"));
    assert_eq!(payload.category_at(2), None);
}

#[test]
fn series_need_points_and_find_reports_positions() {
    let style = SeriesStyle { color: skia_safe::Color::BLACK, width: 1.0 };
    assert!(Series::try_new(Vec::new(), style, 0.0).is_none());

    let point = |i: usize| DataPoint {
        id: PointId(i),
        category: i as f64,
        value: 1.0,
        group_index: 0,
        popup: None,
        label: String::new(),
    };
    let series = Series::try_new(vec![point(4), point(7)], style, 0.0).expect("non-empty");
    assert_eq!(series.find(PointId(7)).map(|(pos, p)| (pos, p.id)), Some((1, PointId(7))));
    assert!(series.find(PointId(5)).is_none());
}
