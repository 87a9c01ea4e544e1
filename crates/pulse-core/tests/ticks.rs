// File: crates/pulse-core/tests/ticks.rs
// Purpose: Per-series axis ticks, label formatting and collision suppression.

use pulse_core::axis::{format_number, format_time, resolve_collisions, series_ticks};
use pulse_core::scale::ChartScales;
use pulse_core::settings::{GapsSettings, XAxisDateFormat};
use pulse_core::{convert, CategoricalPayload, MonospaceMeasure, Settings};

#[test]
fn collisions_suppress_against_last_survivor() {
    // 0 survives; 5 collides; 9 also collides with 0, so both go; 20 survives.
    assert_eq!(resolve_collisions(&[0.0, 5.0, 9.0, 20.0], 10.0), vec![true, false, false, true]);
    // 0 survives; 5 collides, 12 does not: the walk continues normally.
    assert_eq!(resolve_collisions(&[0.0, 5.0, 12.0, 30.0], 10.0), vec![true, false, true, true]);
    // Exactly one label width apart is not a collision.
    assert_eq!(resolve_collisions(&[0.0, 10.0, 20.0], 10.0), vec![true, true, true]);
}

#[test]
fn first_tick_always_survives() {
    for n in 1..50 {
        let positions: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
        let keep = resolve_collisions(&positions, 100.0);
        assert!(keep[0]);
    }
    assert!(resolve_collisions(&[], 10.0).is_empty());
}

#[test]
fn every_series_keeps_a_labelled_tick() {
    // Series of one point, of points closer than a minute, and a long run.
    let stamps = [0.0, 3_600_000.0, 3_610_000.0, 9_000_000.0, 9_060_000.0, 9_120_000.0, 20_000_000.0];
    let payload = CategoricalPayload::temporal(
        stamps.iter().copied().map(Some).collect(),
        (0..stamps.len()).map(|i| Some(i as f64)).collect(),
    );
    let mut settings = Settings::default();
    settings.gaps = GapsSettings { show: true, visible_gaps: 100.0 };
    let data = convert(&payload, &settings, &MonospaceMeasure::default()).expect("convert");
    assert!(data.series.len() >= 3);

    let scales = ChartScales::build(&data, 900.0, 400.0).expect("scales");
    let ticks = series_ticks(&data, &scales, &settings);
    assert_eq!(ticks.len(), data.series.len());
    for (i, st) in ticks.iter().enumerate() {
        assert_eq!(st.series, i);
        assert!(st.ticks.iter().any(|t| t.label.is_some()), "series {i} lost every label");
    }
}

#[test]
fn scalar_ticks_use_numeric_labels() {
    let payload = CategoricalPayload::scalar(
        (0..=10).map(|i| Some(f64::from(i) * 10.0)).collect(),
        (0..=10).map(|i| Some(f64::from(i))).collect(),
    );
    let mut settings = Settings::default();
    settings.x_axis.step = 25;
    let data = convert(&payload, &settings, &MonospaceMeasure::default()).expect("convert");
    let scales = ChartScales::build(&data, 1000.0, 300.0).expect("scales");
    let ticks = &series_ticks(&data, &scales, &settings)[0].ticks;
    let values: Vec<f64> = ticks.iter().map(|t| t.value).collect();
    assert_eq!(values, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    assert_eq!(ticks[1].label.as_deref(), Some("25"));
    assert_eq!(ticks[1].x, 250.0);
}

#[test]
fn formats_times_and_numbers() {
    let ms = 1_700_000_000_000.0; // 2023-11-14 22:13:20 UTC
    assert_eq!(format_time(ms, XAxisDateFormat::DateAndTime), "11/14/2023 22:13");
    assert_eq!(format_time(ms, XAxisDateFormat::DateOnly), "11/14/2023");
    assert_eq!(format_time(ms, XAxisDateFormat::TimeOnly), "22:13");
    assert_eq!(format_number(42.0, 2), "42");
    assert_eq!(format_number(3.14159, 2), "3.14");
    assert_eq!(format_number(2.5, 3), "2.500");
}
