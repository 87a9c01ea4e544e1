// File: crates/pulse-core/tests/scale.rs
// Purpose: Domain scales: endpoint exactness, monotonicity, degenerate domains and the chart scale set.

use pulse_core::scale::{AxisScale, ChartScales, DomainScale, LinearScale, TimeScale, MINUTE_MS};
use pulse_core::{convert, CategoricalPayload, MonospaceMeasure, Settings};

#[test]
fn endpoints_map_exactly() {
    let domains = [(0.0, 1.0), (-250.5, 1e9), (3.0, -7.0), (1_600_000_000_000.0, 1_600_000_360_000.0)];
    let ranges = [(0.0, 800.0), (480.0, 0.0), (12.5, 97.25)];
    for &d in &domains {
        for &r in &ranges {
            let s = LinearScale::new(d, r);
            assert_eq!(s.map(d.0), r.0, "{d:?} -> {r:?}");
            assert_eq!(s.map(d.1), r.1, "{d:?} -> {r:?}");
            let t = TimeScale::new(d, r);
            assert_eq!(t.map(d.0), r.0);
            assert_eq!(t.map(d.1), r.1);
        }
    }
}

#[test]
fn mapping_is_monotonic() {
    let up = LinearScale::new((0.0, 100.0), (0.0, 640.0));
    let down = LinearScale::new((100.0, 0.0), (0.0, 640.0));
    let mut prev_up = f64::NEG_INFINITY;
    let mut prev_down = f64::INFINITY;
    for i in 0..=1000 {
        let v = i as f64 * 0.1;
        let a = up.map(v);
        let b = down.map(v);
        assert!(a >= prev_up);
        assert!(b <= prev_down);
        prev_up = a;
        prev_down = b;
    }
}

#[test]
fn degenerate_domain_maps_to_range_start() {
    let s = LinearScale::new((5.0, 5.0), (10.0, 90.0));
    assert_eq!(s.map(5.0), 10.0);
    assert_eq!(s.map(-100.0), 10.0);
    let t = TimeScale::new((60_000.0, 60_000.0), (0.0, 500.0));
    assert_eq!(t.map(60_000.0), 0.0);
}

#[test]
fn linear_ticks_step_through_domain() {
    let s = LinearScale::new((0.0, 100.0), (0.0, 1.0));
    assert_eq!(s.ticks(30), vec![0.0, 30.0, 60.0, 90.0]);
    let flat = LinearScale::new((4.0, 4.0), (0.0, 1.0));
    assert_eq!(flat.ticks(10), vec![4.0]);
}

#[test]
fn time_ticks_align_to_minute_multiples() {
    let start = 90_000.0; // 00:01:30
    let s = TimeScale::new((start, start + 10.0 * MINUTE_MS), (0.0, 1.0));
    let ticks = s.ticks(5);
    assert_eq!(ticks, vec![5.0 * MINUTE_MS, 10.0 * MINUTE_MS]);
    assert!(ticks.iter().all(|t| t % (5.0 * MINUTE_MS) == 0.0));

    // No multiple inside: fall back to the domain start.
    let short = TimeScale::new((start, start + 1_000.0), (0.0, 1.0));
    assert_eq!(short.ticks(30), vec![start]);
}

#[test]
fn huge_domains_keep_tick_counts_bounded() {
    let s = LinearScale::new((0.0, 1e12), (0.0, 1000.0));
    let ticks = s.ticks(1);
    assert!(!ticks.is_empty());
    assert!(ticks.len() <= 10_001);
}

#[test]
fn overflowing_spans_fall_back_to_the_domain_start() {
    let domain = (-1.7e308, 1.7e308);
    assert_eq!(TimeScale::new(domain, (0.0, 1000.0)).ticks(1), vec![-1.7e308]);
    assert_eq!(LinearScale::new(domain, (0.0, 1000.0)).ticks(1), vec![-1.7e308]);

    let t = TimeScale::new((0.0, 1e300), (0.0, 1000.0)).ticks(1);
    assert!(!t.is_empty() && t.len() <= 10_001);
}

#[test]
fn restricted_axis_scale_keeps_the_parent_mapping() {
    let x = AxisScale::new(false, (0.0, 1000.0), (0.0, 500.0));
    assert!(x.is_time());
    let sub = x.restrict(200.0, 600.0);
    assert_eq!(sub.domain(), (200.0, 600.0));
    assert_eq!(sub.range(), (100.0, 300.0));
    assert_eq!(sub.map(400.0), x.map(400.0));
}

#[test]
fn chart_scales_stack_groups_top_to_bottom() {
    let payload = CategoricalPayload::scalar(
        vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0)],
        vec![Some(10.0), Some(20.0), None, None],
    )
    .with_value_group(vec![None, None, Some(-5.0), Some(5.0)]);
    let data = convert(&payload, &Settings::default(), &MonospaceMeasure::default()).expect("convert");
    let scales = ChartScales::build(&data, 300.0, 200.0).expect("scales");

    assert_eq!(scales.x.domain(), (0.0, 3.0));
    assert_eq!(scales.x.range(), (0.0, 300.0));
    assert_eq!(scales.groups.len(), 2);

    // Group 0 in the top band, max value at the top.
    assert_eq!(scales.groups[0].domain(), (20.0, 10.0));
    assert_eq!(scales.groups[0].range(), (0.0, 100.0));
    assert_eq!(scales.project(0.0, 20.0, 0), (0.0, 0.0));
    // Group 1 in the bottom band.
    assert_eq!(scales.groups[1].range(), (100.0, 200.0));
    assert_eq!(scales.project(3.0, -5.0, 1), (300.0, 200.0));

    assert_eq!(scales.common.domain(), (20.0, -5.0));
    assert_eq!(scales.common.range(), (0.0, 200.0));
}
