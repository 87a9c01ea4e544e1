// File: crates/pulse-core/src/axis.rs
// Summary: Axis label formatting, per-series tick generation and label-collision suppression.

use chrono::DateTime;

use crate::convert::ChartData;
use crate::scale::{ChartScales, DomainScale};
use crate::settings::{Settings, XAxisDateFormat};

/// Font size of axis tick labels.
pub const AXIS_FONT_SIZE: f32 = 11.0;

/// Format epoch milliseconds (UTC) with the configured date format.
pub fn format_time(ms: f64, format: XAxisDateFormat) -> String {
    match DateTime::from_timestamp_millis(ms.round() as i64) {
        Some(dt) => dt.format(format.pattern()).to_string(),
        None => format_number(ms, 0),
    }
}

/// Integral values print without decimals; others with `decimals` places.
pub fn format_number(v: f64, decimals: u8) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.*}", decimals as usize, v)
    }
}

/// Axis label for a category value.
pub fn format_category(v: f64, is_scalar: bool, settings: &Settings) -> String {
    if is_scalar {
        format_number(v, settings.general.decimal_places)
    } else {
        format_time(v, settings.x_axis.date_format)
    }
}

/// One axis tick; `label` is `None` when suppressed by a collision.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Plot-local x position.
    pub x: f64,
    pub label: Option<String>,
}

impl Tick {
    pub fn is_suppressed(&self) -> bool {
        self.label.is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesTicks {
    pub series: usize,
    pub ticks: Vec<Tick>,
}

/// Walk positions left to right and decide which labels survive.
///
/// A position closer than `label_width` to the previous surviving one is
/// suppressed; when that happens and the next position collides with the same
/// survivor, it is suppressed too and the walk skips past both.
pub fn resolve_collisions(positions: &[f64], label_width: f64) -> Vec<bool> {
    let mut keep = vec![true; positions.len()];
    let mut last: Option<f64> = None;
    let mut i = 0;
    while i < positions.len() {
        let x = positions[i];
        match last {
            Some(prev) if (x - prev).abs() < label_width => {
                keep[i] = false;
                if let Some(&next) = positions.get(i + 1) {
                    if (next - prev).abs() < label_width {
                        keep[i + 1] = false;
                        i += 2;
                        continue;
                    }
                }
            }
            _ => last = Some(x),
        }
        i += 1;
    }
    keep
}

/// Ticks for every series, each computed against the horizontal scale
/// restricted to that series' own sub-domain.
pub fn series_ticks(data: &ChartData, scales: &ChartScales, settings: &Settings) -> Vec<SeriesTicks> {
    let label_width = f64::from(data.labels.axis_label_width);
    data.series
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            let (a, b) = s.domain();
            let scale = scales.x.restrict(a, b);
            let values = scale.ticks(settings.x_axis.step);
            let positions: Vec<f64> = values.iter().map(|&v| scale.map(v)).collect();
            let keep = resolve_collisions(&positions, label_width);
            let ticks = values
                .iter()
                .zip(positions)
                .zip(keep)
                .map(|((&value, x), keep)| Tick {
                    value,
                    x,
                    label: keep.then(|| format_category(value, data.is_scalar, settings)),
                })
                .collect();
            SeriesTicks { series: idx, ticks }
        })
        .collect()
}
