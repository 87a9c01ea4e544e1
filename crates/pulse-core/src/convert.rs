// File: crates/pulse-core/src/convert.rs
// Summary: Categorical payload -> ordered series, split on significant time gaps.

use thiserror::Error;

use crate::axis::{format_category, format_time, AXIS_FONT_SIZE};
use crate::payload::{CategoricalPayload, ColumnKind};
use crate::scale::{DomainScale, LinearScale};
use crate::series::{DataPoint, EventPopup, PointId, Series, SeriesStyle};
use crate::settings::{GapsSettings, Settings};
use crate::text::TextMeasure;

/// Gaps at or below this width (one minute in milliseconds) never split a series.
pub const MIN_GAP_WIDTH: f64 = 60_000.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConvertError {
    #[error("payload has no category column")]
    MissingCategory,
    #[error("payload has no value column")]
    MissingValues,
    #[error("category column of type {0:?} is neither date/time nor numeric")]
    UnsupportedCategory(ColumnKind),
    #[error("category column is empty")]
    EmptyCategory,
    #[error("value group {group} has {values} rows, category column has {categories}")]
    LengthMismatch { group: usize, categories: usize, values: usize },
    #[error("no row has both a category and a value")]
    NoPoints,
}

/// Pixel metrics of the labels the converter produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabelMetrics {
    /// Widest axis tick label.
    pub axis_label_width: f32,
    /// Widest popup time label.
    pub time_label_width: f32,
    /// Height of one wrapped description line.
    pub description_line_height: f32,
}

/// Converter output: everything later stages read, immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartData {
    pub series: Vec<Series>,
    pub is_scalar: bool,
    /// Number of vertical bands (value groups) in the payload.
    pub group_count: usize,
    pub labels: LabelMetrics,
}

impl ChartData {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(Series::len).sum()
    }

    pub fn points(&self) -> impl Iterator<Item = &DataPoint> {
        self.series.iter().flat_map(|s| s.points())
    }

    /// Locate a point: `(series index, position in series, point)`.
    pub fn find_point(&self, id: PointId) -> Option<(usize, usize, &DataPoint)> {
        self.series
            .iter()
            .enumerate()
            .find_map(|(si, s)| s.find(id).map(|(pi, p)| (si, pi, p)))
    }

    /// Category value of the last point of the last series.
    pub fn max_progress(&self) -> f64 {
        self.series.last().map(|s| s.last().category).unwrap_or(0.0)
    }
}

/// Distance to the previous row's category; 0 for the first row or when
/// either neighbour is missing.
pub fn gap_widths(payload: &CategoricalPayload) -> Vec<f64> {
    (0..payload.row_count())
        .map(|i| {
            if i == 0 {
                return 0.0;
            }
            match (payload.category_at(i - 1), payload.category_at(i)) {
                (Some(prev), Some(cur)) => cur - prev,
                _ => 0.0,
            }
        })
        .collect()
}

/// Width a gap must exceed to be shown. At 100% every gap above the floor
/// counts; lower percentages move the bar toward `max_gap_width`.
pub fn gap_threshold(max_gap_width: f64, visible_gaps: f64) -> f64 {
    MIN_GAP_WIDTH + (100.0 - visible_gaps) / 100.0 * (max_gap_width - MIN_GAP_WIDTH)
}

pub fn is_significant_gap(width: f64, max_gap_width: f64, gaps: &GapsSettings) -> bool {
    gaps.show && width > gap_threshold(max_gap_width, gaps.visible_gaps)
}

fn validate(payload: &CategoricalPayload) -> Result<bool, ConvertError> {
    let category = payload.category.as_ref().ok_or(ConvertError::MissingCategory)?;
    if payload.value_groups.is_empty() {
        return Err(ConvertError::MissingValues);
    }
    let is_scalar = match category.kind {
        ColumnKind::DateTime => false,
        ColumnKind::Numeric => true,
        kind @ ColumnKind::Text => return Err(ConvertError::UnsupportedCategory(kind)),
    };
    if category.values.is_empty() {
        return Err(ConvertError::EmptyCategory);
    }
    let categories = category.values.len();
    if let Some((group, values)) = payload
        .value_groups
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != categories)
    {
        return Err(ConvertError::LengthMismatch { group, categories, values });
    }
    Ok(is_scalar)
}

/// Convert a host payload into ordered series.
pub fn convert(
    payload: &CategoricalPayload,
    settings: &Settings,
    measure: &dyn TextMeasure,
) -> Result<ChartData, ConvertError> {
    let is_scalar = validate(payload)?;
    let rows = payload.row_count();

    let widths = gap_widths(payload);
    let max_gap_width = widths.iter().copied().fold(0.0_f64, f64::max);

    let sizes: Vec<f64> = (0..rows).filter_map(|i| payload.size_at(i)).collect();
    let size_scale = (!sizes.is_empty()).then(|| {
        let min = sizes.iter().copied().fold(f64::INFINITY, f64::min);
        let max = sizes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        LinearScale::new((min, max), (f64::from(settings.dots.min_size), f64::from(settings.dots.max_size)))
    });

    let style = SeriesStyle { color: settings.series.fill, width: settings.series.width };
    let popup_font = settings.popup.font_size as f32;
    let mut labels = LabelMetrics {
        description_line_height: measure.line_height(popup_font),
        ..Default::default()
    };

    let mut series = Vec::new();
    let mut points: Vec<DataPoint> = Vec::new();
    let mut last_value: Option<(f64, usize)> = None;

    for (i, &width) in widths.iter().enumerate() {
        if !points.is_empty() && is_significant_gap(width, max_gap_width, &settings.gaps) {
            if let Some(s) = Series::try_new(std::mem::take(&mut points), style, width) {
                series.push(s);
            }
        }

        let category = payload.category_at(i);
        let value = payload.value_at(i);
        // Without a time axis an isolated row cannot be placed; drop it.
        if is_scalar && (category.is_none() || value.is_none()) {
            continue;
        }
        let Some(category) = category else {
            continue;
        };
        // Temporal rows without a value hold the previous value; leading ones are dropped.
        let Some((value, group_index)) = value.or(last_value) else {
            continue;
        };
        last_value = Some((value, group_index));

        let label = format_category(category, is_scalar, settings);
        labels.axis_label_width = labels.axis_label_width.max(measure.measure_width(&label, AXIS_FONT_SIZE));

        let title = payload.title_at(i);
        let description = payload.description_at(i);
        let popup = (title.is_some() || description.is_some()).then(|| {
            let time = (!is_scalar).then(|| format_time(category, settings.x_axis.date_format));
            if let Some(t) = &time {
                labels.time_label_width = labels.time_label_width.max(measure.measure_width(t, popup_font));
            }
            let size = match (payload.size_at(i), &size_scale) {
                (Some(raw), Some(scale)) => scale.map(raw) as f32,
                _ => settings.dots.size,
            };
            EventPopup {
                title: title.map(str::to_owned),
                description: description.map(str::to_owned),
                time,
                size,
            }
        });

        points.push(DataPoint { id: PointId(i), category, value, group_index, popup, label });
    }

    if let Some(s) = Series::try_new(points, style, 0.0) {
        series.push(s);
    }
    if series.is_empty() {
        return Err(ConvertError::NoPoints);
    }

    let data = ChartData {
        series,
        is_scalar,
        group_count: payload.value_groups.len().clamp(1, 2),
        labels,
    };
    log::debug!(
        "converted {} rows into {} series ({} points, max gap {})",
        rows,
        data.series.len(),
        data.point_count(),
        max_gap_width
    );
    Ok(data)
}
