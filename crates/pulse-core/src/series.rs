// File: crates/pulse-core/src/series.rs
// Summary: Data point and series model produced by the converter, plus point capability traits.

use skia_safe as skia;

use crate::selection::Selection;

/// Stable identity of a data point (its source row index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub usize);

/// Event payload shown in a popup callout.
#[derive(Clone, Debug, PartialEq)]
pub struct EventPopup {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Formatted time; only on temporal charts.
    pub time: Option<String>,
    /// Dot radius for this event, scaled into the dot size bounds.
    pub size: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    pub id: PointId,
    /// Epoch milliseconds on a temporal chart, a plain scalar otherwise.
    pub category: f64,
    pub value: f64,
    /// Which vertical band/scale this point belongs to.
    pub group_index: usize,
    pub popup: Option<EventPopup>,
    /// Axis label text for `category`.
    pub label: String,
}

pub trait Identifiable {
    fn identity(&self) -> PointId;
}

pub trait TooltipBearing {
    fn tooltip(&self) -> Option<&EventPopup>;

    fn has_tooltip(&self) -> bool {
        self.tooltip().is_some()
    }
}

pub trait Selectable: Identifiable {
    fn is_selected(&self, selection: &Selection) -> bool {
        selection.contains(self.identity())
    }
}

impl Identifiable for DataPoint {
    fn identity(&self) -> PointId {
        self.id
    }
}

impl TooltipBearing for DataPoint {
    fn tooltip(&self) -> Option<&EventPopup> {
        self.popup.as_ref()
    }
}

impl Selectable for DataPoint {}

impl DataPoint {
    /// Radius of this point's dot: the event size when present, else `default_size`.
    pub fn dot_radius(&self, default_size: f32) -> f32 {
        self.popup.as_ref().map(|p| p.size).unwrap_or(default_size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesStyle {
    pub color: skia::Color,
    pub width: f32,
}

/// A contiguous, gap-free run of points drawn as one line.
/// Contract: `points` is non-empty and in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    points: Vec<DataPoint>,
    pub style: SeriesStyle,
    /// Width of the gap that closed this series; 0 for the last one.
    /// The gap in front of `series[i]` is therefore `series[i - 1].width_of_gap`.
    pub width_of_gap: f64,
}

impl Series {
    /// Build a series; `None` for an empty point list.
    pub fn try_new(points: Vec<DataPoint>, style: SeriesStyle, width_of_gap: f64) -> Option<Self> {
        (!points.is_empty()).then_some(Self { points, style, width_of_gap })
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &DataPoint {
        &self.points[0]
    }

    pub fn last(&self) -> &DataPoint {
        &self.points[self.points.len() - 1]
    }

    /// `(first category, last category)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.first().category, self.last().category)
    }

    /// Position and point carrying `id`.
    pub fn find(&self, id: PointId) -> Option<(usize, &DataPoint)> {
        self.points.iter().enumerate().find(|(_, p)| p.id == id)
    }
}
