// File: crates/pulse-core/src/scale.rs
// Summary: Numeric and time domain scales (domain -> pixel range) and the chart's scale set.

use crate::convert::ChartData;

/// Milliseconds per minute; time-axis tick steps are expressed in minutes.
pub const MINUTE_MS: f64 = 60_000.0;
/// Upper bound on candidate ticks per scale; the step widens to stay under it.
pub const MAX_CANDIDATE_TICKS: f64 = 10_000.0;

/// Shared mapping contract of every scale kind.
pub trait DomainScale {
    fn domain(&self) -> (f64, f64);
    fn range(&self) -> (f64, f64);
    /// Map a domain value to the pixel range. A zero-width domain maps
    /// everything to the range start.
    fn map(&self, v: f64) -> f64;
    /// Candidate tick values inside the domain, ascending. Never empty.
    fn ticks(&self, step: u32) -> Vec<f64>;
}

#[inline]
fn linear_map(d: (f64, f64), r: (f64, f64), v: f64) -> f64 {
    let span = d.1 - d.0;
    if span == 0.0 || !span.is_finite() {
        return r.0;
    }
    let t = (v - d.0) / span;
    r.0 * (1.0 - t) + r.1 * t
}

/// Multiply `step` by whole factors until `span` holds at most `MAX_CANDIDATE_TICKS` steps.
fn widen_step(step: f64, span: f64) -> f64 {
    if !span.is_finite() || span <= step * MAX_CANDIDATE_TICKS {
        return step;
    }
    step * (span / (step * MAX_CANDIDATE_TICKS)).ceil()
}

#[inline]
fn ordered(d: (f64, f64)) -> (f64, f64) {
    if d.0 <= d.1 { d } else { (d.1, d.0) }
}

/// Continuous numeric scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }
}

impl DomainScale for LinearScale {
    fn domain(&self) -> (f64, f64) { self.domain }
    fn range(&self) -> (f64, f64) { self.range }

    #[inline]
    fn map(&self, v: f64) -> f64 {
        linear_map(self.domain, self.range, v)
    }

    /// `lo, lo + step, ...` up to and including `hi`.
    fn ticks(&self, step: u32) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        let step = widen_step(f64::from(step.max(1)), hi - lo);
        let count = ((hi - lo) / step).floor();
        if !count.is_finite() || count < 0.0 || count > MAX_CANDIDATE_TICKS {
            return vec![lo];
        }
        (0..=count as usize).map(|i| lo + step * i as f64).collect()
    }
}

/// Time scale over epoch milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }
}

impl DomainScale for TimeScale {
    fn domain(&self) -> (f64, f64) { self.domain }
    fn range(&self) -> (f64, f64) { self.range }

    #[inline]
    fn map(&self, v: f64) -> f64 {
        linear_map(self.domain, self.range, v)
    }

    /// Instants on multiples of `step` minutes inside the domain; the domain
    /// start when no such instant exists.
    fn ticks(&self, step: u32) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        let step_ms = widen_step(f64::from(step.max(1)) * MINUTE_MS, hi - lo);
        let first = (lo / step_ms).ceil() * step_ms;
        if !first.is_finite() || first > hi {
            return vec![lo];
        }
        let count = ((hi - first) / step_ms).floor();
        if !count.is_finite() || count > MAX_CANDIDATE_TICKS {
            return vec![lo];
        }
        (0..=count as usize).map(|i| first + step_ms * i as f64).collect()
    }
}

/// Horizontal scale; the kind follows the chart's scalar/temporal mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisScale {
    Linear(LinearScale),
    Time(TimeScale),
}

impl AxisScale {
    pub fn new(is_scalar: bool, domain: (f64, f64), range: (f64, f64)) -> Self {
        if is_scalar {
            AxisScale::Linear(LinearScale::new(domain, range))
        } else {
            AxisScale::Time(TimeScale::new(domain, range))
        }
    }

    pub fn is_time(&self) -> bool {
        matches!(self, AxisScale::Time(_))
    }

    /// Same mapping, restricted to the sub-domain `[a, b]`.
    pub fn restrict(&self, a: f64, b: f64) -> Self {
        let range = (self.map(a), self.map(b));
        match self {
            AxisScale::Linear(_) => AxisScale::Linear(LinearScale::new((a, b), range)),
            AxisScale::Time(_) => AxisScale::Time(TimeScale::new((a, b), range)),
        }
    }
}

impl DomainScale for AxisScale {
    fn domain(&self) -> (f64, f64) {
        match self {
            AxisScale::Linear(s) => s.domain(),
            AxisScale::Time(s) => s.domain(),
        }
    }

    fn range(&self) -> (f64, f64) {
        match self {
            AxisScale::Linear(s) => s.range(),
            AxisScale::Time(s) => s.range(),
        }
    }

    fn map(&self, v: f64) -> f64 {
        match self {
            AxisScale::Linear(s) => s.map(v),
            AxisScale::Time(s) => s.map(v),
        }
    }

    fn ticks(&self, step: u32) -> Vec<f64> {
        match self {
            AxisScale::Linear(s) => s.ticks(step),
            AxisScale::Time(s) => s.ticks(step),
        }
    }
}

/// Every scale one render pass needs, in plot-local pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartScales {
    /// `[first category, last category] -> [0, plot_width]`.
    pub x: AxisScale,
    /// Per group: `[max, min] -> [g/G * h, (g+1)/G * h]`.
    pub groups: Vec<LinearScale>,
    /// Union of the group domains: `[max, min] -> [0, h]`.
    pub common: LinearScale,
    pub plot_width: f64,
    pub plot_height: f64,
}

impl ChartScales {
    /// Returns `None` when the data holds no points.
    pub fn build(data: &ChartData, plot_width: f64, plot_height: f64) -> Option<Self> {
        let first = data.series.first()?.first().category;
        let last = data.series.last()?.last().category;
        let x = AxisScale::new(data.is_scalar, (first, last), (0.0, plot_width));

        let group_count = data.group_count.max(1);
        let mut bounds = vec![(f64::INFINITY, f64::NEG_INFINITY); group_count];
        for p in data.series.iter().flat_map(|s| s.points()) {
            if let Some(b) = bounds.get_mut(p.group_index) {
                b.0 = b.0.min(p.value);
                b.1 = b.1.max(p.value);
            }
        }

        let band = plot_height / group_count as f64;
        let groups = bounds
            .iter()
            .enumerate()
            .map(|(g, &(min, max))| {
                let (min, max) = if min <= max { (min, max) } else { (0.0, 0.0) };
                LinearScale::new((max, min), (g as f64 * band, (g + 1) as f64 * band))
            })
            .collect();

        let (min_all, max_all) = bounds
            .iter()
            .filter(|(min, max)| min <= max)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |acc, &(min, max)| (acc.0.min(min), acc.1.max(max)));
        let common = LinearScale::new((max_all, min_all), (0.0, plot_height));

        Some(Self { x, groups, common, plot_width, plot_height })
    }

    /// Vertical scale for a group; falls back to the common scale.
    pub fn y_for_group(&self, group: usize) -> &LinearScale {
        self.groups.get(group).unwrap_or(&self.common)
    }

    /// Plot-local pixel position of a point.
    pub fn project(&self, category: f64, value: f64, group: usize) -> (f64, f64) {
        (self.x.map(category), self.y_for_group(group).map(value))
    }
}
