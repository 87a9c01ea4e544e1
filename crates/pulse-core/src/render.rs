// File: crates/pulse-core/src/render.rs
// Summary: Renderer-agnostic draw list and the frame builder mapping chart state to shapes.

use std::collections::HashMap;

use skia_safe as skia;

use crate::axis::{format_number, SeriesTicks, AXIS_FONT_SIZE};
use crate::controls::{control_commands, layout_controls};
use crate::convert::ChartData;
use crate::geometry::{PointF, RectF};
use crate::grid::value_levels;
use crate::playback::{AnimationState, PlaybackState, StepFrame};
use crate::popup::{layout_popup, PopupLayout, POPUP_CORNER_RADIUS};
use crate::scale::{ChartScales, DomainScale};
use crate::selection::Selection;
use crate::series::{PointId, Selectable, TooltipBearing};
use crate::settings::{AxisPosition, PopupShowType, Settings};
use crate::text::TextMeasure;
use crate::types::Viewport;

/// Layer names tagging every command, one per kind of chart element.
pub mod layers {
    pub const CLEAR_CATCHER: &str = "clearCatcher";
    pub const Y_AXIS: &str = "yAxisNode";
    pub const X_AXIS: &str = "xAxisNode";
    pub const GAP: &str = "gapNode";
    pub const LINE: &str = "lineNode";
    pub const DOT: &str = "dot";
    pub const MARKER: &str = "animationDot";
    pub const POPUP: &str = "popup";
    pub const CONTROLS: &str = "playbackControls";
}

/// Half length of a gap glyph stroke.
const GAP_TICK: f32 = 5.0;
/// Horizontal distance between the two strokes of a gap glyph.
const GAP_TICK_SPACING: f32 = 4.0;
const TICK_LENGTH: f32 = 4.0;
const Y_TICK_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Polyline { points: Vec<PointF>, color: skia::Color, width: f32 },
    Line { from: PointF, to: PointF, color: skia::Color, width: f32 },
    Circle { center: PointF, radius: f32, fill: skia::Color, stroke: Option<(skia::Color, f32)> },
    Rect { rect: RectF, fill: skia::Color },
    RoundRect { rect: RectF, radius: f32, fill: skia::Color },
    Polygon { points: Vec<PointF>, fill: skia::Color },
    /// `origin` is the baseline anchor; `align` says which end of the text it is.
    Text { origin: PointF, text: String, size: f32, color: skia::Color, align: TextAlign },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub layer: &'static str,
    pub shape: Shape,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawList {
    pub background: skia::Color,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(background: skia::Color) -> Self {
        Self { background, commands: Vec::new() }
    }

    pub fn push(&mut self, layer: &'static str, shape: Shape) {
        self.commands.push(DrawCommand { layer, shape });
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = DrawCommand>) {
        self.commands.extend(commands);
    }

    pub fn in_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a Shape> + 'a {
        self.commands.iter().filter(move |c| c.layer == layer).map(|c| &c.shape)
    }

    pub fn count(&self, layer: &str) -> usize {
        self.commands.iter().filter(|c| c.layer == layer).count()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Everything one frame is built from.
pub struct FrameContext<'a> {
    pub data: &'a ChartData,
    pub scales: &'a ChartScales,
    pub ticks: &'a [SeriesTicks],
    pub settings: &'a Settings,
    pub viewport: Viewport,
    pub animation: &'a AnimationState,
    pub marker: Option<StepFrame>,
    pub selection: &'a Selection,
    /// Dot radii set by playback activation.
    pub dot_sizes: &'a HashMap<PointId, f32>,
    pub measure: &'a dyn TextMeasure,
}

impl FrameContext<'_> {
    fn to_surface(&self, x: f64, y: f64) -> PointF {
        let plot = self.viewport.plot_rect();
        PointF::new(plot.left + x as f32, plot.top + y as f32)
    }

    fn x_axis_y(&self) -> f32 {
        let plot = self.viewport.plot_rect();
        match self.settings.x_axis.position {
            AxisPosition::Center => plot.top + plot.height() * 0.5,
            AxisPosition::Bottom => plot.bottom,
        }
    }

    /// Number of points of series `s` currently revealed.
    fn revealed(&self, s: usize, len: usize) -> usize {
        match self.animation.state {
            PlaybackState::Ready => len,
            PlaybackState::Playing | PlaybackState::Paused => {
                if s < self.animation.series {
                    len
                } else if s == self.animation.series {
                    (self.animation.index.floor() as usize).min(len)
                } else {
                    0
                }
            }
        }
    }
}

/// Build the draw list for the current chart state.
pub fn build_frame(ctx: &FrameContext<'_>, background: skia::Color) -> DrawList {
    let mut list = DrawList::new(background);
    let plot = ctx.viewport.plot_rect();

    list.push(layers::CLEAR_CATCHER, Shape::Rect { rect: plot, fill: skia::Color::TRANSPARENT });
    draw_y_axis(ctx, &mut list);
    draw_x_axis(ctx, &mut list);
    draw_gaps(ctx, &mut list);
    draw_lines(ctx, &mut list);
    draw_dots(ctx, &mut list);
    draw_marker(ctx, &mut list);
    draw_popups(ctx, &mut list);

    let buttons = layout_controls(&ctx.viewport, ctx.animation.state);
    list.extend(control_commands(&buttons, ctx.animation.control_color));
    list
}

fn draw_y_axis(ctx: &FrameContext<'_>, list: &mut DrawList) {
    let axis = &ctx.settings.y_axis;
    if !axis.show {
        return;
    }
    let plot = ctx.viewport.plot_rect();
    list.push(
        layers::Y_AXIS,
        Shape::Line {
            from: PointF::new(plot.left, plot.top),
            to: PointF::new(plot.left, plot.bottom),
            color: axis.color,
            width: 1.0,
        },
    );
    let (top_value, bottom_value) = ctx.scales.common.domain();
    let decimals = ctx.settings.general.decimal_places;
    for v in value_levels(bottom_value, top_value, Y_TICK_COUNT) {
        let y = plot.top + ctx.scales.common.map(v) as f32;
        list.push(
            layers::Y_AXIS,
            Shape::Line {
                from: PointF::new(plot.left - TICK_LENGTH, y),
                to: PointF::new(plot.left, y),
                color: axis.color,
                width: 1.0,
            },
        );
        list.push(
            layers::Y_AXIS,
            Shape::Text {
                origin: PointF::new(plot.left - TICK_LENGTH - 2.0, y + AXIS_FONT_SIZE * 0.35),
                text: format_number(v, decimals),
                size: AXIS_FONT_SIZE,
                color: axis.font_color,
                align: TextAlign::Right,
            },
        );
    }
}

fn draw_x_axis(ctx: &FrameContext<'_>, list: &mut DrawList) {
    let axis = &ctx.settings.x_axis;
    if !axis.show {
        return;
    }
    let y = ctx.x_axis_y();
    for (s, series) in ctx.data.series.iter().enumerate() {
        let (a, b) = series.domain();
        let from = ctx.to_surface(ctx.scales.x.map(a), 0.0);
        let to = ctx.to_surface(ctx.scales.x.map(b), 0.0);
        list.push(
            layers::X_AXIS,
            Shape::Line { from: PointF::new(from.x, y), to: PointF::new(to.x, y), color: axis.color, width: 1.0 },
        );
        let Some(ticks) = ctx.ticks.iter().find(|t| t.series == s) else {
            continue;
        };
        for tick in &ticks.ticks {
            let x = ctx.to_surface(tick.x, 0.0).x;
            list.push(
                layers::X_AXIS,
                Shape::Line {
                    from: PointF::new(x, y),
                    to: PointF::new(x, y + TICK_LENGTH),
                    color: axis.color,
                    width: 1.0,
                },
            );
            if let Some(label) = &tick.label {
                list.push(
                    layers::X_AXIS,
                    Shape::Text {
                        origin: PointF::new(x, y + TICK_LENGTH + AXIS_FONT_SIZE + 2.0),
                        text: label.clone(),
                        size: AXIS_FONT_SIZE,
                        color: axis.font_color,
                        align: TextAlign::Center,
                    },
                );
            }
        }
    }
}

/// Midpoints (surface x) between consecutive series.
pub fn gap_positions(data: &ChartData, scales: &ChartScales, viewport: &Viewport) -> Vec<f32> {
    let left = viewport.plot_rect().left;
    data.series
        .windows(2)
        .map(|pair| {
            let end = scales.x.map(pair[0].last().category);
            let start = scales.x.map(pair[1].first().category);
            left + ((end + start) * 0.5) as f32
        })
        .collect()
}

fn draw_gaps(ctx: &FrameContext<'_>, list: &mut DrawList) {
    let y = ctx.x_axis_y();
    let color = ctx.settings.x_axis.color;
    for x in gap_positions(ctx.data, ctx.scales, &ctx.viewport) {
        for dx in [-GAP_TICK_SPACING * 0.5, GAP_TICK_SPACING * 0.5] {
            list.push(
                layers::GAP,
                Shape::Line {
                    from: PointF::new(x + dx - GAP_TICK * 0.5, y + GAP_TICK),
                    to: PointF::new(x + dx + GAP_TICK * 0.5, y - GAP_TICK),
                    color,
                    width: 1.5,
                },
            );
        }
    }
}

fn draw_lines(ctx: &FrameContext<'_>, list: &mut DrawList) {
    for (s, series) in ctx.data.series.iter().enumerate() {
        let shown = ctx.revealed(s, series.len());
        if shown == 0 {
            continue;
        }
        let mut points: Vec<PointF> = series.points()[..shown]
            .iter()
            .map(|p| {
                let (x, y) = ctx.scales.project(p.category, p.value, p.group_index);
                ctx.to_surface(x, y)
            })
            .collect();
        if let Some(marker) = ctx.marker.filter(|m| m.series == s && ctx.animation.state != PlaybackState::Ready) {
            points.push(ctx.to_surface(marker.x, marker.y));
        }
        if points.len() < 2 {
            continue;
        }
        list.push(
            layers::LINE,
            Shape::Polyline { points, color: series.style.color, width: series.style.width },
        );
    }
}

/// A drawn event dot in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleDot {
    pub id: PointId,
    pub center: PointF,
    pub radius: f32,
}

/// Event dots currently revealed, in series order.
pub fn visible_dots(ctx: &FrameContext<'_>) -> Vec<VisibleDot> {
    let default_size = ctx.settings.dots.size;
    let animating = ctx.animation.state != PlaybackState::Ready;
    let mut out = Vec::new();
    for (s, series) in ctx.data.series.iter().enumerate() {
        let shown = ctx.revealed(s, series.len());
        for p in series.points()[..shown].iter().filter(|p| p.has_tooltip()) {
            let radius = if animating {
                ctx.dot_sizes.get(&p.id).copied().unwrap_or(default_size)
            } else {
                p.dot_radius(default_size)
            };
            let (x, y) = ctx.scales.project(p.category, p.value, p.group_index);
            out.push(VisibleDot { id: p.id, center: ctx.to_surface(x, y), radius });
        }
    }
    out
}

fn draw_dots(ctx: &FrameContext<'_>, list: &mut DrawList) {
    let fill = ctx.settings.dots.fill();
    for dot in visible_dots(ctx) {
        let stroke = ctx
            .selection
            .contains(dot.id)
            .then_some((ctx.settings.series.selection_color, 2.0));
        list.push(layers::DOT, Shape::Circle { center: dot.center, radius: dot.radius, fill, stroke });
    }
}

fn draw_marker(ctx: &FrameContext<'_>, list: &mut DrawList) {
    if ctx.animation.state == PlaybackState::Ready {
        return;
    }
    if let Some(m) = ctx.marker {
        list.push(
            layers::MARKER,
            Shape::Circle {
                center: ctx.to_surface(m.x, m.y),
                radius: ctx.settings.dots.size,
                fill: ctx.animation.control_color,
                stroke: None,
            },
        );
    }
}

/// Popup layouts for the selected, revealed event points.
pub fn visible_popups(ctx: &FrameContext<'_>) -> Vec<(PointId, PopupLayout)> {
    match ctx.settings.popup.show_type {
        PopupShowType::Hide => return Vec::new(),
        PopupShowType::ShowOnSelection => {}
    }
    let plot = ctx.viewport.plot_rect();
    let split_y = plot.top + (ctx.scales.plot_height * 0.5) as f32;
    visible_dots(ctx)
        .into_iter()
        .filter_map(|dot| {
            let (_, _, point) = ctx.data.find_point(dot.id)?;
            if !point.is_selected(ctx.selection) {
                return None;
            }
            let popup = point.tooltip()?;
            let layout = layout_popup(dot.center, dot.radius, popup, &ctx.settings.popup, plot, split_y, ctx.measure);
            Some((dot.id, layout))
        })
        .collect()
}

fn draw_popups(ctx: &FrameContext<'_>, list: &mut DrawList) {
    let popup = &ctx.settings.popup;
    let font = popup.font_size as f32;
    for (_, layout) in visible_popups(ctx) {
        list.push(
            layers::POPUP,
            Shape::RoundRect { rect: layout.body, radius: POPUP_CORNER_RADIUS, fill: popup.color },
        );
        list.push(layers::POPUP, Shape::Polygon { points: layout.pointer.to_vec(), fill: popup.color });
        if let Some(rect) = layout.time_box {
            list.push(layers::POPUP, Shape::Rect { rect, fill: popup.time_fill });
        }
        if let Some(run) = layout.time {
            list.push(
                layers::POPUP,
                Shape::Text { origin: run.origin, text: run.text, size: font, color: popup.time_color, align: TextAlign::Left },
            );
        }
        for run in layout.title.into_iter().chain(layout.description) {
            list.push(
                layers::POPUP,
                Shape::Text { origin: run.origin, text: run.text, size: font, color: popup.font_color, align: TextAlign::Left },
            );
        }
    }
}
