// File: crates/pulse-core/src/controls.rs
// Summary: Playback control strip: button layout, hit testing, enabled state and icon shapes.

use skia_safe as skia;

use crate::geometry::{PointF, RectF};
use crate::playback::PlaybackState;
use crate::render::{layers, DrawCommand, Shape};
use crate::types::Viewport;

pub const CONTROL_SIZE: f32 = 16.0;
pub const CONTROL_SPACING: f32 = 6.0;
/// Alpha applied to the control color of a disabled button.
const DISABLED_ALPHA: u8 = 70;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackControl {
    Play,
    Pause,
    ToStart,
    ToEnd,
}

impl PlaybackControl {
    pub const ALL: [PlaybackControl; 4] = [
        PlaybackControl::ToStart,
        PlaybackControl::Play,
        PlaybackControl::Pause,
        PlaybackControl::ToEnd,
    ];

    /// Whether pressing this control does anything in `state`.
    pub fn is_enabled(self, state: PlaybackState) -> bool {
        match self {
            PlaybackControl::Play => state != PlaybackState::Playing,
            PlaybackControl::Pause => state == PlaybackState::Playing,
            PlaybackControl::ToStart | PlaybackControl::ToEnd => state != PlaybackState::Ready,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlButton {
    pub control: PlaybackControl,
    pub rect: RectF,
    pub enabled: bool,
}

/// Buttons laid out left to right in the band above the plot.
pub fn layout_controls(viewport: &Viewport, state: PlaybackState) -> Vec<ControlButton> {
    let plot = viewport.plot_rect();
    let top = ((plot.top - CONTROL_SIZE) * 0.5).max(0.0);
    PlaybackControl::ALL
        .iter()
        .enumerate()
        .map(|(i, &control)| {
            let left = plot.left + i as f32 * (CONTROL_SIZE + CONTROL_SPACING);
            ControlButton {
                control,
                rect: RectF::from_ltwh(left, top, CONTROL_SIZE, CONTROL_SIZE),
                enabled: control.is_enabled(state),
            }
        })
        .collect()
}

/// Enabled control under `p`, if any.
pub fn hit_test(buttons: &[ControlButton], p: PointF) -> Option<PlaybackControl> {
    buttons.iter().find(|b| b.enabled && b.rect.contains(p)).map(|b| b.control)
}

fn triangle(rect: RectF, pointing_right: bool) -> Vec<PointF> {
    if pointing_right {
        vec![
            PointF::new(rect.left, rect.top),
            PointF::new(rect.right, (rect.top + rect.bottom) * 0.5),
            PointF::new(rect.left, rect.bottom),
        ]
    } else {
        vec![
            PointF::new(rect.right, rect.top),
            PointF::new(rect.left, (rect.top + rect.bottom) * 0.5),
            PointF::new(rect.right, rect.bottom),
        ]
    }
}

/// Icon shapes for every button; disabled buttons are dimmed.
pub fn control_commands(buttons: &[ControlButton], color: skia::Color) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    let mut push = |shape| out.push(DrawCommand { layer: layers::CONTROLS, shape });
    for b in buttons {
        let fill = if b.enabled { color } else { color.with_a(DISABLED_ALPHA) };
        let r = b.rect;
        let bar = CONTROL_SIZE * 0.2;
        match b.control {
            PlaybackControl::Play => push(Shape::Polygon { points: triangle(r, true), fill }),
            PlaybackControl::Pause => {
                push(Shape::Rect { rect: RectF::from_ltwh(r.left + bar * 0.5, r.top, bar * 1.5, r.height()), fill });
                push(Shape::Rect {
                    rect: RectF::from_ltwh(r.right - bar * 2.0, r.top, bar * 1.5, r.height()),
                    fill,
                });
            }
            PlaybackControl::ToStart => {
                push(Shape::Rect { rect: RectF::from_ltwh(r.left, r.top, bar, r.height()), fill });
                push(Shape::Polygon {
                    points: triangle(RectF::from_ltrb(r.left + bar, r.top, r.right, r.bottom), false),
                    fill,
                });
            }
            PlaybackControl::ToEnd => {
                push(Shape::Polygon {
                    points: triangle(RectF::from_ltrb(r.left, r.top, r.right - bar, r.bottom), true),
                    fill,
                });
                push(Shape::Rect { rect: RectF::from_ltwh(r.right - bar, r.top, bar, r.height()), fill });
            }
        }
    }
    out
}
