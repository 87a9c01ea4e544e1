// File: crates/pulse-core/src/lib.rs
// Summary: Core library entry point; exports the public API for event-pulse chart conversion, playback and rendering.

pub mod axis;
pub mod chart;
pub mod controls;
pub mod convert;
pub mod geometry;
pub mod grid;
pub mod paint;
pub mod payload;
pub mod playback;
pub mod popup;
pub mod render;
pub mod scale;
pub mod selection;
pub mod series;
pub mod settings;
pub mod text;
pub mod theme;
pub mod types;

pub use chart::{ClickTarget, PulseChart};
pub use controls::PlaybackControl;
pub use convert::{convert, ChartData, ConvertError};
pub use paint::{render_to_png, render_to_png_bytes, render_to_rgba8, RenderOptions};
pub use payload::{CategoricalPayload, CategoryColumn, ColumnKind};
pub use playback::{AnimationState, Playback, PlaybackIntent, PlaybackState};
pub use render::{layers, DrawCommand, DrawList, Shape};
pub use selection::Selection;
pub use series::{DataPoint, PointId, Series};
pub use settings::{Settings, SettingsError, SettingsOverrides};
pub use text::{MonospaceMeasure, TextMeasure, TextShaper};
pub use theme::Theme;
pub use types::{Insets, Viewport};
