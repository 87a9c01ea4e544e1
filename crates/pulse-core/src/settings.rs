// File: crates/pulse-core/src/settings.rs
// Summary: Host setting overrides (serde) and their resolution into a clamped Settings snapshot.

use std::time::Duration;

use serde::Deserialize;
use skia_safe as skia;
use thiserror::Error;

use crate::theme::{ColorHelper, ColorRole, FillOverride, Palette, Theme};

/// Lower bound of the popup width, in pixels.
pub const POPUP_MIN_WIDTH: f32 = 1.0;
/// Upper bound of the popup width, in pixels.
pub const POPUP_MAX_WIDTH: f32 = 999_999.0;
/// Horizontal room kept around the time label inside a popup.
pub const POPUP_LABEL_PADDING: f32 = 20.0;
/// Step duration used when the play speed is not a positive number.
pub const FALLBACK_STEP_DURATION: Duration = Duration::from_millis(300);
/// Longest step, hold or autoplay delay, in seconds (one day).
pub const MAX_TIMER_SECS: f64 = 86_400.0;
/// Largest number of decimal places used for value labels.
pub const MAX_DECIMAL_PLACES: u8 = 10;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---- closed option enums --------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PopupShowType {
    Hide,
    #[default]
    ShowOnSelection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum AxisPosition {
    #[default]
    Center,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum XAxisDateFormat {
    #[default]
    DateAndTime,
    DateOnly,
    TimeOnly,
}

impl XAxisDateFormat {
    /// chrono format string for this variant.
    pub fn pattern(self) -> &'static str {
        match self {
            XAxisDateFormat::DateAndTime => "%m/%d/%Y %H:%M",
            XAxisDateFormat::DateOnly => "%m/%d/%Y",
            XAxisDateFormat::TimeOnly => "%H:%M",
        }
    }
}

// ---- overrides -------------------------------------------------------------

/// Integer-ish host value: hosts send font sizes as numbers or numeric strings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    /// Leading integer of the value, if any.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            NumberOrText::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            NumberOrText::Number(_) => None,
            NumberOrText::Text(s) => {
                let s = s.trim();
                let (sign, digits) = match s.strip_prefix('-') {
                    Some(rest) => (-1, rest),
                    None => (1, s.strip_prefix('+').unwrap_or(s)),
                };
                let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
                digits[..end].parse::<i64>().ok().map(|v| v * sign)
            }
        }
    }
}

/// Host metadata object keyed by option group. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsOverrides {
    pub series: SeriesOverrides,
    pub gaps: GapsOverrides,
    pub popup: PopupOverrides,
    pub dots: DotsOverrides,
    pub x_axis: XAxisOverrides,
    pub y_axis: YAxisOverrides,
    pub playback: PlaybackOverrides,
    pub general: GeneralOverrides,
}

impl SettingsOverrides {
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesOverrides {
    pub fill: Option<FillOverride>,
    pub width: Option<f32>,
    pub selection_color: Option<FillOverride>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GapsOverrides {
    pub show: Option<bool>,
    pub visible_gaps: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PopupOverrides {
    pub show_type: Option<PopupShowType>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub color: Option<FillOverride>,
    pub font_size: Option<NumberOrText>,
    pub font_color: Option<FillOverride>,
    pub show_time: Option<bool>,
    pub show_title: Option<bool>,
    pub time_color: Option<FillOverride>,
    pub time_fill: Option<FillOverride>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DotsOverrides {
    pub color: Option<FillOverride>,
    pub size: Option<f32>,
    pub min_size: Option<f32>,
    pub max_size: Option<f32>,
    pub transparency: Option<f32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct XAxisOverrides {
    pub show: Option<bool>,
    pub color: Option<FillOverride>,
    pub font_color: Option<FillOverride>,
    pub step: Option<NumberOrText>,
    pub date_format: Option<XAxisDateFormat>,
    pub position: Option<AxisPosition>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YAxisOverrides {
    pub show: Option<bool>,
    pub color: Option<FillOverride>,
    pub font_color: Option<FillOverride>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackOverrides {
    pub autoplay: Option<bool>,
    pub play_speed: Option<f64>,
    pub pause_duration: Option<f64>,
    pub autoplay_pause_duration: Option<f64>,
    pub color: Option<FillOverride>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralOverrides {
    pub decimal_places: Option<NumberOrText>,
}

// ---- resolved settings -----------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSettings {
    pub fill: skia::Color,
    pub width: f32,
    pub selection_color: skia::Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GapsSettings {
    pub show: bool,
    /// Percentage in `[1, 100]`.
    pub visible_gaps: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PopupSettings {
    pub show_type: PopupShowType,
    pub width: f32,
    pub height: f32,
    pub color: skia::Color,
    pub font_size: u32,
    pub font_color: skia::Color,
    pub show_time: bool,
    pub show_title: bool,
    pub time_color: skia::Color,
    pub time_fill: skia::Color,
}

impl PopupSettings {
    /// Widen the popup so the time label (plus padding) always fits.
    pub fn fit_to_label(&mut self, label_width: f32) {
        if label_width.is_finite() {
            self.width = self.width.max(label_width + POPUP_LABEL_PADDING);
        }
    }
}

/// Dot sizing. Contract: `min_size <= size <= max_size`.
#[derive(Clone, Debug, PartialEq)]
pub struct DotsSettings {
    pub color: skia::Color,
    pub size: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Percent in `[0, 100]`; applied to the dot fill alpha.
    pub transparency: f32,
}

impl DotsSettings {
    /// Dot fill with transparency applied.
    pub fn fill(&self) -> skia::Color {
        let alpha = (255.0 * (1.0 - self.transparency / 100.0)).round().clamp(0.0, 255.0) as u8;
        self.color.with_a(alpha)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct XAxisSettings {
    pub show: bool,
    pub color: skia::Color,
    pub font_color: skia::Color,
    /// Tick step: minutes on a time axis, domain units on a numeric one. At least 1.
    pub step: u32,
    pub date_format: XAxisDateFormat,
    pub position: AxisPosition,
}

#[derive(Clone, Debug, PartialEq)]
pub struct YAxisSettings {
    pub show: bool,
    pub color: skia::Color,
    pub font_color: skia::Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackSettings {
    pub autoplay: bool,
    /// Points per second.
    pub play_speed: f64,
    /// Seconds to hold an event popup before resuming.
    pub pause_duration: f64,
    /// Seconds to wait before autoplay starts.
    pub autoplay_pause_duration: f64,
    pub color: skia::Color,
}

impl PlaybackSettings {
    /// Duration of one interpolation step (one point to the next).
    pub fn step_duration(&self) -> Duration {
        if self.play_speed.is_finite() && self.play_speed > 0.0 {
            timer_duration(1.0 / self.play_speed).max(Duration::from_millis(1))
        } else {
            FALLBACK_STEP_DURATION
        }
    }

    pub fn pause_duration(&self) -> Duration {
        timer_duration(self.pause_duration)
    }

    pub fn autoplay_delay(&self) -> Duration {
        timer_duration(self.autoplay_pause_duration)
    }
}

/// Seconds as a Duration, clamped into `[0, MAX_TIMER_SECS]`; NaN is zero.
fn timer_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.clamp(0.0, MAX_TIMER_SECS)).unwrap_or(Duration::ZERO)
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneralSettings {
    pub decimal_places: u8,
}

/// Resolved configuration snapshot, built once per data update.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub series: SeriesSettings,
    pub gaps: GapsSettings,
    pub popup: PopupSettings,
    pub dots: DotsSettings,
    pub x_axis: XAxisSettings,
    pub y_axis: YAxisSettings,
    pub playback: PlaybackSettings,
    pub general: GeneralSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::resolve(&SettingsOverrides::default(), &Theme::default())
    }
}

/// Timer seconds clamped into `[0, MAX_TIMER_SECS]`.
fn timer_secs(v: Option<f64>, default: f64) -> f64 {
    match v {
        Some(v) if v.is_finite() => v.clamp(0.0, MAX_TIMER_SECS),
        _ => default,
    }
}

fn finite_f32(v: Option<f32>, default: f32) -> f32 {
    match v {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

impl Settings {
    /// Merge overrides with defaults. Out-of-range values are clamped, never rejected.
    pub fn resolve(o: &SettingsOverrides, palette: &dyn Palette) -> Settings {
        let colors = ColorHelper::new(palette);

        let series = SeriesSettings {
            fill: colors.resolve(o.series.fill.as_ref(), ColorRole::SeriesFill),
            width: finite_f32(o.series.width, 2.0).max(0.0),
            selection_color: colors.resolve(o.series.selection_color.as_ref(), ColorRole::SeriesSelection),
        };

        let visible_gaps = match o.gaps.visible_gaps {
            Some(p) if p.is_finite() => p.clamp(1.0, 100.0),
            _ => 1.0,
        };
        let gaps = GapsSettings { show: o.gaps.show.unwrap_or(false), visible_gaps };

        let font_size = o
            .popup
            .font_size
            .as_ref()
            .and_then(NumberOrText::as_integer)
            .filter(|v| *v >= 1)
            .map(|v| v.min(u32::MAX as i64) as u32)
            .unwrap_or(10);
        let popup = PopupSettings {
            show_type: o.popup.show_type.unwrap_or_default(),
            width: finite_f32(o.popup.width, 100.0).clamp(POPUP_MIN_WIDTH, POPUP_MAX_WIDTH),
            height: finite_f32(o.popup.height, 80.0).clamp(POPUP_MIN_WIDTH, POPUP_MAX_WIDTH),
            color: colors.resolve(o.popup.color.as_ref(), ColorRole::PopupFill),
            font_size,
            font_color: colors.resolve(o.popup.font_color.as_ref(), ColorRole::PopupFont),
            show_time: o.popup.show_time.unwrap_or(true),
            show_title: o.popup.show_title.unwrap_or(true),
            time_color: colors.resolve(o.popup.time_color.as_ref(), ColorRole::PopupTime),
            time_fill: colors.resolve(o.popup.time_fill.as_ref(), ColorRole::PopupTimeFill),
        };

        let min_size = finite_f32(o.dots.min_size, 5.0).max(0.0);
        let max_size = finite_f32(o.dots.max_size, 20.0).max(min_size);
        let size = finite_f32(o.dots.size, 5.0).clamp(min_size, max_size);
        let dots = DotsSettings {
            color: colors.resolve(o.dots.color.as_ref(), ColorRole::DotFill),
            size,
            min_size,
            max_size,
            transparency: finite_f32(o.dots.transparency, 25.0).clamp(0.0, 100.0),
        };

        let x_axis = XAxisSettings {
            show: o.x_axis.show.unwrap_or(true),
            color: colors.resolve(o.x_axis.color.as_ref(), ColorRole::AxisLine),
            font_color: colors.resolve(o.x_axis.font_color.as_ref(), ColorRole::AxisFont),
            step: o
                .x_axis
                .step
                .as_ref()
                .and_then(NumberOrText::as_integer)
                .map(|v| v.clamp(1, i64::from(u32::MAX)) as u32)
                .unwrap_or(30),
            date_format: o.x_axis.date_format.unwrap_or_default(),
            position: o.x_axis.position.unwrap_or_default(),
        };

        let y_axis = YAxisSettings {
            show: o.y_axis.show.unwrap_or(true),
            color: colors.resolve(o.y_axis.color.as_ref(), ColorRole::AxisLine),
            font_color: colors.resolve(o.y_axis.font_color.as_ref(), ColorRole::AxisFont),
        };

        let playback = PlaybackSettings {
            autoplay: o.playback.autoplay.unwrap_or(false),
            // Slower than one point per MAX_TIMER_SECS is raised to it; zero or below keeps the fallback step.
            play_speed: match o.playback.play_speed.filter(|v| v.is_finite()).unwrap_or(5.0) {
                v if v > 0.0 => v.max(1.0 / MAX_TIMER_SECS),
                v => v,
            },
            pause_duration: timer_secs(o.playback.pause_duration, 10.0),
            autoplay_pause_duration: timer_secs(o.playback.autoplay_pause_duration, 0.0),
            color: colors.resolve(o.playback.color.as_ref(), ColorRole::PlaybackControl),
        };

        let general = GeneralSettings {
            decimal_places: o
                .general
                .decimal_places
                .as_ref()
                .and_then(NumberOrText::as_integer)
                .map(|v| v.clamp(0, i64::from(MAX_DECIMAL_PLACES)) as u8)
                .unwrap_or(2),
        };

        Settings { series, gaps, popup, dots, x_axis, y_axis, playback, general }
    }
}
