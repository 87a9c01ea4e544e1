// File: crates/pulse-core/src/theme.rs
// Summary: Color palettes and the palette-aware color helper used by settings resolution.

use serde::Deserialize;
use skia_safe as skia;

/// Every colored element of the pulse chart; palettes supply a default per role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Background,
    SeriesFill,
    SeriesSelection,
    DotFill,
    PopupFill,
    PopupFont,
    PopupTime,
    PopupTimeFill,
    AxisLine,
    AxisFont,
    PlaybackControl,
}

/// Host color service: the default color for a role.
pub trait Palette {
    fn color(&self, role: ColorRole) -> skia::Color;
}

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub series_fill: skia::Color,
    pub series_selection: skia::Color,
    pub dot_fill: skia::Color,
    pub popup_fill: skia::Color,
    pub popup_font: skia::Color,
    pub popup_time: skia::Color,
    pub popup_time_fill: skia::Color,
    pub axis_line: skia::Color,
    pub axis_font: skia::Color,
    pub playback_control: skia::Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 255, 255, 255),
            series_fill: skia::Color::from_argb(255, 0x37, 0x79, 0xB7),
            series_selection: skia::Color::from_argb(255, 0xD9, 0xD9, 0xD9),
            dot_fill: skia::Color::from_argb(255, 0x80, 0x81, 0x81),
            popup_fill: skia::Color::from_argb(255, 0x80, 0x81, 0x81),
            popup_font: skia::Color::from_argb(255, 0xFF, 0xFF, 0xFF),
            popup_time: skia::Color::from_argb(255, 0xFF, 0xFF, 0xFF),
            popup_time_fill: skia::Color::from_argb(255, 0x01, 0x01, 0x01),
            axis_line: skia::Color::from_argb(255, 0x77, 0x77, 0x77),
            axis_font: skia::Color::from_argb(255, 0x77, 0x77, 0x77),
            playback_control: skia::Color::from_argb(255, 0x77, 0x77, 0x77),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            series_fill: skia::Color::from_argb(255, 64, 160, 255),
            series_selection: skia::Color::from_argb(255, 90, 90, 100),
            dot_fill: skia::Color::from_argb(255, 180, 180, 190),
            popup_fill: skia::Color::from_argb(255, 60, 60, 70),
            popup_font: skia::Color::from_argb(255, 235, 235, 245),
            popup_time: skia::Color::from_argb(255, 235, 235, 245),
            popup_time_fill: skia::Color::from_argb(255, 30, 30, 34),
            axis_line: skia::Color::from_argb(255, 150, 150, 160),
            axis_font: skia::Color::from_argb(255, 210, 210, 220),
            playback_control: skia::Color::from_argb(255, 180, 180, 190),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

impl Palette for Theme {
    fn color(&self, role: ColorRole) -> skia::Color {
        match role {
            ColorRole::Background => self.background,
            ColorRole::SeriesFill => self.series_fill,
            ColorRole::SeriesSelection => self.series_selection,
            ColorRole::DotFill => self.dot_fill,
            ColorRole::PopupFill => self.popup_fill,
            ColorRole::PopupFont => self.popup_font,
            ColorRole::PopupTime => self.popup_time,
            ColorRole::PopupTimeFill => self.popup_time_fill,
            ColorRole::AxisLine => self.axis_line,
            ColorRole::AxisFont => self.axis_font,
            ColorRole::PlaybackControl => self.playback_control,
        }
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::light()
}

/// Host color override: either a bare hex string or `{ "solid": { "color": "#RRGGBB" } }`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FillOverride {
    Hex(String),
    Solid { solid: SolidColor },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SolidColor {
    pub color: String,
}

impl FillOverride {
    fn hex(&self) -> &str {
        match self {
            FillOverride::Hex(s) => s,
            FillOverride::Solid { solid } => &solid.color,
        }
    }
}

/// Resolves overrides against a palette: a parseable solid color wins, else the role default.
pub struct ColorHelper<'a> {
    palette: &'a dyn Palette,
}

impl<'a> ColorHelper<'a> {
    pub fn new(palette: &'a dyn Palette) -> Self {
        Self { palette }
    }

    pub fn resolve(&self, fill: Option<&FillOverride>, role: ColorRole) -> skia::Color {
        fill.and_then(|f| parse_hex(f.hex()))
            .unwrap_or_else(|| self.palette.color(role))
    }
}

/// Parse `#RGB` or `#RRGGBB` (leading `#` optional) into an opaque color.
pub fn parse_hex(text: &str) -> Option<skia::Color> {
    let hex = text.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let v = u16::from_str_radix(hex, 16).ok()?;
            let r = ((v >> 8) & 0xF) as u8;
            let g = ((v >> 4) & 0xF) as u8;
            let b = (v & 0xF) as u8;
            Some(skia::Color::from_argb(255, r * 17, g * 17, b * 17))
        }
        6 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            Some(skia::Color::from_argb(255, (v >> 16) as u8, (v >> 8) as u8, v as u8))
        }
        _ => None,
    }
}
