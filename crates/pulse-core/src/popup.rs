// File: crates/pulse-core/src/popup.rs
// Summary: Event popup callout layout (body, pointer, time box, title, wrapped description).

use crate::geometry::{clamp, PointF, RectF};
use crate::series::EventPopup;
use crate::settings::PopupSettings;
use crate::text::{wrap_text, TextMeasure};

/// Inner padding of the popup body.
pub const POPUP_PADDING: f32 = 5.0;
/// Height of the pointer triangle between body and dot.
pub const POINTER_HEIGHT: f32 = 8.0;
/// Half width of the pointer triangle base.
pub const POINTER_HALF_WIDTH: f32 = 6.0;
/// Corner radius of the popup body.
pub const POPUP_CORNER_RADIUS: f32 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Left end of the baseline.
    pub origin: PointF,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PopupLayout {
    pub body: RectF,
    pub pointer: [PointF; 3],
    pub time_box: Option<RectF>,
    pub time: Option<TextRun>,
    pub title: Option<TextRun>,
    pub description: Vec<TextRun>,
    /// Whether the body sits above the anchor.
    pub above: bool,
}

/// Lay out a popup for a dot at `anchor` (surface coordinates) with radius `radius`.
///
/// Points in the lower half of the plot (`anchor.y > split_y`) get their popup
/// above, others below. The body is clamped horizontally into `plot`.
pub fn layout_popup(
    anchor: PointF,
    radius: f32,
    popup: &EventPopup,
    settings: &PopupSettings,
    plot: RectF,
    split_y: f32,
    measure: &dyn TextMeasure,
) -> PopupLayout {
    let font = settings.font_size as f32;
    let line_height = measure.line_height(font);
    let width = settings.width;
    let inner_width = (width - 2.0 * POPUP_PADDING).max(1.0);

    let time_text = popup.time.as_ref().filter(|_| settings.show_time);
    let title_text = popup.title.as_ref().filter(|_| settings.show_title);
    let lines = popup
        .description
        .as_deref()
        .map(|d| wrap_text(measure, d, font, inner_width))
        .unwrap_or_default();

    let time_box_height = line_height + 2.0;
    let mut content = POPUP_PADDING * 2.0;
    if time_text.is_some() {
        content += time_box_height + 2.0;
    }
    if title_text.is_some() {
        content += line_height;
    }
    content += line_height * lines.len() as f32;
    let height = settings.height.max(content);

    let above = anchor.y > split_y;
    let top = if above {
        anchor.y - radius - POINTER_HEIGHT - height
    } else {
        anchor.y + radius + POINTER_HEIGHT
    };
    let max_left = (plot.right - width).max(plot.left);
    let left = clamp(anchor.x - width * 0.5, plot.left, max_left);
    let body = RectF::from_ltwh(left, top, width, height);

    let base_x = clamp(
        anchor.x,
        body.left + POINTER_HALF_WIDTH,
        (body.right - POINTER_HALF_WIDTH).max(body.left + POINTER_HALF_WIDTH),
    );
    let (base_y, tip_y) = if above {
        (body.bottom, anchor.y - radius)
    } else {
        (body.top, anchor.y + radius)
    };
    let pointer = [
        PointF::new(base_x - POINTER_HALF_WIDTH, base_y),
        PointF::new(base_x + POINTER_HALF_WIDTH, base_y),
        PointF::new(anchor.x, tip_y),
    ];

    let mut cursor = body.top + POPUP_PADDING;
    let mut time_box = None;
    let mut time = None;
    if let Some(t) = time_text {
        let w = (measure.measure_width(t, font) + 2.0 * POPUP_PADDING).min(width);
        let rect = RectF::from_ltwh(body.left, cursor - POPUP_PADDING, w, time_box_height + POPUP_PADDING);
        time = Some(TextRun {
            origin: PointF::new(body.left + POPUP_PADDING, cursor + font),
            text: t.clone(),
        });
        time_box = Some(rect);
        cursor += time_box_height + 2.0;
    }

    let title = title_text.map(|t| {
        let run = TextRun {
            origin: PointF::new(body.left + POPUP_PADDING, cursor + font),
            text: t.clone(),
        };
        cursor += line_height;
        run
    });

    let description = lines
        .into_iter()
        .map(|text| {
            let run = TextRun { origin: PointF::new(body.left + POPUP_PADDING, cursor + font), text };
            cursor += line_height;
            run
        })
        .collect();

    PopupLayout { body, pointer, time_box, time, title, description, above }
}
