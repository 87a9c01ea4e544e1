// File: crates/pulse-core/src/paint.rs
// Summary: Headless Skia CPU raster painting of a DrawList to PNG files, PNG bytes or RGBA8 pixels.

use anyhow::Result;
use skia_safe as skia;

use crate::geometry::{PointF, RectF};
use crate::render::{DrawList, Shape, TextAlign};
use crate::text::{TextMeasure, TextShaper};
use crate::types::{Viewport, HEIGHT, WIDTH};

pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    /// Text is skipped when false, which keeps output independent of system fonts.
    pub draw_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { width: WIDTH, height: HEIGHT, draw_labels: true }
    }
}

impl RenderOptions {
    pub fn for_viewport(viewport: &Viewport) -> Self {
        Self {
            width: viewport.width.round().max(1.0) as i32,
            height: viewport.height.round().max(1.0) as i32,
            draw_labels: true,
        }
    }

    pub fn without_labels(mut self) -> Self {
        self.draw_labels = false;
        self
    }
}

fn sk_rect(r: RectF) -> skia::Rect {
    skia::Rect::from_ltrb(r.left, r.top, r.right, r.bottom)
}

fn sk_point(p: PointF) -> skia::Point {
    skia::Point::new(p.x, p.y)
}

fn fill_paint(color: skia::Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(color);
    paint
}

fn stroke_paint(color: skia::Color, width: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint.set_color(color);
    paint
}

fn polygon_path(points: &[PointF]) -> skia::Path {
    let mut path = skia::Path::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(sk_point(*first));
        for p in rest {
            path.line_to(sk_point(*p));
        }
    }
    path
}

/// Paint every command of `list` onto `canvas`. Text is drawn only when a shaper is given.
pub fn paint(canvas: &skia::Canvas, list: &DrawList, shaper: Option<&TextShaper>) {
    canvas.clear(list.background);
    for cmd in &list.commands {
        match &cmd.shape {
            Shape::Polyline { points, color, width } => {
                if points.len() < 2 {
                    continue;
                }
                let mut paint = stroke_paint(*color, *width);
                paint.set_stroke_join(skia::paint::Join::Round);
                canvas.draw_path(&polygon_path(points), &paint);
            }
            Shape::Line { from, to, color, width } => {
                canvas.draw_line(sk_point(*from), sk_point(*to), &stroke_paint(*color, *width));
            }
            Shape::Circle { center, radius, fill, stroke } => {
                canvas.draw_circle(sk_point(*center), *radius, &fill_paint(*fill));
                if let Some((color, width)) = stroke {
                    canvas.draw_circle(sk_point(*center), *radius, &stroke_paint(*color, *width));
                }
            }
            Shape::Rect { rect, fill } => {
                if fill.a() == 0 {
                    continue;
                }
                canvas.draw_rect(sk_rect(*rect), &fill_paint(*fill));
            }
            Shape::RoundRect { rect, radius, fill } => {
                canvas.draw_round_rect(sk_rect(*rect), *radius, *radius, &fill_paint(*fill));
            }
            Shape::Polygon { points, fill } => {
                let mut path = polygon_path(points);
                path.close();
                canvas.draw_path(&path, &fill_paint(*fill));
            }
            Shape::Text { origin, text, size, color, align } => {
                let Some(shaper) = shaper else {
                    continue;
                };
                let width = shaper.measure_width(text, *size);
                let x = match align {
                    TextAlign::Left => origin.x,
                    TextAlign::Center => origin.x - width * 0.5,
                    TextAlign::Right => origin.x - width,
                };
                shaper.draw_left(canvas, text, x, origin.y, *size, *color);
            }
        }
    }
}

fn render_surface(list: &DrawList, opts: &RenderOptions) -> Result<skia::Surface> {
    let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
        .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
    let shaper = opts.draw_labels.then(TextShaper::new);
    paint(surface.canvas(), list, shaper.as_ref());
    Ok(surface)
}

/// Render `list` and return encoded PNG bytes.
pub fn render_to_png_bytes(list: &DrawList, opts: &RenderOptions) -> Result<Vec<u8>> {
    let mut surface = render_surface(list, opts)?;
    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

/// Render `list` to a PNG at `output_png_path`, creating parent directories.
pub fn render_to_png(list: &DrawList, opts: &RenderOptions, output_png_path: impl AsRef<std::path::Path>) -> Result<()> {
    let bytes = render_to_png_bytes(list, opts)?;
    if let Some(parent) = output_png_path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_png_path, bytes)?;
    Ok(())
}

/// Render `list` into unpremultiplied RGBA8 pixels: `(pixels, width, height, row_bytes)`.
pub fn render_to_rgba8(list: &DrawList, opts: &RenderOptions) -> Result<(Vec<u8>, u32, u32, usize)> {
    let mut surface = render_surface(list, opts)?;
    let info = skia::ImageInfo::new(
        (opts.width, opts.height),
        skia::ColorType::RGBA8888,
        skia::AlphaType::Unpremul,
        None,
    );
    let row_bytes = opts.width as usize * 4;
    let mut pixels = vec![0u8; row_bytes * opts.height as usize];
    if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
        anyhow::bail!("reading back surface pixels failed");
    }
    Ok((pixels, opts.width as u32, opts.height as u32, row_bytes))
}
