//! Segment-stroke glyphs for tile edge labels.
//!
//! Degree labels only ever contain digits, `-`, `.` and `°`, so characters
//! are stroked directly from short segment lists instead of rasterizing a
//! font. Coordinates are baseline-relative: a glyph occupies the box from
//! `y - cap_height` up to the baseline `y`.

use tiny_skia::{LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Width of one character cell at `font_size`.
pub fn char_width(font_size: f32) -> f32 {
    font_size * 0.6
}

fn char_spacing(font_size: f32) -> f32 {
    font_size * 0.1
}

fn cap_height(font_size: f32) -> f32 {
    font_size * 0.7
}

/// Measured pixel width of `text` at `font_size`.
pub fn measure_text(text: &str, font_size: f32) -> f32 {
    let n = text.chars().count();
    if n == 0 {
        return 0.0;
    }
    n as f32 * char_width(font_size) + (n - 1) as f32 * char_spacing(font_size)
}

/// Draw `text` with its left edge at `x` and baseline at `y`.
pub fn draw_text(pixmap: &mut Pixmap, x: f32, y: f32, text: &str, font_size: f32, color: [u8; 4]) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: (font_size * 0.12).max(1.0),
        line_cap: LineCap::Round,
        ..Stroke::default()
    };

    let advance = char_width(font_size) + char_spacing(font_size);
    let mut pen_x = x;
    for ch in text.chars() {
        draw_char(pixmap, pen_x, y, ch, font_size, &paint, &stroke);
        pen_x += advance;
    }
}

fn draw_char(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    ch: char,
    font_size: f32,
    paint: &Paint,
    stroke: &Stroke,
) {
    let w = char_width(font_size);
    let h = cap_height(font_size);

    // Glyph box corners and midlines
    let (x0, x1) = (x, x + w);
    let (y0, y1) = (y - h, y);
    let xm = x + w / 2.0;
    let ym = y - h / 2.0;

    if ch == '°' {
        // Small ring hanging from the cap line
        let r = w * 0.28;
        let mut pb = PathBuilder::new();
        pb.push_circle(x + r + stroke.width / 2.0, y0 + r + stroke.width / 2.0, r);
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
        }
        return;
    }

    let segments: Vec<((f32, f32), (f32, f32))> = match ch {
        '0' => vec![
            ((x0, y0), (x1, y0)), // top
            ((x1, y0), (x1, y1)), // right
            ((x1, y1), (x0, y1)), // bottom
            ((x0, y1), (x0, y0)), // left
        ],
        '1' => vec![((xm, y0), (xm, y1))],
        '2' => vec![
            ((x0, y0), (x1, y0)),
            ((x1, y0), (x1, ym)),
            ((x1, ym), (x0, ym)),
            ((x0, ym), (x0, y1)),
            ((x0, y1), (x1, y1)),
        ],
        '3' => vec![
            ((x0, y0), (x1, y0)),
            ((x1, y0), (x1, y1)),
            ((x1, y1), (x0, y1)),
            ((x0, ym), (x1, ym)),
        ],
        '4' => vec![
            ((x0, y0), (x0, ym)),
            ((x0, ym), (x1, ym)),
            ((x1, y0), (x1, y1)),
        ],
        '5' => vec![
            ((x1, y0), (x0, y0)),
            ((x0, y0), (x0, ym)),
            ((x0, ym), (x1, ym)),
            ((x1, ym), (x1, y1)),
            ((x1, y1), (x0, y1)),
        ],
        '6' => vec![
            ((x1, y0), (x0, y0)),
            ((x0, y0), (x0, y1)),
            ((x0, y1), (x1, y1)),
            ((x1, y1), (x1, ym)),
            ((x1, ym), (x0, ym)),
        ],
        '7' => vec![((x0, y0), (x1, y0)), ((x1, y0), (xm, y1))],
        '8' => vec![
            ((x0, y0), (x1, y0)),
            ((x1, y0), (x1, y1)),
            ((x1, y1), (x0, y1)),
            ((x0, y1), (x0, y0)),
            ((x0, ym), (x1, ym)),
        ],
        '9' => vec![
            ((x1, ym), (x0, ym)),
            ((x0, ym), (x0, y0)),
            ((x0, y0), (x1, y0)),
            ((x1, y0), (x1, y1)),
        ],
        '-' => vec![((x0, ym), (x1, ym))],
        '.' => vec![((xm, y - h * 0.1), (xm, y))],
        _ => return, // unknown character, skip
    };

    for ((ax, ay), (bx, by)) in segments {
        let mut pb = PathBuilder::new();
        pb.move_to(ax, ay);
        pb.line_to(bx, by);
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
        }
    }
}
