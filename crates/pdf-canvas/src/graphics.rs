//! Content-stream operator generation

use crate::{Align, Color};

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// How a rectangle is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPaint {
    /// Interior fill color
    pub fill: Option<Color>,
    /// Border color and line width
    pub stroke: Option<(Color, f64)>,
}

impl RectPaint {
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some((color, width)),
        }
    }

    pub fn fill_and_stroke(fill: Color, stroke: Color, width: f64) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some((stroke, width)),
        }
    }
}

fn fmt(v: f64) -> String {
    // Two decimals is plenty for point coordinates and keeps streams stable
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn fmt_color(c: Color) -> String {
    format!("{} {} {}", c.r, c.g, c.b)
}

/// Generate PDF operators for text insertion
///
/// Creates the proper PDF text operators (BT, Tf, Td, Tj, ET) to render text
/// at a specific position with alignment support.
///
/// # Arguments
/// * `text_hex` - Hex-encoded text (e.g., "<0041004200>")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate in points (PDF coordinates, from bottom)
/// * `align` - Text alignment
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let x_offset = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };
    let final_x = x + x_offset;

    let mut ops = String::new();
    ops.push_str("BT\n");
    ops.push_str(&format!("{} rg\n", fmt_color(ctx.color)));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    ops.push_str(&format!("{} {} Td\n", fmt(final_x), fmt(y)));
    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

/// Generate operators for a rectangle
///
/// # Arguments
/// * `x`, `y` - Lower-left corner in PDF coordinates (from bottom)
/// * `width`, `height` - Rectangle size in points
/// * `paint` - Fill and/or stroke specification
pub fn generate_rect_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    paint: RectPaint,
) -> Vec<u8> {
    let mut ops = String::from("q\n");

    if let Some(fill) = paint.fill {
        ops.push_str(&format!("{} rg\n", fmt_color(fill)));
    }
    if let Some((stroke, line_width)) = paint.stroke {
        ops.push_str(&format!("{} RG\n", fmt_color(stroke)));
        ops.push_str(&format!("{} w\n", fmt(line_width)));
    }

    ops.push_str(&format!(
        "{} {} {} {} re\n",
        fmt(x),
        fmt(y),
        fmt(width),
        fmt(height)
    ));

    let op = match (paint.fill.is_some(), paint.stroke.is_some()) {
        (true, true) => "B",
        (true, false) => "f",
        (false, true) => "S",
        (false, false) => "n",
    };
    ops.push_str(op);
    ops.push_str("\nQ\n");

    ops.into_bytes()
}

/// Generate operators for a straight line
///
/// Coordinates are PDF coordinates (origin bottom-left).
pub fn generate_line_operators(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    color: Color,
    line_width: f64,
) -> Vec<u8> {
    format!(
        "q\n{} RG\n{} w\n{} {} m\n{} {} l\nS\nQ\n",
        fmt_color(color),
        fmt(line_width),
        fmt(x1),
        fmt(y1),
        fmt(x2),
        fmt(y2)
    )
    .into_bytes()
}

/// Generate operators to draw an image XObject at position
///
/// # Arguments
/// * `image_name` - Image resource name (e.g., "Im1")
/// * `x`, `y` - Lower-left corner in PDF coordinates (from bottom)
/// * `width`, `height` - Display size in points
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!(
        "q\n{} 0 0 {} {} {} cm\n/{image_name} Do\nQ\n",
        fmt(width),
        fmt(height),
        fmt(x),
        fmt(y)
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(width: f64) -> TextRenderContext {
        TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 12.0,
            text_width: width,
            color: Color::black(),
        }
    }

    #[test]
    fn test_text_operators_left() {
        let ops = generate_text_operators("<0041>", 100.0, 700.0, Align::Left, &ctx(100.0));
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("BT"));
        assert!(ops_str.contains("/F1 12 Tf"));
        assert!(ops_str.contains("100 700 Td"));
        assert!(ops_str.contains("<0041> Tj"));
        assert!(ops_str.contains("ET"));
    }

    #[test]
    fn test_text_operators_center() {
        let ops = generate_text_operators("<0041>", 200.0, 600.0, Align::Center, &ctx(100.0));
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("150 600 Td")); // 200 - 50
    }

    #[test]
    fn test_text_operators_right() {
        let ops = generate_text_operators("<0041>", 300.0, 500.0, Align::Right, &ctx(80.0));
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("220 500 Td")); // 300 - 80
    }

    #[test]
    fn test_text_operators_color() {
        let mut c = ctx(0.0);
        c.color = Color::rgb(1.0, 0.0, 0.0);
        let ops = generate_text_operators("<0041>", 0.0, 0.0, Align::Left, &c);
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("1 0 0 rg"));
    }

    #[test]
    fn test_rect_fill() {
        let ops = generate_rect_operators(10.0, 20.0, 100.0, 50.0, RectPaint::fill(Color::white()));
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("1 1 1 rg"));
        assert!(ops_str.contains("10 20 100 50 re"));
        assert!(ops_str.contains("f\n"));
        assert!(!ops_str.contains("RG"));
    }

    #[test]
    fn test_rect_stroke() {
        let ops =
            generate_rect_operators(0.0, 0.0, 10.0, 10.0, RectPaint::stroke(Color::black(), 2.0));
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("0 0 0 RG"));
        assert!(ops_str.contains("2 w"));
        assert!(ops_str.contains("S\n"));
    }

    #[test]
    fn test_rect_fill_and_stroke() {
        let ops = generate_rect_operators(
            0.0,
            0.0,
            10.0,
            10.0,
            RectPaint::fill_and_stroke(Color::white(), Color::black(), 1.0),
        );
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("B\n"));
    }

    #[test]
    fn test_line_operators() {
        let ops = generate_line_operators(56.69, 70.0, 538.58, 70.0, Color::black(), 1.0);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("56.69 70 m"));
        assert!(ops_str.contains("538.58 70 l"));
        assert!(ops_str.contains("S"));
    }

    #[test]
    fn test_image_operators() {
        let ops = generate_image_operators("Im1", 100.0, 200.0, 50.0, 75.0);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("50 0 0 75 100 200 cm"));
        assert!(ops_str.contains("/Im1 Do"));
    }

    #[test]
    fn test_coordinate_formatting_is_stable() {
        // Long fractions are cut to two decimals so repeated renders emit
        // identical streams.
        let ops = generate_line_operators(56.692913, 0.0, 0.0, 0.0, Color::black(), 1.0);
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("56.69 0 m"));
    }
}
