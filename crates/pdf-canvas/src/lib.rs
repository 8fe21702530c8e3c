//! PDF Canvas - single-page PDF drawing surface
//!
//! This crate provides:
//! - Creating a blank A4 document from scratch
//! - Embedding a TrueType font as a CID/Type0 font
//! - Drawing aligned text, filled/stroked rectangles, lines
//! - Drawing images (JPEG, PNG)
//!
//! # Example
//!
//! ```ignore
//! use pdf_canvas::{Align, Color, FontData, PdfCanvas};
//!
//! let font = FontData::from_ttf("amiri", &std::fs::read("Amiri-Regular.ttf")?)?;
//! let mut canvas = PdfCanvas::new_a4();
//! canvas.install_font(font);
//! canvas.set_font("amiri", 12.0)?;
//! canvas.fill_rect(0.0, 0.0, canvas.page_width(), 80.0, Color::from_rgb(46, 64, 87));
//! canvas.draw_text("Hello", 100.0, 40.0, Align::Left)?;
//! canvas.save("out.pdf")?;
//! ```

mod canvas;
mod font;
mod graphics;
mod image_xobject;

pub use canvas::PdfCanvas;
pub use font::FontData;
pub use graphics::{generate_line_operators, generate_rect_operators, generate_text_operators, RectPaint, TextRenderContext};
pub use image_xobject::{calculate_scaled_dimensions, ImageScaleMode, ImageXObject};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_color_from_rgb() {
        let c = Color::from_rgb(255, 0, 0);
        assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_color_default_is_black() {
        assert_eq!(Color::default(), Color::black());
    }
}
