//! Arabic text preparation for PDF rendering
//!
//! PDF text operators place glyphs left to right with no layout engine
//! behind them, so Arabic strings must arrive already in visual form. This
//! crate provides:
//! - `shape()` - contextual letter joining plus bidirectional reordering
//! - `localize_digits()` - ASCII digits to Arabic-Indic numerals
//! - `format_amount()` - two-fraction-digit monetary display strings
//!
//! All functions are best-effort and infallible. Input that needs no work
//! (empty strings, pure Latin text) comes back unchanged.

mod numerals;
mod shaping;

pub use numerals::{format_amount, localize_digits};
pub use shaping::shape;
