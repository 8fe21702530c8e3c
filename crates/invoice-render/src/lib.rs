//! Arabic invoice rendering engine
//!
//! Takes an invoice record and a theme identifier and produces one
//! deterministic A4 PDF page: shaped right-to-left text, localized
//! numerals, a banded item table, and derived monetary totals. Visual
//! styles are data-only [`ThemeDescriptor`]s resolved through a
//! [`ThemeRegistry`]; the layout engine itself has no per-theme code paths.
//!
//! # Example
//!
//! ```ignore
//! use invoice_render::{DocumentBuilder, ThemeRegistry};
//!
//! let font = std::fs::read("Amiri-Regular.ttf")?;
//! let builder = DocumentBuilder::new(ThemeRegistry::with_builtin(), &font)?;
//! let doc = builder.build(&record, "Company 1 - Classic")?;
//! std::fs::write(format!("{}.pdf", doc.invoice_no), &doc.bytes)?;
//! ```

mod builder;
mod layout;
mod record;
mod registry;
mod theme;
mod totals;

pub use builder::{DocumentBuilder, RenderedDocument};
pub use record::{InvalidLineTotal, InvoiceRecord, LineItem};
pub use registry::ThemeRegistry;
pub use theme::{
    AnchoredText, Band, BlockHeading, BlockTop, ColumnField, ColumnSpec, DividerSpec, FooterSpec,
    Frame, GrandRow, HAlign, HeaderSpec, InfoLayout, InfoRow, InfoSpec, InfoValue, LogoSpec,
    PanelSpec, PartiesSpec, PartyBlock, Rgb, TableSpec, TermsSpec, ThemeDescriptor, TotalsSpec,
};
pub use totals::{compute_totals, MonetaryTotals};

pub use arabic_text::{format_amount, localize_digits, shape};

use std::fmt;
use thiserror::Error;

/// One area of the page, named in render failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Header,
    InfoBox,
    Parties,
    Table,
    Totals,
    Footer,
    /// Final serialization of the document
    Finalize,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Header => "header",
            Region::InfoBox => "info box",
            Region::Parties => "parties",
            Region::Table => "table",
            Region::Totals => "totals",
            Region::Footer => "footer",
            Region::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

/// Fatal pipeline errors
///
/// Every variant names the invoice or theme it concerns so a batch caller
/// can report failures without inspecting internals.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invoice {invoice_no}: item {index} has non-numeric line total {value:?}")]
    InvalidLineItem {
        invoice_no: String,
        index: usize,
        value: String,
    },

    #[error("unknown theme: {0}")]
    ThemeNotFound(String),

    #[error("failed to load shaping font: {0}")]
    FontLoad(String),

    #[error("invoice {invoice_no}: {region} region failed: {source}")]
    Render {
        invoice_no: String,
        region: Region,
        #[source]
        source: pdf_canvas::PdfError,
    },

    #[error("invoice {invoice_no}: failed to write output: {source}")]
    OutputWrite {
        invoice_no: String,
        #[source]
        source: std::io::Error,
    },
}

/// Non-fatal conditions attached to a successful render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderWarning {
    /// Logo asset missing or undecodable; the placeholder was drawn
    LogoMissing,
    /// Flowed content reached into the footer reserve
    ContentOverflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_display() {
        assert_eq!(Region::InfoBox.to_string(), "info box");
        assert_eq!(Region::Totals.to_string(), "totals");
    }

    #[test]
    fn test_build_error_messages_name_the_invoice() {
        let err = BuildError::InvalidLineItem {
            invoice_no: "INV-7".to_string(),
            index: 2,
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("INV-7"));
        assert!(msg.contains("abc"));

        let err = BuildError::ThemeNotFound("Company 9".to_string());
        assert!(err.to_string().contains("Company 9"));
    }
}
