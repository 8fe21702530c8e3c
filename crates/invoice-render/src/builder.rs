//! Document builder
//!
//! The sole public pipeline entry: resolve theme, validate the record,
//! compute totals, render, and optionally write the result. The shaping
//! font is parsed once at construction; a missing or corrupt font fails
//! here, before any invoice is touched.

use crate::layout;
use crate::record::InvoiceRecord;
use crate::registry::ThemeRegistry;
use crate::totals::compute_totals;
use crate::{BuildError, RenderWarning};
use log::debug;
use pdf_canvas::FontData;
use std::path::{Path, PathBuf};

/// A finalized single-page document
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub invoice_no: String,
    /// Name of the theme that rendered it
    pub theme: String,
    /// Complete PDF file bytes
    pub bytes: Vec<u8>,
    pub warnings: Vec<RenderWarning>,
}

/// Renders invoice records against registered themes
///
/// Immutable after construction. Independent invoices can be rendered
/// from separate threads; each render works on its own canvas and clones
/// the parsed font handle.
#[derive(Debug)]
pub struct DocumentBuilder {
    registry: ThemeRegistry,
    font: FontData,
}

impl DocumentBuilder {
    /// Create a builder, parsing the shaping font up front
    ///
    /// # Arguments
    /// * `registry` - themes available to `build`
    /// * `font_bytes` - TrueType font file covering the Arabic script
    pub fn new(registry: ThemeRegistry, font_bytes: &[u8]) -> Result<Self, BuildError> {
        let font = FontData::from_ttf("invoice", font_bytes)
            .map_err(|e| BuildError::FontLoad(e.to_string()))?;
        Ok(Self { registry, font })
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    /// Render one record with the given theme
    pub fn build(
        &self,
        record: &InvoiceRecord,
        theme_id: &str,
    ) -> Result<RenderedDocument, BuildError> {
        let theme = self.registry.resolve(theme_id)?;

        record
            .validate()
            .map_err(|e| BuildError::InvalidLineItem {
                invoice_no: record.invoice_no.clone(),
                index: e.index,
                value: e.value,
            })?;

        let totals = compute_totals(&record.items, theme.discount_rate, theme.vat_rate)
            .map_err(|e| BuildError::InvalidLineItem {
                invoice_no: record.invoice_no.clone(),
                index: e.index,
                value: e.value,
            })?;

        let output = layout::render(record, theme, &totals, self.font.clone()).map_err(|e| {
            BuildError::Render {
                invoice_no: record.invoice_no.clone(),
                region: e.region,
                source: e.source,
            }
        })?;

        debug!(
            "invoice {}: rendered with {:?}, {} bytes, {} warning(s)",
            record.invoice_no,
            theme_id,
            output.bytes.len(),
            output.warnings.len()
        );

        Ok(RenderedDocument {
            invoice_no: record.invoice_no.clone(),
            theme: theme.name.clone(),
            bytes: output.bytes,
            warnings: output.warnings,
        })
    }

    /// Render one record and write `<invoice_no>.pdf` into `dir`
    pub fn build_to_dir(
        &self,
        record: &InvoiceRecord,
        theme_id: &str,
        dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        let document = self.build(record, theme_id)?;
        let path = dir.join(format!("{}.pdf", document.invoice_no));
        std::fs::write(&path, &document.bytes).map_err(|source| BuildError::OutputWrite {
            invoice_no: document.invoice_no.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Render a batch, one result per record in input order
    ///
    /// A failing record does not stop the rest of the batch.
    pub fn build_batch(
        &self,
        records: &[InvoiceRecord],
        theme_id: &str,
        dir: &Path,
    ) -> Vec<Result<PathBuf, BuildError>> {
        records
            .iter()
            .map(|record| self.build_to_dir(record, theme_id, dir))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_font_is_fatal_up_front() {
        let err = DocumentBuilder::new(ThemeRegistry::with_builtin(), &[0u8; 32]).unwrap_err();
        assert!(matches!(err, BuildError::FontLoad(_)));
    }
}
