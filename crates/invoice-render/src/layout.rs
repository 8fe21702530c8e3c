//! Layout engine
//!
//! Draws the six page regions in fixed order, flowing a top-down cursor.
//! Everything variable between styles comes from the [`ThemeDescriptor`];
//! the engine only interprets descriptor data. All drawn strings pass
//! through `shape()`, and numerals drawn in RTL context pass through
//! `localize_digits()` exactly once.

use crate::record::{InvoiceRecord, LineItem};
use crate::theme::{
    BlockTop, ColumnField, Frame, HAlign, InfoLayout, InfoValue, PartyBlock, Rgb, ThemeDescriptor,
};
use crate::totals::MonetaryTotals;
use crate::{Region, RenderWarning};
use arabic_text::{format_amount, localize_digits, shape};
use log::{debug, warn};
use pdf_canvas::{FontData, ImageScaleMode, PdfCanvas, PdfError, RectPaint};

/// A render failure tagged with the region it happened in
pub(crate) struct RegionError {
    pub region: Region,
    pub source: PdfError,
}

pub(crate) struct RenderOutput {
    pub bytes: Vec<u8>,
    pub warnings: Vec<RenderWarning>,
}

/// Render one invoice onto a single A4 page
pub(crate) fn render(
    record: &InvoiceRecord,
    theme: &ThemeDescriptor,
    totals: &MonetaryTotals,
    font: FontData,
) -> Result<RenderOutput, RegionError> {
    let mut engine = Engine::new(record, theme, totals, font)
        .map_err(|source| RegionError {
            region: Region::Header,
            source,
        })?;

    engine.region(Region::Header, Engine::header)?;
    engine.region(Region::InfoBox, Engine::info_box)?;
    engine.region(Region::Parties, Engine::parties)?;
    engine.region(Region::Table, Engine::table)?;
    engine.region(Region::Totals, Engine::totals)?;
    engine.region(Region::Footer, Engine::footer)?;

    let bytes = engine.canvas.to_bytes().map_err(|source| RegionError {
        region: Region::Finalize,
        source,
    })?;

    Ok(RenderOutput {
        bytes,
        warnings: engine.warnings,
    })
}

struct Engine<'a> {
    record: &'a InvoiceRecord,
    theme: &'a ThemeDescriptor,
    totals: &'a MonetaryTotals,
    canvas: PdfCanvas,
    font_name: String,
    /// Bottom of the most recent flowed block, from the page top
    cursor: f64,
    warnings: Vec<RenderWarning>,
}

impl<'a> Engine<'a> {
    fn new(
        record: &'a InvoiceRecord,
        theme: &'a ThemeDescriptor,
        totals: &'a MonetaryTotals,
        font: FontData,
    ) -> Result<Self, PdfError> {
        let mut canvas = PdfCanvas::new_a4();
        let font_name = font.name.clone();
        canvas.install_font(font)?;

        Ok(Self {
            record,
            theme,
            totals,
            canvas,
            font_name,
            cursor: 0.0,
            warnings: Vec::new(),
        })
    }

    fn region(
        &mut self,
        region: Region,
        draw: fn(&mut Self) -> Result<(), PdfError>,
    ) -> Result<(), RegionError> {
        debug!(
            "invoice {}: laying out {} region",
            self.record.invoice_no, region
        );
        draw(self).map_err(|source| RegionError { region, source })
    }

    /// Draw one shaped line of text
    fn text(
        &mut self,
        raw: &str,
        x: f64,
        y: f64,
        align: HAlign,
        size: f32,
        color: Rgb,
    ) -> Result<(), PdfError> {
        self.canvas.set_font(&self.font_name, size)?;
        self.canvas.set_text_color(color.to_color());
        self.canvas.draw_text(&shape(raw), x, y, align.to_align())
    }

    fn frame(&mut self, frame: &Frame, y_offset: f64) {
        let paint = match (frame.fill, frame.stroke) {
            (Some(fill), Some(stroke)) => RectPaint::fill_and_stroke(
                fill.to_color(),
                stroke.to_color(),
                frame.stroke_width,
            ),
            (Some(fill), None) => RectPaint::fill(fill.to_color()),
            (None, Some(stroke)) => RectPaint::stroke(stroke.to_color(), frame.stroke_width),
            (None, None) => return,
        };
        self.canvas
            .paint_rect(frame.x, frame.y + y_offset, frame.width, frame.height, paint);
    }

    fn header(&mut self) -> Result<(), PdfError> {
        let spec = &self.theme.header;
        if let Some(band) = &spec.band {
            self.canvas.fill_rect(
                0.0,
                0.0,
                self.canvas.page_width(),
                band.height,
                band.fill.to_color(),
            );
        }

        let title = spec.title.clone();
        self.text(
            &title.text,
            title.x,
            title.y,
            title.align,
            title.size,
            title.color,
        )?;

        self.logo()
    }

    /// Draw the logo image, or the theme placeholder when the asset is
    /// missing or the data cannot be decoded
    fn logo(&mut self) -> Result<(), PdfError> {
        let spec = self.theme.header.logo.clone();

        let drawn = match std::fs::read(&spec.path) {
            Ok(data) => self
                .canvas
                .draw_image(
                    &data,
                    spec.x,
                    spec.y,
                    spec.width,
                    spec.height,
                    ImageScaleMode::FitBox,
                )
                .is_ok(),
            Err(_) => false,
        };

        if !drawn {
            warn!(
                "invoice {}: logo {:?} unavailable, drawing placeholder",
                self.record.invoice_no, spec.path
            );
            self.warnings.push(RenderWarning::LogoMissing);
            if let Some(placeholder) = &spec.placeholder {
                let p = placeholder.clone();
                self.text(&p.text, p.x, p.y, p.align, p.size, p.color)?;
            }
        }

        Ok(())
    }

    fn info_box(&mut self) -> Result<(), PdfError> {
        let spec = self.theme.info.clone();
        if let Some(frame) = &spec.frame {
            self.frame(frame, 0.0);
        }

        let mut y = spec.first_baseline;
        for row in &spec.rows {
            let value = match &row.value {
                InfoValue::InvoiceNo => localize_digits(&self.record.invoice_no),
                InfoValue::InvoiceDate => localize_digits(&self.record.invoice_date),
                InfoValue::DueDate => localize_digits(&self.record.due_date),
                InfoValue::Static(text) => text.clone(),
            };

            match &spec.layout {
                InfoLayout::Columns { label_x, value_x } => {
                    self.text(&row.label, *label_x, y, HAlign::Right, spec.size, spec.label_color)?;
                    self.text(&value, *value_x, y, HAlign::Right, spec.size, spec.value_color)?;
                }
                InfoLayout::Inline { x } => {
                    let line = format!("{} {}", row.label, value);
                    self.text(&line, *x, y, HAlign::Right, spec.size, spec.value_color)?;
                }
            }
            y += spec.row_step;
        }

        self.cursor = y;
        Ok(())
    }

    fn parties(&mut self) -> Result<(), PdfError> {
        let spec = self.theme.parties.clone();
        let margin = self.theme.margin;
        let width = self.canvas.page_width() - 2.0 * margin;

        if let Some(panel) = &spec.panel {
            let col_w = width / 2.0;
            self.canvas.stroke_rect(
                margin,
                panel.y,
                width,
                panel.height,
                panel.stroke.to_color(),
                panel.stroke_width,
            );
            self.canvas
                .fill_rect(margin, panel.y, col_w, panel.bar_height, panel.bar_fill.to_color());
            self.canvas.fill_rect(
                margin + col_w,
                panel.y,
                col_w,
                panel.bar_height,
                panel.bar_fill.to_color(),
            );

            let heading_y = panel.y + panel.heading_baseline;
            self.text(
                &panel.sender_heading,
                margin + col_w / 2.0,
                heading_y,
                HAlign::Center,
                panel.heading_size,
                panel.heading_color,
            )?;
            self.text(
                &panel.client_heading,
                margin + col_w * 1.5,
                heading_y,
                HAlign::Center,
                panel.heading_size,
                panel.heading_color,
            )?;
        }

        let info_end = self.cursor;
        let sender_end = self.party_block(&spec.sender, &spec.sender_lines, info_end)?;
        let client_lines = self.record.client_info.clone();
        let client_end = self.party_block(&spec.client, &client_lines, sender_end)?;

        // A framed panel has fixed extent; plain blocks flow
        self.cursor = match &spec.panel {
            Some(panel) => panel.y + panel.height,
            None => client_end,
        };
        Ok(())
    }

    /// Draw one party block and return the y just past its last line
    fn party_block(
        &mut self,
        block: &PartyBlock,
        lines: &[String],
        prev_end: f64,
    ) -> Result<f64, PdfError> {
        let top = match block.top {
            BlockTop::Fixed(y) => y,
            BlockTop::Below(gap) => prev_end + gap,
        };

        let mut y = top;
        if let Some(heading) = &block.heading {
            self.text(&heading.text, heading.x, y, heading.align, block.size, block.color)?;
            y += block.step;
        }
        for line in lines {
            self.text(line, block.x, y, block.align, block.size, block.color)?;
            y += block.step;
        }
        Ok(y)
    }

    fn table(&mut self) -> Result<(), PdfError> {
        let spec = self.theme.table.clone();
        let top = match spec.top {
            BlockTop::Fixed(y) => y,
            BlockTop::Below(gap) => self.cursor + gap,
        };

        if let Some(fill) = spec.header_fill {
            self.canvas
                .fill_rect(spec.x, top, spec.width, spec.header_height, fill.to_color());
        }
        let header_y = top + spec.header_baseline;
        for col in &spec.columns {
            self.text(
                &col.label,
                col.x,
                header_y,
                col.align,
                spec.header_size,
                spec.header_color,
            )?;
        }

        let rows_top = top + spec.header_height;
        for (index, item) in self.record.items.iter().enumerate() {
            if let Some(banding) = &spec.banding {
                self.canvas.fill_rect(
                    spec.x,
                    rows_top + spec.row_step * index as f64,
                    spec.width,
                    spec.row_step,
                    banding[index % 2].to_color(),
                );
            }

            let y = rows_top + spec.first_row_baseline + spec.row_step * index as f64;
            for col in &spec.columns {
                let value = cell_value(col.field, item, index, col.value_prefix.as_deref());
                self.text(&value, col.x, y, col.align, spec.row_size, spec.row_color)?;
            }
        }

        self.cursor = rows_top + spec.row_step * self.record.items.len() as f64;
        Ok(())
    }

    fn totals(&mut self) -> Result<(), PdfError> {
        let spec = self.theme.totals.clone();
        let top = self.cursor + spec.top_gap;

        if let Some(frame) = &spec.frame {
            self.frame(frame, top);
        }

        let rows = [
            (spec.subtotal_label.as_str(), self.totals.subtotal),
            (spec.discount_label.as_str(), self.totals.discount),
            (spec.vat_label.as_str(), self.totals.vat),
        ];
        let prefix = spec.value_prefix.as_deref().unwrap_or("");

        let mut y = top + spec.first_baseline;
        for (label, amount) in rows {
            let value = format!("{prefix}{}", format_amount(amount));
            self.text(&value, spec.value_x, y, HAlign::Left, spec.size, spec.value_color)?;
            self.text(label, spec.label_x, y, HAlign::Right, spec.size, spec.label_color)?;
            y += spec.row_step;
        }

        let grand = &spec.grand;
        if let Some(band) = &grand.band {
            self.frame(band, top);
        }
        let grand_prefix = grand.value_prefix.as_deref().unwrap_or("");
        let grand_value = format!("{grand_prefix}{}", format_amount(self.totals.grand_total));
        let grand_y = top + grand.baseline;
        self.text(
            &grand_value,
            grand.value_x,
            grand_y,
            HAlign::Left,
            grand.size,
            grand.value_color,
        )?;
        self.text(
            &grand.label,
            grand.label_x,
            grand_y,
            HAlign::Right,
            grand.size,
            grand.label_color,
        )?;

        self.cursor = top + spec.height;
        Ok(())
    }

    fn footer(&mut self) -> Result<(), PdfError> {
        let spec = self.theme.footer.clone();
        let page_height = self.canvas.page_height();
        let margin = self.theme.margin;

        if let Some(terms) = &spec.terms {
            let heading_y = self.cursor + terms.top_gap;
            self.text(
                &terms.heading,
                terms.heading_x,
                heading_y,
                HAlign::Right,
                terms.heading_size,
                terms.color,
            )?;

            let mut y = heading_y + terms.first_line_offset;
            for line in &terms.lines {
                self.text(line, terms.line_x, y, HAlign::Right, terms.line_size, terms.color)?;
                y += terms.line_step;
            }
            self.cursor = y;
        }

        // The footer itself is anchored to the page bottom; flowed content
        // crossing into its reserve is reported, not clipped silently.
        if self.cursor > page_height - spec.reserve {
            warn!(
                "invoice {}: content reaches {:.0}pt, past the footer reserve at {:.0}pt",
                self.record.invoice_no,
                self.cursor,
                page_height - spec.reserve
            );
            self.warnings.push(RenderWarning::ContentOverflow);
        }

        if let Some(divider) = &spec.divider {
            let y = page_height - divider.y_from_bottom;
            self.canvas.line(
                margin,
                y,
                self.canvas.page_width() - margin,
                y,
                divider.color.to_color(),
                divider.width,
            );
        }

        self.text(
            &spec.thank_you,
            self.canvas.page_width() / 2.0,
            page_height - spec.thank_you_from_bottom,
            HAlign::Center,
            spec.thank_you_size,
            spec.thank_you_color,
        )
    }
}

/// Value of one table cell
///
/// Quantities and row indexes are localized; line totals keep their
/// external text with an optional currency prefix.
fn cell_value(
    field: ColumnField,
    item: &LineItem,
    index: usize,
    prefix: Option<&str>,
) -> String {
    let prefix = prefix.unwrap_or("");
    match field {
        ColumnField::Description => item.description.clone(),
        ColumnField::Unit => item.unit.clone(),
        ColumnField::Quantity => localize_digits(&item.quantity),
        ColumnField::LineTotal => format!("{prefix}{}", localize_digits(&item.line_total)),
        ColumnField::RowIndex => localize_digits(&(index + 1).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_item() -> LineItem {
        LineItem {
            description: "تطوير موقع".to_string(),
            unit: "ساعة".to_string(),
            quantity: "40".to_string(),
            line_total: "6000.00".to_string(),
        }
    }

    #[test]
    fn test_cell_quantity_localized() {
        assert_eq!(
            cell_value(ColumnField::Quantity, &sample_item(), 0, None),
            "٤٠"
        );
    }

    #[test]
    fn test_cell_row_index_is_one_based() {
        assert_eq!(cell_value(ColumnField::RowIndex, &sample_item(), 0, None), "١");
        assert_eq!(cell_value(ColumnField::RowIndex, &sample_item(), 9, None), "١٠");
    }

    #[test]
    fn test_cell_line_total_keeps_text_and_prefix() {
        assert_eq!(
            cell_value(ColumnField::LineTotal, &sample_item(), 0, Some("ريال ")),
            "ريال ٦٠٠٠.٠٠"
        );
    }

    #[test]
    fn test_cell_description_verbatim() {
        assert_eq!(
            cell_value(ColumnField::Description, &sample_item(), 0, None),
            "تطوير موقع"
        );
    }
}
