//! Single-page PDF drawing surface

use crate::graphics::{
    generate_image_operators, generate_line_operators, generate_rect_operators,
    generate_text_operators, RectPaint, TextRenderContext,
};
use crate::image_xobject::{calculate_scaled_dimensions, ImageScaleMode, ImageXObject};
use crate::{Align, Color, FontData, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::path::Path;

/// A4 page size in points
const A4_WIDTH: f64 = 595.28;
const A4_HEIGHT: f64 = 841.89;

/// A single-page PDF canvas
///
/// Coordinates passed to drawing methods use a top-left origin (y grows
/// downward); they are converted to PDF bottom-left coordinates when the
/// operators are generated. Content operators are buffered and written as one
/// stream at save time.
pub struct PdfCanvas {
    /// The underlying lopdf document
    inner: Document,
    /// The single page object
    page_id: ObjectId,
    /// Installed fonts by name. BTreeMap so embedding order is stable.
    fonts: BTreeMap<String, FontData>,
    /// Font name -> page resource name (e.g., "F1")
    font_resources: BTreeMap<String, String>,
    next_font_resource: u32,
    /// Current font name
    current_font: Option<String>,
    /// Current font size in points
    current_font_size: f32,
    /// Current text color
    current_text_color: Color,
    /// Embedded images by resource name, in insertion order
    images: Vec<(String, ImageXObject)>,
    /// Image data hash -> resource name, for dedup
    image_hashes: HashMap<u64, String>,
    next_image_resource: u32,
    /// Buffered content operators, flushed at save
    content: Vec<u8>,
    page_width: f64,
    page_height: f64,
}

impl PdfCanvas {
    /// Create a blank A4 canvas
    pub fn new_a4() -> Self {
        let mut inner = Document::with_version("1.5");

        let pages_id = inner.new_object_id();
        let page_id = inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), A4_WIDTH.into(), A4_HEIGHT.into()],
        });
        inner.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self {
            inner,
            page_id,
            fonts: BTreeMap::new(),
            font_resources: BTreeMap::new(),
            next_font_resource: 1,
            current_font: None,
            current_font_size: 12.0,
            current_text_color: Color::black(),
            images: Vec::new(),
            image_hashes: HashMap::new(),
            next_image_resource: 1,
            content: Vec::new(),
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
        }
    }

    /// Page width in points
    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    /// Page height in points
    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Install a font on the canvas
    ///
    /// The font is embedded at save time if any text used it.
    pub fn install_font(&mut self, font: FontData) -> Result<()> {
        if self.fonts.contains_key(&font.name) {
            return Err(PdfError::FontAlreadyExists(font.name.clone()));
        }

        let resource_name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;
        self.font_resources
            .insert(font.name.clone(), resource_name);
        self.fonts.insert(font.name.clone(), font);

        Ok(())
    }

    /// Set the current font and size
    pub fn set_font(&mut self, name: &str, size: f32) -> Result<()> {
        if !self.fonts.contains_key(name) {
            return Err(PdfError::FontNotFound(name.to_string()));
        }

        self.current_font = Some(name.to_string());
        self.current_font_size = size;

        Ok(())
    }

    /// Set only the font size (keeps current font)
    pub fn set_font_size(&mut self, size: f32) {
        self.current_font_size = size;
    }

    /// Set the text color
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Width of `text` in points at the current font and size
    pub fn text_width(&self, text: &str) -> Result<f64> {
        let font = self.current_font_data()?;
        Ok(font.text_width_points(text, self.current_font_size) as f64)
    }

    /// Check whether the current font has glyphs for every character of `text`
    pub fn has_glyphs(&self, text: &str) -> Result<bool> {
        let font = self.current_font_data()?;
        Ok(text
            .chars()
            .all(|c| c.is_whitespace() || font.has_glyph(c)))
    }

    /// Draw a line of text
    ///
    /// # Arguments
    /// * `text` - Already shaped text, drawn in logical order left to right
    /// * `x` - Anchor x in points; meaning depends on `align`
    /// * `y` - Baseline y in points from the TOP of the page
    /// * `align` - Whether `x` is the left edge, center, or right edge
    pub fn draw_text(&mut self, text: &str, x: f64, y: f64, align: Align) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        let font_name = self
            .current_font
            .clone()
            .ok_or_else(|| PdfError::FontNotFound("No font set".to_string()))?;
        let resource_name = self.font_resources[&font_name].clone();

        let font = self
            .fonts
            .get_mut(&font_name)
            .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;
        font.add_chars(text);

        // Glyph ids are stable because the full font is embedded, so the text
        // can be encoded immediately.
        let text_hex = font.encode_text_hex(text);
        let text_width = font.text_width_points(text, self.current_font_size) as f64;

        let ctx = TextRenderContext {
            font_name: resource_name,
            font_size: self.current_font_size,
            text_width,
            color: self.current_text_color,
        };

        let pdf_y = self.page_height - y;
        let operators = generate_text_operators(&text_hex, x, pdf_y, align, &ctx);
        self.content.extend_from_slice(&operators);

        Ok(())
    }

    /// Fill a rectangle
    ///
    /// `x`, `y` is the TOP-left corner in points from the top of the page.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.paint_rect(x, y, width, height, RectPaint::fill(color));
    }

    /// Stroke a rectangle outline
    pub fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        line_width: f64,
    ) {
        self.paint_rect(x, y, width, height, RectPaint::stroke(color, line_width));
    }

    /// Draw a rectangle with arbitrary paint
    pub fn paint_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: RectPaint) {
        let pdf_y = self.page_height - y - height;
        let operators = generate_rect_operators(x, pdf_y, width, height, paint);
        self.content.extend_from_slice(&operators);
    }

    /// Draw a straight line between two points (y from the top of the page)
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, line_width: f64) {
        let operators = generate_line_operators(
            x1,
            self.page_height - y1,
            x2,
            self.page_height - y2,
            color,
            line_width,
        );
        self.content.extend_from_slice(&operators);
    }

    /// Draw an image into a box
    ///
    /// `x`, `y` is the TOP-left corner of the box in points from the top of
    /// the page. The image is scaled per `mode` and anchored at the box's
    /// top-left corner. Identical image data is embedded once.
    ///
    /// # Returns
    /// The displayed (width, height) in points.
    pub fn draw_image(
        &mut self,
        data: &[u8],
        x: f64,
        y: f64,
        box_width: f64,
        box_height: f64,
        mode: ImageScaleMode,
    ) -> Result<(f64, f64)> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let hash = hasher.finish();

        let (resource_name, width, height) = match self.image_hashes.get(&hash) {
            Some(name) => {
                let xobject = &self
                    .images
                    .iter()
                    .find(|(n, _)| n == name)
                    .ok_or_else(|| PdfError::ImageError("Image resource lost".to_string()))?
                    .1;
                (name.clone(), xobject.width, xobject.height)
            }
            None => {
                let xobject = ImageXObject::from_bytes(data)?;
                let name = format!("Im{}", self.next_image_resource);
                self.next_image_resource += 1;
                let dims = (xobject.width, xobject.height);
                self.image_hashes.insert(hash, name.clone());
                self.images.push((name.clone(), xobject));
                (name, dims.0, dims.1)
            }
        };

        let (display_w, display_h) =
            calculate_scaled_dimensions(width, height, box_width, box_height, mode);

        let pdf_y = self.page_height - y - display_h;
        let operators = generate_image_operators(&resource_name, x, pdf_y, display_w, display_h);
        self.content.extend_from_slice(&operators);

        Ok((display_w, display_h))
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;
        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;
        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    /// Embed fonts and images, write the content stream, and wire up the
    /// page's Resources dictionary
    fn finalize(&mut self) -> Result<()> {
        let mut font_dict = Dictionary::new();
        // Iteration over the BTreeMap keeps object numbering deterministic
        let font_names: Vec<String> = self
            .fonts
            .iter()
            .filter(|(_, f)| !f.used_chars.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        for font_name in font_names {
            let font_id = self.embed_font_object(&font_name)?;
            let resource_name = self.font_resources[&font_name].clone();
            font_dict.set(resource_name.as_bytes(), Object::Reference(font_id));
        }

        let mut xobject_dict = Dictionary::new();
        let images = std::mem::take(&mut self.images);
        for (resource_name, xobject) in images {
            let image_id = self.inner.add_object(xobject.to_pdf_stream());
            xobject_dict.set(resource_name.as_bytes(), Object::Reference(image_id));
        }

        let mut resources = Dictionary::new();
        if !font_dict.is_empty() {
            resources.set("Font", Object::Dictionary(font_dict));
        }
        if !xobject_dict.is_empty() {
            resources.set("XObject", Object::Dictionary(xobject_dict));
        }

        let content = std::mem::take(&mut self.content);
        let content_id = self
            .inner
            .add_object(Stream::new(dictionary! {}, content));

        let page_obj = self.inner.get_object(self.page_id)?;
        let mut page_dict = page_obj
            .as_dict()
            .map_err(|_| PdfError::SaveError("Page object is not a dictionary".to_string()))?
            .clone();
        page_dict.set("Resources", Object::Dictionary(resources));
        page_dict.set("Contents", Object::Reference(content_id));
        self.inner.objects.insert(self.page_id, page_dict.into());

        Ok(())
    }

    /// Embed a single font, resolving the placeholder references
    fn embed_font_object(&mut self, font_name: &str) -> Result<ObjectId> {
        let font = self
            .fonts
            .get(font_name)
            .ok_or_else(|| PdfError::FontNotFound(font_name.to_string()))?;
        let font_objects = font.to_pdf_objects()?;

        let font_file_id = self.inner.add_object(font_objects.font_file_stream);

        let mut font_descriptor = font_objects.font_descriptor;
        font_descriptor.set("FontFile2", Object::Reference(font_file_id));
        let font_descriptor_id = self.inner.add_object(font_descriptor);

        let mut cid_font = font_objects.cid_font;
        cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
        let cid_font_id = self.inner.add_object(cid_font);

        let mut type0_font = font_objects.type0_font;
        type0_font.set(
            "DescendantFonts",
            Object::Array(vec![Object::Reference(cid_font_id)]),
        );
        let tounicode_id = self.inner.add_object(font_objects.tounicode_stream);
        type0_font.set("ToUnicode", Object::Reference(tounicode_id));

        Ok(self.inner.add_object(type0_font))
    }

    fn current_font_data(&self) -> Result<&FontData> {
        let name = self
            .current_font
            .as_deref()
            .ok_or_else(|| PdfError::FontNotFound("No font set".to_string()))?;
        self.fonts
            .get(name)
            .ok_or_else(|| PdfError::FontNotFound(name.to_string()))
    }
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new_a4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_dimensions() {
        let canvas = PdfCanvas::new_a4();
        assert_eq!(canvas.page_width(), 595.28);
        assert_eq!(canvas.page_height(), 841.89);
    }

    #[test]
    fn test_set_font_unknown() {
        let mut canvas = PdfCanvas::new_a4();
        assert!(matches!(
            canvas.set_font("missing", 12.0),
            Err(PdfError::FontNotFound(_))
        ));
    }

    #[test]
    fn test_draw_text_without_font() {
        let mut canvas = PdfCanvas::new_a4();
        assert!(canvas.draw_text("hi", 0.0, 0.0, Align::Left).is_err());
    }

    #[test]
    fn test_draw_empty_text_is_noop() {
        let mut canvas = PdfCanvas::new_a4();
        // No font set, but empty text never reaches the font lookup
        assert!(canvas.draw_text("", 0.0, 0.0, Align::Left).is_ok());
        assert!(canvas.content.is_empty());
    }

    #[test]
    fn test_rect_converts_to_bottom_origin() {
        let mut canvas = PdfCanvas::new_a4();
        canvas.fill_rect(0.0, 0.0, 100.0, 80.0, Color::black());

        let content = String::from_utf8(canvas.content.clone()).unwrap();
        // Top-left (0, 0) with height 80 lands at PDF y = 841.89 - 80
        assert!(content.contains("0 761.89 100 80 re"));
    }

    #[test]
    fn test_save_rect_only_document() {
        let mut canvas = PdfCanvas::new_a4();
        canvas.fill_rect(10.0, 10.0, 50.0, 50.0, Color::from_rgb(46, 64, 87));
        canvas.line(0.0, 100.0, 595.28, 100.0, Color::black(), 1.0);

        let bytes = canvas.to_bytes().expect("serialize");
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_rect_only_document_is_deterministic() {
        let render = || {
            let mut canvas = PdfCanvas::new_a4();
            canvas.fill_rect(10.0, 10.0, 50.0, 50.0, Color::white());
            canvas.stroke_rect(10.0, 10.0, 50.0, 50.0, Color::black(), 1.5);
            canvas.to_bytes().expect("serialize")
        };

        assert_eq!(render(), render());
    }

    #[test]
    fn test_duplicate_font_rejected() {
        let mut canvas = PdfCanvas::new_a4();
        let font = crate::font::test_support::faceless("amiri");
        canvas.install_font(font.clone()).unwrap();
        assert!(matches!(
            canvas.install_font(font),
            Err(PdfError::FontAlreadyExists(_))
        ));
    }
}
