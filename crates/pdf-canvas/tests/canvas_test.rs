//! Integration tests for the PDF canvas
//!
//! These tests draw geometry only, so they run without any font files.

use pdf_canvas::{Color, PdfCanvas, RectPaint};
use pretty_assertions::assert_eq;

fn rect_document() -> Vec<u8> {
    let mut canvas = PdfCanvas::new_a4();
    canvas.fill_rect(0.0, 0.0, canvas.page_width(), 80.0, Color::from_rgb(46, 64, 87));
    canvas.paint_rect(
        56.69,
        120.0,
        200.0,
        80.0,
        RectPaint::fill_and_stroke(Color::white(), Color::black(), 1.0),
    );
    canvas.line(56.69, 771.89, 538.58, 771.89, Color::black(), 1.0);
    canvas.to_bytes().expect("serialize")
}

#[test]
fn produced_document_parses_back() {
    let bytes = rect_document();
    assert!(bytes.starts_with(b"%PDF-1.5"));

    let doc = lopdf::Document::load_mem(&bytes).expect("reload");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);

    let page_id = pages[&1];
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    assert_eq!(media_box.len(), 4);
    assert!(page.get(b"Contents").is_ok());
}

#[test]
fn identical_drawings_produce_identical_bytes() {
    assert_eq!(rect_document(), rect_document());
}

#[test]
fn content_stream_contains_drawing_operators() {
    let bytes = rect_document();
    let doc = lopdf::Document::load_mem(&bytes).expect("reload");
    let page_id = doc.get_pages()[&1];
    let content = doc.get_page_content(page_id).expect("content");
    let content_str = String::from_utf8_lossy(&content);

    assert!(content_str.contains("re"));
    assert!(content_str.contains("m"));
    assert!(content_str.contains("l"));
}
