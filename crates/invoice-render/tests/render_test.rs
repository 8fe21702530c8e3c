use anyhow::Result;
use invoice_render::{
    BuildError, DocumentBuilder, InvoiceRecord, LineItem, RenderWarning, ThemeRegistry,
};
use std::path::PathBuf;

/// Locate an Arabic-capable TrueType font on the host
///
/// End-to-end rendering needs a real font file. Tests that render skip
/// themselves when none is found; set INVOICE_TEST_FONT to point at one.
fn find_font() -> Option<Vec<u8>> {
    if let Ok(path) = std::env::var("INVOICE_TEST_FONT") {
        if let Ok(data) = std::fs::read(&path) {
            return Some(data);
        }
    }
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/noto/NotoNaskhArabic-Regular.ttf",
        "/usr/share/fonts/truetype/kacst/KacstOne.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
    ];
    candidates
        .iter()
        .find_map(|path| std::fs::read(path).ok())
}

fn sample_record() -> InvoiceRecord {
    InvoiceRecord {
        invoice_no: "INV-1001".to_string(),
        invoice_date: "2024-01-15".to_string(),
        due_date: "2024-01-29".to_string(),
        client_info: vec![
            "مؤسسة الاختبار التجارية".to_string(),
            "جدة، المملكة العربية السعودية".to_string(),
        ],
        items: vec![
            LineItem {
                description: "تطوير موقع إلكتروني".to_string(),
                unit: "ساعة".to_string(),
                quantity: "40".to_string(),
                line_total: "6000.00".to_string(),
            },
            LineItem {
                description: "استضافة سنوية".to_string(),
                unit: "سنة".to_string(),
                quantity: "1".to_string(),
                line_total: "500.00".to_string(),
            },
        ],
    }
}

#[test]
fn test_unknown_theme_fails_before_rendering() {
    let Some(font) = find_font() else {
        eprintln!("skipping: no test font found");
        return;
    };
    let builder = DocumentBuilder::new(ThemeRegistry::with_builtin(), &font).unwrap();
    let err = builder.build(&sample_record(), "Company 9 - Imaginary").unwrap_err();
    assert!(matches!(err, BuildError::ThemeNotFound(_)));
}

#[test]
fn test_each_builtin_theme_renders_a_parseable_pdf() -> Result<()> {
    let Some(font) = find_font() else {
        eprintln!("skipping: no test font found");
        return Ok(());
    };
    let builder = DocumentBuilder::new(ThemeRegistry::with_builtin(), &font)?;

    let ids: Vec<String> = builder.registry().ids().map(String::from).collect();
    for theme_id in ids {
        let doc = builder.build(&sample_record(), &theme_id)?;
        assert!(doc.bytes.starts_with(b"%PDF"), "{theme_id}: not a PDF");

        let parsed = lopdf::Document::load_mem(&doc.bytes)?;
        assert_eq!(parsed.get_pages().len(), 1, "{theme_id}: page count");
    }
    Ok(())
}

#[test]
fn test_same_record_renders_identical_bytes() -> Result<()> {
    let Some(font) = find_font() else {
        eprintln!("skipping: no test font found");
        return Ok(());
    };
    let builder = DocumentBuilder::new(ThemeRegistry::with_builtin(), &font)?;
    let record = sample_record();

    let first = builder.build(&record, "Company 1 - Classic")?;
    let second = builder.build(&record, "Company 1 - Classic")?;
    assert_eq!(first.bytes, second.bytes);
    Ok(())
}

#[test]
fn test_missing_logo_warns_but_succeeds() -> Result<()> {
    let Some(font) = find_font() else {
        eprintln!("skipping: no test font found");
        return Ok(());
    };
    // Built-in themes point at asset paths that do not exist on test hosts.
    let builder = DocumentBuilder::new(ThemeRegistry::with_builtin(), &font)?;
    let doc = builder.build(&sample_record(), "Company 1 - Classic")?;
    assert!(doc.warnings.contains(&RenderWarning::LogoMissing));
    Ok(())
}

#[test]
fn test_bad_line_total_writes_no_file() -> Result<()> {
    let Some(font) = find_font() else {
        eprintln!("skipping: no test font found");
        return Ok(());
    };
    let builder = DocumentBuilder::new(ThemeRegistry::with_builtin(), &font)?;
    let dir = std::env::temp_dir().join("invoice-render-test-bad-total");
    std::fs::create_dir_all(&dir)?;

    let mut record = sample_record();
    record.invoice_no = "INV-BAD".to_string();
    record.items[1].line_total = "خمسمائة".to_string();

    let err = builder
        .build_to_dir(&record, "Company 2 - Modern", &dir)
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::InvalidLineItem { index: 1, .. }
    ));
    assert!(!dir.join("INV-BAD.pdf").exists());

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_batch_continues_past_failures() -> Result<()> {
    let Some(font) = find_font() else {
        eprintln!("skipping: no test font found");
        return Ok(());
    };
    let builder = DocumentBuilder::new(ThemeRegistry::with_builtin(), &font)?;
    let dir = std::env::temp_dir().join("invoice-render-test-batch");
    std::fs::create_dir_all(&dir)?;

    let good = sample_record();
    let mut bad = sample_record();
    bad.invoice_no = "INV-1002".to_string();
    bad.items[0].line_total = "n/a".to_string();
    let mut last = sample_record();
    last.invoice_no = "INV-1003".to_string();

    let results = builder.build_batch(&[good, bad, last], "Company 3 - Professional", &dir);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());

    let written: Vec<PathBuf> = results.into_iter().flatten().collect();
    assert_eq!(written.len(), 2);
    for path in &written {
        assert!(path.exists());
    }

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_long_item_list_attaches_overflow_warning() -> Result<()> {
    let Some(font) = find_font() else {
        eprintln!("skipping: no test font found");
        return Ok(());
    };
    let builder = DocumentBuilder::new(ThemeRegistry::with_builtin(), &font)?;

    let mut record = sample_record();
    record.items = (1..=40)
        .map(|i| LineItem {
            description: format!("بند رقم {i}"),
            unit: "قطعة".to_string(),
            quantity: "1".to_string(),
            line_total: "10.00".to_string(),
        })
        .collect();

    // 40 rows push the flowed content well past the footer reserve; the
    // render still succeeds and reports it.
    let doc = builder.build(&record, "Company 1 - Classic")?;
    assert!(doc.warnings.contains(&RenderWarning::ContentOverflow));
    Ok(())
}

#[test]
fn test_empty_items_render_totals_of_zero() -> Result<()> {
    let Some(font) = find_font() else {
        eprintln!("skipping: no test font found");
        return Ok(());
    };
    let builder = DocumentBuilder::new(ThemeRegistry::with_builtin(), &font)?;

    let mut record = sample_record();
    record.items.clear();
    let doc = builder.build(&record, "Company 1 - Classic")?;
    assert!(doc.bytes.starts_with(b"%PDF"));
    Ok(())
}
