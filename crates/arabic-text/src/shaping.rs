//! Contextual shaping and bidirectional reordering

use ar_reshaper::{ArabicReshaper, ReshaperConfig};
use unicode_bidi::BidiInfo;

/// Mirror paired punctuation when a run is reversed
fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '«' => '»',
        '»' => '«',
        _ => c,
    }
}

/// Prepare a logical-order string for glyph-by-glyph rendering
///
/// Splits the text into bidirectional runs, applies contextual joining to
/// the right-to-left runs, and emits everything in visual order. Embedded
/// left-to-right runs (Latin words, digit groups) keep their order. Paired
/// brackets inside reversed runs are mirrored so they still open toward the
/// enclosed text.
///
/// Best-effort: text without right-to-left content comes back unchanged.
pub fn shape(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let info = BidiInfo::new(text, None);
    let reshaper = ArabicReshaper::new(ReshaperConfig::default());

    let mut out = String::with_capacity(text.len());
    for para in &info.paragraphs {
        // The levels vector is per byte; each run's direction comes from the
        // level at its own start. Digit runs resolve to an even level even
        // inside Arabic text and must never be reversed.
        let (levels, runs) = info.visual_runs(para, para.range.clone());
        for run in runs {
            let slice = &text[run.clone()];
            if levels[run.start].is_rtl() {
                let shaped = reshaper.reshape(slice);
                out.extend(shaped.chars().rev().map(mirror));
            } else {
                out.push_str(slice);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty() {
        assert_eq!(shape(""), "");
    }

    #[test]
    fn test_latin_passthrough() {
        assert_eq!(shape("Widget 2x"), "Widget 2x");
    }

    #[test]
    fn test_arabic_is_reversed() {
        // "فاتورة" in visual order ends with the glyph for the first logical
        // letter. The shaped forms are presentation-form codepoints, so only
        // check ordering-sensitive structure here.
        let out = shape("فاتورة");
        assert_eq!(out.chars().count(), 6);
        assert_ne!(out, "فاتورة");
    }

    #[test]
    fn test_isolated_letter_keeps_count() {
        // A single letter has only its isolated form
        let out = shape("م");
        assert_eq!(out.chars().count(), 1);
    }

    #[test]
    fn test_shape_is_idempotent_for_latin() {
        let once = shape("Invoice 2024-001");
        assert_eq!(shape(&once), once);
    }

    #[test]
    fn test_brackets_mirrored_in_rtl_run() {
        // Arabic-Indic digits and the percent sign are part of the RTL run;
        // reversing it must flip the parentheses too
        let out = shape("الخصم (٥٪)");
        assert_eq!(out.matches('(').count(), 1);
        assert_eq!(out.matches(')').count(), 1);
        let open = out.find('(').unwrap();
        let close = out.find(')').unwrap();
        assert!(open < close);
    }

    #[test]
    fn test_mixed_direction_keeps_ltr_order() {
        // The embedded ASCII number must survive in readable order
        let out = shape("رقم 123");
        assert!(out.contains("123"));
    }

    #[test]
    fn test_arabic_indic_amount_keeps_digit_order() {
        // A currency label followed by a localized amount splits into an
        // RTL run and a digit run; only the letters get reversed
        let out = shape("ريال ١٠٩.٢٥");
        assert!(out.contains("١٠٩.٢٥"));
    }

    #[test]
    fn test_localized_date_unchanged() {
        assert_eq!(shape("٢٠٢٤-٠١-١٥"), "٢٠٢٤-٠١-١٥");
    }

    #[test]
    fn test_mirror_pairs() {
        assert_eq!(mirror('('), ')');
        assert_eq!(mirror(')'), '(');
        assert_eq!(mirror('ا'), 'ا');
    }
}
