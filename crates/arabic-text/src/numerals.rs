//! Arabic-Indic numeral localization

/// Replace ASCII digits with Arabic-Indic numerals
///
/// Every other character passes through unchanged, so dates
/// ("2024-01-15") and amounts ("109.25") keep their separators.
pub fn localize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0' => '٠',
            '1' => '١',
            '2' => '٢',
            '3' => '٣',
            '4' => '٤',
            '5' => '٥',
            '6' => '٦',
            '7' => '٧',
            '8' => '٨',
            '9' => '٩',
            _ => c,
        })
        .collect()
}

/// Format a monetary amount with two fraction digits and localized numerals
pub fn format_amount(amount: f64) -> String {
    localize_digits(&format!("{amount:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_digits() {
        assert_eq!(localize_digits("0123456789"), "٠١٢٣٤٥٦٧٨٩");
    }

    #[test]
    fn test_separators_pass_through() {
        assert_eq!(localize_digits("2024-01-15"), "٢٠٢٤-٠١-١٥");
        assert_eq!(localize_digits("109.25"), "١٠٩.٢٥");
    }

    #[test]
    fn test_non_digit_text_unchanged() {
        assert_eq!(localize_digits("INV-"), "INV-");
        assert_eq!(localize_digits(""), "");
    }

    #[test]
    fn test_format_amount_two_decimals() {
        assert_eq!(format_amount(100.0), "١٠٠.٠٠");
        assert_eq!(format_amount(14.25), "١٤.٢٥");
        assert_eq!(format_amount(0.5), "٠.٥٠");
    }

    #[test]
    fn test_format_amount_rounds() {
        assert_eq!(format_amount(5.005), localize_digits(&format!("{:.2}", 5.005)));
    }
}
