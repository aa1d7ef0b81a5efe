use chrono::{DateTime, Utc};
use std::path::Path;

use crate::error::ValidationError;

const IMPORT_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];

/// Whole-rupee amount with Indian digit grouping, e.g. `₹12,34,567`.
pub fn format_currency(amount: Option<f64>) -> String {
    let Some(amount) = amount.filter(|value| value.is_finite()) else {
        return "₹0".to_string();
    };

    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-₹{}", group_indian(&digits))
    } else {
        format!("₹{}", group_indian(&digits))
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Parse a user-typed amount. Currency symbols, grouping commas and spaces are ignored.
pub fn parse_amount(value: &str) -> Result<f64, ValidationError> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '₹' | ',' | ' '))
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .ok_or_else(|| ValidationError::InvalidAmount(value.trim().to_string()))
}

pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|date| date.format("%d %b %Y").to_string())
        .unwrap_or_default()
}

/// Bank exports the server can import. Only the extension is checked.
pub fn is_importable_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMPORT_EXTENSIONS.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_indian_grouping() {
        assert_eq!(format_currency(Some(0.0)), "₹0");
        assert_eq!(format_currency(Some(999.0)), "₹999");
        assert_eq!(format_currency(Some(1000.0)), "₹1,000");
        assert_eq!(format_currency(Some(123456.0)), "₹1,23,456");
        assert_eq!(format_currency(Some(12345678.0)), "₹1,23,45,678");
    }

    #[test]
    fn rounds_to_whole_rupees() {
        assert_eq!(format_currency(Some(1499.5)), "₹1,500");
        assert_eq!(format_currency(Some(-2500.4)), "-₹2,500");
        assert_eq!(format_currency(Some(-0.2)), "₹0");
    }

    #[test]
    fn missing_amount_is_zero() {
        assert_eq!(format_currency(None), "₹0");
        assert_eq!(format_currency(Some(f64::NAN)), "₹0");
    }

    #[test]
    fn parses_typed_amounts() {
        assert_eq!(parse_amount("1,250.50").unwrap(), 1250.5);
        assert_eq!(parse_amount(" ₹ 1,00,000 ").unwrap(), 100000.0);
        assert_eq!(parse_amount("0").unwrap(), 0.0);
    }

    #[test]
    fn rejects_bad_amounts() {
        assert_eq!(
            parse_amount("ten"),
            Err(ValidationError::InvalidAmount("ten".to_string()))
        );
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-5").is_err());
    }

    #[test]
    fn import_filter_checks_extension_only() {
        assert!(is_importable_file(Path::new("statement.csv")));
        assert!(is_importable_file(Path::new("/tmp/Statement.XLSX")));
        assert!(is_importable_file(Path::new("old.xls")));
        assert!(!is_importable_file(Path::new("statement.pdf")));
        assert!(!is_importable_file(Path::new("csv")));
    }

    #[test]
    fn formats_dates() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();

        assert_eq!(format_date(Some(date)), "05 Mar 2024");
        assert_eq!(format_date(None), "");
    }
}
