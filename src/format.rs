//! Display formatters for field values.
//!
//! Formatting never fails: a value that does not fit the expected shape is
//! returned unchanged.

use crate::schema::FieldFormat;

/// Render a trimmed raw value according to its field's format tag.
pub fn format_value(format: FieldFormat, raw: &str) -> String {
    match format {
        FieldFormat::Text => raw.to_string(),
        FieldFormat::Amount => format_amount(raw),
        FieldFormat::Date => format_date(raw),
        FieldFormat::Time => format_time(raw),
    }
}

/// Integer cents to US currency, e.g. `0000012345` -> `$123.45`.
///
/// An empty amount is zero. Anything that is not a signed integer, including
/// decimal values such as `1.50`, is returned as-is.
pub fn format_amount(raw: &str) -> String {
    let cents: i64 = if raw.is_empty() {
        0
    } else {
        match raw.parse() {
            Ok(v) => v,
            Err(_) => return raw.to_string(),
        }
    };

    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!(
        "{sign}${}.{:02}",
        group_thousands(&(abs / 100).to_string()),
        abs % 100
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `YYMMDD` -> `20YY-MM-DD`, `MMDDYYYY` -> `MM/DD/YYYY`.
///
/// Other lengths, and values that are not all digits, pass through.
pub fn format_date(raw: &str) -> String {
    if !all_digits(raw) {
        return raw.to_string();
    }
    match raw.len() {
        6 => format!("20{}-{}-{}", &raw[0..2], &raw[2..4], &raw[4..6]),
        8 => format!("{}/{}/{}", &raw[0..2], &raw[2..4], &raw[4..8]),
        _ => raw.to_string(),
    }
}

/// `HHMM` -> `HH:MM`.
pub fn format_time(raw: &str) -> String {
    if raw.len() == 4 && all_digits(raw) {
        format!("{}:{}", &raw[0..2], &raw[2..4])
    } else {
        raw.to_string()
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_from_cents() {
        assert_eq!(format_amount("0000012345"), "$123.45");
        assert_eq!(format_amount("5"), "$0.05");
        assert_eq!(format_amount("0000000000"), "$0.00");
    }

    #[test]
    fn test_amount_thousands_separators() {
        assert_eq!(format_amount("123456789"), "$1,234,567.89");
        assert_eq!(format_amount("100000"), "$1,000.00");
        assert_eq!(format_amount("99999"), "$999.99");
    }

    #[test]
    fn test_amount_negative() {
        assert_eq!(format_amount("-250"), "-$2.50");
    }

    #[test]
    fn test_amount_empty_is_zero() {
        assert_eq!(format_amount(""), "$0.00");
    }

    #[test]
    fn test_amount_not_numeric_passes_through() {
        assert_eq!(format_amount("12AB"), "12AB");
        assert_eq!(format_amount("1.50"), "1.50");
    }

    #[test]
    fn test_date_short_form() {
        assert_eq!(format_date("230401"), "2023-04-01");
    }

    #[test]
    fn test_date_long_form() {
        assert_eq!(format_date("04012023"), "04/01/2023");
    }

    #[test]
    fn test_date_other_lengths_pass_through() {
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("2304"), "2304");
        assert_eq!(format_date("2023040"), "2023040");
        assert_eq!(format_date("23O401"), "23O401");
    }

    #[test]
    fn test_time() {
        assert_eq!(format_time("1430"), "14:30");
        assert_eq!(format_time("143"), "143");
        assert_eq!(format_time(""), "");
        assert_eq!(format_time("14h3"), "14h3");
    }

    #[test]
    fn test_format_value_dispatch() {
        assert_eq!(format_value(FieldFormat::Text, "0000012345"), "0000012345");
        assert_eq!(format_value(FieldFormat::Amount, "0000012345"), "$123.45");
        assert_eq!(format_value(FieldFormat::Date, "230401"), "2023-04-01");
        assert_eq!(format_value(FieldFormat::Time, "0905"), "09:05");
    }
}
