//! Read-only queries over decoded records.
//!
//! Presentation layers (tables, search boxes, type filters) read the decoded
//! file through these helpers; nothing here mutates a record or a group.

use crate::decoder::DecodedFile;
use crate::record::DecodedRecord;

/// Columns shown by default for payment (code 6) rows.
pub const DEFAULT_PAYMENT_COLUMNS: &[&str] = &[
    "Batch Number",
    "Item Number",
    "Remittance Amount",
    "Remittance RTN",
    "Check Number",
    "Check Date",
    "Check Level Remitter Name",
];

/// Columns shown by default for invoice (code 4) rows.
pub const DEFAULT_INVOICE_COLUMNS: &[&str] = &[
    "Invoice Number",
    "Invoice Amount",
    "Gross Invoice Amount",
    "Discount Invoice Amount",
    "Last Indicator",
];

/// Default table columns for a record code, if it has a table view.
pub fn default_columns(code: char) -> Option<&'static [&'static str]> {
    match code {
        '6' => Some(DEFAULT_PAYMENT_COLUMNS),
        '4' => Some(DEFAULT_INVOICE_COLUMNS),
        _ => None,
    }
}

/// Search term plus optional record-code restriction. Both must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    search: String,
    code: Option<char>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring search over the raw line, the record type
    /// name, and each field's name and formatted value.
    pub fn search(mut self, term: &str) -> Self {
        self.search = term.to_lowercase();
        self
    }

    pub fn code(mut self, code: char) -> Self {
        self.code = Some(code);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.code.is_none()
    }

    pub fn matches(&self, record: &DecodedRecord) -> bool {
        let matches_type = self.code.is_none_or(|c| record.code == c);
        let matches_search = self.search.is_empty() || record.contains_lowercase(&self.search);
        matches_type && matches_search
    }

    /// Records that pass the filter, in file order.
    pub fn apply<'a>(&self, records: &'a [DecodedRecord]) -> Vec<&'a DecodedRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

impl DecodedFile {
    pub fn filter(&self, filter: &RecordFilter) -> Vec<&DecodedRecord> {
        filter.apply(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    const SAMPLE: &str = "101BANKDEST  ORIGINCO  2304011430
5      1234567230401
6001002000001234512345678900000111110000002222
6001003000000050012345678900000111110000003333
4001003    INV-77         0000000500";

    #[test]
    fn test_empty_filter_matches_everything() {
        let file = decode(SAMPLE);
        let filter = RecordFilter::new();
        assert!(filter.is_empty());
        assert_eq!(file.filter(&filter).len(), file.records.len());
    }

    #[test]
    fn test_filter_by_code() {
        let file = decode(SAMPLE);
        let payments = file.filter(&RecordFilter::new().code('6'));
        assert_eq!(payments.len(), 2);
        assert!(payments.iter().all(|r| r.code == '6'));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let file = decode(SAMPLE);
        let hits = file.filter(&RecordFilter::new().search("originco"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, '1');

        let hits = file.filter(&RecordFilter::new().search("inv-77"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, '4');
    }

    #[test]
    fn test_search_matches_formatted_values_and_names() {
        let file = decode(SAMPLE);
        // Formatted amount, not present in any raw line.
        let hits = file.filter(&RecordFilter::new().search("$123.45"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 2);
        // Formatted date.
        let hits = file.filter(&RecordFilter::new().search("2023-04-01"));
        assert_eq!(hits.len(), 2);
        // Type name.
        let hits = file.filter(&RecordFilter::new().search("LOCKBOX HEADER"));
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_search_and_code_combine() {
        let file = decode(SAMPLE);
        let filter = RecordFilter::new().search("$5.00").code('6');
        let hits = file.filter(&filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 3);
        assert!(file.filter(&RecordFilter::new().search("inv-77").code('6')).is_empty());
    }

    #[test]
    fn test_default_columns_resolve() {
        let file = decode(SAMPLE);
        let invoice = &file.records[4];
        let cols = invoice.select_columns(default_columns('4').unwrap());
        assert_eq!(
            cols,
            vec![Some("INV-77"), Some("$5.00"), Some("$0.00"), Some("$0.00"), Some("")]
        );
        assert!(default_columns('1').is_none());
        assert_eq!(default_columns('6').unwrap().len(), 7);
    }
}
