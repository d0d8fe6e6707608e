//! Decoded records and fixed-width column extraction.

use serde::{Serialize, Serializer};

use crate::format::format_value;
use crate::schema::{FieldSchema, RecordTypeSchema};

/// Slice the 1-based inclusive column range `[start, end]` out of `line`.
///
/// Columns are counted in characters. A line shorter than the range yields
/// whatever part of the range it covers, possibly nothing; it is never padded.
pub fn column_slice(line: &str, start: usize, end: usize) -> &str {
    let from = start.saturating_sub(1);
    let to = end.max(from);

    if line.is_ascii() {
        let len = line.len();
        return &line[from.min(len)..to.min(len)];
    }

    let byte_at = |n: usize| {
        line.char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    };
    &line[byte_at(from)..byte_at(to)]
}

/// A single extracted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedField {
    pub name: &'static str,
    /// Trimmed substring of the line.
    pub raw_value: String,
    /// Display rendering of `raw_value`.
    pub value: String,
}

impl DecodedField {
    /// Extract and format one field from a raw line.
    pub fn extract(schema: &FieldSchema, line: &str) -> Self {
        let raw_value = column_slice(line, schema.start, schema.end).trim().to_string();
        let value = format_value(schema.format, &raw_value);
        Self {
            name: schema.name,
            raw_value,
            value,
        }
    }
}

/// One decoded line of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedRecord {
    pub code: char,
    #[serde(rename = "recordType", serialize_with = "serialize_type_name")]
    pub schema: &'static RecordTypeSchema,
    /// The original line, untrimmed.
    pub raw: String,
    pub fields: Vec<DecodedField>,
    /// Position among the non-blank lines of the file.
    pub index: usize,
}

fn serialize_type_name<S: Serializer>(
    schema: &&'static RecordTypeSchema,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(schema.name)
}

impl DecodedRecord {
    /// Decode `line` against `schema`, extracting every field in declared order.
    pub fn from_line(schema: &'static RecordTypeSchema, line: &str, index: usize) -> Self {
        Self {
            code: schema.code,
            schema,
            raw: line.to_string(),
            fields: schema
                .fields
                .iter()
                .map(|f| DecodedField::extract(f, line))
                .collect(),
            index,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.schema.name
    }

    pub fn field(&self, name: &str) -> Option<&DecodedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Raw value of a field, or `""` if the record type has no such field.
    pub fn raw_value(&self, name: &str) -> &str {
        self.field(name).map(|f| f.raw_value.as_str()).unwrap_or("")
    }

    /// Formatted values for the requested columns, in column order.
    pub fn select_columns(&self, columns: &[&str]) -> Vec<Option<&str>> {
        columns
            .iter()
            .map(|c| self.field(c).map(|f| f.value.as_str()))
            .collect()
    }

    /// Case-insensitive match against the raw line, the type name, and every
    /// field's name and formatted value. `needle` must already be lowercase.
    pub(crate) fn contains_lowercase(&self, needle: &str) -> bool {
        self.raw.to_lowercase().contains(needle)
            || self.schema.name.to_lowercase().contains(needle)
            || self.fields.iter().any(|f| {
                f.value.to_lowercase().contains(needle) || f.name.to_lowercase().contains(needle)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{lookup, names};

    #[test]
    fn test_column_slice() {
        assert_eq!(column_slice("ABCDEFGH", 1, 1), "A");
        assert_eq!(column_slice("ABCDEFGH", 2, 4), "BCD");
        assert_eq!(column_slice("ABCDEFGH", 6, 20), "FGH");
        assert_eq!(column_slice("ABC", 10, 20), "");
        assert_eq!(column_slice("", 1, 5), "");
    }

    #[test]
    fn test_column_slice_counts_characters() {
        assert_eq!(column_slice("1ÉCOLE  X", 2, 6), "ÉCOLE");
        assert_eq!(column_slice("1ÉCOLE  X", 9, 9), "X");
        assert_eq!(column_slice("1É", 3, 9), "");
    }

    #[test]
    fn test_from_line_extracts_all_fields() {
        let line = "101BANKDEST  ORIGINCO  2304011430";
        let rec = DecodedRecord::from_line(lookup('1').unwrap(), line, 0);
        assert_eq!(rec.code, '1');
        assert_eq!(rec.type_name(), "Transmission Header");
        assert_eq!(rec.fields.len(), 7);
        assert_eq!(rec.raw_value("Priority Code"), "01");
        assert_eq!(rec.raw_value(names::DESTINATION), "BANKDEST");
        assert_eq!(rec.raw_value(names::ORIGIN), "ORIGINCO");
        assert_eq!(rec.field(names::DATE).unwrap().value, "2023-04-01");
        assert_eq!(rec.field(names::TIME).unwrap().value, "14:30");
        assert_eq!(rec.raw_value("Reserved"), "");
        assert_eq!(rec.raw, line);
    }

    #[test]
    fn test_raw_value_never_exceeds_width() {
        let line = format!("6{}", "9".repeat(400));
        let rec = DecodedRecord::from_line(lookup('6').unwrap(), &line, 3);
        for (field, schema) in rec.fields.iter().zip(rec.schema.fields) {
            assert!(field.raw_value.chars().count() <= schema.width(), "{}", field.name);
        }
        assert_eq!(rec.index, 3);
    }

    #[test]
    fn test_select_columns() {
        let line = "6001002000001234512345678900000111110000002222";
        let rec = DecodedRecord::from_line(lookup('6').unwrap(), line, 0);
        let cols = rec.select_columns(&["Batch Number", "Remittance Amount", "Nope"]);
        assert_eq!(cols, vec![Some("001"), Some("$123.45"), None]);
    }

    #[test]
    fn test_contains_lowercase() {
        let line = "6001002000001234512345678900000111110000002222";
        let rec = DecodedRecord::from_line(lookup('6').unwrap(), line, 0);
        assert!(rec.contains_lowercase("payment"));
        assert!(rec.contains_lowercase("$123.45"));
        assert!(rec.contains_lowercase("remittance rtn"));
        assert!(!rec.contains_lowercase("lockbox"));
    }
}
