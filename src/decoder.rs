//! Fixed-Width Decoder.
//!
//! Turns a whole file held in memory into an ordered sequence of
//! [`DecodedRecord`]s. Blank lines are discarded; a line whose leading
//! character is not a known record code is skipped with a diagnostic.
//!
//! ```
//! use lockbox_rs::decode;
//!
//! let file = decode("10 DEST      ORIGIN    2304011200\r\n\r\n9000002");
//! assert_eq!(file.records.len(), 2);
//! assert_eq!(file.records[1].raw_value("Record Count"), "000002");
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::record::DecodedRecord;
use crate::schema;

/// A non-blank line that produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Position among non-blank lines.
    pub index: usize,
    pub code: char,
    pub line: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: unknown record type: {}", self.index, self.code)
    }
}

/// Result of one decode pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFile {
    /// Known-code records in file order.
    pub records: Vec<DecodedRecord>,
    /// Number of non-blank lines, including skipped ones.
    pub line_count: usize,
    /// Lines skipped because of an unknown record code.
    pub diagnostics: Vec<Diagnostic>,
}

impl DecodedFile {
    /// The file's record total as the Lockbox viewer reports it: non-blank
    /// lines minus one. Never negative.
    pub fn total_records(&self) -> usize {
        self.line_count.saturating_sub(1)
    }

    /// Look up a record by its sequence index.
    pub fn record(&self, index: usize) -> Option<&DecodedRecord> {
        self.records
            .binary_search_by_key(&index, |r| r.index)
            .ok()
            .map(|pos| &self.records[pos])
    }
}

/// Rewrite `\r\n` and lone `\r` line endings as `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decode a text blob into records. A leading byte-order mark is ignored.
pub fn decode(text: &str) -> DecodedFile {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let normalized = normalize_line_endings(text);
    let mut file = DecodedFile::default();

    let lines = normalized.split('\n').filter(|l| !l.trim().is_empty());
    for (index, line) in lines.enumerate() {
        file.line_count += 1;

        // Non-blank lines always have a first character.
        let Some(code) = line.chars().next() else {
            continue;
        };

        match schema::lookup(code) {
            Some(record_type) => {
                file.records
                    .push(DecodedRecord::from_line(record_type, line, index));
            }
            None => {
                warn!(index, code = %code, "unknown record type, skipping line");
                file.diagnostics.push(Diagnostic {
                    index,
                    code,
                    line: line.to_string(),
                });
            }
        }
    }

    debug!(
        lines = file.line_count,
        records = file.records.len(),
        skipped = file.diagnostics.len(),
        "decoded lockbox file"
    );
    file
}

/// Decode raw bytes. Fails only if the bytes are not UTF-8 text; nothing is
/// returned from a failed decode.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedFile> {
    let text = std::str::from_utf8(bytes)?;
    Ok(decode(text))
}
