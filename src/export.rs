//! JSON export of a decoded file.
//!
//! The snapshot holds the flat record list, the statistics and the group
//! tree. Groups refer to records by sequence index rather than repeating them.

use serde::Serialize;

use crate::decoder::{DecodedFile, Diagnostic};
use crate::error::Result;
use crate::group::GroupTree;
use crate::record::DecodedRecord;
use crate::stats::Statistics;

/// Everything a presentation layer needs, borrowed from one decoded file.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub records: &'a [DecodedRecord],
    pub statistics: Statistics,
    pub groups: GroupTree<'a>,
    pub skipped: &'a [Diagnostic],
}

impl<'a> Snapshot<'a> {
    pub fn new(file: &'a DecodedFile) -> Self {
        Self {
            records: &file.records,
            statistics: file.statistics(),
            groups: file.group_tree(),
            skipped: &file.diagnostics,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl DecodedFile {
    /// Pretty-printed JSON export of this file.
    pub fn to_json(&self) -> Result<String> {
        Snapshot::new(self).to_json()
    }
}
