//! Statistics Aggregator.
//!
//! One forward pass over the decoded sequence, independent of the group tree:
//! per-code counts, file-level metadata from the first transmission header,
//! one account per lockbox header and one transaction per payment.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::consumer::{self, RecordConsumer};
use crate::decoder::DecodedFile;
use crate::record::DecodedRecord;
use crate::schema::names;

/// Metadata from the first transmission header (raw values).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Origin field.
    pub sender: String,
    /// Destination field.
    pub receiver: String,
    pub creation_date: String,
    pub creation_time: String,
    /// Not carried by the transmission header; always empty.
    pub file_id: String,
}

/// A lockbox header, reported as an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: String,
    pub currency_code: &'static str,
    pub index: usize,
}

/// A payment record, reported as a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub type_code: &'static str,
    /// Raw remittance amount in cents.
    pub amount: String,
    /// Remittance RTN.
    pub bank_ref: String,
    /// Check number.
    pub customer_ref: String,
    /// Remittance account number.
    pub description: String,
    pub index: usize,
}

/// Summary of one decoded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Non-blank lines minus one; see [`DecodedFile::total_records`].
    pub total_records: usize,
    /// Non-blank lines, including skipped ones.
    pub line_count: usize,
    pub record_counts: BTreeMap<char, usize>,
    pub file_info: Option<FileInfo>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

impl Statistics {
    pub fn record_count(&self, code: char) -> usize {
        self.record_counts.get(&code).copied().unwrap_or(0)
    }

    /// Number of distinct record codes seen.
    pub fn record_type_count(&self) -> usize {
        self.record_counts.len()
    }

    /// Sum of the per-code counts, i.e. the number of decoded records.
    pub fn counted_records(&self) -> usize {
        self.record_counts.values().sum()
    }
}

/// Accumulates [`Statistics`] one record at a time.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    stats: Statistics,
}

impl StatsAggregator {
    /// `line_count` is the file's non-blank line count, which the records
    /// alone cannot tell.
    pub fn new(line_count: usize) -> Self {
        Self {
            stats: Statistics {
                line_count,
                total_records: line_count.saturating_sub(1),
                ..Statistics::default()
            },
        }
    }
}

impl<'a> RecordConsumer<'a> for StatsAggregator {
    type Output = Statistics;

    fn consume(&mut self, record: &'a DecodedRecord) {
        let stats = &mut self.stats;
        *stats.record_counts.entry(record.code).or_insert(0) += 1;

        match record.code {
            '1' if stats.file_info.is_none() => {
                stats.file_info = Some(FileInfo {
                    sender: record.raw_value(names::ORIGIN).to_string(),
                    receiver: record.raw_value(names::DESTINATION).to_string(),
                    creation_date: record.raw_value(names::DATE).to_string(),
                    creation_time: record.raw_value(names::TIME).to_string(),
                    file_id: String::new(),
                });
            }
            '5' => stats.accounts.push(Account {
                account_number: record.raw_value(names::LOCKBOX_NUMBER).to_string(),
                currency_code: "USD",
                index: record.index,
            }),
            '6' => stats.transactions.push(Transaction {
                type_code: "DTL",
                amount: record.raw_value(names::REMITTANCE_AMOUNT).to_string(),
                bank_ref: record.raw_value(names::REMITTANCE_RTN).to_string(),
                customer_ref: record.raw_value(names::CHECK_NUMBER).to_string(),
                description: record
                    .raw_value(names::REMITTANCE_ACCOUNT_NUMBER)
                    .to_string(),
                index: record.index,
            }),
            _ => {}
        }
    }

    fn finish(self) -> Statistics {
        self.stats
    }

    fn name(&self) -> &str {
        "STATS"
    }
}

/// Aggregate statistics for a decoded file.
pub fn aggregate(file: &DecodedFile) -> Statistics {
    consumer::run(&file.records, StatsAggregator::new(file.line_count))
}

impl DecodedFile {
    pub fn statistics(&self) -> Statistics {
        aggregate(self)
    }
}
