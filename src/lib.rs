//! # lockbox-rs
//!
//! A decoder for fixed-width Lockbox remittance files.
//!
//! Banks deliver lockbox remittance data as positional text records, each
//! line identified by a single leading record code. The file is a nested
//! hierarchy (transmission, service, lockbox, batch, payment detail, invoice
//! overflow) sent flat, with the boundaries left implicit.
//!
//! ## Overview
//!
//! - **Schema registry**: the static layout of the eight record types
//! - **Decoder**: text to an ordered list of typed, formatted records
//! - **Grouping engine**: a pushdown automaton that rebuilds the hierarchy
//! - **Statistics**: a single-pass summary over the same records
//!
//! Decoding is lenient: unknown record codes are skipped, short lines yield
//! truncated fields and out-of-sequence records become `Orphan` groups. Only
//! input that is not text at all is an error.
//!
//! ## Example
//!
//! ```
//! use lockbox_rs::{GroupKind, decode};
//!
//! let text = "\
//! 101BANKDEST  ORIGINCO  2304011430
//! 2
//! 5      1234567230401
//! 6001001000001234512345678900000111110000002222
//! 7001001
//! 8
//! 9000006";
//!
//! let file = decode(text);
//! let stats = file.statistics();
//! assert_eq!(stats.transactions[0].amount, "0000012345");
//!
//! let tree = file.group_tree();
//! let lockbox = &tree.roots()[0].children()[0].children()[0];
//! assert_eq!(lockbox.kind(), GroupKind::Lockbox);
//! assert_eq!(lockbox.children()[0].batch_key(), Some("001"));
//! ```

pub mod consumer;
pub mod debug_trace;
pub mod decoder;
pub mod error;
pub mod export;
pub mod format;
pub mod group;
pub mod query;
pub mod record;
pub mod schema;
pub mod stats;

pub use consumer::RecordConsumer;
pub use debug_trace::{Action, GroupTrace, Transition};
pub use decoder::{DecodedFile, Diagnostic, decode, decode_bytes};
pub use error::{LockboxError, Result};
pub use export::Snapshot;
pub use group::{GroupBuilder, GroupKind, GroupNode, GroupTree, build_tree, build_tree_traced};
pub use query::RecordFilter;
pub use record::{DecodedField, DecodedRecord};
pub use schema::{FieldFormat, FieldSchema, RecordTypeSchema, lookup};
pub use stats::{Account, FileInfo, Statistics, StatsAggregator, Transaction, aggregate};
