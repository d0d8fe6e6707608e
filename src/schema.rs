//! Record Schema Registry.
//!
//! A process-wide, immutable table of the eight Lockbox record types. Each
//! record type is keyed by the single leading character of a line and lists
//! its fields as 1-based, inclusive column ranges.
//!
//! Every field carries an explicit [`FieldFormat`] tag, so the decoder never
//! has to guess a formatter from the field name.

use serde::Serialize;

/// Field names the grouping engine and statistics aggregator read.
pub mod names {
    pub const RECORD_CODE: &str = "Record Code";
    pub const BATCH_NUMBER: &str = "Batch Number";
    pub const DESTINATION: &str = "Destination";
    pub const ORIGIN: &str = "Origin";
    pub const DATE: &str = "Date";
    pub const TIME: &str = "Time";
    pub const LOCKBOX_NUMBER: &str = "Lockbox Number";
    pub const REMITTANCE_AMOUNT: &str = "Remittance Amount";
    pub const REMITTANCE_RTN: &str = "Remittance RTN";
    pub const REMITTANCE_ACCOUNT_NUMBER: &str = "Remittance Account Number";
    pub const CHECK_NUMBER: &str = "Check Number";
}

/// How a field's raw value is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    /// Shown as the trimmed raw value.
    Text,
    /// Integer cents rendered as currency.
    Amount,
    /// `YYMMDD` or `MMDDYYYY`.
    Date,
    /// `HHMM`.
    Time,
}

/// One fixed-width field: a name and a 1-based inclusive column range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
    pub format: FieldFormat,
}

impl FieldSchema {
    const fn new(name: &'static str, start: usize, end: usize, format: FieldFormat) -> Self {
        Self {
            name,
            start,
            end,
            format,
        }
    }

    /// Declared width in characters.
    pub fn width(&self) -> usize {
        self.end + 1 - self.start
    }
}

const fn text(name: &'static str, start: usize, end: usize) -> FieldSchema {
    FieldSchema::new(name, start, end, FieldFormat::Text)
}

const fn amount(name: &'static str, start: usize, end: usize) -> FieldSchema {
    FieldSchema::new(name, start, end, FieldFormat::Amount)
}

const fn date(name: &'static str, start: usize, end: usize) -> FieldSchema {
    FieldSchema::new(name, start, end, FieldFormat::Date)
}

const fn time(name: &'static str, start: usize, end: usize) -> FieldSchema {
    FieldSchema::new(name, start, end, FieldFormat::Time)
}

/// Layout of one record type.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct RecordTypeSchema {
    pub code: char,
    pub name: &'static str,
    /// Presentation hint only; carries no semantics.
    pub tag: &'static str,
    pub fields: &'static [FieldSchema],
}

impl RecordTypeSchema {
    /// Look up a field definition by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Last column covered by any field.
    pub fn line_width(&self) -> usize {
        self.fields.iter().map(|f| f.end).max().unwrap_or(0)
    }
}

const TRANSMISSION_HEADER: &[FieldSchema] = &[
    text("Record Code", 1, 1),
    text("Priority Code", 2, 3),
    text("Destination", 4, 13),
    text("Origin", 14, 23),
    date("Date", 24, 29),
    time("Time", 30, 33),
    text("Reserved", 34, 300),
];

const SERVICE_HEADER: &[FieldSchema] = &[
    text("Record Code", 1, 1),
    text("Ultimate Network Address", 2, 11),
    text("Ultimate Network Origin", 12, 21),
    text("Reference Code", 22, 31),
    text("Service Type", 32, 34),
    text("Record Size", 35, 37),
    text("Blocking Factor", 38, 41),
    text("Format Code", 42, 42),
    text("Reserved", 43, 300),
];

const LOCKBOX_HEADER: &[FieldSchema] = &[
    text("Record Code", 1, 1),
    text("Reserved", 2, 7),
    text("Lockbox Number", 8, 14),
    date("Date", 15, 20),
    text("Processing Destination", 21, 30),
    text("Processing Origin", 31, 40),
    text("Reserved2", 41, 300),
];

const PAYMENT: &[FieldSchema] = &[
    text("Record Code", 1, 1),
    text("Batch Number", 2, 4),
    text("Item Number", 5, 7),
    amount("Remittance Amount", 8, 17),
    text("Remittance RTN", 18, 26),
    text("Remittance Account Number", 27, 36),
    text("Check Number", 37, 46),
    text("Check Level User-Defined Field 1", 47, 76),
    text("Filler", 77, 80),
    text("Vicor TID", 81, 87),
    date("Check Date", 88, 93),
    text("Check Level Remitter Name", 94, 123),
    text("Check Level Remitter Account Number", 124, 153),
    date("Postmark Date", 154, 159),
    text("Remitter Zip Code", 160, 168),
    text("Envelope Sequence Number", 169, 171),
    text("Check Level User-Defined Field 2", 172, 201),
    text("Check Level User-Defined Field 3", 202, 231),
    text("Check Level User-Defined Dollar Field 1", 232, 242),
    text("Reserved", 243, 300),
];

const INVOICE: &[FieldSchema] = &[
    text("Record Code", 1, 1),
    text("Batch Number", 2, 4),
    text("Item Number", 5, 7),
    text("Overflow Type", 8, 8),
    text("Overflow Sequence Number", 9, 10),
    text("Last Indicator", 11, 11),
    text("Invoice Number", 12, 26),
    amount("Invoice Amount", 27, 36),
    text("Invoice Level User-Defined Field 1", 37, 66),
    text("Filler", 67, 80),
    date("Invoice Date", 81, 86),
    amount("Gross Invoice Amount", 87, 97),
    amount("Discount Invoice Amount", 98, 108),
    text("Invoice Remitter Account Number with Lockbox Customer", 109, 138),
    text("Envelope Sequence Number", 139, 141),
    amount("Invoice Amount Due", 142, 152),
    text("Invoice Level User-Defined Field 2", 153, 182),
    text("Invoice Level User-Defined Field 3", 183, 212),
    text("Invoice Level User-Defined Field 4", 213, 242),
    text("Invoice Level User-Defined Dollar Field 1", 243, 253),
    text("Invoice Level User-Defined Dollar Field 2", 254, 264),
    text("Invoice Level User-Defined Dollar Field 3", 265, 275),
    text("Invoice Level User-Defined Dollar Field 4", 276, 286),
    date("Invoice Level User-Defined Date Field", 287, 292),
    text("Reserved", 293, 300),
];

const BATCH_TRAILER: &[FieldSchema] = &[
    text("Record Code", 1, 1),
    text("Batch Number", 2, 4),
    text("Last Item Number", 5, 7),
    text("Lockbox Number", 8, 14),
    date("Processing Date", 15, 20),
    text("Item Count", 21, 23),
    amount("Batch Total Amount", 24, 33),
    text("Batch Summary Data", 34, 300),
];

const LOCKBOX_TRAILER: &[FieldSchema] = &[
    text("Record Code", 1, 1),
    text("Last Batch Number", 2, 4),
    text("Last Item Number", 5, 7),
    text("Lockbox Number", 8, 14),
    date("Processing Date", 15, 20),
    text("Item Count", 21, 23),
    amount("Lockbox Total Amount", 24, 33),
    text("Filler", 34, 34),
    text("Batch Count", 35, 37),
    text("Reserved", 38, 80),
];

const TRANSMISSION_TRAILER: &[FieldSchema] = &[
    text("Record Code", 1, 1),
    text("Record Count", 2, 7),
    text("Reserved", 8, 80),
];

static RECORD_TYPES: [RecordTypeSchema; 8] = [
    RecordTypeSchema {
        code: '1',
        name: "Transmission Header",
        tag: "transmission",
        fields: TRANSMISSION_HEADER,
    },
    RecordTypeSchema {
        code: '2',
        name: "Service Header",
        tag: "service",
        fields: SERVICE_HEADER,
    },
    RecordTypeSchema {
        code: '5',
        name: "Lockbox Header",
        tag: "lockbox",
        fields: LOCKBOX_HEADER,
    },
    RecordTypeSchema {
        code: '6',
        name: "Payment",
        tag: "payment",
        fields: PAYMENT,
    },
    RecordTypeSchema {
        code: '4',
        name: "Invoices",
        tag: "invoice",
        fields: INVOICE,
    },
    RecordTypeSchema {
        code: '7',
        name: "Batch Trailer",
        tag: "batch-trailer",
        fields: BATCH_TRAILER,
    },
    RecordTypeSchema {
        code: '8',
        name: "Lockbox Trailer",
        tag: "lockbox-trailer",
        fields: LOCKBOX_TRAILER,
    },
    RecordTypeSchema {
        code: '9',
        name: "Transmission Trailer",
        tag: "transmission",
        fields: TRANSMISSION_TRAILER,
    },
];

/// Resolve a record code to its layout.
pub fn lookup(code: char) -> Option<&'static RecordTypeSchema> {
    RECORD_TYPES.iter().find(|t| t.code == code)
}

/// All known record types, in registry order.
pub fn record_types() -> &'static [RecordTypeSchema] {
    &RECORD_TYPES
}
