//! Consumers of a decoded record sequence.
//!
//! The grouping engine and the statistics aggregator both read the same
//! decoded sequence in one forward pass and are independent of each other.
//! Each one implements [`RecordConsumer`]: it sees every record once, in file
//! order, and produces its output when the sequence ends.

use crate::record::DecodedRecord;

/// A single-pass, record-at-a-time reader of a decoded sequence.
pub trait RecordConsumer<'a> {
    /// What the consumer produces once all records have been seen.
    type Output;

    /// Observe the next record in file order.
    fn consume(&mut self, record: &'a DecodedRecord);

    /// Finish the pass and produce the output.
    fn finish(self) -> Self::Output;

    /// The display name of this consumer.
    fn name(&self) -> &str;
}

/// Feed every record to `consumer`, in order, and return its output.
pub fn run<'a, C>(records: &'a [DecodedRecord], mut consumer: C) -> C::Output
where
    C: RecordConsumer<'a>,
{
    for record in records {
        consumer.consume(record);
    }
    consumer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    struct CodeCollector(Vec<char>);

    impl<'a> RecordConsumer<'a> for CodeCollector {
        type Output = String;

        fn consume(&mut self, record: &'a DecodedRecord) {
            self.0.push(record.code);
        }

        fn finish(self) -> String {
            self.0.into_iter().collect()
        }

        fn name(&self) -> &str {
            "CODES"
        }
    }

    #[test]
    fn test_run_visits_records_in_order() {
        let file = decode("1\n2\n5\n6\n4\n7\n8\n9");
        let codes = run(&file.records, CodeCollector(Vec::new()));
        assert_eq!(codes, "12564789");
    }

    #[test]
    fn test_run_on_empty_sequence() {
        let consumer = CodeCollector(Vec::new());
        assert_eq!(consumer.name(), "CODES");
        assert_eq!(run(&[], consumer), "");
    }
}
