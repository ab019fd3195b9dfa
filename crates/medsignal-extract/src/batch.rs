//! Batch driver: lazy, order-preserving extraction over many messages.
//!
//! Assembly can only fail with malformed input. Those messages are logged,
//! counted in the summary and skipped; they never end the batch.

use std::borrow::Borrow;

use serde::Serialize;
use tracing::{info, warn};

use crate::message::Message;
use crate::record::{BusinessRecord, Extractor};

/// Counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Messages pulled from the input.
    pub processed: usize,
    /// Records emitted.
    pub extracted: usize,
    /// Messages skipped because their text was malformed.
    pub skipped_errors: usize,
}

impl BatchSummary {
    /// Messages that assembled cleanly but carried no signal.
    pub fn discarded(&self) -> usize {
        self.processed - self.extracted - self.skipped_errors
    }
}

/// Records plus summary, for callers that want the whole batch at once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub records: Vec<BusinessRecord>,
    pub summary: BatchSummary,
}

pub struct BatchDriver<'a> {
    extractor: &'a Extractor,
}

impl<'a> BatchDriver<'a> {
    pub fn new(extractor: &'a Extractor) -> Self {
        Self { extractor }
    }

    /// Lazily extract records from `messages`, in input order.
    pub fn run<I>(&self, messages: I) -> Extractions<'a, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<Message>,
    {
        Extractions {
            extractor: self.extractor,
            messages: messages.into_iter(),
            summary: BatchSummary::default(),
            done: false,
        }
    }

    /// Drain a run into a [`BatchOutcome`].
    pub fn collect<I>(&self, messages: I) -> BatchOutcome
    where
        I: IntoIterator,
        I::Item: Borrow<Message>,
    {
        let mut run = self.run(messages);
        let records: Vec<BusinessRecord> = run.by_ref().collect();
        BatchOutcome {
            records,
            summary: run.summary(),
        }
    }
}

/// Iterator returned by [`BatchDriver::run`]. Single pass.
pub struct Extractions<'a, I> {
    extractor: &'a Extractor,
    messages: I,
    summary: BatchSummary,
    done: bool,
}

impl<I> Extractions<'_, I> {
    /// Counters so far; final once the iterator returns `None`.
    pub fn summary(&self) -> BatchSummary {
        self.summary
    }
}

impl<I> Iterator for Extractions<'_, I>
where
    I: Iterator,
    I::Item: Borrow<Message>,
{
    type Item = BusinessRecord;

    fn next(&mut self) -> Option<BusinessRecord> {
        if self.done {
            return None;
        }

        for item in self.messages.by_ref() {
            let message = item.borrow();
            self.summary.processed += 1;

            match self.extractor.assemble(message) {
                Ok(Some(record)) => {
                    self.summary.extracted += 1;
                    return Some(record);
                }
                Ok(None) => {}
                Err(malformed) => {
                    warn!("Skipping {}", malformed);
                    self.summary.skipped_errors += 1;
                }
            }
        }

        self.done = true;
        info!(
            "Batch complete: processed={}, extracted={}, skipped_errors={}",
            self.summary.processed, self.summary.extracted, self.summary.skipped_errors
        );
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, self.messages.size_hint().1)
        }
    }
}

impl<I> std::iter::FusedIterator for Extractions<'_, I>
where
    I: Iterator,
    I::Item: Borrow<Message>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn batch() -> Vec<Message> {
        vec![
            Message::new("ch/1", "Call 0911223344"),
            Message::with_raw_text("ch/2", json!(123)),
            Message::new("ch/3", "price 150 birr"),
        ]
    }

    #[test]
    fn test_malformed_message_is_skipped() {
        let extractor = Extractor::default();
        let outcome = BatchDriver::new(&extractor).collect(batch());
        let ids: Vec<&str> = outcome.records.iter().map(|r| r.source_id.as_str()).collect();
        assert_eq!(ids, vec!["ch/1", "ch/3"]);
        assert_eq!(
            outcome.summary,
            BatchSummary {
                processed: 3,
                extracted: 2,
                skipped_errors: 1
            }
        );
    }

    #[test]
    fn test_malformed_shapes_never_end_the_batch() {
        let extractor = Extractor::default();
        let messages = vec![
            Message::with_raw_text("ch/1", json!(true)),
            Message::with_raw_text("ch/2", json!({"text": "nested"})),
            Message::with_raw_text("ch/3", json!(["ok", 7])),
            Message::new("ch/4", "open 8:30"),
        ];
        let outcome = BatchDriver::new(&extractor).collect(&messages);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].source_id, "ch/4");
        assert_eq!(outcome.summary.skipped_errors, 3);
        assert_eq!(outcome.summary.discarded(), 0);
    }

    #[test]
    fn test_lazy_iteration() {
        let extractor = Extractor::default();
        let messages = batch();
        let mut run = BatchDriver::new(&extractor).run(&messages);

        let first = run.next().unwrap();
        assert_eq!(first.source_id, "ch/1");
        assert_eq!(run.summary().processed, 1);

        let second = run.next().unwrap();
        assert_eq!(second.source_id, "ch/3");
        assert_eq!(run.summary().skipped_errors, 1);

        assert!(run.next().is_none());
        assert!(run.next().is_none());
        assert_eq!(run.summary().processed, 3);
    }

    #[test]
    fn test_discarded_count() {
        let extractor = Extractor::default();
        let messages = vec![
            Message::new("ch/1", "nothing to see"),
            Message::new("ch/2", ""),
            Message::new("ch/3", "open 8:30"),
        ];
        let outcome = BatchDriver::new(&extractor).collect(&messages);
        assert_eq!(outcome.summary.extracted, 1);
        assert_eq!(outcome.summary.discarded(), 2);
    }

    #[test]
    fn test_empty_batch() {
        let extractor = Extractor::default();
        let outcome = BatchDriver::new(&extractor).collect(Vec::<Message>::new());
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.summary, BatchSummary::default());
    }

    #[test]
    fn test_summary_serializes_with_snake_case_keys() {
        let value = serde_json::to_value(BatchSummary {
            processed: 3,
            extracted: 2,
            skipped_errors: 1,
        })
        .unwrap();
        assert_eq!(value, json!({"processed": 3, "extracted": 2, "skipped_errors": 1}));
    }
}
