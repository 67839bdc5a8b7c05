// In memory implementation of the ExportQueries port.
//
// The stream is built lazily over a snapshot of the rows; insertion order is
// preserved, matching the "order the store yields them" contract.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::NaiveDate;
use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use std::sync::Mutex;

use crate::modules::exports::core::row::ExportRow;
use crate::modules::exports::ports::{ExportQueries, ExportQueriesError};

pub struct InMemoryExportStore {
    rows: Mutex<Vec<ExportRow>>,
    offline: AtomicBool,
    streams_opened: Arc<AtomicUsize>,
}

impl InMemoryExportStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
            streams_opened: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fault switch for tests: the stream yields a single backend error.
    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn insert(&self, row: ExportRow) {
        self.rows.lock().expect("export rows poisoned").push(row);
    }

    /// How many streams were opened against the store. Lets tests assert the
    /// use case never touched storage on a validation failure.
    pub fn streams_opened(&self) -> usize {
        self.streams_opened.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryExportStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportQueries for InMemoryExportStore {
    fn stream_entries(
        &self,
        start: NaiveDate,
        stop: NaiveDate,
    ) -> BoxStream<'static, Result<ExportRow, ExportQueriesError>> {
        self.streams_opened.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return futures_util::stream::once(async {
                Err(ExportQueriesError::Backend("export store offline".into()))
            })
            .boxed();
        }
        let matching: Vec<ExportRow> = self
            .rows
            .lock()
            .expect("export rows poisoned")
            .iter()
            .filter(|r| r.date >= start && r.date < stop)
            .cloned()
            .collect();
        futures_util::stream::iter(matching.into_iter().map(Ok)).boxed()
    }
}
