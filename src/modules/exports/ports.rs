// Port for the export read model.

use chrono::NaiveDate;
use futures_core::stream::BoxStream;
use thiserror::Error;

use crate::modules::exports::core::row::ExportRow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum ExportQueriesError {
    #[default]
    #[error("unknown export query error")]
    Unknown,

    #[error("backend error: {0}")]
    Backend(String),
}

pub trait ExportQueries: Send + Sync {
    /// A lazy, single-pass, forward-only sequence of export rows for entries
    /// dated in `start..stop`, in the order the store yields them. Not
    /// restartable; the caller consumes and serializes without buffering.
    fn stream_entries(
        &self,
        start: NaiveDate,
        stop: NaiveDate,
    ) -> BoxStream<'static, Result<ExportRow, ExportQueriesError>>;
}
