// Export entries over a date range as a lazy stream the caller serializes
// (CSV or otherwise) without buffering the full result set.

use std::sync::Arc;

use chrono::NaiveDate;
use futures_core::stream::BoxStream;
use thiserror::Error;

use crate::modules::exports::core::row::ExportRow;
use crate::modules::exports::ports::{ExportQueries, ExportQueriesError};
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum ExportEntriesError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not read exports")]
    UnauthorizedUser,

    #[error("start must lie strictly before stop")]
    StartGreaterThanStop,
}

pub struct ExportEntriesUseCase<Q>
where
    Q: ExportQueries + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    queries: Arc<Q>,
}

impl<Q> ExportEntriesUseCase<Q>
where
    Q: ExportQueries + 'static,
{
    pub fn new(resolver: Arc<dyn ResolveUser>, queries: Arc<Q>) -> Self {
        Self { resolver, queries }
    }

    /// Validation happens before any store access: an invalid range never
    /// opens a stream.
    pub async fn execute(
        &self,
        start: NaiveDate,
        stop: NaiveDate,
    ) -> Result<BoxStream<'static, Result<ExportRow, ExportQueriesError>>, ExportEntriesError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                ExportEntriesError::UnauthenticatedUser,
                ExportEntriesError::Unknown,
            )
        })?;
        if !caller.permissions.exports.can_read() {
            return Err(ExportEntriesError::UnauthorizedUser);
        }
        if start >= stop {
            return Err(ExportEntriesError::StartGreaterThanStop);
        }
        Ok(self.queries.stream_entries(start, stop))
    }
}

#[cfg(test)]
mod export_entries_tests {
    use super::*;
    use crate::modules::exports::adapters::in_memory::InMemoryExportStore;
    use crate::shared::core::permission::{PermissionSet, UserPermission};
    use crate::test_support::fixtures::{FailingResolver, FixedResolver};
    use futures_util::StreamExt;
    use rstest::{fixture, rstest};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn make_row(d: u32, minutes: u32) -> ExportRow {
        ExportRow {
            date: date(d),
            user_name: "Alex".to_string(),
            project_name: "Alpha".to_string(),
            invoice_item_name: "Development".to_string(),
            minutes,
            remark: None,
        }
    }

    #[fixture]
    fn before_each() -> Arc<InMemoryExportStore> {
        Arc::new(InMemoryExportStore::new())
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_stream_rows_in_store_order(before_each: Arc<InMemoryExportStore>) {
        let store = before_each;
        store.insert(make_row(20, 30));
        store.insert(make_row(16, 60));
        let permissions = PermissionSet {
            exports: UserPermission::Read,
            ..PermissionSet::default()
        };
        let use_case = ExportEntriesUseCase::new(
            Arc::new(FixedResolver::with_permissions(permissions)),
            store,
        );
        let stream = use_case.execute(date(16), date(30)).await.unwrap();
        let minutes: Vec<u32> = stream.map(|r| r.unwrap().minutes).collect().await;
        // No re-sort: the order the store yields is the order exported.
        assert_eq!(minutes, vec![30, 60]);
    }

    #[rstest]
    #[case(30, 16)]
    #[case(16, 16)]
    #[tokio::test]
    async fn it_should_reject_an_invalid_range_before_any_store_access(
        before_each: Arc<InMemoryExportStore>,
        #[case] start: u32,
        #[case] stop: u32,
    ) {
        let store = before_each;
        let use_case = ExportEntriesUseCase::new(Arc::new(FixedResolver::admin()), store.clone());
        let result = use_case.execute(date(start), date(stop)).await;
        assert!(matches!(result, Err(ExportEntriesError::StartGreaterThanStop)));
        assert_eq!(store.streams_opened(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_caller_without_exports_read(
        before_each: Arc<InMemoryExportStore>,
    ) {
        let store = before_each;
        let use_case = ExportEntriesUseCase::new(
            Arc::new(FixedResolver::with_permissions(PermissionSet::entries_only())),
            store.clone(),
        );
        let result = use_case.execute(date(16), date(30)).await;
        assert!(matches!(result, Err(ExportEntriesError::UnauthorizedUser)));
        assert_eq!(store.streams_opened(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_map_unauthenticated_resolution(before_each: Arc<InMemoryExportStore>) {
        let use_case =
            ExportEntriesUseCase::new(Arc::new(FailingResolver::unauthenticated()), before_each);
        let result = use_case.execute(date(16), date(30)).await;
        assert!(matches!(result, Err(ExportEntriesError::UnauthenticatedUser)));
    }
}
