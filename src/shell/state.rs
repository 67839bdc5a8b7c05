// Shared application state: the stores plus config. Use cases are wired per
// request, because the resolver's cache is request-scoped.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::config::AppConfig;
use crate::modules::customizations::adapters::in_memory::InMemoryCustomizationStore;
use crate::modules::entries::adapters::in_memory::InMemoryEntryStore;
use crate::modules::exports::adapters::in_memory::InMemoryExportStore;
use crate::modules::projects::adapters::in_memory::InMemoryProjectStore;
use crate::modules::users::adapters::in_memory::InMemoryUserStore;
use crate::modules::users::use_cases::resolve_user::{ResolveUser, UserResolver};
use crate::shell::identity::HeaderIdentitySource;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<InMemoryUserStore>,
    pub projects: Arc<InMemoryProjectStore>,
    pub customizations: Arc<InMemoryCustomizationStore>,
    pub entries: Arc<InMemoryEntryStore>,
    pub exports: Arc<InMemoryExportStore>,
}

impl AppState {
    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            users: Arc::new(InMemoryUserStore::new()),
            projects: Arc::new(InMemoryProjectStore::new()),
            customizations: Arc::new(InMemoryCustomizationStore::new()),
            entries: Arc::new(InMemoryEntryStore::new()),
            exports: Arc::new(InMemoryExportStore::new()),
        }
    }

    /// A fresh resolver for one request; its single-flight cache lives and
    /// dies with the request.
    pub fn resolver(&self, headers: &HeaderMap) -> Arc<dyn ResolveUser> {
        Arc::new(UserResolver::new(
            HeaderIdentitySource::from_headers(headers),
            self.users.clone(),
            &self.config,
        ))
    }
}
