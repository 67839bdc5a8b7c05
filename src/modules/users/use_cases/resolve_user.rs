// User resolution gate. Every protected use case passes through here first.
//
// Responsibilities
// - Turn the request's ambient identity claims into an internal `ResolvedUser`.
// - Auto-register first-time callers; promote the first caller matching the
//   configured admin e-mail to full permissions while no admin exists.
// - Memoize the result for the rest of the request with single-flight
//   semantics: at most one registration/update attempt per request, even under
//   concurrent internal calls.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{error, warn};

use crate::config::AppConfig;
use crate::modules::users::core::user::{IdentityClaims, NewUser, ResolvedUser};
use crate::modules::users::ports::{IdentitySource, UserRepository};
use crate::shared::core::permission::PermissionSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum ResolveUserError {
    #[default]
    #[error("unknown resolution error")]
    Unknown,

    #[error("the request carries no identity")]
    UserNotAuthenticated,

    #[error("the identity was issued by an unsupported provider")]
    UnsupportedIdentityProvider,

    #[error("the identity claims are missing required fields")]
    MalformedUserClaims,

    #[error("registering the user failed")]
    UserRegistrationFailed,
}

/// Seam the downstream use cases depend on, so tests can stub resolution.
#[async_trait]
pub trait ResolveUser: Send + Sync {
    async fn resolve(&self) -> Result<ResolvedUser, ResolveUserError>;
}

/// One resolver per logical request. The cell serializes concurrent first
/// access and caches the success for every later caller; failures are not
/// cached, so a later call within the request may retry.
pub struct UserResolver<I, R>
where
    I: IdentitySource,
    R: UserRepository + 'static,
{
    identity: I,
    users: Arc<R>,
    accepted_provider: String,
    first_admin_email: Option<String>,
    cache: OnceCell<ResolvedUser>,
}

impl<I, R> UserResolver<I, R>
where
    I: IdentitySource,
    R: UserRepository + 'static,
{
    pub fn new(identity: I, users: Arc<R>, config: &AppConfig) -> Self {
        Self {
            identity,
            users,
            accepted_provider: config.identity_provider.clone(),
            first_admin_email: config.first_admin_email.clone(),
            cache: OnceCell::new(),
        }
    }

    fn validated_claims(&self) -> Result<IdentityClaims, ResolveUserError> {
        let claims = self
            .identity
            .claims()
            .ok_or(ResolveUserError::UserNotAuthenticated)?;
        if claims.provider != self.accepted_provider {
            return Err(ResolveUserError::UnsupportedIdentityProvider);
        }
        if claims.external_id.trim().is_empty()
            || claims.name.trim().is_empty()
            || claims.email.trim().is_empty()
        {
            return Err(ResolveUserError::MalformedUserClaims);
        }
        Ok(claims)
    }

    async fn get_or_register(&self, claims: IdentityClaims) -> Result<ResolvedUser, ResolveUserError> {
        let existing = self
            .users
            .get_by_external_id(&claims.external_id, &claims.provider)
            .await
            .map_err(|e| {
                error!(error = %e, "user lookup failed during resolution");
                ResolveUserError::Unknown
            })?;

        if let Some(mut user) = existing {
            if user.name != claims.name || user.email != claims.email {
                match self
                    .users
                    .update_user_identity(user.id, &claims.name, &claims.email)
                    .await
                {
                    Ok(()) => {
                        user.name = claims.name;
                        user.email = claims.email;
                    }
                    // Stale but valid; the next request will retry the refresh.
                    Err(e) => warn!(error = %e, user_id = %user.id, "identity refresh failed"),
                }
            }
            return Ok(user.into());
        }

        let admin_exists = self.users.admin_exists().await.map_err(|e| {
            error!(error = %e, "admin lookup failed during registration");
            ResolveUserError::Unknown
        })?;
        let becomes_first_admin = !admin_exists
            && self
                .first_admin_email
                .as_deref()
                .is_some_and(|admin| admin.eq_ignore_ascii_case(&claims.email));
        let permissions = if becomes_first_admin {
            PermissionSet::full()
        } else {
            PermissionSet::entries_only()
        };

        let user = self
            .users
            .save_new_user(NewUser {
                external_id: claims.external_id,
                provider: claims.provider,
                name: claims.name,
                email: claims.email,
                permissions,
            })
            .await
            .map_err(|e| {
                error!(error = %e, "user registration failed");
                ResolveUserError::UserRegistrationFailed
            })?;
        Ok(user.into())
    }

    async fn resolve_uncached(&self) -> Result<ResolvedUser, ResolveUserError> {
        let claims = self.validated_claims()?;
        self.get_or_register(claims).await
    }
}

#[async_trait]
impl<I, R> ResolveUser for UserResolver<I, R>
where
    I: IdentitySource,
    R: UserRepository + 'static,
{
    async fn resolve(&self) -> Result<ResolvedUser, ResolveUserError> {
        self.cache
            .get_or_try_init(|| self.resolve_uncached())
            .await
            .map(Clone::clone)
    }
}

/// Maps a resolution failure into a use case's own error pair: not
/// authenticated stays distinguishable, everything else collapses to the use
/// case's `Unknown`.
pub fn map_resolution_error<E>(error: ResolveUserError, unauthenticated: E, unknown: E) -> E {
    match error {
        ResolveUserError::UserNotAuthenticated => unauthenticated,
        other => {
            error!(error = %other, "user resolution failed");
            unknown
        }
    }
}
