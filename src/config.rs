// Environment-driven configuration, read once at the composition root.

use std::env;

pub const DEFAULT_IDENTITY_PROVIDER: &str = "github";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The single external identity provider this deployment accepts.
    pub identity_provider: String,
    /// E-mail that promotes the first matching caller to full permissions
    /// while no admin exists yet.
    pub first_admin_email: Option<String>,
    pub listen_address: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            identity_provider: env::var("TIMESHEET_IDENTITY_PROVIDER")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_PROVIDER.to_string()),
            first_admin_email: env::var("TIMESHEET_FIRST_ADMIN_EMAIL").ok(),
            listen_address: env::var("TIMESHEET_LISTEN_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            identity_provider: DEFAULT_IDENTITY_PROVIDER.to_string(),
            first_admin_email: None,
            listen_address: "0.0.0.0:3000".to_string(),
        }
    }
}
