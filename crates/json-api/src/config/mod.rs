//! Server configuration module

use clap::Parser;

use crate::config::{
    admin::AdminConfig,
    catalog::CatalogConfig,
    observability::{LoggingConfig, RequestLoggingConfig},
    server::ServerRuntimeConfig,
    sessions::SessionsConfig,
};

pub(crate) mod admin;
pub(crate) mod catalog;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod sessions;

/// Appointime JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "appointime-json", about = "Appointime JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request logging settings.
    #[command(flatten)]
    pub requests: RequestLoggingConfig,

    /// Product catalogue settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Session and form token settings.
    #[command(flatten)]
    pub sessions: SessionsConfig,

    /// Admin authentication settings.
    #[command(flatten)]
    pub admin: AdminConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_without_arguments() -> TestResult {
        let config = ServerConfig::try_parse_from(["appointime-json"])?;

        assert_eq!(config.server.port, 8698);
        assert_eq!(config.sessions.form_token_ttl_secs, 86_400);
        assert_eq!(config.sessions.session_sweep_interval_secs, 300);
        assert_eq!(config.catalog.catalog_path, Path::new("fixtures/catalog.yml"));

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "appointime-json",
            "--port",
            "9000",
            "--form-token-ttl-secs",
            "60",
            "--admin-token",
            "secret",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
        assert_eq!(config.sessions.form_token_ttl_secs, 60);
        assert_eq!(config.admin.admin_token.as_deref(), Some("secret"));

        Ok(())
    }

    #[test]
    fn sweep_interval_must_be_positive() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "appointime-json",
            "--session-sweep-interval-secs",
            "30",
        ])?;

        assert_eq!(config.sessions.session_sweep_interval_secs, 30);
        assert!(
            ServerConfig::try_parse_from(["appointime-json", "--session-sweep-interval-secs", "0"])
                .is_err()
        );

        Ok(())
    }
}
