//! Admin Config

use clap::Args;

/// Admin authentication settings.
#[derive(Debug, Args)]
pub struct AdminConfig {
    /// Bearer token for the price table admin routes. Admin routes reject
    /// every request when unset.
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,
}
