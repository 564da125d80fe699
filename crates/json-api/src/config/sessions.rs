//! Sessions Config

use appointime_app::sessions::DEFAULT_FORM_TOKEN_TTL_SECS;
use clap::Args;

/// Session and form token settings.
#[derive(Debug, Args)]
pub struct SessionsConfig {
    /// Form token lifetime in seconds
    #[arg(long, env = "FORM_TOKEN_TTL_SECS", default_value_t = DEFAULT_FORM_TOKEN_TTL_SECS)]
    pub form_token_ttl_secs: u64,

    /// Seconds between sweeps that remove expired sessions and their carts
    #[arg(
        long,
        env = "SESSION_SWEEP_INTERVAL_SECS",
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub session_sweep_interval_secs: u64,
}
