//! Expired Session Sweeper

use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::debug;

use appointime_app::context::AppContext;

/// Runs one sweep, returning how many expired sessions were removed.
pub(crate) async fn sweep(app: &AppContext) -> usize {
    let removed = app.purge_expired_sessions().await;

    debug!(removed, "session sweep finished");

    removed
}

/// Spawns a task that sweeps expired sessions and their carts every `period`.
pub(crate) fn spawn(app: AppContext, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            sweep(&app).await;
        }
    })
}
