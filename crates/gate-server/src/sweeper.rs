//! Background removal of idle sessions

use gate_flow::{Clock, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Purge sessions idle longer than `idle_timeout` every `every`.
/// The first sweep runs immediately. Each sweep runs on the blocking pool:
/// the file store reads every session file.
pub fn spawn(
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    idle_timeout: i64,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let now = clock.now();
            let sweep = {
                let store = store.clone();
                tokio::task::spawn_blocking(move || store.purge_idle(now, idle_timeout))
            };
            match sweep.await {
                Ok(Ok(0)) => debug!("no idle sessions"),
                Ok(Ok(removed)) => info!(removed, "purged idle sessions"),
                Ok(Err(e)) => warn!(error = %e, "idle session sweep failed"),
                Err(e) => error!(error = %e, "idle session sweep panicked"),
            }
        }
    })
}
