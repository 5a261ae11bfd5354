//! Revocation list implementations and maintenance

mod in_memory;

pub use in_memory::InMemoryRevocationList;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::{Clock, RevocationList};

/// Periodically drop revocation entries for tokens that have expired anyway
pub fn spawn_purge_task(
    list: Arc<dyn RevocationList>,
    clock: Arc<dyn Clock>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match list.purge_expired(clock.now()).await {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "Purged expired revocation entries"),
                Err(e) => warn!(error = %e, "Failed to purge revocation entries"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ManualClock, TokenFingerprint};
    use chrono::DateTime;

    #[tokio::test(start_paused = true)]
    async fn test_purge_task_runs_on_interval() {
        let list = Arc::new(InMemoryRevocationList::new());
        let clock = Arc::new(ManualClock::at_timestamp(1_000));

        list.revoke(
            TokenFingerprint::of("expired"),
            DateTime::from_timestamp(500, 0).unwrap(),
        )
        .await
        .unwrap();
        list.revoke(
            TokenFingerprint::of("live"),
            DateTime::from_timestamp(5_000, 0).unwrap(),
        )
        .await
        .unwrap();

        let handle = spawn_purge_task(list.clone(), clock, Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert_eq!(list.len().await.unwrap(), 1);
        handle.abort();
    }
}
