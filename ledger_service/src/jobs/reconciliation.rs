use crate::domain::repository::EventStore;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Background job that scans for transactions stuck in PENDING.
///
/// Unlike the teacher's retry job, this does not re-drive the saga: the
/// contract makes retrying the client's responsibility, protected by the
/// idempotency key, and the orchestrator auto-retrying a collaborator call
/// would risk double-crediting or double-debiting behind the caller's back
/// (SPEC_FULL.md §5). A stuck PENDING row means the process crashed or a
/// collaborator call never returned; this job can only raise the alarm.
pub struct ReconciliationJob {
    event_store: Arc<dyn EventStore>,
    stuck_after: Duration,
}

impl ReconciliationJob {
    pub fn new(event_store: Arc<dyn EventStore>, stuck_after: Duration) -> Self {
        Self {
            event_store,
            stuck_after,
        }
    }

    pub async fn run_once(&self) {
        let cutoff = Utc::now() - self.stuck_after;

        match self.event_store.find_pending_older_than(cutoff).await {
            Ok(stuck) => {
                if stuck.is_empty() {
                    return;
                }
                for tx in &stuck {
                    warn!(
                        transaction_id = %tx.id,
                        user_id = %tx.user_id,
                        created_at = %tx.created_at,
                        "transaction stuck in PENDING, requires operator attention"
                    );
                }
                info!(count = stuck.len(), "reconciliation sweep found stuck transactions");
            }
            Err(e) => {
                error!(error = %e, "reconciliation sweep failed to query the event store");
            }
        }
    }

    /// Runs the sweep on a fixed interval until the process exits.
    pub async fn run_forever(self: Arc<Self>, interval: std::time::Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }
}
