// Fire-and-forget notification tasks.
//
// Every task is tracked so the owner can wait for stragglers at shutdown;
// no task observes another, and a failure is logged where it happens.

use std::sync::Arc;

use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::backend::Notifier;
use crate::model::BookingRecord;

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    tracker: TaskTracker,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one task per applicable notifier. Returns how many were spawned.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, record: &BookingRecord, notifiers: &[Arc<dyn Notifier>]) -> usize {
        let record = Arc::new(record.clone());
        let mut spawned = 0;

        for notifier in notifiers.iter().filter(|n| n.applies_to(&record)) {
            let notifier = Arc::clone(notifier);
            let record = Arc::clone(&record);
            self.tracker.spawn(async move {
                let channel = notifier.channel();
                match notifier.notify(&record).await {
                    Ok(()) => debug!(booking_id = %record.id, channel, "notification sent"),
                    Err(e) => {
                        warn!(booking_id = %record.id, channel, error = %e, "notification failed");
                    }
                }
            });
            spawned += 1;
        }

        spawned
    }

    /// Notifications still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting work and wait for everything already spawned.
    pub async fn shutdown(&self) {
        self.tracker.close();
        if !self.tracker.is_empty() {
            debug!(pending = self.tracker.len(), "waiting for notifications");
        }
        self.tracker.wait().await;
    }
}
