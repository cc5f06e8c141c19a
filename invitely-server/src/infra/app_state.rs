use std::{fmt, sync::Arc};

use invitely_config::Config;
use invitely_core::{NotificationEvent, RecordStore};
use tracing::{debug, error};

use crate::infra::notify::NotificationHub;

#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    pub hub: Arc<NotificationHub>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: Config, store: RecordStore) -> Self {
        let hub = NotificationHub::new();
        Self {
            store,
            hub: Arc::new(hub),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fan `event` out to connected observers. Failures stay inside the hub
    /// and never reach the request that caused the change.
    pub fn publish(&self, event: NotificationEvent) {
        match self.hub.broadcast(&event) {
            Ok(report) => debug!(
                event = event.kind(),
                delivered = report.delivered,
                dropped = report.dropped,
                "event broadcast"
            ),
            Err(err) => error!(
                event = event.kind(),
                error = %err,
                "failed to serialize event"
            ),
        }
    }
}
