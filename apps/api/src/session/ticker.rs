use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::session::service::Session;

/// Repeating task that rotates the processing phrase.
/// Lives only while the session is in Processing; dropping it aborts the task.
pub(crate) struct PhraseTicker {
    handle: JoinHandle<()>,
}

impl PhraseTicker {
    pub(crate) fn start(session: Arc<Mutex<Session>>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                session.lock().await.controller.advance_phrase();
            }
        });
        Self { handle }
    }
}

impl Drop for PhraseTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
