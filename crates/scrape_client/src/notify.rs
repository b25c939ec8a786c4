use std::sync::{Arc, Mutex};
use std::time::Duration;

use scrape_core::{
    Notification, NotificationId, NotificationKind, NotificationList,
    DEFAULT_NOTIFICATION_DURATION,
};
use scrape_logging::scrape_warn;

use crate::lock;

/// Short-lived user messages, independent of how they are displayed.
///
/// Clones share the same list. Auto-removal timers run as detached tasks and
/// are not cleared by a manual [`Notifications::remove`]; removing an id twice
/// is harmless.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    list: Arc<Mutex<NotificationList>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a notification and returns its id right away. A zero
    /// `duration` keeps it until it is removed by hand.
    pub fn show(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
    ) -> NotificationId {
        let id = lock(&self.list).push(message, kind);
        if !duration.is_zero() {
            self.schedule_removal(id, duration);
        }
        id
    }

    fn schedule_removal(&self, id: NotificationId, duration: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            scrape_warn!("No async runtime; notification {} will not expire", id);
            return;
        };
        let list = Arc::downgrade(&self.list);
        runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(list) = list.upgrade() {
                lock(&list).remove(id);
            }
        });
    }

    pub fn remove(&self, id: NotificationId) {
        lock(&self.list).remove(id);
    }

    pub fn success(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationId {
        self.show(message, NotificationKind::Success, or_default(duration))
    }

    pub fn error(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationId {
        self.show(message, NotificationKind::Error, or_default(duration))
    }

    pub fn warning(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationId {
        self.show(message, NotificationKind::Warning, or_default(duration))
    }

    pub fn info(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationId {
        self.show(message, NotificationKind::Info, or_default(duration))
    }

    /// Current notifications, oldest first.
    pub fn list(&self) -> Vec<Notification> {
        lock(&self.list).iter().cloned().collect()
    }

    pub fn clear(&self) {
        lock(&self.list).clear();
    }
}

fn or_default(duration: Option<Duration>) -> Duration {
    duration.unwrap_or(DEFAULT_NOTIFICATION_DURATION)
}
