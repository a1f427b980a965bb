//! Transient user-facing notifications.
//!
//! Screens receive a [`Notifier`] explicitly instead of reaching for a global
//! sink. [`Toaster`] keeps each notification for a fixed time-to-live and
//! drops it afterwards.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::config::DEFAULT_NOTIFICATION_TTL_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Instant,
}

/// Capability to emit a transient notification.
pub trait Notifier {
    fn notify(&self, message: &str, kind: NotificationKind);
}

struct Entry {
    notification: Notification,
    seen: bool,
}

/// Notification queue with auto-dismiss.
pub struct Toaster {
    ttl: Duration,
    entries: Mutex<Vec<Entry>>,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_NOTIFICATION_TTL_SECS))
    }
}

impl Toaster {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Notifications still alive at `now`, oldest first.
    pub fn active_at(&self, now: Instant) -> Vec<Notification> {
        let mut entries = self.entries.lock().expect("toaster lock poisoned");
        self.prune(&mut entries, now);
        entries
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    /// Returns notifications that have not been handed out yet and marks them
    /// as seen. Each one is handed out once even if its TTL already elapsed;
    /// it then stays active until the TTL runs out.
    pub fn take_unseen(&self) -> Vec<Notification> {
        let mut entries = self.entries.lock().expect("toaster lock poisoned");
        let unseen = entries
            .iter_mut()
            .filter(|entry| !entry.seen)
            .map(|entry| {
                entry.seen = true;
                entry.notification.clone()
            })
            .collect();
        self.prune(&mut entries, Instant::now());
        unseen
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut entries = self.entries.lock().expect("toaster lock poisoned");
        let before = entries.len();
        entries.retain(|entry| entry.notification.id != id);
        entries.len() != before
    }

    fn prune(&self, entries: &mut Vec<Entry>, now: Instant) {
        let ttl = self.ttl;
        entries.retain(|entry| now.saturating_duration_since(entry.notification.created_at) < ttl);
    }
}

impl Notifier for Toaster {
    fn notify(&self, message: &str, kind: NotificationKind) {
        tracing::debug!(?kind, message, "notification queued");
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.to_string(),
            kind,
            created_at: Instant::now(),
        };
        self.entries
            .lock()
            .expect("toaster lock poisoned")
            .push(Entry {
                notification,
                seen: false,
            });
    }
}
