use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counter bumped on every navigation. A fetch remembers the value it
/// started under and its result is dropped if the counter moved meanwhile.
#[derive(Debug, Clone, Default)]
pub struct ViewEpoch(Arc<AtomicU64>);

/// Proof of the epoch a fetch was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTicket(u64);

impl ViewEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket(&self) -> ViewTicket {
        ViewTicket(self.0.load(Ordering::SeqCst))
    }

    /// Marks a navigation; outstanding tickets become stale.
    pub fn bump(&self) -> ViewTicket {
        ViewTicket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: ViewTicket) -> bool {
        self.ticket() == ticket
    }

    /// Passes `value` through only while `ticket` is current.
    pub fn accept<T>(&self, ticket: ViewTicket, value: T, what: &str) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(what, "discarding stale response");
            None
        }
    }
}
