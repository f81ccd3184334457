use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one logical search issued by an interactive caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Tracks the latest search issued by a search-as-you-type caller so that
/// responses to superseded requests can be discarded on arrival.
///
/// The aggregation service itself is request-agnostic; only callers that
/// issue overlapping searches need one of these.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Awaits `fut` and yields its output only if `ticket` is still the latest.
    pub async fn complete<F: Future>(&self, ticket: RequestTicket, fut: F) -> Option<F::Output> {
        let output = fut.await;
        self.is_current(ticket).then_some(output)
    }
}
