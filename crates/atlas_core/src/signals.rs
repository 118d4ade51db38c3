//! Explicit subscription channel for zero-payload view signals.
//!
//! Listeners register with a [`ViewCoordinator`] and drain their own
//! receiver; nothing is dispatched through ambient global state.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSignal {
    ResetView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One listener's end of the channel.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    rx: Receiver<ViewSignal>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Drains pending signals without blocking.
    pub fn drain(&self) -> Vec<ViewSignal> {
        self.rx.try_iter().collect()
    }
}

#[derive(Debug, Default)]
pub struct ViewCoordinator {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Sender<ViewSignal>)>,
}

impl ViewCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = unbounded();
        self.listeners.push((id, tx));
        Subscription { id, rx }
    }

    /// Returns whether the id was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Broadcasts a reset to every live listener. Listeners whose receiver
    /// was dropped are pruned. Returns how many were notified.
    pub fn request_reset(&mut self) -> usize {
        self.listeners
            .retain(|(_, tx)| tx.send(ViewSignal::ResetView).is_ok());
        let notified = self.listeners.len();
        debug!(listeners = notified, "broadcast view reset");
        notified
    }
}

#[cfg(test)]
#[path = "tests/signals_tests.rs"]
mod tests;
