//! In-process state bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use livecal_domain::error::LiveEventError;
use livecal_domain::live_state::LiveState;
use livecal_domain::status::LiveStatus;

use crate::ports::StatePublisher;

/// Something a live event published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveUpdate {
    State(LiveState),
    Status(LiveStatus),
}

/// In-process [`StatePublisher`] using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the update is simply dropped).
pub struct StateBus {
    sender: broadcast::Sender<LiveUpdate>,
}

impl StateBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to updates on this bus.
    ///
    /// Returns a receiver that will get all updates published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LiveUpdate> {
        self.sender.subscribe()
    }

    fn send(&self, update: LiveUpdate) {
        // broadcast::send fails only when there are zero receivers
        let _ = self.sender.send(update);
    }
}

impl StatePublisher for StateBus {
    fn publish(
        &self,
        state: LiveState,
    ) -> impl Future<Output = Result<(), LiveEventError>> + Send {
        self.send(LiveUpdate::State(state));
        async { Ok(()) }
    }

    fn update_status(
        &self,
        status: LiveStatus,
    ) -> impl Future<Output = Result<(), LiveEventError>> + Send {
        self.send(LiveUpdate::Status(status));
        async { Ok(()) }
    }
}
