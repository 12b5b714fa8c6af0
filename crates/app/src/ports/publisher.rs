//! Publisher port: where resolved live states and status changes go.

use std::future::Future;

use livecal_domain::error::LiveEventError;
use livecal_domain::live_state::LiveState;
use livecal_domain::status::LiveStatus;

/// Receives the outcome of every resolution cycle.
pub trait StatePublisher: Send + Sync {
    /// Publish the live state resolved in one cycle.
    fn publish(&self, state: LiveState)
    -> impl Future<Output = Result<(), LiveEventError>> + Send;

    /// Report a status change of the live event.
    fn update_status(
        &self,
        status: LiveStatus,
    ) -> impl Future<Output = Result<(), LiveEventError>> + Send;
}

impl<T: StatePublisher> StatePublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        state: LiveState,
    ) -> impl Future<Output = Result<(), LiveEventError>> + Send {
        (**self).publish(state)
    }

    fn update_status(
        &self,
        status: LiveStatus,
    ) -> impl Future<Output = Result<(), LiveEventError>> + Send {
        (**self).update_status(status)
    }
}
