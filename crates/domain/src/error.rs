//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`LiveEventError`] via `#[from]`.

use crate::time::Timestamp;

/// Top-level error for everything the live event scheduler does.
#[derive(Debug, thiserror::Error)]
pub enum LiveEventError {
    #[error("configuration error")]
    Configuration(#[from] ConfigurationError),

    #[error("communication error")]
    Communication(#[from] CommunicationError),

    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The state publisher rejected a publication.
    #[error("failed to publish live state")]
    Publish(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The controller was disposed and accepts no further work.
    #[error("live event controller has been disposed")]
    Disposed,
}

impl LiveEventError {
    /// Human readable reason, suitable for a status message.
    ///
    /// Unlike [`Display`](std::fmt::Display), this surfaces the innermost
    /// typed error rather than the category.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Configuration(err) => err.to_string(),
            Self::Communication(err) => err.to_string(),
            Self::Validation(err) => err.to_string(),
            Self::Publish(err) => err.to_string(),
            Self::Disposed => self.to_string(),
        }
    }
}

/// Bad or incomplete configuration of a live event.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// A filter value is configured without a field or a match type.
    #[error("text filter settings incomplete")]
    IncompleteTextFilter,

    #[error("text event field `{0}` not recognized")]
    UnknownField(String),

    #[error("text value type `{0}` not recognized")]
    UnknownMatchType(String),

    #[error("text filter value is not a valid regular expression")]
    InvalidPattern(#[source] regex::Error),

    #[error("a live event requires a calendar bridge")]
    MissingBridge,
}

/// The calendar or the bridge providing it cannot be reached.
#[derive(Debug, thiserror::Error)]
pub enum CommunicationError {
    #[error("calendar has not been retrieved yet")]
    CalendarNotRetrieved,

    #[error("calendar bridge is offline")]
    BridgeOffline,

    /// The calendar claims an event is present but cannot return it.
    #[error("calendar reported an event at {at} but returned none")]
    InconsistentCalendar { at: Timestamp },
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("event ends at {end} before it starts at {start}")]
    EndBeforeStart { start: Timestamp, end: Timestamp },
}
