//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// UTC timestamp used for event boundaries and reference instants.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Signed number of seconds added to wall-clock time to obtain the
/// reference instant of a resolution cycle.
///
/// A positive offset looks ahead: an event becomes "current" that many
/// seconds before it really starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceOffset(i64);

impl ReferenceOffset {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub fn as_secs(self) -> i64 {
        self.0
    }

    /// Shift `wall_clock` by this offset.
    ///
    /// Saturates at the representable bounds instead of overflowing.
    #[must_use]
    pub fn apply(self, wall_clock: Timestamp) -> Timestamp {
        TimeDelta::try_seconds(self.0)
            .and_then(|delta| wall_clock.checked_add_signed(delta))
            .unwrap_or(if self.0 >= 0 {
                DateTime::<Utc>::MAX_UTC
            } else {
                DateTime::<Utc>::MIN_UTC
            })
    }
}

impl std::fmt::Display for ReferenceOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}s", self.0)
    }
}
