//! Reference clock: wall-clock "now" shifted by the configured offset.
//!
//! A cycle reads the reference instant exactly once and hands the same
//! value to both resolution and rescheduling.

use livecal_domain::time::{ReferenceOffset, Timestamp};

use crate::ports::Clock;

pub struct ReferenceClock<K> {
    clock: K,
    offset: ReferenceOffset,
}

impl<K: Clock> ReferenceClock<K> {
    pub fn new(clock: K, offset: ReferenceOffset) -> Self {
        Self { clock, offset }
    }

    /// The instant a resolution cycle is evaluated against.
    #[must_use]
    pub fn reference(&self) -> Timestamp {
        self.offset.apply(self.clock.now())
    }
}
