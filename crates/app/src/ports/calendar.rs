//! Calendar port: temporal queries answered by a calendar engine.
//!
//! Implementations hold an already parsed calendar in memory; every query
//! is expected to be fast and must not perform IO.

use std::sync::Arc;

use livecal_domain::event::CalendarEvent;
use livecal_domain::filter::EventTextFilter;
use livecal_domain::time::Timestamp;

/// Read-only view on a parsed calendar.
pub trait Calendar: Send + Sync {
    /// Whether any event contains `at` (ignoring filters).
    fn is_event_present(&self, at: Timestamp) -> bool;

    /// The event containing `at`, restricted to `filter` when given.
    fn current_event(
        &self,
        at: Timestamp,
        filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent>;

    /// The earliest event starting strictly after `at`, restricted to
    /// `filter` when given.
    fn next_event(&self, at: Timestamp, filter: Option<&EventTextFilter>)
    -> Option<CalendarEvent>;
}

impl<T: Calendar + ?Sized> Calendar for Arc<T> {
    fn is_event_present(&self, at: Timestamp) -> bool {
        (**self).is_event_present(at)
    }

    fn current_event(
        &self,
        at: Timestamp,
        filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent> {
        (**self).current_event(at, filter)
    }

    fn next_event(
        &self,
        at: Timestamp,
        filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent> {
        (**self).next_event(at, filter)
    }
}
