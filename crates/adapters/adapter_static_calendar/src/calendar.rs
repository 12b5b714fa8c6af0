//! In-memory calendar over a fixed list of events.

use livecal_app::ports::Calendar;
use livecal_domain::error::ValidationError;
use livecal_domain::event::CalendarEvent;
use livecal_domain::filter::EventTextFilter;
use livecal_domain::time::Timestamp;

/// A snapshot of events, sorted by start.
///
/// Among overlapping events the one that started first is the current one;
/// events starting at the same instant keep their original order.
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    events: Vec<CalendarEvent>,
}

impl StaticCalendar {
    /// Build a calendar from `events`, in any order.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first invalid event.
    pub fn new(mut events: Vec<CalendarEvent>) -> Result<Self, ValidationError> {
        for event in &events {
            event.validate()?;
        }
        events.sort_by_key(|event| event.start);
        Ok(Self { events })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.events.iter()
    }

    /// Events that started at or before `at`.
    fn started(&self, at: Timestamp) -> &[CalendarEvent] {
        let split = self.events.partition_point(|event| event.start <= at);
        &self.events[..split]
    }

    /// Events starting strictly after `at`.
    fn upcoming(&self, at: Timestamp) -> &[CalendarEvent] {
        let split = self.events.partition_point(|event| event.start <= at);
        &self.events[split..]
    }
}

fn accepts(filter: Option<&EventTextFilter>, event: &CalendarEvent) -> bool {
    filter.is_none_or(|filter| filter.matches(event))
}

impl Calendar for StaticCalendar {
    fn is_event_present(&self, at: Timestamp) -> bool {
        self.started(at).iter().any(|event| event.contains(at))
    }

    fn current_event(
        &self,
        at: Timestamp,
        filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent> {
        self.started(at)
            .iter()
            .find(|event| event.contains(at) && accepts(filter, event))
            .cloned()
    }

    fn next_event(
        &self,
        at: Timestamp,
        filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent> {
        self.upcoming(at)
            .iter()
            .find(|event| accepts(filter, event))
            .cloned()
    }
}
