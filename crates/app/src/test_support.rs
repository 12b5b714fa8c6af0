//! Shared fakes for the unit tests of this crate.

use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use livecal_domain::event::CalendarEvent;
use livecal_domain::filter::EventTextFilter;
use livecal_domain::time::Timestamp;

use crate::ports::Calendar;

/// 2024-05-01 at the given wall time, UTC.
pub fn at(h: u32, m: u32, s: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
}

pub fn event(title: &str, start: Timestamp, end: Timestamp) -> CalendarEvent {
    CalendarEvent::builder()
        .title(title)
        .start(start)
        .end(end)
        .build()
        .unwrap()
}

/// Calendar over a plain list of events, scanned linearly.
#[derive(Default)]
pub struct ListCalendar {
    events: Vec<CalendarEvent>,
}

impl ListCalendar {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }

    fn candidates<'a>(
        &'a self,
        filter: Option<&'a EventTextFilter>,
    ) -> impl Iterator<Item = &'a CalendarEvent> {
        self.events
            .iter()
            .filter(move |event| filter.is_none_or(|f| f.matches(event)))
    }
}

impl Calendar for ListCalendar {
    fn is_event_present(&self, at: Timestamp) -> bool {
        self.events.iter().any(|event| event.contains(at))
    }

    fn current_event(
        &self,
        at: Timestamp,
        filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent> {
        self.candidates(filter)
            .filter(|event| event.contains(at))
            .min_by_key(|event| event.start)
            .cloned()
    }

    fn next_event(
        &self,
        at: Timestamp,
        filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent> {
        self.candidates(filter)
            .filter(|event| event.starts_after(at))
            .min_by_key(|event| event.start)
            .cloned()
    }
}

/// Calendar that claims an event is present but never returns one.
pub struct InconsistentCalendar;

impl Calendar for InconsistentCalendar {
    fn is_event_present(&self, _at: Timestamp) -> bool {
        true
    }

    fn current_event(
        &self,
        _at: Timestamp,
        _filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent> {
        None
    }

    fn next_event(
        &self,
        _at: Timestamp,
        _filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent> {
        None
    }
}

/// Calendar counting how often it is queried.
#[derive(Default)]
pub struct CountingCalendar {
    pub inner: ListCalendar,
    pub queries: Mutex<usize>,
}

impl CountingCalendar {
    pub fn query_count(&self) -> usize {
        *self.queries.lock().unwrap()
    }

    fn bump(&self) {
        *self.queries.lock().unwrap() += 1;
    }
}

impl Calendar for CountingCalendar {
    fn is_event_present(&self, at: Timestamp) -> bool {
        self.bump();
        self.inner.is_event_present(at)
    }

    fn current_event(
        &self,
        at: Timestamp,
        filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent> {
        self.bump();
        self.inner.current_event(at, filter)
    }

    fn next_event(
        &self,
        at: Timestamp,
        filter: Option<&EventTextFilter>,
    ) -> Option<CalendarEvent> {
        self.bump();
        self.inner.next_event(at, filter)
    }
}
