//! Bridge serving a replaceable [`StaticCalendar`] snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use livecal_app::ports::{BridgeStatus, CalendarBridge};

use crate::calendar::StaticCalendar;

/// A [`CalendarBridge`] whose calendar and connectivity are set by its owner.
///
/// Replacing the calendar does not notify anyone: the owner calls
/// `calendar_updated` on the live events attached to it afterwards.
#[derive(Debug, Default)]
pub struct StaticBridge {
    status: RwLock<BridgeStatus>,
    calendar: RwLock<Option<Arc<StaticCalendar>>>,
}

impl StaticBridge {
    /// A bridge that is not connected yet and holds no calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An online bridge serving `calendar`.
    #[must_use]
    pub fn online(calendar: StaticCalendar) -> Self {
        Self {
            status: RwLock::new(BridgeStatus::Online),
            calendar: RwLock::new(Some(Arc::new(calendar))),
        }
    }

    /// Swap in a new calendar snapshot. Readers holding the previous one
    /// keep it until they are done.
    pub fn replace_calendar(&self, calendar: StaticCalendar) {
        let count = calendar.len();
        *self
            .calendar
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(calendar));
        tracing::debug!(events = count, "calendar replaced");
    }

    /// Set the connectivity. Returns whether it changed.
    pub fn set_status(&self, status: BridgeStatus) -> bool {
        let mut current = self.status.write().unwrap_or_else(PoisonError::into_inner);
        if *current == status {
            return false;
        }
        tracing::info!(from = ?*current, to = ?status, "bridge status changed");
        *current = status;
        true
    }
}

impl CalendarBridge for StaticBridge {
    type Calendar = StaticCalendar;

    fn status(&self) -> BridgeStatus {
        *self.status.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn runtime_calendar(&self) -> Option<Arc<StaticCalendar>> {
        self.calendar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use livecal_app::live_event::{LiveEventController, Phase};
    use livecal_app::ports::Clock;
    use livecal_app::state_bus::{LiveUpdate, StateBus};
    use livecal_domain::config::LiveEventConfig;
    use livecal_domain::event::CalendarEvent;
    use livecal_domain::status::LiveStatus;
    use livecal_domain::time::Timestamp;

    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    fn calendar(title: &str, start: Timestamp, end: Timestamp) -> StaticCalendar {
        let event = CalendarEvent::builder()
            .title(title)
            .start(start)
            .end(end)
            .build()
            .unwrap();
        StaticCalendar::new(vec![event]).unwrap()
    }

    struct FixedClock(Timestamp);

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    #[test]
    fn should_start_unknown_without_calendar() {
        let bridge = StaticBridge::new();
        assert_eq!(bridge.status(), BridgeStatus::Unknown);
        assert!(bridge.runtime_calendar().is_none());
    }

    #[test]
    fn should_serve_replaced_calendar() {
        let bridge = StaticBridge::online(StaticCalendar::default());
        let before = bridge.runtime_calendar().unwrap();

        bridge.replace_calendar(calendar("A", at(10, 0), at(11, 0)));

        assert!(before.is_empty());
        assert_eq!(bridge.runtime_calendar().unwrap().len(), 1);
    }

    #[test]
    fn should_report_status_change_only_once() {
        let bridge = StaticBridge::new();
        assert!(bridge.set_status(BridgeStatus::Online));
        assert!(!bridge.set_status(BridgeStatus::Online));
        assert_eq!(bridge.status(), BridgeStatus::Online);
    }

    #[tokio::test]
    async fn should_drive_live_event_through_calendar_updates() {
        let bridge = Arc::new(StaticBridge::online(StaticCalendar::default()));
        let bus = Arc::new(StateBus::new(16));
        let mut rx = bus.subscribe();
        let live = LiveEventController::new(
            Some(Arc::clone(&bridge)),
            Arc::clone(&bus),
            FixedClock(at(10, 30)),
            LiveEventConfig::default(),
        );

        live.initialize().await.unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            LiveUpdate::Status(LiveStatus::Online)
        );
        let LiveUpdate::State(state) = rx.recv().await.unwrap() else {
            panic!("expected a live state");
        };
        assert!(state.current.is_none());

        bridge.replace_calendar(calendar("Standup", at(10, 0), at(11, 0)));
        live.calendar_updated().await.unwrap();

        let LiveUpdate::State(state) = rx.recv().await.unwrap() else {
            panic!("expected a live state");
        };
        assert_eq!(state.current.unwrap().title, "Standup");
        assert_eq!(live.pending_wakeup().await, Some(at(11, 0)));

        live.dispose().await;
        assert_eq!(live.phase().await, Phase::Disposed);
    }
}
