//! Rescheduler: when the live state must be recomputed next, and the
//! single wake-up armed for that instant.
//!
//! Boundaries are always taken from the **unfiltered** calendar. An event
//! hidden by the text filter still ends, and the filtered "next event" may
//! change when it does.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use livecal_domain::error::CommunicationError;
use livecal_domain::time::Timestamp;
use tokio::task::JoinHandle;

use crate::ports::Calendar;

/// The next event boundary after `at`, if any.
///
/// This is the end of the event containing `at` or the start of the next
/// event, whichever comes first. Back-to-back events share one boundary.
///
/// # Errors
///
/// - [`CommunicationError::CalendarNotRetrieved`] when `calendar` is `None`
/// - [`CommunicationError::InconsistentCalendar`] when the calendar reports
///   an event at `at` but cannot return it
pub fn next_wakeup<C: Calendar + ?Sized>(
    calendar: Option<&C>,
    at: Timestamp,
) -> Result<Option<Timestamp>, CommunicationError> {
    let calendar = calendar.ok_or(CommunicationError::CalendarNotRetrieved)?;

    let mut wakeup = None;
    if calendar.is_event_present(at) {
        let current = calendar
            .current_event(at, None)
            .ok_or(CommunicationError::InconsistentCalendar { at })?;
        wakeup = Some(current.end);
    }

    if let Some(next) = calendar.next_event(at, None) {
        wakeup = Some(wakeup.map_or(next.start, |end: Timestamp| end.min(next.start)));
    }

    Ok(wakeup)
}

/// Future run when a wake-up fires.
pub type WakeupTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A scheduled callback and the instant it targets.
#[derive(Debug)]
struct PendingWakeup {
    generation: u64,
    target: Timestamp,
    handle: JoinHandle<()>,
}

/// Holds at most one armed wake-up.
///
/// Every armed wake-up carries a generation number. A callback that fires
/// must [`claim`](Self::claim) its generation before doing any work; a
/// callback whose wake-up was replaced in the meantime finds a different
/// generation and does nothing.
#[derive(Debug, Default)]
pub struct WakeupSlot {
    pending: Option<PendingWakeup>,
    generation: u64,
}

impl WakeupSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instant targeted by the armed wake-up.
    #[must_use]
    pub fn target(&self) -> Option<Timestamp> {
        self.pending.as_ref().map(|pending| pending.target)
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel the armed wake-up, if any. Cancelling a wake-up that already
    /// fired is a no-op.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            tracing::debug!(
                generation = pending.generation,
                target = %pending.target,
                "wake-up cancelled"
            );
        }
    }

    /// Replace the armed wake-up with one firing at `target`.
    ///
    /// The delay is `target - reference`, clamped at zero. `task` receives
    /// the generation of the new wake-up and builds the future to run when
    /// it fires. Must be called from within a tokio runtime.
    pub fn arm<F>(&mut self, reference: Timestamp, target: Timestamp, task: F)
    where
        F: FnOnce(u64) -> WakeupTask,
    {
        self.cancel();

        self.generation += 1;
        let generation = self.generation;
        let delay = (target - reference).to_std().unwrap_or(Duration::ZERO);
        let fire = task(generation);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire.await;
        });

        tracing::debug!(
            generation,
            %target,
            delay_secs = delay.as_secs(),
            "wake-up armed"
        );
        self.pending = Some(PendingWakeup {
            generation,
            target,
            handle,
        });
    }

    /// Called by a firing wake-up. Returns `true` and clears the slot when
    /// `generation` is the armed one; returns `false` for a stale callback.
    pub fn claim(&mut self, generation: u64) -> bool {
        let armed = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.generation == generation);
        if armed {
            // the handle belongs to the task calling us, so it is dropped
            // rather than aborted
            self.pending = None;
        }
        armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InconsistentCalendar, ListCalendar, at, event};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[test]
    fn should_wake_up_at_end_of_current_event() {
        let calendar = ListCalendar::new(vec![event("A", at(10, 0, 0), at(11, 0, 0))]);
        let wakeup = next_wakeup(Some(&calendar), at(10, 30, 0)).unwrap();
        assert_eq!(wakeup, Some(at(11, 0, 0)));
    }

    #[test]
    fn should_wake_up_at_start_of_next_event() {
        let calendar = ListCalendar::new(vec![event("A", at(10, 0, 0), at(11, 0, 0))]);
        let wakeup = next_wakeup(Some(&calendar), at(9, 0, 0)).unwrap();
        assert_eq!(wakeup, Some(at(10, 0, 0)));
    }

    #[test]
    fn should_wake_up_once_for_back_to_back_events() {
        let calendar = ListCalendar::new(vec![
            event("A", at(10, 0, 0), at(11, 0, 0)),
            event("B", at(11, 0, 0), at(12, 0, 0)),
        ]);
        let wakeup = next_wakeup(Some(&calendar), at(10, 59, 59)).unwrap();
        assert_eq!(wakeup, Some(at(11, 0, 0)));
    }

    #[test]
    fn should_prefer_next_start_when_it_precedes_current_end() {
        let calendar = ListCalendar::new(vec![
            event("Long", at(9, 0, 0), at(17, 0, 0)),
            event("Overlap", at(12, 0, 0), at(13, 0, 0)),
        ]);
        let wakeup = next_wakeup(Some(&calendar), at(10, 0, 0)).unwrap();
        assert_eq!(wakeup, Some(at(12, 0, 0)));
    }

    #[test]
    fn should_not_wake_up_when_calendar_is_empty() {
        let wakeup = next_wakeup(Some(&ListCalendar::default()), at(10, 0, 0)).unwrap();
        assert_eq!(wakeup, None);
    }

    #[test]
    fn should_not_wake_up_after_last_event() {
        let calendar = ListCalendar::new(vec![event("A", at(10, 0, 0), at(11, 0, 0))]);
        assert_eq!(next_wakeup(Some(&calendar), at(11, 0, 0)).unwrap(), None);
    }

    #[test]
    fn should_fail_when_calendar_missing() {
        let result = next_wakeup::<ListCalendar>(None, at(10, 0, 0));
        assert!(matches!(
            result,
            Err(CommunicationError::CalendarNotRetrieved)
        ));
    }

    #[test]
    fn should_fail_when_calendar_is_inconsistent() {
        let result = next_wakeup(Some(&InconsistentCalendar), at(10, 0, 0));
        assert!(matches!(
            result,
            Err(CommunicationError::InconsistentCalendar { .. })
        ));
    }

    #[test]
    fn should_never_move_wakeup_backwards_as_time_advances() {
        let calendar = ListCalendar::new(vec![
            event("A", at(8, 0, 0), at(9, 30, 0)),
            event("B", at(9, 0, 0), at(10, 0, 0)),
            event("C", at(10, 0, 0), at(10, 0, 0)),
            event("D", at(10, 0, 0), at(12, 0, 0)),
            event("E", at(11, 0, 0), at(11, 15, 0)),
        ]);
        let mut previous: Option<Timestamp> = None;
        for second in (0..16 * 3600).step_by(30) {
            let t = at(0, 0, 0) + chrono::TimeDelta::seconds(second);
            let wakeup = next_wakeup(Some(&calendar), t).unwrap();
            if let (Some(prev), Some(current)) = (previous, wakeup) {
                assert!(current >= prev, "wake-up moved back at {t}");
            }
            if let Some(current) = wakeup {
                assert!(current > t);
            }
            if previous.is_some() && wakeup.is_none() {
                assert!(t >= at(12, 0, 0));
            }
            previous = wakeup;
        }
    }

    fn counting_task(counter: &Arc<AtomicUsize>) -> impl FnOnce(u64) -> WakeupTask {
        let counter = Arc::clone(counter);
        move |_generation| {
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_after_delay() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut slot = WakeupSlot::new();
        slot.arm(at(10, 0, 0), at(10, 0, 30), counting_task(&counter));
        assert_eq!(slot.target(), Some(at(10, 0, 30)));

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_immediately_when_target_is_in_the_past() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut slot = WakeupSlot::new();
        slot.arm(at(10, 0, 0), at(9, 0, 0), counting_task(&counter));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_only_one_wakeup_when_armed_twice() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut slot = WakeupSlot::new();
        slot.arm(at(10, 0, 0), at(10, 1, 0), counting_task(&counter));
        slot.arm(at(10, 0, 0), at(10, 1, 0), counting_task(&counter));
        assert!(slot.is_armed());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_fire_after_cancel() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut slot = WakeupSlot::new();
        slot.arm(at(10, 0, 0), at(10, 1, 0), counting_task(&counter));
        slot.cancel();
        slot.cancel();
        assert!(!slot.is_armed());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn should_claim_only_current_generation() {
        let mut slot = WakeupSlot::new();
        let first = Arc::new(AtomicU64::new(0));
        let second = Arc::new(AtomicU64::new(0));
        let first_generation = Arc::clone(&first);
        let second_generation = Arc::clone(&second);

        slot.arm(at(10, 0, 0), at(11, 0, 0), move |generation| {
            first_generation.store(generation, Ordering::SeqCst);
            Box::pin(async {})
        });
        slot.arm(at(10, 0, 0), at(11, 0, 0), move |generation| {
            second_generation.store(generation, Ordering::SeqCst);
            Box::pin(async {})
        });

        let stale = first.load(Ordering::SeqCst);
        let current = second.load(Ordering::SeqCst);
        assert_ne!(stale, current);
        assert!(!slot.claim(stale));
        assert!(slot.is_armed());
        assert!(slot.claim(current));
        assert!(!slot.is_armed());
        assert!(!slot.claim(current));
    }
}
