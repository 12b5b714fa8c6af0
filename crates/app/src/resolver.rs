//! Event resolver: which event is current and which is next at an instant.
//!
//! All temporal work is delegated to the [`Calendar`]. The resolver only
//! turns a missing calendar into a communication error, so that "no event
//! right now" and "no calendar at all" stay distinguishable.

use livecal_domain::error::CommunicationError;
use livecal_domain::filter::EventTextFilter;
use livecal_domain::live_state::LiveState;
use livecal_domain::time::Timestamp;

use crate::ports::Calendar;

/// Resolve the current and next event at `at`, restricted to `filter`.
///
/// # Errors
///
/// Returns [`CommunicationError::CalendarNotRetrieved`] when `calendar` is
/// `None`.
pub fn resolve<C: Calendar + ?Sized>(
    calendar: Option<&C>,
    at: Timestamp,
    filter: Option<&EventTextFilter>,
) -> Result<LiveState, CommunicationError> {
    let calendar = calendar.ok_or(CommunicationError::CalendarNotRetrieved)?;
    Ok(LiveState::new(
        calendar.current_event(at, filter),
        calendar.next_event(at, filter),
    ))
}
