//! Bridge port: the calendar source a live event hangs off.
//!
//! The bridge owns fetching and parsing; a live event only asks it whether
//! it is online and for its latest calendar snapshot.

use std::sync::Arc;

use crate::ports::Calendar;

/// Connectivity of a bridge as seen by the live events attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BridgeStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

/// A connected calendar source.
pub trait CalendarBridge: Send + Sync {
    type Calendar: Calendar + 'static;

    /// Current connectivity. Anything but [`BridgeStatus::Online`]
    /// suppresses resolution.
    fn status(&self) -> BridgeStatus;

    /// The most recently retrieved calendar, if any was retrieved yet.
    ///
    /// Must be a cheap local call returning a possibly stale snapshot.
    fn runtime_calendar(&self) -> Option<Arc<Self::Calendar>>;
}

impl<T: CalendarBridge + ?Sized> CalendarBridge for Arc<T> {
    type Calendar = T::Calendar;

    fn status(&self) -> BridgeStatus {
        (**self).status()
    }

    fn runtime_calendar(&self) -> Option<Arc<Self::Calendar>> {
        (**self).runtime_calendar()
    }
}
