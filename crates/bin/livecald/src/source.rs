//! Keeps the bridge in sync with the events file.

use std::path::PathBuf;
use std::sync::Arc;

use livecal_adapter_static_calendar::{StaticBridge, StaticCalendar, load_events};
use livecal_app::ports::BridgeStatus;
use livecal_domain::event::CalendarEvent;

/// What a [`CalendarSource::sync`] changed on the bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub status_changed: Option<BridgeStatus>,
    pub calendar_changed: bool,
}

/// Reads the events file into a [`StaticBridge`].
///
/// A file that cannot be loaded takes the bridge offline; the last good
/// calendar stays in place until the file loads again.
pub struct CalendarSource {
    path: PathBuf,
    bridge: Arc<StaticBridge>,
    last: Option<Vec<CalendarEvent>>,
}

impl CalendarSource {
    pub fn new(path: PathBuf, bridge: Arc<StaticBridge>) -> Self {
        Self {
            path,
            bridge,
            last: None,
        }
    }

    /// Load the file and push it to the bridge when it changed.
    pub fn sync(&mut self) -> SyncOutcome {
        let loaded = self.load();

        match loaded {
            Ok((events, calendar)) => {
                let calendar_changed = self.last.as_ref() != Some(&events);
                if calendar_changed {
                    tracing::info!(
                        path = %self.path.display(),
                        events = events.len(),
                        "calendar loaded"
                    );
                    self.bridge.replace_calendar(calendar);
                    self.last = Some(events);
                }
                SyncOutcome {
                    status_changed: self.set_status(BridgeStatus::Online),
                    calendar_changed,
                }
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = format!("{err:#}"),
                    "unable to load calendar"
                );
                SyncOutcome {
                    status_changed: self.set_status(BridgeStatus::Offline),
                    calendar_changed: false,
                }
            }
        }
    }

    fn load(&self) -> anyhow::Result<(Vec<CalendarEvent>, StaticCalendar)> {
        let events = load_events(&self.path)?;
        let calendar = StaticCalendar::new(events.clone())?;
        Ok((events, calendar))
    }

    fn set_status(&self, status: BridgeStatus) -> Option<BridgeStatus> {
        self.bridge.set_status(status).then_some(status)
    }
}
