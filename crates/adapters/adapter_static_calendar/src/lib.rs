//! # livecal-adapter-static-calendar
//!
//! Calendar source backed by a local file of events.
//!
//! - [`StaticCalendar`] answers current / next event queries over a sorted
//!   snapshot of events.
//! - [`StaticBridge`] exposes the latest snapshot through the
//!   [`CalendarBridge`](livecal_app::ports::CalendarBridge) port; its owner
//!   swaps snapshots in when the file changes.
//! - [`load_events`] reads a TOML or JSON events file.
//!
//! ## Dependency rule
//!
//! Depends on `livecal-app` (port traits) and `livecal-domain` only.

mod bridge;
mod calendar;
mod error;
mod loader;

pub use bridge::StaticBridge;
pub use calendar::StaticCalendar;
pub use error::CalendarFileError;
pub use loader::{FileFormat, load_events, parse_events};
