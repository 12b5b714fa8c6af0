//! # livecal-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Calendar`: answers "current event" / "next event" queries
//!   - `CalendarBridge`: connectivity status and the latest calendar snapshot
//!   - `StatePublisher`: receives live states and status changes
//!   - `Clock`: wall-clock time
//! - Provide the scheduling core:
//!   - `reference_clock`: offset-shifted "now"
//!   - `resolver`: current / next event resolution
//!   - `rescheduler`: next boundary computation and the single wake-up slot
//!   - `live_event`: the controller orchestrating all of the above
//! - Provide **in-process infrastructure** (state bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `livecal-domain` only (plus `tokio` for locks, timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod live_event;
pub mod ports;
pub mod reference_clock;
pub mod rescheduler;
pub mod resolver;
pub mod state_bus;

#[cfg(test)]
mod test_support;
