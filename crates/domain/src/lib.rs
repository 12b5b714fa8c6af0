//! # livecal-domain
//!
//! Pure domain model for the live calendar-event scheduler.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, the reference offset
//! - Define **calendar events** (time-bounded, read-only values owned by a calendar engine)
//! - Define **text filters** and their selection from free-form configuration
//! - Define the **live state** (current / next event) and its channel projection
//! - Define the **status** an owning entity exposes (online, offline + detail)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod config;
pub mod error;
pub mod time;

pub mod event;
pub mod filter;
pub mod live_state;
pub mod status;
