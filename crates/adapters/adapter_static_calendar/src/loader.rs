//! Reading calendar events from a file.
//!
//! Two formats are accepted, picked from the file extension:
//!
//! ```toml
//! [[event]]
//! title = "Standup"
//! start = "2024-05-01T10:00:00Z"
//! end = "2024-05-01T10:15:00Z"
//! location = "Room 2"
//! ```
//!
//! or a JSON array of the same objects.

use std::path::Path;

use serde::Deserialize;

use livecal_domain::event::CalendarEvent;

use crate::error::CalendarFileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    /// Detect the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarFileError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, CalendarFileError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(CalendarFileError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlCalendar {
    #[serde(default, rename = "event")]
    events: Vec<CalendarEvent>,
}

/// Read and validate every event of the file at `path`.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or when one of its events
/// ends before it starts.
pub fn load_events(path: &Path) -> Result<Vec<CalendarEvent>, CalendarFileError> {
    let format = FileFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| CalendarFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let events = parse_events(&content, format)?;
    tracing::debug!(path = %path.display(), count = events.len(), "calendar file loaded");
    Ok(events)
}

/// Parse and validate events from `content`.
///
/// # Errors
///
/// Same as [`load_events`], minus the IO.
pub fn parse_events(
    content: &str,
    format: FileFormat,
) -> Result<Vec<CalendarEvent>, CalendarFileError> {
    let events = match format {
        FileFormat::Toml => {
            toml::from_str::<TomlCalendar>(content)
                .map_err(CalendarFileError::Toml)?
                .events
        }
        FileFormat::Json => {
            serde_json::from_str::<Vec<CalendarEvent>>(content).map_err(CalendarFileError::Json)?
        }
    };

    for (index, event) in events.iter().enumerate() {
        event
            .validate()
            .map_err(|source| CalendarFileError::InvalidEvent {
                index,
                title: event.title.clone(),
                source,
            })?;
    }
    Ok(events)
}
