//! Static calendar adapter error types.

use std::path::PathBuf;

use livecal_domain::error::ValidationError;

/// Errors raised while loading a calendar file.
#[derive(Debug, thiserror::Error)]
pub enum CalendarFileError {
    /// The file could not be read.
    #[error("unable to read calendar file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is neither `toml` nor `json`.
    #[error("unsupported calendar file format {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("failed to parse TOML calendar")]
    Toml(#[source] toml::de::Error),

    #[error("failed to parse JSON calendar")]
    Json(#[source] serde_json::Error),

    /// An event in the file is not a valid calendar event.
    #[error("event #{index} ({title:?}) is invalid")]
    InvalidEvent {
        index: usize,
        title: String,
        #[source]
        source: ValidationError,
    },
}
