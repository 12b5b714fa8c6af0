//! Live event configuration and text filter selection.

use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::filter::{EventField, EventTextFilter, MatchType};
use crate::time::ReferenceOffset;

/// Configuration of a single live event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LiveEventConfig {
    /// Signed offset in seconds applied to "now". Defaults to `0`.
    pub offset: Option<i64>,
    /// Name of the [`EventField`] to filter on (e.g. `SUMMARY`).
    pub text_event_field: Option<String>,
    /// Value to look for. No value means no filtering.
    pub text_event_value: Option<String>,
    /// Name of the [`MatchType`] (`TEXT` or `REGEX`).
    pub text_value_type: Option<String>,
}

impl LiveEventConfig {
    #[must_use]
    pub fn reference_offset(&self) -> ReferenceOffset {
        ReferenceOffset::from_secs(self.offset.unwrap_or_default())
    }

    /// Select the text filter described by this configuration.
    ///
    /// Returns `Ok(None)` when no filter value is set, whatever the other
    /// two settings say.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::IncompleteTextFilter`] when a value is set but
    ///   the field or the match type is missing
    /// - [`ConfigurationError::UnknownField`] / [`ConfigurationError::UnknownMatchType`]
    ///   when a name does not resolve
    /// - [`ConfigurationError::InvalidPattern`] for an invalid regular expression
    pub fn text_filter(&self) -> Result<Option<EventTextFilter>, ConfigurationError> {
        let Some(value) = self.text_event_value.as_deref() else {
            return Ok(None);
        };
        let (Some(field), Some(match_type)) = (
            self.text_event_field.as_deref(),
            self.text_value_type.as_deref(),
        ) else {
            return Err(ConfigurationError::IncompleteTextFilter);
        };

        let field: EventField = field.parse()?;
        let match_type: MatchType = match_type.parse()?;
        EventTextFilter::new(field, value, match_type).map(Some)
    }

    /// A field is configured without a match type, so the filter can never
    /// apply.
    #[must_use]
    pub fn has_dangling_filter_field(&self) -> bool {
        self.text_event_field.is_some() && self.text_value_type.is_none()
    }
}
