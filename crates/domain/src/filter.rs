//! Text filter: restricts the events a live event considers.
//!
//! Field and match type come from free-form configuration strings and are
//! resolved by name into the closed [`EventField`] and [`MatchType`] enums.
//! An unknown name yields a typed [`ConfigurationError`].

use std::str::FromStr;

use regex::{Regex, RegexBuilder};

use crate::error::ConfigurationError;
use crate::event::CalendarEvent;

/// The event field a text filter looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventField {
    Summary,
    Description,
    Comment,
    Contact,
    Location,
}

impl EventField {
    pub const ALL: [Self; 5] = [
        Self::Summary,
        Self::Description,
        Self::Comment,
        Self::Contact,
        Self::Location,
    ];

    /// Configuration name of the field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "SUMMARY",
            Self::Description => "DESCRIPTION",
            Self::Comment => "COMMENT",
            Self::Contact => "CONTACT",
            Self::Location => "LOCATION",
        }
    }
}

impl FromStr for EventField {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownField(s.to_string()))
    }
}

impl std::fmt::Display for EventField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the configured value is compared against the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// Case-insensitive whole-word occurrence of the value.
    Text,
    /// Regular expression search.
    Regex,
}

impl MatchType {
    pub const ALL: [Self; 2] = [Self::Text, Self::Regex];

    /// Configuration name of the match type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Regex => "REGEX",
        }
    }
}

impl FromStr for MatchType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownMatchType(s.to_string()))
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, immutable text filter.
#[derive(Debug, Clone)]
pub struct EventTextFilter {
    field: EventField,
    match_type: MatchType,
    value: String,
    pattern: Regex,
}

impl EventTextFilter {
    /// Compile a filter for `value` on `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidPattern`] when `match_type` is
    /// [`MatchType::Regex`] and `value` does not compile.
    pub fn new(
        field: EventField,
        value: impl Into<String>,
        match_type: MatchType,
    ) -> Result<Self, ConfigurationError> {
        let value = value.into();
        let pattern = match match_type {
            MatchType::Text => RegexBuilder::new(&format!(
                r"(?:^|\W){}(?:\W|$)",
                regex::escape(&value)
            ))
            .case_insensitive(true)
            .build(),
            MatchType::Regex => Regex::new(&value),
        }
        .map_err(ConfigurationError::InvalidPattern)?;

        Ok(Self {
            field,
            match_type,
            value,
            pattern,
        })
    }

    #[must_use]
    pub fn field(&self) -> EventField {
        self.field
    }

    #[must_use]
    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether `event` passes this filter. A missing field is matched as
    /// empty text.
    #[must_use]
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        self.pattern.is_match(event.field(self.field).unwrap_or_default())
    }
}

impl PartialEq for EventTextFilter {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.match_type == other.match_type
            && self.value == other.value
    }
}

impl Eq for EventTextFilter {}
