//! Calendar event: an immutable, time-bounded entry of a calendar.
//!
//! Events are owned by the calendar engine. The scheduler only reads them
//! for the duration of a single resolution cycle.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::filter::EventField;
use crate::time::Timestamp;

/// A single calendar entry covering the half-open interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: Timestamp,
    pub end: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl CalendarEvent {
    /// Create a builder for constructing a [`CalendarEvent`].
    #[must_use]
    pub fn builder() -> CalendarEventBuilder {
        CalendarEventBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EndBeforeStart`] when `end < start`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end < self.start {
            return Err(ValidationError::EndBeforeStart {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Whether `at` lies within `[start, end)`.
    #[must_use]
    pub fn contains(&self, at: Timestamp) -> bool {
        self.start <= at && at < self.end
    }

    /// Whether the event begins strictly after `at`.
    #[must_use]
    pub fn starts_after(&self, at: Timestamp) -> bool {
        self.start > at
    }

    /// Text of the given field, if the event carries one.
    #[must_use]
    pub fn field(&self, field: EventField) -> Option<&str> {
        match field {
            EventField::Summary => Some(self.title.as_str()),
            EventField::Description => self.description.as_deref(),
            EventField::Comment => self.comment.as_deref(),
            EventField::Contact => self.contact.as_deref(),
            EventField::Location => self.location.as_deref(),
        }
    }
}

/// Step-by-step builder for [`CalendarEvent`].
#[derive(Debug, Default)]
pub struct CalendarEventBuilder {
    title: Option<String>,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    description: Option<String>,
    location: Option<String>,
    comment: Option<String>,
    contact: Option<String>,
}

impl CalendarEventBuilder {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn start(mut self, start: Timestamp) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn end(mut self, end: Timestamp) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Consume the builder, validate, and return a [`CalendarEvent`].
    ///
    /// A missing `end` makes the event instantaneous (`end == start`); a
    /// missing `start` defaults to the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EndBeforeStart`] if `end < start`.
    pub fn build(self) -> Result<CalendarEvent, ValidationError> {
        let start = self.start.unwrap_or_else(crate::time::now);
        let event = CalendarEvent {
            title: self.title.unwrap_or_default(),
            start,
            end: self.end.unwrap_or(start),
            description: self.description,
            location: self.location,
            comment: self.comment,
            contact: self.contact,
        };
        event.validate()?;
        Ok(event)
    }
}
