//! Live state: the current and next event resolved in one cycle, and their
//! projection onto named channels.

use serde::Serialize;

use crate::event::CalendarEvent;
use crate::time::Timestamp;

/// Result of one resolution cycle. Recomputed from scratch every time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LiveState {
    pub current: Option<CalendarEvent>,
    pub next: Option<CalendarEvent>,
}

impl LiveState {
    #[must_use]
    pub fn new(current: Option<CalendarEvent>, next: Option<CalendarEvent>) -> Self {
        Self { current, next }
    }

    #[must_use]
    pub fn is_event_present(&self) -> bool {
        self.current.is_some()
    }

    /// Every channel with the value this state publishes on it.
    ///
    /// Absent events publish [`ChannelValue::Undef`] on all their channels,
    /// except `current_presence` which turns off.
    #[must_use]
    pub fn channels(&self) -> Vec<(Channel, ChannelValue)> {
        let mut out = Vec::with_capacity(Channel::ALL.len());
        out.push((
            Channel::CurrentPresence,
            ChannelValue::Switch(self.is_event_present()),
        ));
        push_event_channels(&mut out, self.current.as_ref(), &CURRENT_CHANNELS);
        push_event_channels(&mut out, self.next.as_ref(), &NEXT_CHANNELS);
        out
    }
}

/// Named data points a live event publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    CurrentPresence,
    CurrentTitle,
    CurrentStart,
    CurrentEnd,
    CurrentDescription,
    CurrentLocation,
    CurrentComment,
    CurrentContact,
    NextTitle,
    NextStart,
    NextEnd,
    NextDescription,
    NextLocation,
    NextComment,
    NextContact,
}

impl Channel {
    pub const ALL: [Self; 15] = [
        Self::CurrentPresence,
        Self::CurrentTitle,
        Self::CurrentStart,
        Self::CurrentEnd,
        Self::CurrentDescription,
        Self::CurrentLocation,
        Self::CurrentComment,
        Self::CurrentContact,
        Self::NextTitle,
        Self::NextStart,
        Self::NextEnd,
        Self::NextDescription,
        Self::NextLocation,
        Self::NextComment,
        Self::NextContact,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CurrentPresence => "current_presence",
            Self::CurrentTitle => "current_title",
            Self::CurrentStart => "current_start",
            Self::CurrentEnd => "current_end",
            Self::CurrentDescription => "current_description",
            Self::CurrentLocation => "current_location",
            Self::CurrentComment => "current_comment",
            Self::CurrentContact => "current_contact",
            Self::NextTitle => "next_title",
            Self::NextStart => "next_start",
            Self::NextEnd => "next_end",
            Self::NextDescription => "next_description",
            Self::NextLocation => "next_location",
            Self::NextComment => "next_comment",
            Self::NextContact => "next_contact",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value published on a [`Channel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ChannelValue {
    Switch(bool),
    Text(String),
    DateTime(Timestamp),
    Undef,
}

impl std::fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Switch(true) => f.write_str("ON"),
            Self::Switch(false) => f.write_str("OFF"),
            Self::Text(text) => f.write_str(text),
            Self::DateTime(ts) => write!(f, "{}", ts.to_rfc3339()),
            Self::Undef => f.write_str("UNDEF"),
        }
    }
}

/// Title, start, end, description, location, comment, contact.
type EventChannels = [Channel; 7];

const CURRENT_CHANNELS: EventChannels = [
    Channel::CurrentTitle,
    Channel::CurrentStart,
    Channel::CurrentEnd,
    Channel::CurrentDescription,
    Channel::CurrentLocation,
    Channel::CurrentComment,
    Channel::CurrentContact,
];

const NEXT_CHANNELS: EventChannels = [
    Channel::NextTitle,
    Channel::NextStart,
    Channel::NextEnd,
    Channel::NextDescription,
    Channel::NextLocation,
    Channel::NextComment,
    Channel::NextContact,
];

fn push_event_channels(
    out: &mut Vec<(Channel, ChannelValue)>,
    event: Option<&CalendarEvent>,
    channels: &EventChannels,
) {
    let Some(event) = event else {
        out.extend(channels.iter().map(|ch| (*ch, ChannelValue::Undef)));
        return;
    };

    let text = |value: Option<&String>| {
        value.map_or(ChannelValue::Undef, |v| ChannelValue::Text(v.clone()))
    };
    let [title, start, end, description, location, comment, contact] = *channels;
    out.push((title, ChannelValue::Text(event.title.clone())));
    out.push((start, ChannelValue::DateTime(event.start)));
    out.push((end, ChannelValue::DateTime(event.end)));
    out.push((description, text(event.description.as_ref())));
    out.push((location, text(event.location.as_ref())));
    out.push((comment, text(event.comment.as_ref())));
    out.push((contact, text(event.contact.as_ref())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event() -> CalendarEvent {
        CalendarEvent::builder()
            .title("Yoga")
            .start(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
            .end(Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap())
            .location("Studio")
            .build()
            .unwrap()
    }

    fn value_of(channels: &[(Channel, ChannelValue)], channel: Channel) -> &ChannelValue {
        &channels.iter().find(|(ch, _)| *ch == channel).unwrap().1
    }

    #[test]
    fn should_publish_every_channel_exactly_once() {
        let channels = LiveState::new(Some(event()), None).channels();
        assert_eq!(channels.len(), Channel::ALL.len());
        for channel in Channel::ALL {
            assert_eq!(channels.iter().filter(|(ch, _)| *ch == channel).count(), 1);
        }
    }

    #[test]
    fn should_switch_presence_off_and_undef_everything_when_empty() {
        let channels = LiveState::default().channels();
        assert_eq!(
            value_of(&channels, Channel::CurrentPresence),
            &ChannelValue::Switch(false)
        );
        assert!(
            channels
                .iter()
                .filter(|(ch, _)| *ch != Channel::CurrentPresence)
                .all(|(_, value)| *value == ChannelValue::Undef)
        );
    }

    #[test]
    fn should_map_current_event_fields() {
        let channels = LiveState::new(Some(event()), None).channels();
        assert_eq!(
            value_of(&channels, Channel::CurrentPresence),
            &ChannelValue::Switch(true)
        );
        assert_eq!(
            value_of(&channels, Channel::CurrentTitle),
            &ChannelValue::Text("Yoga".to_string())
        );
        assert_eq!(
            value_of(&channels, Channel::CurrentLocation),
            &ChannelValue::Text("Studio".to_string())
        );
        assert_eq!(
            value_of(&channels, Channel::CurrentComment),
            &ChannelValue::Undef
        );
        assert_eq!(value_of(&channels, Channel::NextTitle), &ChannelValue::Undef);
    }

    #[test]
    fn should_map_next_event_without_presence() {
        let channels = LiveState::new(None, Some(event())).channels();
        assert_eq!(
            value_of(&channels, Channel::CurrentPresence),
            &ChannelValue::Switch(false)
        );
        assert_eq!(
            value_of(&channels, Channel::NextStart),
            &ChannelValue::DateTime(event().start)
        );
    }

    #[test]
    fn should_display_values_like_item_states() {
        assert_eq!(ChannelValue::Switch(true).to_string(), "ON");
        assert_eq!(ChannelValue::Undef.to_string(), "UNDEF");
        assert_eq!(
            ChannelValue::DateTime(event().start).to_string(),
            "2024-05-01T10:00:00+00:00"
        );
    }
}
