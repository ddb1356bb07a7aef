//! Event vocabulary.
//!
//! [`Event`] is what callers may send. [`EventName`] is the closed set of
//! every event a machine can observe, including the node-to-node protocol,
//! and is what `on_event` callbacks receive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when an event name falls outside the public vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown transition event '{0}'")]
    UnknownEvent(String),

    #[error("'{0}' is an internal protocol event and cannot be sent by callers")]
    InternalEvent(EventName),
}

/// Events a caller may send to a machine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Enter,
    Leave,
    Start,
    Stop,
    Cancel,
    Reset,
}

impl Event {
    pub const ALL: [Event; 6] = [
        Event::Enter,
        Event::Leave,
        Event::Start,
        Event::Stop,
        Event::Cancel,
        Event::Reset,
    ];

    pub fn as_str(&self) -> &'static str {
        EventName::from(*self).as_str()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<EventName>()?.try_into()
    }
}

/// Every event name a machine can dispatch.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EventName {
    Enter,
    Leave,
    Start,
    Stop,
    Cancel,
    Reset,
    ChildAdd,
    ChildRemove,
    ChildBecome,
    ChildResign,
    ChildStart,
    ChildStop,
}

impl EventName {
    pub const ALL: [EventName; 12] = [
        EventName::Enter,
        EventName::Leave,
        EventName::Start,
        EventName::Stop,
        EventName::Cancel,
        EventName::Reset,
        EventName::ChildAdd,
        EventName::ChildRemove,
        EventName::ChildBecome,
        EventName::ChildResign,
        EventName::ChildStart,
        EventName::ChildStop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Enter => "enter",
            EventName::Leave => "leave",
            EventName::Start => "start",
            EventName::Stop => "stop",
            EventName::Cancel => "cancel",
            EventName::Reset => "reset",
            EventName::ChildAdd => "#child.add",
            EventName::ChildRemove => "#child.remove",
            EventName::ChildBecome => "#child.become",
            EventName::ChildResign => "#child.resign",
            EventName::ChildStart => "#child.start",
            EventName::ChildStop => "#child.stop",
        }
    }

    /// Whether this event belongs to the node-to-node protocol.
    pub fn is_internal(&self) -> bool {
        Event::try_from(*self).is_err()
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownEvent(s.to_string()))
    }
}

impl From<Event> for EventName {
    fn from(event: Event) -> Self {
        match event {
            Event::Enter => EventName::Enter,
            Event::Leave => EventName::Leave,
            Event::Start => EventName::Start,
            Event::Stop => EventName::Stop,
            Event::Cancel => EventName::Cancel,
            Event::Reset => EventName::Reset,
        }
    }
}

impl TryFrom<EventName> for Event {
    type Error = ProtocolError;

    fn try_from(name: EventName) -> Result<Self, Self::Error> {
        match name {
            EventName::Enter => Ok(Event::Enter),
            EventName::Leave => Ok(Event::Leave),
            EventName::Start => Ok(Event::Start),
            EventName::Stop => Ok(Event::Stop),
            EventName::Cancel => Ok(Event::Cancel),
            EventName::Reset => Ok(Event::Reset),
            internal => Err(ProtocolError::InternalEvent(internal)),
        }
    }
}
