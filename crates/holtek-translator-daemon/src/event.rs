//! Timestamped input event records
//!
//! [`RawEvent`] is the record the translator works on. It is a plain copy of
//! an evdev `input_event`, so the translation logic can be exercised without
//! touching a real device.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use evdev::{EventType, InputEvent, Key};

/// Event value constants for key events.
pub mod event_value {
    /// Key release event value
    pub const RELEASE: i32 = 0;
    /// Key press event value
    pub const PRESS: i32 = 1;
    /// Key repeat event value (autorepeat)
    pub const REPEAT: i32 = 2;
}

/// The state a key event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Up,
    Down,
    Repeat,
}

impl KeyState {
    /// Any value other than press or repeat counts as a release.
    pub fn from_value(value: i32) -> Self {
        match value {
            event_value::PRESS => KeyState::Down,
            event_value::REPEAT => KeyState::Repeat,
            _ => KeyState::Up,
        }
    }
}

/// Driver timestamp of an event, split the way `struct timeval` is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventTime {
    pub sec: i64,
    pub usec: i64,
}

impl From<SystemTime> for EventTime {
    fn from(time: SystemTime) -> Self {
        // Times before the epoch are reported as negative offsets.
        let (sign, since) = match time.duration_since(UNIX_EPOCH) {
            Ok(d) => (1, d),
            Err(e) => (-1, e.duration()),
        };
        Self {
            sec: sign * since.as_secs() as i64,
            usec: sign * i64::from(since.subsec_micros()),
        }
    }
}

/// One `(type, code, value)` record with its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub time: EventTime,
    pub kind: EventType,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    /// A key event with a zero timestamp.
    #[cfg(test)]
    pub fn key(key: Key, value: i32) -> Self {
        Self {
            time: EventTime::default(),
            kind: EventType::KEY,
            code: key.code(),
            value,
        }
    }

    #[cfg(test)]
    pub fn at(mut self, time: EventTime) -> Self {
        self.time = time;
        self
    }

    pub fn is_key(&self) -> bool {
        self.kind == EventType::KEY
    }

    pub fn key_code(&self) -> Key {
        Key::new(self.code)
    }

    /// The key state, for key events only.
    pub fn key_state(&self) -> Option<KeyState> {
        if !self.is_key() {
            return None;
        }
        Some(KeyState::from_value(self.value))
    }

    /// The same event with `code` replaced, keeping time, type and value.
    pub fn with_code(&self, key: Key) -> Self {
        Self {
            code: key.code(),
            ..*self
        }
    }

    /// The evdev record to write to a uinput device.
    ///
    /// uinput stamps injected events itself, so the time is not carried over.
    pub fn to_input_event(&self) -> InputEvent {
        InputEvent::new(self.kind, self.code, self.value)
    }
}

impl From<InputEvent> for RawEvent {
    fn from(event: InputEvent) -> Self {
        Self {
            time: event.timestamp().into(),
            kind: event.event_type(),
            code: event.code(),
            value: event.value(),
        }
    }
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_key() {
            write!(
                f,
                "{:?} value={} @{}.{:06}",
                self.key_code(),
                self.value,
                self.time.sec,
                self.time.usec
            )
        } else {
            write!(
                f,
                "{:?} code={} value={} @{}.{:06}",
                self.kind, self.code, self.value, self.time.sec, self.time.usec
            )
        }
    }
}
