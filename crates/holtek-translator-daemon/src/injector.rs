//! Virtual device injection via uinput
//!
//! Translated and passed-through events leave the daemon through an
//! [`EventSink`]. The production sink is [`VirtualDevice`], a uinput keyboard
//! that the rest of the system reads like any other keyboard.

use evdev::{uinput::VirtualDeviceBuilder, AttributeSet, InputEvent, Key};

use crate::error::DaemonError;
use crate::event::RawEvent;

/// Destination for output events.
///
/// `emit` may buffer; `flush` terminates the report so consumers see it
/// atomically.
pub trait EventSink {
    /// Queue one event for the current report.
    fn emit(&mut self, event: &RawEvent) -> Result<(), DaemonError>;

    /// Finish the current report with a sync marker.
    fn flush(&mut self) -> Result<(), DaemonError>;
}

/// Write one event as a complete report.
///
/// Every event leaves the daemon through here, so no report is ever left
/// without its sync marker.
pub fn forward<S: EventSink + ?Sized>(sink: &mut S, event: &RawEvent) -> Result<(), DaemonError> {
    sink.emit(event)?;
    sink.flush()
}

/// A virtual keyboard for injecting translated events.
pub struct VirtualDevice {
    device: evdev::uinput::VirtualDevice,
    pending: Vec<InputEvent>,
}

impl VirtualDevice {
    /// Create a virtual keyboard advertising `keys`.
    pub fn new_keyboard(name: &str, keys: &[Key]) -> Result<Self, DaemonError> {
        let mut key_set = AttributeSet::<Key>::new();
        for key in keys {
            key_set.insert(*key);
        }

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(name).with_keys(&key_set))
            .and_then(|builder| builder.build())
            .map_err(|source| DaemonError::VirtualDevice {
                name: name.to_string(),
                source,
            })?;

        tracing::info!("Created virtual device '{}' with {} key(s)", name, keys.len());

        Ok(Self {
            device,
            pending: Vec::new(),
        })
    }
}

impl EventSink for VirtualDevice {
    fn emit(&mut self, event: &RawEvent) -> Result<(), DaemonError> {
        self.pending.push(event.to_input_event());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DaemonError> {
        // evdev appends the SYN_REPORT itself.
        let result = self.device.emit(&self.pending);
        self.pending.clear();
        result.map_err(DaemonError::Emit)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingSink, SinkCall};
    use super::*;

    #[test]
    fn test_forward_pairs_emit_with_flush() {
        let mut sink = RecordingSink::default();
        let a = RawEvent::key(Key::KEY_GREEN, 1);
        let b = RawEvent::key(Key::KEY_GREEN, 0);

        forward(&mut sink, &a).unwrap();
        forward(&mut sink, &b).unwrap();

        assert_eq!(
            sink.calls,
            vec![SinkCall::Emit(a), SinkCall::Flush, SinkCall::Emit(b), SinkCall::Flush]
        );
        assert!(sink.is_flushed_per_event());
    }

    #[test]
    fn test_forward_through_trait_object() {
        let mut sink = RecordingSink::default();
        let dyn_sink: &mut dyn EventSink = &mut sink;
        forward(dyn_sink, &RawEvent::key(Key::KEY_MUTE, 1)).unwrap();
        assert_eq!(sink.events(), vec![RawEvent::key(Key::KEY_MUTE, 1)]);
    }

    #[test]
    fn test_unflushed_emit_is_detected() {
        let mut sink = RecordingSink::default();
        sink.emit(&RawEvent::key(Key::KEY_A, 1)).unwrap();
        sink.emit(&RawEvent::key(Key::KEY_A, 0)).unwrap();
        sink.flush().unwrap();
        assert!(!sink.is_flushed_per_event());
    }
}
