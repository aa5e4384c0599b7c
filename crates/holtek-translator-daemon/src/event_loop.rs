//! Event source multiplexer
//!
//! Waits on both input devices at once and runs each event through the
//! translator that belongs to its device. The wait is a readiness wait on
//! the device file descriptors (evdev's tokio `EventStream`), never a poll
//! loop.
//!
//! When both devices have events ready, they are served alternately, one
//! event at a time. The events of a single device always keep their order.

use std::future;
use std::io;

use futures::stream::{self, PollNext, Stream, StreamExt};
use holtek_translator_keymap::Keymap;

use crate::device::DeviceRole;
use crate::error::DaemonError;
use crate::event::RawEvent;
use crate::injector::{self, EventSink};
use crate::remapper::ChordTranslator;

/// One translator per device.
#[derive(Debug, Clone)]
pub struct Translators {
    keyboard: ChordTranslator,
    mouse: ChordTranslator,
}

impl Translators {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keyboard: ChordTranslator::new(keymap),
            mouse: ChordTranslator::new(keymap),
        }
    }

    pub fn get_mut(&mut self, role: DeviceRole) -> &mut ChordTranslator {
        match role {
            DeviceRole::Keyboard => &mut self.keyboard,
            DeviceRole::Mouse => &mut self.mouse,
        }
    }
}

/// Tag a device stream with its role and turn its end into an error.
fn tagged<S>(role: DeviceRole, events: S) -> impl Stream<Item = (DeviceRole, io::Result<RawEvent>)>
where
    S: Stream<Item = io::Result<evdev::InputEvent>>,
{
    let closed = stream::once(future::ready(Err(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "event stream closed",
    ))));

    events
        .map(|item| item.map(RawEvent::from))
        .chain(closed)
        .map(move |item| (role, item))
}

/// Alternate which side is polled first on every poll.
fn round_robin(last: &mut PollNext) -> PollNext {
    last.toggle()
}

/// Translate events from both devices until one of them fails.
///
/// Every produced event is forwarded to `sink` as soon as it is translated.
/// A device whose stream ends counts as lost.
pub async fn run<K, M, S>(
    keyboard: K,
    mouse: M,
    translators: &mut Translators,
    sink: &mut S,
) -> Result<(), DaemonError>
where
    K: Stream<Item = io::Result<evdev::InputEvent>>,
    M: Stream<Item = io::Result<evdev::InputEvent>>,
    S: EventSink + ?Sized,
{
    let merged = stream::select_with_strategy(
        tagged(DeviceRole::Keyboard, keyboard),
        tagged(DeviceRole::Mouse, mouse),
        round_robin,
    );
    let mut merged = std::pin::pin!(merged);

    tracing::info!("Translating events");

    while let Some((role, item)) = merged.next().await {
        let event = item.map_err(|source| DaemonError::DeviceLost { role, source })?;

        match translators.get_mut(role).process(&event).into_event() {
            Some(output) => {
                tracing::debug!("{}: {} => {}", role, event, output);
                injector::forward(sink, &output)?;
            }
            None => tracing::trace!("{}: {} dropped", role, event),
        }
    }

    // Not reached: each tagged stream ends with an error item.
    Ok(())
}

#[cfg(test)]
mod tests {
    use evdev::{EventType, InputEvent, Key};
    use holtek_translator_keymap::{holtek_keymap, ModifierMask};

    use super::*;
    use crate::event::event_value::{PRESS, RELEASE, REPEAT};
    use crate::injector::testing::RecordingSink;

    fn key(key: Key, value: i32) -> io::Result<InputEvent> {
        Ok(InputEvent::new(EventType::KEY, key.code(), value))
    }

    fn syn() -> io::Result<InputEvent> {
        Ok(InputEvent::new(EventType::SYNCHRONIZATION, 0, 0))
    }

    fn codes(sink: &RecordingSink) -> Vec<(Key, i32)> {
        sink.events()
            .iter()
            .map(|event| (event.key_code(), event.value))
            .collect()
    }

    #[tokio::test]
    async fn test_chord_from_keyboard_is_translated() {
        let keyboard = stream::iter(vec![
            key(Key::KEY_LEFTCTRL, PRESS),
            syn(),
            key(Key::KEY_G, PRESS),
            syn(),
            key(Key::KEY_G, REPEAT),
            syn(),
            key(Key::KEY_LEFTCTRL, RELEASE),
            syn(),
            key(Key::KEY_G, RELEASE),
            syn(),
        ]);
        let mouse = stream::pending();
        let mut translators = Translators::new(holtek_keymap());
        let mut sink = RecordingSink::default();

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(200),
            run(keyboard, mouse, &mut translators, &mut sink),
        )
        .await;

        // The keyboard stream ends, which counts as losing the device.
        match result {
            Ok(Err(DaemonError::DeviceLost { role, source })) => {
                assert_eq!(role, DeviceRole::Keyboard);
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected keyboard loss, got {:?}", other),
        }
        let program = holtek_keymap()
            .find_chord(ModifierMask::CTRL, Key::KEY_G)
            .map(|rule| rule.output)
            .unwrap();
        assert_eq!(codes(&sink), vec![(program, PRESS), (program, RELEASE)]);
        assert!(sink.is_flushed_per_event());
    }

    #[tokio::test]
    async fn test_both_devices_keep_their_own_order() {
        let keyboard = stream::iter(vec![
            key(Key::KEY_UP, PRESS),
            key(Key::KEY_UP, RELEASE),
            key(Key::KEY_DOWN, PRESS),
            key(Key::KEY_DOWN, RELEASE),
        ])
        .chain(stream::pending());
        let mouse = stream::iter(vec![
            key(Key::BTN_RIGHT, PRESS),
            key(Key::BTN_RIGHT, RELEASE),
        ])
        .chain(stream::pending());
        let mut translators = Translators::new(holtek_keymap());
        let mut sink = RecordingSink::default();

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            run(keyboard, mouse, &mut translators, &mut sink),
        )
        .await;
        assert!(result.is_err(), "run should still be waiting for input");

        let info = holtek_keymap()
            .find_chord(ModifierMask::EMPTY, Key::BTN_RIGHT)
            .map(|rule| rule.output)
            .unwrap();
        let output = codes(&sink);
        let keyboard_out: Vec<_> = output.iter().copied().filter(|(k, _)| *k != info).collect();
        let mouse_out: Vec<_> = output.iter().copied().filter(|(k, _)| *k == info).collect();

        assert_eq!(
            keyboard_out,
            vec![
                (Key::KEY_UP, PRESS),
                (Key::KEY_UP, RELEASE),
                (Key::KEY_DOWN, PRESS),
                (Key::KEY_DOWN, RELEASE),
            ]
        );
        assert_eq!(mouse_out, vec![(info, PRESS), (info, RELEASE)]);
        assert!(sink.is_flushed_per_event());
    }

    #[tokio::test]
    async fn test_simultaneous_events_alternate() {
        let keyboard = stream::iter(vec![key(Key::KEY_1, PRESS), key(Key::KEY_2, PRESS)])
            .chain(stream::pending());
        let mouse = stream::iter(vec![key(Key::KEY_3, PRESS), key(Key::KEY_4, PRESS)])
            .chain(stream::pending());
        let mut translators = Translators::new(holtek_keymap());
        let mut sink = RecordingSink::default();

        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            run(keyboard, mouse, &mut translators, &mut sink),
        )
        .await;

        assert_eq!(
            codes(&sink),
            vec![
                (Key::KEY_1, PRESS),
                (Key::KEY_3, PRESS),
                (Key::KEY_2, PRESS),
                (Key::KEY_4, PRESS),
            ]
        );
    }

    #[tokio::test]
    async fn test_modifier_state_is_per_device() {
        // Ctrl held on the keyboard must not turn a mouse-side G into a chord.
        let keyboard = stream::iter(vec![key(Key::KEY_LEFTCTRL, PRESS)]).chain(stream::pending());
        let mouse = stream::iter(vec![key(Key::KEY_G, PRESS)]).chain(stream::pending());
        let mut translators = Translators::new(holtek_keymap());
        let mut sink = RecordingSink::default();

        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            run(keyboard, mouse, &mut translators, &mut sink),
        )
        .await;

        assert_eq!(codes(&sink), vec![(Key::KEY_G, PRESS)]);
        assert!(translators.get_mut(DeviceRole::Mouse).modifiers().is_empty());
        assert!(!translators.get_mut(DeviceRole::Keyboard).modifiers().is_empty());
    }

    #[tokio::test]
    async fn test_read_error_is_fatal() {
        let keyboard = stream::pending();
        let mouse = stream::iter(vec![
            key(Key::BTN_RIGHT, PRESS),
            Err(io::Error::from_raw_os_error(19)),
            key(Key::BTN_RIGHT, RELEASE),
        ]);
        let mut translators = Translators::new(holtek_keymap());
        let mut sink = RecordingSink::default();

        let err = run(keyboard, mouse, &mut translators, &mut sink)
            .await
            .unwrap_err();

        match err {
            DaemonError::DeviceLost { role, source } => {
                assert_eq!(role, DeviceRole::Mouse);
                assert_eq!(source.raw_os_error(), Some(19));
            }
            other => panic!("expected DeviceLost, got {:?}", other),
        }
        assert_eq!(sink.events().len(), 1, "Nothing after the failure is forwarded");
    }
}
