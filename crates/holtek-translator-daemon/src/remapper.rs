//! Chord translation
//!
//! # State machine
//!
//! Each input device gets its own [`ChordTranslator`]. It tracks the held
//! modifiers for that device and at most one pending translated key.
//!
//! ```text
//!                 chord key-down
//!        ┌──────────────────────────────┐
//!        │                              ▼
//!   ┌────┴───┐                    ┌────────────┐
//!   │  IDLE  │                    │ ARMED(out) │ ◄──┐ chord key-down
//!   └────────┘                    └─────┬──────┘ ───┘ (last chord wins)
//!        ▲                              │
//!        │  chord key-up, or any        │
//!        │  unmatched key-up            │
//!        └──────────────────────────────┘
//! ```
//!
//! Every key event is handled in this order:
//!
//! 1. Repeat events (value 2) are dropped. Any other value that is not a
//!    press (value 1) counts as a release.
//! 2. Modifier keys update the modifier mask and are dropped.
//! 3. A chord matching the exact mask and code is translated. Key-down arms
//!    the translator; key-up disarms it.
//! 4. An unmatched key-up while armed releases the pending output key.
//! 5. Anything else passes through unchanged.
//!
//! Step 4 exists because the remote releases its modifiers before the main
//! key. By the time the main key goes up the mask is already empty and no
//! chord matches.

use evdev::Key;
use holtek_translator_keymap::{Keymap, ModifierFlag, ModifierMask};

use crate::event::{KeyState, RawEvent};

/// Tracks which modifier flags are held on one device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    mask: ModifierMask,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `flag` when `down`, clear it otherwise.
    pub fn set_modifier(&mut self, flag: ModifierFlag, down: bool) {
        self.mask.set(flag, down);
    }

    pub fn mask(&self) -> ModifierMask {
        self.mask
    }
}

/// Whether a translated key is waiting for its release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranslatorState {
    /// No translated key is held
    #[default]
    Idle,
    /// The output key of the last matched chord is held
    Armed(Key),
}

/// What to do with one incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Emit this event instead of the input
    Translated(RawEvent),
    /// Emit the input unchanged
    Passthrough(RawEvent),
    /// Emit nothing
    Suppressed,
}

impl Outcome {
    /// The event to hand to the output sink, if any.
    pub fn into_event(self) -> Option<RawEvent> {
        match self {
            Outcome::Translated(event) | Outcome::Passthrough(event) => Some(event),
            Outcome::Suppressed => None,
        }
    }
}

/// Per-device chord translator.
#[derive(Debug, Clone)]
pub struct ChordTranslator {
    keymap: Keymap,
    modifiers: ModifierState,
    state: TranslatorState,
}

impl ChordTranslator {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            modifiers: ModifierState::new(),
            state: TranslatorState::Idle,
        }
    }

    #[cfg(test)]
    pub fn modifiers(&self) -> ModifierMask {
        self.modifiers.mask()
    }

    #[cfg(test)]
    pub fn state(&self) -> TranslatorState {
        self.state
    }

    /// Process one event and decide what to emit.
    pub fn process(&mut self, event: &RawEvent) -> Outcome {
        // Only key events are translated; everything else (SYN, MSC, mouse
        // motion) is dropped.
        if !event.is_key() {
            return Outcome::Suppressed;
        }

        let key = event.key_code();
        let key_state = match event.key_state() {
            Some(KeyState::Repeat) | None => return Outcome::Suppressed,
            Some(key_state) => key_state,
        };

        if let Some(flag) = self.keymap.modifier_for(key) {
            self.modifiers.set_modifier(flag, key_state == KeyState::Down);
            tracing::trace!("Modifier {} {:?}, held: {}", flag, key_state, self.modifiers.mask());
            return Outcome::Suppressed;
        }

        if let Some(rule) = self.keymap.find_chord(self.modifiers.mask(), key) {
            let output = rule.output;
            self.state = match key_state {
                KeyState::Down => TranslatorState::Armed(output),
                // A matching release clears whatever was pending, even if the
                // pending key differs.
                _ => TranslatorState::Idle,
            };
            tracing::debug!("Chord {} -> {:?} ({:?})", rule, output, key_state);
            return Outcome::Translated(event.with_code(output));
        }

        if key_state == KeyState::Up {
            if let TranslatorState::Armed(output) = self.state {
                self.state = TranslatorState::Idle;
                tracing::debug!("Releasing pending {:?} on {:?} up", output, key);
                return Outcome::Translated(event.with_code(output));
            }
        }

        Outcome::Passthrough(*event)
    }
}
