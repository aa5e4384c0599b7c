use evdev::Key;
use miette::Diagnostic;
use thiserror::Error;

use crate::model::{ModifierFlag, ModifierMask};

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    #[error("Key {key:?} is bound to both {first} and {second}")]
    #[diagnostic(code(holtek_translator::keymap::duplicate_modifier))]
    DuplicateModifier {
        key: Key,
        first: ModifierFlag,
        second: ModifierFlag,
    },

    #[error("Chord #{index} uses modifier key {key:?} as its source key")]
    #[diagnostic(
        code(holtek_translator::keymap::modifier_as_source),
        help("modifier key events are consumed before chord lookup, so this rule can never fire")
    )]
    ModifierAsSource { index: usize, key: Key },

    #[error("Chord #{index} ({modifiers}+{source_key:?}) is shadowed by chord #{shadowed_by}")]
    #[diagnostic(code(holtek_translator::keymap::shadowed_chord))]
    ShadowedChord {
        index: usize,
        shadowed_by: usize,
        modifiers: ModifierMask,
        source_key: Key,
    },

    #[error("Chord #{index} outputs {output:?}, which the virtual device does not advertise")]
    #[diagnostic(
        code(holtek_translator::keymap::output_not_registered),
        help("add the key to the output key list")
    )]
    OutputNotRegistered { index: usize, output: Key },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowed_chord_message() {
        let err = KeymapError::ShadowedChord {
            index: 3,
            shadowed_by: 1,
            modifiers: ModifierMask::CTRL,
            source_key: Key::KEY_I,
        };

        assert_eq!(
            err.to_string(),
            "Chord #3 (CTRL+KEY_I) is shadowed by chord #1"
        );
    }

    #[test]
    fn test_diagnostic_code() {
        let err = KeymapError::OutputNotRegistered {
            index: 2,
            output: Key::KEY_MUTE,
        };

        let code = err.code().map(|c| c.to_string());
        assert_eq!(
            code.as_deref(),
            Some("holtek_translator::keymap::output_not_registered")
        );
        assert!(err.help().is_some());
    }
}
