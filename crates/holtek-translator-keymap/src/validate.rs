//! Startup checks for a [`Keymap`]

use crate::error::KeymapError;
use crate::model::Keymap;

impl Keymap {
    /// Check that every entry of the table can take effect.
    ///
    /// Returns the first problem found. Chord indices in errors are
    /// 1-based, in table order.
    pub fn validate(&self) -> Result<(), KeymapError> {
        for (i, binding) in self.modifiers.iter().enumerate() {
            if let Some(earlier) = self.modifiers[..i].iter().find(|b| b.key == binding.key) {
                return Err(KeymapError::DuplicateModifier {
                    key: binding.key,
                    first: earlier.flag,
                    second: binding.flag,
                });
            }
        }

        for (i, rule) in self.chords.iter().enumerate() {
            let index = i + 1;

            if self.modifier_for(rule.source).is_some() {
                return Err(KeymapError::ModifierAsSource {
                    index,
                    key: rule.source,
                });
            }

            if let Some(j) = self.chords[..i].iter().position(|earlier| {
                earlier.modifiers == rule.modifiers && earlier.source == rule.source
            }) {
                return Err(KeymapError::ShadowedChord {
                    index,
                    shadowed_by: j + 1,
                    modifiers: rule.modifiers,
                    source_key: rule.source,
                });
            }

            if !self.output_keys.contains(&rule.output) {
                return Err(KeymapError::OutputNotRegistered {
                    index,
                    output: rule.output,
                });
            }
        }

        tracing::debug!(
            "Keymap valid: {} modifier key(s), {} chord(s), {} output key(s)",
            self.modifiers.len(),
            self.chords.len(),
            self.output_keys.len()
        );

        Ok(())
    }
}
