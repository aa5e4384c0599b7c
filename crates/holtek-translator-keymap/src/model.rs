//! Mapping table data model

use std::fmt;
use std::ops::BitOr;
use std::path::Path;

use evdev::Key;

/// A single modifier bit.
///
/// The discriminants are the bit values used in [`ModifierMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ModifierFlag {
    Shift = 1,
    Ctrl = 2,
    Alt = 4,
    Meta = 8,
    /// Reserved for a mouse button acting as a modifier
    MouseButton = 16,
}

impl ModifierFlag {
    /// All flags, in bit order.
    pub const ALL: [ModifierFlag; 5] = [
        ModifierFlag::Shift,
        ModifierFlag::Ctrl,
        ModifierFlag::Alt,
        ModifierFlag::Meta,
        ModifierFlag::MouseButton,
    ];

    pub const fn bit(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            ModifierFlag::Shift => "SHIFT",
            ModifierFlag::Ctrl => "CTRL",
            ModifierFlag::Alt => "ALT",
            ModifierFlag::Meta => "META",
            ModifierFlag::MouseButton => "MOUSE",
        }
    }
}

impl fmt::Display for ModifierFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bitmask of currently held modifiers.
///
/// Chord matching compares masks for equality, so `CTRL` does not match
/// while `CTRL+SHIFT` is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierMask(u8);

impl ModifierMask {
    pub const EMPTY: ModifierMask = ModifierMask(0);
    pub const SHIFT: ModifierMask = ModifierMask::from_flag(ModifierFlag::Shift);
    pub const CTRL: ModifierMask = ModifierMask::from_flag(ModifierFlag::Ctrl);
    pub const ALT: ModifierMask = ModifierMask::from_flag(ModifierFlag::Alt);
    pub const META: ModifierMask = ModifierMask::from_flag(ModifierFlag::Meta);

    pub const fn from_flag(flag: ModifierFlag) -> Self {
        Self(flag.bit())
    }

    /// Return a copy of this mask with `flag` added.
    pub const fn with(self, flag: ModifierFlag) -> Self {
        Self(self.0 | flag.bit())
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, flag: ModifierFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Set the bit for `flag` when `down`, clear it otherwise.
    ///
    /// Setting an already set bit is a no-op.
    pub fn set(&mut self, flag: ModifierFlag, down: bool) {
        if down {
            self.0 |= flag.bit();
        } else {
            self.0 &= !flag.bit();
        }
    }

    /// Iterate over the flags present in this mask, in bit order.
    pub fn flags(self) -> impl Iterator<Item = ModifierFlag> {
        ModifierFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }
}

impl From<ModifierFlag> for ModifierMask {
    fn from(flag: ModifierFlag) -> Self {
        Self::from_flag(flag)
    }
}

impl BitOr for ModifierMask {
    type Output = ModifierMask;

    fn bitor(self, rhs: ModifierMask) -> ModifierMask {
        ModifierMask(self.0 | rhs.0)
    }
}

impl BitOr<ModifierFlag> for ModifierMask {
    type Output = ModifierMask;

    fn bitor(self, rhs: ModifierFlag) -> ModifierMask {
        self.with(rhs)
    }
}

impl BitOr for ModifierFlag {
    type Output = ModifierMask;

    fn bitor(self, rhs: ModifierFlag) -> ModifierMask {
        ModifierMask::from_flag(self).with(rhs)
    }
}

impl fmt::Display for ModifierMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for flag in self.flags() {
            if !first {
                f.write_str("+")?;
            }
            write!(f, "{}", flag)?;
            first = false;
        }
        Ok(())
    }
}

/// Binds a raw key code to the modifier flag it sets and clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierBinding {
    pub key: Key,
    pub flag: ModifierFlag,
}

/// A chord translation rule.
///
/// Matches when the held modifiers equal `modifiers` exactly and the event
/// code is `source`; the event is then re-emitted as `output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordRule {
    pub modifiers: ModifierMask,
    pub source: Key,
    pub output: Key,
}

impl fmt::Display for ChordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}+{:?} -> {:?}",
            self.modifiers, self.source, self.output
        )
    }
}

/// The complete translation table.
///
/// Cheap to copy; all data lives in `'static` slices.
#[derive(Debug, Clone, Copy)]
pub struct Keymap {
    pub modifiers: &'static [ModifierBinding],
    pub chords: &'static [ChordRule],
    /// Keys the virtual output device advertises
    pub output_keys: &'static [Key],
}

impl Keymap {
    /// Look up the modifier flag a key controls, if it is a modifier key.
    pub fn modifier_for(&self, key: Key) -> Option<ModifierFlag> {
        self.modifiers
            .iter()
            .find(|binding| binding.key == key)
            .map(|binding| binding.flag)
    }

    /// Find the first chord, in table order, matching `held` and `key`.
    pub fn find_chord(&self, held: ModifierMask, key: Key) -> Option<&ChordRule> {
        self.chords
            .iter()
            .find(|rule| rule.modifiers == held && rule.source == key)
    }

    pub fn output_keys(&self) -> &'static [Key] {
        self.output_keys
    }
}

/// Fixed paths of the two input devices the remote exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPaths {
    pub keyboard: &'static str,
    pub mouse: &'static str,
}

impl InputPaths {
    pub fn keyboard(&self) -> &Path {
        Path::new(self.keyboard)
    }

    pub fn mouse(&self) -> &Path {
        Path::new(self.mouse)
    }
}
