//! Translation table for the Holtek e000 media remote
//!
//! The remote shows up as two evdev devices: a keyboard that sends most
//! buttons as modifier chords (e.g. the green button is `Ctrl+I`) and a mouse
//! interface whose right button is the info key. The table below turns each
//! chord back into the single media key it stands for.

use evdev::Key;

use crate::model::{ChordRule, InputPaths, Keymap, ModifierBinding, ModifierFlag, ModifierMask};

/// Name of the virtual output device.
pub const VIRTUAL_DEVICE_NAME: &str = "translated-remote";

/// by-id paths of the remote's keyboard and mouse interfaces.
pub const HOLTEK_PATHS: InputPaths = InputPaths {
    keyboard: "/dev/input/by-id/usb-HOLTEK_e000-event-kbd",
    mouse: "/dev/input/by-id/usb-HOLTEK_e000-if01-event-mouse",
};

/// Output codes for the translated buttons.
#[cfg(not(feature = "x11-keycodes"))]
mod output {
    use evdev::Key;

    pub const GREEN: Key = Key::KEY_GREEN;
    pub const YELLOW: Key = Key::KEY_YELLOW;
    pub const PROGRAM: Key = Key::KEY_PROGRAM;
    pub const INFO: Key = Key::KEY_INFO;
    pub const LIST: Key = Key::KEY_LIST;
    pub const TEXT: Key = Key::KEY_TEXT;
    pub const PLAY: Key = Key::KEY_PLAY;
}

/// X11 ignores key codes above 255 and maps PLAY and PLAYPAUSE to the same
/// keysym, so these buttons get low-numbered stand-ins.
#[cfg(feature = "x11-keycodes")]
mod output {
    use evdev::Key;

    pub const GREEN: Key = Key::KEY_HOMEPAGE;
    pub const YELLOW: Key = Key::KEY_BOOKMARKS;
    pub const PROGRAM: Key = Key::KEY_DOCUMENTS;
    pub const INFO: Key = Key::KEY_CONFIG;
    pub const LIST: Key = Key::KEY_OPEN;
    pub const TEXT: Key = Key::KEY_WWW;
    pub const PLAY: Key = Key::KEY_REWIND;
}

const CTRL: ModifierMask = ModifierMask::CTRL;
const ALT: ModifierMask = ModifierMask::ALT;
const CTRL_SHIFT: ModifierMask = ModifierMask::CTRL.with(ModifierFlag::Shift);
const ALT_META: ModifierMask = ModifierMask::ALT.with(ModifierFlag::Meta);
const NONE: ModifierMask = ModifierMask::EMPTY;

static MODIFIER_KEYS: [ModifierBinding; 4] = [
    ModifierBinding {
        key: Key::KEY_LEFTSHIFT,
        flag: ModifierFlag::Shift,
    },
    ModifierBinding {
        key: Key::KEY_LEFTCTRL,
        flag: ModifierFlag::Ctrl,
    },
    ModifierBinding {
        key: Key::KEY_LEFTALT,
        flag: ModifierFlag::Alt,
    },
    ModifierBinding {
        key: Key::KEY_LEFTMETA,
        flag: ModifierFlag::Meta,
    },
];

const fn chord(modifiers: ModifierMask, source: Key, output: Key) -> ChordRule {
    ChordRule { modifiers, source, output }
}

// Order matters: the first matching rule wins.
static CHORDS: [ChordRule; 12] = [
    chord(CTRL, Key::KEY_I, output::GREEN),
    chord(ALT, Key::KEY_TAB, output::YELLOW),
    chord(CTRL, Key::KEY_G, output::PROGRAM),
    chord(ALT_META, Key::KEY_ENTER, Key::KEY_MENU),
    chord(NONE, Key::BTN_RIGHT, output::INFO),
    chord(NONE, Key::KEY_F8, Key::KEY_MUTE),
    chord(CTRL, Key::KEY_O, output::LIST),
    chord(CTRL, Key::KEY_R, Key::KEY_RECORD),
    chord(CTRL_SHIFT, Key::KEY_P, output::PLAY),
    chord(CTRL_SHIFT, Key::KEY_S, Key::KEY_STOPCD),
    chord(CTRL, Key::KEY_P, Key::KEY_PLAYPAUSE),
    chord(CTRL_SHIFT, Key::KEY_T, output::TEXT),
];

/// Every key the remote can produce after translation, including the
/// buttons it already sends as plain keys.
static OUTPUT_KEYS: [Key; 34] = [
    output::GREEN,
    output::YELLOW,
    output::PROGRAM,
    Key::KEY_MENU,
    output::INFO,
    Key::KEY_VOLUMEUP,
    Key::KEY_VOLUMEDOWN,
    Key::KEY_ENTER,
    Key::KEY_UP,
    Key::KEY_DOWN,
    Key::KEY_LEFT,
    Key::KEY_RIGHT,
    Key::KEY_PAGEUP,
    Key::KEY_PAGEDOWN,
    Key::KEY_BACKSPACE,
    Key::KEY_MUTE,
    output::LIST,
    Key::KEY_RECORD,
    output::PLAY,
    Key::KEY_STOPCD,
    Key::KEY_PREVIOUSSONG,
    Key::KEY_PLAYPAUSE,
    Key::KEY_NEXTSONG,
    Key::KEY_1,
    Key::KEY_2,
    Key::KEY_3,
    Key::KEY_4,
    Key::KEY_5,
    Key::KEY_6,
    Key::KEY_7,
    Key::KEY_8,
    Key::KEY_9,
    Key::KEY_0,
    output::TEXT,
];

/// The translation table for the Holtek remote.
pub fn holtek_keymap() -> Keymap {
    Keymap {
        modifiers: &MODIFIER_KEYS,
        chords: &CHORDS,
        output_keys: &OUTPUT_KEYS,
    }
}
