//! Chord mapping table for the Holtek remote translator
//!
//! This crate holds the static data the daemon translates with: which keys
//! are modifiers, which modifier chords become which media key, and the keys
//! the virtual output device advertises.

mod error;
mod model;
mod table;
mod validate;

pub use error::KeymapError;
pub use model::*;
pub use table::{holtek_keymap, HOLTEK_PATHS, VIRTUAL_DEVICE_NAME};
