//! holtek-translator daemon
//!
//! Grabs the Holtek remote's keyboard and mouse interfaces and re-emits its
//! modifier chords as single media keys on a virtual keyboard.

mod device;
mod error;
mod event;
mod event_loop;
mod injector;
mod remapper;

use anyhow::{Context, Result};
use clap::Parser;
use holtek_translator_keymap::{holtek_keymap, Keymap, HOLTEK_PATHS, VIRTUAL_DEVICE_NAME};
use tokio::signal::unix::{signal, SignalKind};
use tracing_subscriber::EnvFilter;

use crate::device::DeviceRole;
use crate::event_loop::Translators;
use crate::injector::VirtualDevice;

#[derive(Parser, Debug)]
#[command(name = "holtek-translator")]
#[command(about = "Translate Holtek remote key chords into media keys")]
#[command(version)]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Args {} = Args::parse();

    tracing::info!("holtek-translator {} starting", env!("CARGO_PKG_VERSION"));

    let keymap = holtek_keymap();
    check_keymap(&keymap)?;
    for rule in keymap.chords {
        tracing::debug!("Chord {}", rule);
    }

    // Both devices must be held before anything is emitted.
    let keyboard = device::open_grabbed(DeviceRole::Keyboard, HOLTEK_PATHS.keyboard())?;
    let mouse = device::open_grabbed(DeviceRole::Mouse, HOLTEK_PATHS.mouse())?;

    let keyboard = keyboard
        .into_event_stream()
        .context("Failed to watch the keyboard device")?;
    let mouse = mouse
        .into_event_stream()
        .context("Failed to watch the mouse device")?;

    let mut output = VirtualDevice::new_keyboard(VIRTUAL_DEVICE_NAME, keymap.output_keys())?;
    let mut translators = Translators::new(keymap);

    tokio::select! {
        result = event_loop::run(keyboard, mouse, &mut translators, &mut output) => {
            result.context("Translation stopped")?;
        }
        signal = shutdown_signal() => {
            let signal = signal.context("Failed to listen for shutdown signals")?;
            tracing::info!("Received {}, shutting down", signal);
        }
    }

    tracing::info!("Input devices released");

    Ok(())
}

/// Validate the keymap, keeping the diagnostic code and help in the error.
fn check_keymap(keymap: &Keymap) -> Result<()> {
    keymap.validate().map_err(|err| {
        let report = miette::Report::new(err);
        anyhow::anyhow!("Built-in keymap is inconsistent\n{:?}", report)
    })
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() -> std::io::Result<&'static str> {
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            Ok("SIGINT")
        }
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}
