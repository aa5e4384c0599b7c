//! Input device opening and enumeration

use std::fmt;
use std::path::{Path, PathBuf};

use evdev::Device;

use crate::error::DaemonError;

/// Which of the remote's two interfaces a device is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceRole {
    Keyboard,
    Mouse,
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceRole::Keyboard => f.write_str("keyboard"),
            DeviceRole::Mouse => f.write_str("mouse"),
        }
    }
}

/// Information about an input device
#[derive(Debug)]
pub struct DeviceInfo {
    pub path: PathBuf,
    pub name: String,
    pub vendor: u16,
    pub product: u16,
}

impl DeviceInfo {
    /// Get vendor:product string (e.g., "04d9:e000")
    pub fn vendor_product(&self) -> String {
        format!("{:04x}:{:04x}", self.vendor, self.product)
    }
}

fn is_event_node(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("event"))
        .unwrap_or(false)
}

/// Enumerate all input devices we are allowed to open
pub fn enumerate_devices() -> std::io::Result<Vec<DeviceInfo>> {
    let mut devices = Vec::new();

    for entry in std::fs::read_dir("/dev/input")? {
        let path = entry?.path();
        if !is_event_node(&path) {
            continue;
        }

        match Device::open(&path) {
            Ok(device) => {
                let id = device.input_id();
                devices.push(DeviceInfo {
                    name: device.name().unwrap_or("Unknown").to_string(),
                    path,
                    vendor: id.vendor(),
                    product: id.product(),
                });
            }
            Err(e) => {
                tracing::debug!("Could not open {}: {}", path.display(), e);
            }
        }
    }

    devices.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(devices)
}

/// Log the input devices that are present, to help locate a missing one.
fn log_available_devices() {
    match enumerate_devices() {
        Ok(devices) if devices.is_empty() => {
            tracing::warn!("No readable input devices under /dev/input");
        }
        Ok(devices) => {
            tracing::warn!("Readable input devices:");
            for info in devices {
                tracing::warn!(
                    "  {} [{}] {}",
                    info.path.display(),
                    info.vendor_product(),
                    info.name
                );
            }
        }
        Err(e) => tracing::debug!("Could not list /dev/input: {}", e),
    }
}

/// Open a device and grab it for exclusive access.
///
/// The grab lasts until the returned device (or the stream built from it)
/// is dropped, which closes the file descriptor.
pub fn open_grabbed(role: DeviceRole, path: &Path) -> Result<Device, DaemonError> {
    let mut device = Device::open(path).map_err(|source| {
        log_available_devices();
        DaemonError::DeviceOpen {
            role,
            path: path.to_path_buf(),
            source,
        }
    })?;

    device.grab().map_err(|source| DaemonError::DeviceGrab {
        role,
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "Grabbed {} device '{}' at {}",
        role,
        device.name().unwrap_or("Unknown"),
        path.display()
    );

    Ok(device)
}
