//! Error types for the translator daemon

use std::path::PathBuf;

use thiserror::Error;

use crate::device::DeviceRole;

/// Errors that stop the daemon.
///
/// None of these are recoverable: the translator must hold both devices
/// exclusively, so losing either one ends the process.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The input device node could not be opened
    #[error("Cannot open {role} device {path}: {source}")]
    DeviceOpen {
        role: DeviceRole,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input device could not be grabbed exclusively
    #[error("Cannot grab {role} device {path} - is another process holding it?")]
    DeviceGrab {
        role: DeviceRole,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from a grabbed device failed or its stream ended
    #[error("Lost {role} device: {source}")]
    DeviceLost {
        role: DeviceRole,
        #[source]
        source: std::io::Error,
    },

    /// The uinput device could not be created
    #[error("Cannot create virtual device '{name}' - is /dev/uinput writable?")]
    VirtualDevice {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the uinput device failed
    #[error("Error writing to the virtual device: {0}")]
    Emit(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use super::*;

    #[test]
    fn test_device_open_names_role_and_path() {
        let err = DaemonError::DeviceOpen {
            role: DeviceRole::Mouse,
            path: PathBuf::from("/dev/input/missing"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };

        let msg = err.to_string();
        assert!(msg.starts_with("Cannot open mouse device /dev/input/missing"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_device_lost_keeps_os_error() {
        let err = DaemonError::DeviceLost {
            role: DeviceRole::Keyboard,
            source: io::Error::from_raw_os_error(19),
        };

        assert!(err.to_string().starts_with("Lost keyboard device"));
        let source = err
            .source()
            .and_then(|e| e.downcast_ref::<io::Error>())
            .unwrap();
        assert_eq!(source.raw_os_error(), Some(19));
    }
}
