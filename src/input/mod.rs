//! Input devices — discovery, capability checks, event decoding.
//!
//! [`locator`] finds and opens at most a handful of evdev devices,
//! [`device`] owns the open non-blocking handles, and [`reader`] turns
//! their raw events into classification [`Signal`](crate::press::Signal)s
//! while tracking modifiers per device.

mod device;
mod locator;
mod modifier;
mod reader;

use std::future::Future;
use std::io;
use std::path::PathBuf;

use evdev::InputEvent;

pub use device::EvdevSource;
pub use locator::{DeviceLocator, UdevEnumerator};
pub use modifier::ModifierSet;
#[cfg(test)]
pub use modifier::Modifier;
pub use reader::DeviceReader;

/// Errors opening or reading a single device. Never fatal to the daemon.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("{path} has no power key, lid switch or meta hotkey")]
    Unsupported { path: PathBuf },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors from the device enumeration service.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("udev: {0}")]
    Udev(#[from] io::Error),
}

/// A pollable stream of raw input events.
///
/// `next_batch` waits until the source is readable and returns every
/// event buffered at that point. It may return an empty batch on a
/// spurious wake.
pub trait EventSource {
    fn next_batch(&mut self) -> impl Future<Output = io::Result<Vec<InputEvent>>>;
}
