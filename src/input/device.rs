//! Open evdev handles — capability validation and non-blocking reads.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use evdev::{Device, InputEvent, KeyCode, SwitchCode};
use nix::fcntl::OFlag;
use tokio::io::unix::AsyncFd;

use super::reader::HOTKEY;
use super::{DeviceError, EventSource};

/// Which of the recognised inputs a device advertises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub power_key: bool,
    pub lid_switch: bool,
    /// Both left meta and the alternate hotkey.
    pub meta_hotkey: bool,
}

impl Capabilities {
    pub fn of(device: &Device) -> Self {
        let keys = device.supported_keys();
        let has_key = |code: KeyCode| keys.is_some_and(|keys| keys.contains(code));
        let lid_switch = device
            .supported_switches()
            .is_some_and(|switches| switches.contains(SwitchCode::SW_LID));

        Self {
            power_key: has_key(KeyCode::KEY_POWER),
            lid_switch,
            meta_hotkey: has_key(KeyCode::KEY_LEFTMETA) && has_key(HOTKEY),
        }
    }

    /// A device is worth watching if it can produce any gesture.
    pub fn is_candidate(self) -> bool {
        self.power_key || self.lid_switch || self.meta_hotkey
    }
}

/// A validated, non-blocking evdev device registered with the reactor.
pub struct EvdevSource {
    path: PathBuf,
    fd: AsyncFd<Device>,
}

impl EvdevSource {
    /// Open `path` read-only and non-blocking, then check its capabilities.
    ///
    /// Must be called from within the tokio runtime.
    pub fn open(path: &Path) -> Result<Self, DeviceError> {
        let device = open_nonblocking(path)
            .and_then(|file| Device::from_fd(file.into()))
            .map_err(|source| DeviceError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let caps = Capabilities::of(&device);
        if !caps.is_candidate() {
            return Err(DeviceError::Unsupported {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(
            path = %path.display(),
            name = device.name().unwrap_or("unknown"),
            power_key = caps.power_key,
            lid_switch = caps.lid_switch,
            meta_hotkey = caps.meta_hotkey,
            "opened input device"
        );

        Ok(Self {
            path: path.to_path_buf(),
            fd: AsyncFd::new(device)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for EvdevSource {
    async fn next_batch(&mut self) -> io::Result<Vec<InputEvent>> {
        loop {
            let mut guard = self.fd.readable_mut().await?;
            match guard.try_io(|inner| drain(inner.get_mut())) {
                Ok(result) => return result,
                // Readiness was stale; cleared by try_io, wait again.
                Err(_would_block) => continue,
            }
        }
    }
}

/// Read until the kernel has nothing more buffered.
///
/// `SYN_DROPPED` resynchronisation happens inside `fetch_events`.
/// Returns `WouldBlock` only when nothing at all was read.
fn drain(device: &mut Device) -> io::Result<Vec<InputEvent>> {
    let mut events = Vec::new();
    loop {
        match device.fetch_events() {
            Ok(batch) => {
                let before = events.len();
                events.extend(batch);
                if events.len() == before {
                    return Ok(events);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock && !events.is_empty() => {
                return Ok(events);
            }
            Err(e) => return Err(e),
        }
    }
}

fn open_nonblocking(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .custom_flags(OFlag::O_NONBLOCK.bits())
        .open(path)
}
