//! Device reader — raw evdev events to classification signals.

use std::io;
use std::path::{Path, PathBuf};

use evdev::{EventSummary, InputEvent, KeyCode, SwitchCode};

use super::EventSource;
use super::modifier::ModifierTracker;
use crate::press::Signal;

/// Alternate hotkey; only counts while a meta key alone is held.
pub const HOTKEY: KeyCode = KeyCode::KEY_F16;

/// One open device and the modifier state of its keys.
pub struct DeviceReader<S> {
    path: PathBuf,
    source: S,
    modifiers: ModifierTracker,
}

impl<S: EventSource> DeviceReader<S> {
    pub fn new(path: PathBuf, source: S) -> Self {
        Self {
            path,
            source,
            modifiers: ModifierTracker::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the device and decode everything it has buffered.
    pub async fn next_signals(&mut self) -> io::Result<Vec<Signal>> {
        let events = self.source.next_batch().await?;
        Ok(events.iter().filter_map(|ev| self.decode(ev)).collect())
    }

    /// Decode one event, updating modifier state as a side effect.
    pub fn decode(&mut self, event: &InputEvent) -> Option<Signal> {
        match event.destructure() {
            EventSummary::Key(_, KeyCode::KEY_POWER, 1) => Some(Signal::PowerDown),
            EventSummary::Key(_, KeyCode::KEY_POWER, 0) => Some(Signal::PowerUp),
            EventSummary::Key(_, HOTKEY, 1) => Some(Signal::Hotkey(self.modifiers.held())),
            EventSummary::Key(_, code, value) => {
                self.modifiers.on_key_event(code, value);
                None
            }
            EventSummary::Switch(_, SwitchCode::SW_LID, 1) => Some(Signal::LidClosed),
            _ => None,
        }
    }
}
