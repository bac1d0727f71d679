//! Modifier tracking — which qualifier keys are held on one device.
//!
//! Pure state. Each [`DeviceReader`](super::DeviceReader) owns one
//! tracker, so a chord only counts when every key of it comes from the
//! same device.

use std::fmt;

use evdev::KeyCode;

/// A qualifier key, left and right sides distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    LeftMeta,
    RightMeta,
}

impl Modifier {
    /// Map an evdev key code to the modifier it represents, if any.
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KEY_LEFTSHIFT => Some(Self::LeftShift),
            KeyCode::KEY_RIGHTSHIFT => Some(Self::RightShift),
            KeyCode::KEY_LEFTCTRL => Some(Self::LeftCtrl),
            KeyCode::KEY_RIGHTCTRL => Some(Self::RightCtrl),
            KeyCode::KEY_LEFTALT => Some(Self::LeftAlt),
            KeyCode::KEY_RIGHTALT => Some(Self::RightAlt),
            KeyCode::KEY_LEFTMETA => Some(Self::LeftMeta),
            KeyCode::KEY_RIGHTMETA => Some(Self::RightMeta),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of held modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierSet(u8);

impl ModifierSet {
    const META: u8 = (1 << Modifier::LeftMeta as u8) | (1 << Modifier::RightMeta as u8);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    pub fn remove(&mut self, modifier: Modifier) {
        self.0 &= !modifier.bit();
    }

    #[cfg(test)]
    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    #[cfg(test)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when at least one meta key is held and nothing else is.
    pub fn is_meta_only(self) -> bool {
        self.0 & Self::META != 0 && self.0 & !Self::META == 0
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut set = Self::empty();
        for modifier in iter {
            set.insert(modifier);
        }
        set
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// Per-device modifier state.
#[derive(Debug, Default)]
pub struct ModifierTracker {
    held: ModifierSet,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one key event and return the resulting set.
    ///
    /// `value > 0` (press or autorepeat) marks the modifier held,
    /// `value == 0` releases it. Keys that are not modifiers leave the
    /// set unchanged.
    pub fn on_key_event(&mut self, code: KeyCode, value: i32) -> ModifierSet {
        if let Some(modifier) = Modifier::from_key(code) {
            if value > 0 {
                self.held.insert(modifier);
            } else if value == 0 {
                self.held.remove(modifier);
            }
        }
        self.held
    }

    pub fn held(&self) -> ModifierSet {
        self.held
    }
}
