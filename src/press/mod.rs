//! Press classification — short vs. long power presses.
//!
//! [`PressClassifier`] is the process-wide gesture state machine. It sees
//! decoded [`Signal`]s from every device plus deadline expiry, and answers
//! with the [`Action`] the event loop must perform. It holds no clock;
//! the deadline itself lives in [`GestureTimer`].

mod timer;

use std::fmt;

use crate::input::ModifierSet;

pub use timer::GestureTimer;

/// Classified gesture, forwarded to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Short,
    Long,
}

impl Gesture {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded input event relevant to classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Power key pressed (value 1).
    PowerDown,
    /// Power key released (value 0).
    PowerUp,
    /// Lid switch closed (value 1).
    LidClosed,
    /// Alternate hotkey pressed, with the modifiers held on the same device.
    Hotkey(ModifierSet),
}

/// What the event loop must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Arm the hold deadline, replacing any pending one.
    ArmTimer,
    /// Cancel the deadline and dispatch the gesture.
    Dispatch(Gesture),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    PressActive,
}

/// Gesture state machine shared by all devices.
#[derive(Debug)]
pub struct PressClassifier {
    state: State,
}

impl PressClassifier {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    pub fn is_active(&self) -> bool {
        self.state == State::PressActive
    }

    /// Apply one decoded signal.
    pub fn on_signal(&mut self, signal: Signal) -> Option<Action> {
        match signal {
            Signal::PowerDown => {
                self.state = State::PressActive;
                Some(Action::ArmTimer)
            }
            Signal::PowerUp => self.resolve(Gesture::Short),
            // Lid closing always means suspend, whatever the button is doing.
            Signal::LidClosed => self.force(Gesture::Short),
            Signal::Hotkey(modifiers) if modifiers.is_meta_only() => self.force(Gesture::Long),
            Signal::Hotkey(modifiers) => {
                tracing::debug!(%modifiers, "hotkey ignored: modifier chord is not meta only");
                None
            }
        }
    }

    /// Hold deadline elapsed. A deadline outliving its gesture is a no-op.
    pub fn on_expiry(&mut self) -> Option<Action> {
        self.resolve(Gesture::Long)
    }

    /// Resolve the active press, if there is one.
    fn resolve(&mut self, gesture: Gesture) -> Option<Action> {
        if self.state == State::PressActive {
            self.force(gesture)
        } else {
            None
        }
    }

    fn force(&mut self, gesture: Gesture) -> Option<Action> {
        self.state = State::Idle;
        Some(Action::Dispatch(gesture))
    }
}

impl Default for PressClassifier {
    fn default() -> Self {
        Self::new()
    }
}
