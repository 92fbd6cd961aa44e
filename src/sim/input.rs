//! Keyboard state for the paddle and the pause toggle
//!
//! Movement keys are level-triggered (held or not). Pause is edge-triggered:
//! auto-repeat key-downs while the key is held do not toggle again.

use serde::{Deserialize, Serialize};

/// Game keys, after resolving raw identifiers through the key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Pause,
}

/// One-shot actions produced by key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    TogglePause,
}

/// Held movement keys plus the pause latch
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    left_held: bool,
    right_held: bool,
    /// Set on the pause key-down that toggled, cleared on its key-up
    pause_latched: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) -> Option<InputAction> {
        match key {
            Key::Left => {
                self.left_held = true;
                None
            }
            Key::Right => {
                self.right_held = true;
                None
            }
            Key::Pause => {
                if self.pause_latched {
                    None
                } else {
                    self.pause_latched = true;
                    Some(InputAction::TogglePause)
                }
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left_held = false,
            Key::Right => self.right_held = false,
            Key::Pause => self.pause_latched = false,
        }
    }

    /// Forget every held key
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    pub fn left_held(&self) -> bool {
        self.left_held
    }

    pub fn right_held(&self) -> bool {
        self.right_held
    }

    /// Paddle direction for this frame; right wins when both are held
    pub fn direction(&self) -> f32 {
        if self.right_held {
            1.0
        } else if self.left_held {
            -1.0
        } else {
            0.0
        }
    }
}
