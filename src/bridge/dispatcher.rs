//! # Button Dispatcher
//!
//! Fixed table from button press edges to actions. Releases are ignored.
//!
//! | Button | Action |
//! |--------|--------|
//! | Left shoulder | Save preset |
//! | Right shoulder | Recall preset |
//! | North (Y) | Rumble, then screenshot |
//! | South (A) | Toggle light |
//! | Guide | Quit |

use crate::controller::Button;

/// What a button press asks the bridge to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PresetSave,
    PresetRecall,
    Screenshot,
    /// Light toggled; carries the new state to send.
    LightToggle(bool),
    Quit,
}

/// Maps button presses to actions and tracks the light state bit.
#[derive(Debug, Default)]
pub struct ButtonDispatcher {
    light_on: bool,
}

impl ButtonDispatcher {
    /// Light starts off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last light state handed out by a toggle.
    #[must_use]
    pub fn light_on(&self) -> bool {
        self.light_on
    }

    /// Handles a press edge. Flips the light bit for the toggle button.
    pub fn on_press(&mut self, button: Button) -> Option<Action> {
        let action = match button {
            Button::LeftShoulder => Action::PresetSave,
            Button::RightShoulder => Action::PresetRecall,
            Button::North => Action::Screenshot,
            Button::South => {
                self.light_on = !self.light_on;
                Action::LightToggle(self.light_on)
            }
            Button::Mode => Action::Quit,
            _ => return None,
        };
        Some(action)
    }
}
