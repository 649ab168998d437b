use std::collections::HashSet;

use super::types::{ButtonState, InputEvent, Key, KeyState, MouseButton};

/// Current input state for the demo window.
///
/// Mutated by the event callback, read by the frame driver at the top of each
/// tick. Both run on the event-loop thread.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,

    /// Primary-button clicks since the session started.
    pub clicks: u32,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Release events are not delivered to an unfocused window.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            // Repeats of a held key change nothing: the set already holds it.
            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    self.keys_down.insert(*key);
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::MouseButton { button, state } => match state {
                ButtonState::Pressed => {
                    let inserted = self.buttons_down.insert(*button);
                    if inserted && *button == MouseButton::Left {
                        self.clicks = self.clicks.wrapping_add(1);
                    }
                }
                ButtonState::Released => {
                    self.buttons_down.remove(button);
                }
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}
