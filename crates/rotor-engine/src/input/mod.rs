//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types; the
//! runtime translates window events through [`platform::winit`]. All input is
//! delivered and read on the event-loop thread, so no state here is
//! synchronized.

mod movement;
pub mod platform;
mod state;
mod types;

pub use movement::{Direction, KeyBindings, Movement};
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, KeyState, MouseButton};
