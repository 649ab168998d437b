//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the demo window, and wires them to the GPU
//! layer, the scene and the frame driver.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
