//! Rotor engine crate.
//!
//! One reusable scene setup + frame driver pair for small spinning-geometry
//! demos. A demo is fully described by a [`driver::DemoConfig`]; the
//! [`window::Runtime`] owns the platform loop and the GPU context and drives
//! the frame driver once per redraw.

pub mod device;
pub mod driver;
pub mod error;
pub mod input;
pub mod logging;
pub mod math;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;

pub use error::{SetupError, ShaderStage};
