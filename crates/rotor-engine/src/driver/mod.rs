//! Per-demo configuration and the frame driver.
//!
//! A demo is data: [`DemoConfig`] says what to draw and how it moves. The
//! [`FrameDriver`] turns elapsed time and input into a [`FramePlan`] each
//! refresh without touching the GPU; `render::Scene` executes the plan.

mod config;
mod frame_driver;
mod plan;
mod state;

pub use config::{DemoConfig, Motion, ObjectDescriptor, Spin, ViewConfig};
pub use frame_driver::FrameDriver;
pub use plan::{DrawCall, FramePlan};
pub use state::SessionState;
