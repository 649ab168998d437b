//! GPU device, surface and depth target.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue for one window
//! - configures the surface and keeps a matching depth buffer
//! - acquires, submits and presents frames

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
