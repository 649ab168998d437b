//! Demo presets for rotor-engine.
//!
//! Each binary in `src/bin` runs one preset. The presets are plain
//! [`DemoConfig`](rotor_engine::driver::DemoConfig) values, so they are
//! tested here without a window or GPU.

pub mod presets;
pub mod shaders;

use anyhow::Result;
use rotor_engine::device::GpuInit;
use rotor_engine::driver::DemoConfig;
use rotor_engine::logging::{init_logging, LoggingConfig};
use rotor_engine::window::{Runtime, RuntimeConfig};

/// Shared `main` body: logging, window titled after the demo, default GPU setup.
pub fn run(demo: DemoConfig) -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("starting demo '{}'", demo.name);

    let config = RuntimeConfig {
        title: format!("rotor · {}", demo.name),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), demo)
}
