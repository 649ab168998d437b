use std::borrow::Cow;

use crate::{SetupError, ShaderStage};

/// Entry point every vertex shader must export.
pub const VERTEX_ENTRY: &str = "vs_main";

/// Entry point every fragment shader must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// A vertex/fragment pair of WGSL texts.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSource {
    pub label: Cow<'static, str>,
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl ShaderSource {
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        vertex: impl Into<Cow<'static, str>>,
        fragment: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            label: label.into(),
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Parses and validates one stage.
///
/// Errors carry the compiler diagnostic rendered against the source text.
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<naga::Module, SetupError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| {
        SetupError::ShaderCompileFailure {
            stage,
            log: e.emit_to_string(source),
        }
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    );
    validator
        .validate(&module)
        .map_err(|e| SetupError::ShaderCompileFailure {
            stage,
            log: e.emit_to_string(source),
        })?;

    Ok(module)
}
