use std::fmt;

/// Pipeline stage a shader diagnostic refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failures that stop a demo before its first frame.
///
/// All variants are terminal for the demo instance. Inputs (context
/// capabilities, shader text, asset files) are static, so none are retried.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    /// No window or compatible GPU context could be created.
    ContextUnavailable(String),

    /// A shader stage failed to parse or validate. `log` is the compiler output.
    ShaderCompileFailure { stage: ShaderStage, log: String },

    /// The compiled stages do not form a valid program with the bound
    /// geometry and resources. The message is the link log.
    ProgramLinkFailure(String),

    /// A texture or mesh asset could not be loaded or is malformed.
    AssetUnavailable { asset: String, reason: String },
}

impl SetupError {
    pub(crate) fn asset(asset: impl Into<String>, reason: impl fmt::Display) -> Self {
        SetupError::AssetUnavailable {
            asset: asset.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::ContextUnavailable(reason) => {
                write!(f, "rendering context unavailable: {reason}")
            }
            SetupError::ShaderCompileFailure { stage, log } => {
                write!(f, "{stage} shader not compiled:\n{log}")
            }
            SetupError::ProgramLinkFailure(log) => write!(f, "program not linked: {log}"),
            SetupError::AssetUnavailable { asset, reason } => {
                write!(f, "asset `{asset}` unavailable: {reason}")
            }
        }
    }
}

impl std::error::Error for SetupError {}
