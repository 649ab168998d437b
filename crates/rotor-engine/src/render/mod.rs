//! GPU side of a demo: shader validation, resources, and frame submission.
//!
//! Convention:
//! - group 0 holds uniforms: binding 0 transforms (`mWorld`, `mView`,
//!   `mProjection`), binding 1 lighting (`ambient`, `lightDirection`, `lightColor`)
//! - group 1 holds the texture at binding 0 and its sampler at binding 1
//! - vertex inputs use the fixed locations of [`crate::scene::Attribute`]

mod link;
mod scene;
mod shader;
mod texture;
mod uniforms;

pub use link::{link_program, BindingSlot, LinkedProgram};
pub use scene::Scene;
pub use shader::{compile_stage, ShaderSource, FRAGMENT_ENTRY, VERTEX_ENTRY};
pub use texture::{DecodedImage, GpuTexture, TextureSource};
pub use uniforms::{LightingUniform, TransformUniform};
