use std::collections::BTreeMap;

use naga::{
    AddressSpace, Binding, ImageClass, ImageDimension, Module, ScalarKind, TypeInner, VectorSize,
};

use super::shader::{compile_stage, ShaderSource, FRAGMENT_ENTRY, VERTEX_ENTRY};
use super::uniforms::{LightingUniform, TransformUniform};
use crate::scene::VertexLayout;
use crate::{SetupError, ShaderStage};

/// Resource slots a scene can provide to its shaders.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BindingSlot {
    Transforms,
    Lighting,
    Texture,
    Sampler,
}

impl BindingSlot {
    /// `(group, binding)` pair used in WGSL.
    pub const fn location(self) -> (u32, u32) {
        match self {
            BindingSlot::Transforms => (0, 0),
            BindingSlot::Lighting => (0, 1),
            BindingSlot::Texture => (1, 0),
            BindingSlot::Sampler => (1, 1),
        }
    }

    /// Byte size of the uniform bound at this slot; zero for non-buffer slots.
    pub const fn max_uniform_size(self) -> u32 {
        match self {
            BindingSlot::Transforms => size_of::<TransformUniform>() as u32,
            BindingSlot::Lighting => size_of::<LightingUniform>() as u32,
            BindingSlot::Texture | BindingSlot::Sampler => 0,
        }
    }

    fn from_location(group: u32, binding: u32) -> Option<Self> {
        [
            BindingSlot::Transforms,
            BindingSlot::Lighting,
            BindingSlot::Texture,
            BindingSlot::Sampler,
        ]
        .into_iter()
        .find(|slot| slot.location() == (group, binding))
    }
}

/// Both stages compiled and checked against each other, the vertex layout,
/// and the resources the scene provides.
#[derive(Debug)]
pub struct LinkedProgram {
    pub vertex: Module,
    pub fragment: Module,
    /// Slots referenced by either stage.
    pub used: Vec<BindingSlot>,
}

impl LinkedProgram {
    pub fn uses(&self, slot: BindingSlot) -> bool {
        self.used.contains(&slot)
    }
}

/// Compiles both stages, then checks the program can be assembled:
/// entry points exist, fragment inputs are produced by the vertex stage,
/// vertex inputs are fed by `layout`, and every resource is in `provided`.
pub fn link_program(
    source: &ShaderSource,
    layout: &VertexLayout,
    provided: &[BindingSlot],
) -> Result<LinkedProgram, SetupError> {
    let vertex = compile_stage(ShaderStage::Vertex, &source.vertex)?;
    let fragment = compile_stage(ShaderStage::Fragment, &source.fragment)?;

    let vs = entry_point(&vertex, VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
    let fs = entry_point(&fragment, FRAGMENT_ENTRY, naga::ShaderStage::Fragment)?;

    // vertex inputs <- layout
    for (location, inner) in arguments(&vertex, vs) {
        let wanted = float_components(&inner).ok_or_else(|| {
            SetupError::ProgramLinkFailure(format!(
                "vertex input @location({location}) is not a float scalar or vector"
            ))
        })?;
        match layout.components_at(location) {
            Some(have) if have == wanted => {}
            Some(have) => {
                return Err(SetupError::ProgramLinkFailure(format!(
                    "vertex input @location({location}) reads {wanted} components, geometry provides {have}"
                )));
            }
            None => {
                return Err(SetupError::ProgramLinkFailure(format!(
                    "vertex input @location({location}) has no matching geometry attribute"
                )));
            }
        }
    }

    // fragment inputs <- vertex outputs
    let produced = result_locations(&vertex, vs);
    for (location, inner) in arguments(&fragment, fs) {
        match produced.get(&location) {
            Some(out) if *out == inner => {}
            Some(_) => {
                return Err(SetupError::ProgramLinkFailure(format!(
                    "varying @location({location}) differs in type between stages"
                )));
            }
            None => {
                return Err(SetupError::ProgramLinkFailure(format!(
                    "fragment input @location({location}) is not written by the vertex stage"
                )));
            }
        }
    }

    if !result_locations(&fragment, fs).contains_key(&0) {
        return Err(SetupError::ProgramLinkFailure(
            "fragment stage does not write @location(0)".into(),
        ));
    }

    let mut used = Vec::new();
    for (stage, module) in [(ShaderStage::Vertex, &vertex), (ShaderStage::Fragment, &fragment)] {
        for (_, global) in module.global_variables.iter() {
            let Some(rb) = &global.binding else { continue };
            let name = global.name.as_deref().unwrap_or("<unnamed>");
            let slot = BindingSlot::from_location(rb.group, rb.binding)
                .filter(|slot| provided.contains(slot))
                .ok_or_else(|| {
                    SetupError::ProgramLinkFailure(format!(
                        "`{name}` at @group({}) @binding({}) is not provided by this scene",
                        rb.group, rb.binding
                    ))
                })?;
            check_resource(module, global, slot, stage).map_err(|reason| {
                SetupError::ProgramLinkFailure(format!("{stage} `{name}`: {reason}"))
            })?;
            if !used.contains(&slot) {
                used.push(slot);
            }
        }
    }

    log::debug!("linked program '{}' using {:?}", source.label, used);

    Ok(LinkedProgram {
        vertex,
        fragment,
        used,
    })
}

/// Checks a bound global against the resource the scene puts in `slot`.
fn check_resource(
    module: &Module,
    global: &naga::GlobalVariable,
    slot: BindingSlot,
    stage: ShaderStage,
) -> Result<(), String> {
    let inner = &module.types[global.ty].inner;
    match slot {
        BindingSlot::Transforms | BindingSlot::Lighting => {
            if global.space != AddressSpace::Uniform {
                return Err(format!("{slot:?} slot holds a uniform buffer"));
            }
            let size = inner.size(module.to_ctx());
            if size > slot.max_uniform_size() {
                return Err(format!(
                    "reads {size} bytes, {slot:?} uniform holds {}",
                    slot.max_uniform_size()
                ));
            }
        }
        BindingSlot::Texture | BindingSlot::Sampler => {
            // texture layout entries are visible to the fragment stage only
            if stage != ShaderStage::Fragment {
                return Err(format!("{slot:?} is only bound for the fragment stage"));
            }
            let fits = match (slot, inner) {
                (
                    BindingSlot::Texture,
                    TypeInner::Image {
                        dim: ImageDimension::D2,
                        arrayed: false,
                        class:
                            ImageClass::Sampled {
                                kind: ScalarKind::Float,
                                multi: false,
                            },
                    },
                ) => true,
                (BindingSlot::Sampler, TypeInner::Sampler { comparison: false }) => true,
                _ => false,
            };
            if !fits {
                return Err(match slot {
                    BindingSlot::Texture => "Texture slot holds a texture_2d<f32>".to_owned(),
                    _ => "Sampler slot holds a filtering sampler".to_owned(),
                });
            }
        }
    }
    Ok(())
}

fn entry_point<'m>(
    module: &'m Module,
    name: &str,
    stage: naga::ShaderStage,
) -> Result<&'m naga::Function, SetupError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .map(|ep| &ep.function)
        .ok_or_else(|| {
            SetupError::ProgramLinkFailure(format!("missing {stage:?} entry point `{name}`"))
        })
}

/// Location-bound inputs, flattening struct arguments.
fn arguments(module: &Module, function: &naga::Function) -> Vec<(u32, TypeInner)> {
    let mut out = Vec::new();
    for arg in &function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

fn result_locations(module: &Module, function: &naga::Function) -> BTreeMap<u32, TypeInner> {
    let mut out = Vec::new();
    if let Some(result) = &function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out.into_iter().collect()
}

fn collect_locations(
    module: &Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut Vec<(u32, TypeInner)>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.push((*location, module.types[ty].inner.clone()));
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn float_components(inner: &TypeInner) -> Option<u32> {
    match inner {
        TypeInner::Scalar(s) if s.kind == ScalarKind::Float && s.width == 4 => Some(1),
        TypeInner::Vector { size, scalar } if scalar.kind == ScalarKind::Float && scalar.width == 4 => {
            Some(match size {
                VectorSize::Bi => 2,
                VectorSize::Tri => 3,
                VectorSize::Quad => 4,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shapes;

    const COLOR_VS: &str = r#"
        struct Transforms {
            mWorld: mat4x4<f32>,
            mView: mat4x4<f32>,
            mProjection: mat4x4<f32>,
        };
        @group(0) @binding(0) var<uniform> transforms: Transforms;

        struct VertexOut {
            @builtin(position) clip: vec4<f32>,
            @location(0) color: vec3<f32>,
        };

        @vertex
        fn vs_main(@location(0) pos: vec3<f32>, @location(1) color: vec3<f32>) -> VertexOut {
            var o: VertexOut;
            o.clip = transforms.mProjection * transforms.mView * transforms.mWorld * vec4<f32>(pos, 1.0);
            o.color = color;
            return o;
        }
    "#;

    const COLOR_FS: &str = r#"
        @fragment
        fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
            return vec4<f32>(color, 1.0);
        }
    "#;

    fn source(vs: &str, fs: &str) -> ShaderSource {
        ShaderSource::new("test", vs.to_owned(), fs.to_owned())
    }

    fn link_failure(result: Result<LinkedProgram, SetupError>) -> String {
        match result {
            Err(SetupError::ProgramLinkFailure(msg)) => msg,
            other => panic!("expected link failure, got {other:?}"),
        }
    }

    // ── success ─────────────────────────────────────────────────────────

    #[test]
    fn color_program_links_against_triangle() {
        let layout = shapes::triangle().layout();
        let program =
            link_program(&source(COLOR_VS, COLOR_FS), &layout, &[BindingSlot::Transforms]).unwrap();
        assert!(program.uses(BindingSlot::Transforms));
        assert!(!program.uses(BindingSlot::Lighting));
    }

    #[test]
    fn unused_provided_slots_are_fine() {
        let layout = shapes::triangle().layout();
        let provided = [BindingSlot::Transforms, BindingSlot::Lighting];
        assert!(link_program(&source(COLOR_VS, COLOR_FS), &layout, &provided).is_ok());
    }

    // ── failures ────────────────────────────────────────────────────────

    #[test]
    fn compile_error_surfaces_before_link() {
        let broken = COLOR_FS.replace("vec4<f32>(color", "vec4<f32>(colour");
        let layout = shapes::triangle().layout();
        let result = link_program(&source(COLOR_VS, &broken), &layout, &[BindingSlot::Transforms]);
        assert!(matches!(
            result,
            Err(SetupError::ShaderCompileFailure {
                stage: ShaderStage::Fragment,
                ..
            })
        ));
    }

    #[test]
    fn missing_entry_point() {
        let renamed = COLOR_FS.replace("fs_main", "main");
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(
            &source(COLOR_VS, &renamed),
            &layout,
            &[BindingSlot::Transforms],
        ));
        assert!(msg.contains("fs_main"));
    }

    #[test]
    fn fragment_input_not_written_by_vertex() {
        let fs = r#"
            @fragment
            fn fs_main(@location(3) n: vec3<f32>) -> @location(0) vec4<f32> {
                return vec4<f32>(n, 1.0);
            }
        "#;
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(COLOR_VS, fs), &layout, &[BindingSlot::Transforms]));
        assert!(msg.contains("@location(3)"));
    }

    #[test]
    fn varying_type_mismatch() {
        let fs = r#"
            @fragment
            fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
                return color;
            }
        "#;
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(COLOR_VS, fs), &layout, &[BindingSlot::Transforms]));
        assert!(msg.contains("differs"));
    }

    #[test]
    fn vertex_input_without_geometry_attribute() {
        // triangle has no normals at location 3
        let vs = r#"
            @vertex
            fn vs_main(@location(0) pos: vec3<f32>, @location(3) n: vec3<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(pos + n, 1.0);
            }
        "#;
        let fs = r#"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0);
            }
        "#;
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(vs, fs), &layout, &[]));
        assert!(msg.contains("@location(3)"));
    }

    #[test]
    fn vertex_input_component_mismatch() {
        let vs = r#"
            @vertex
            fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(pos, 0.0, 1.0);
            }
        "#;
        let fs = r#"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0);
            }
        "#;
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(vs, fs), &layout, &[]));
        assert!(msg.contains("provides 3"));
    }

    #[test]
    fn resource_not_provided() {
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(COLOR_VS, COLOR_FS), &layout, &[]));
        assert!(msg.contains("transforms"));
    }

    #[test]
    fn unknown_binding_slot() {
        let fs = r#"
            @group(2) @binding(0) var<uniform> tint: vec4<f32>;
            @fragment
            fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
                return vec4<f32>(color, 1.0) * tint;
            }
        "#;
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(COLOR_VS, fs), &layout, &[BindingSlot::Transforms]));
        assert!(msg.contains("@group(2)"));
    }

    // ── resource kinds ──────────────────────────────────────────────────

    const ALL: [BindingSlot; 4] = [
        BindingSlot::Transforms,
        BindingSlot::Lighting,
        BindingSlot::Texture,
        BindingSlot::Sampler,
    ];

    fn color_fs_with(decl: &str, body: &str) -> String {
        format!(
            "{decl}\n@fragment\nfn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {{\n{body}\n}}"
        )
    }

    #[test]
    fn sampled_texture_in_fragment_links() {
        let fs = color_fs_with(
            "@group(1) @binding(0) var tex: texture_2d<f32>;\n@group(1) @binding(1) var samp: sampler;",
            "return textureSample(tex, samp, color.xy) * vec4<f32>(color, 1.0);",
        );
        let layout = shapes::triangle().layout();
        let program = link_program(&source(COLOR_VS, &fs), &layout, &ALL).unwrap();
        assert!(program.uses(BindingSlot::Texture));
        assert!(program.uses(BindingSlot::Sampler));
    }

    #[test]
    fn texture_declared_at_uniform_slot_fails() {
        let vs = COLOR_VS.replace(
            "@group(0) @binding(0) var<uniform> transforms: Transforms;",
            "@group(0) @binding(0) var<uniform> transforms: Transforms;\n@group(0) @binding(1) var light_tex: texture_2d<f32>;",
        );
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(&vs, COLOR_FS), &layout, &ALL));
        assert!(msg.contains("light_tex"), "{msg}");
        assert!(msg.contains("uniform buffer"), "{msg}");
    }

    #[test]
    fn uniform_declared_at_texture_slot_fails() {
        let fs = color_fs_with(
            "@group(1) @binding(0) var<uniform> tint: vec4<f32>;",
            "return vec4<f32>(color, 1.0) * tint;",
        );
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(COLOR_VS, &fs), &layout, &ALL));
        assert!(msg.contains("texture_2d<f32>"), "{msg}");
    }

    #[test]
    fn comparison_sampler_fails() {
        let fs = color_fs_with(
            "@group(1) @binding(0) var tex: texture_depth_2d;\n@group(1) @binding(1) var samp: sampler_comparison;",
            "let d = textureSampleCompare(tex, samp, color.xy, 0.5);\nreturn vec4<f32>(color * d, 1.0);",
        );
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(COLOR_VS, &fs), &layout, &ALL));
        assert!(msg.contains("Texture slot") || msg.contains("Sampler slot"), "{msg}");
    }

    #[test]
    fn texture_in_vertex_stage_fails() {
        let vs = COLOR_VS.replace(
            "@group(0) @binding(0) var<uniform> transforms: Transforms;",
            "@group(0) @binding(0) var<uniform> transforms: Transforms;\n@group(1) @binding(0) var tex: texture_2d<f32>;",
        );
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(&vs, COLOR_FS), &layout, &ALL));
        assert!(msg.starts_with("vertex"), "{msg}");
        assert!(msg.contains("fragment stage"), "{msg}");
    }

    #[test]
    fn uniform_larger_than_bound_buffer_fails() {
        let fs = color_fs_with(
            "@group(0) @binding(1) var<uniform> light: array<vec4<f32>, 4>;",
            "return vec4<f32>(color, 1.0) * light[0];",
        );
        let layout = shapes::triangle().layout();
        let msg = link_failure(link_program(&source(COLOR_VS, &fs), &layout, &ALL));
        assert!(msg.contains("64 bytes"), "{msg}");
        assert!(msg.contains("48"), "{msg}");
    }

    #[test]
    fn uniform_sizes_match_gpu_structs() {
        assert_eq!(BindingSlot::Transforms.max_uniform_size(), 192);
        assert_eq!(BindingSlot::Lighting.max_uniform_size(), 48);
    }
}
