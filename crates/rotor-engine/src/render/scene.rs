use glam::Mat4;
use wgpu::util::DeviceExt;

use super::link::{link_program, BindingSlot};
use super::shader::{FRAGMENT_ENTRY, VERTEX_ENTRY};
use super::texture::{DecodedImage, GpuTexture};
use super::uniforms::{LightingUniform, TransformUniform};
use crate::device::{Gpu, GpuFrame};
use crate::driver::{DemoConfig, FramePlan};
use crate::math::Transform;
use crate::scene::{DrawCount, GeometryBuffer};
use crate::SetupError;

/// GPU resources for one demo: one pipeline, one vertex buffer, an optional
/// index buffer, uniforms, and an optional texture. Created once and kept for
/// the whole session.
pub struct Scene {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    transform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: Option<wgpu::BindGroup>,
    _lighting_buffer: Option<wgpu::Buffer>,
    _texture: Option<GpuTexture>,
    projection: Mat4,
}

impl Scene {
    /// Compiles and links the shaders, uploads geometry and texture, and sets
    /// the initial uniforms.
    ///
    /// `texture` must be the decoded form of `config.texture` when the demo is
    /// textured.
    pub fn build(
        gpu: &Gpu<'_>,
        config: &DemoConfig,
        geometry: &GeometryBuffer,
        texture: Option<&DecodedImage>,
    ) -> Result<Self, SetupError> {
        geometry
            .validate()
            .map_err(|e| SetupError::asset("scene geometry", e))?;

        let layout = geometry.layout();
        let mut provided = config.provided_slots();
        if texture.is_none() {
            provided.retain(|s| !matches!(s, BindingSlot::Texture | BindingSlot::Sampler));
        }
        let program = link_program(&config.shaders, &layout, &provided).inspect_err(|e| {
            log::error!("scene '{}': {e}", config.name);
        })?;

        let device = gpu.device();
        let queue = gpu.queue();

        // ── uniforms (group 0) ───────────────────────────────────────────
        let size = gpu.size();
        let projection = config
            .projection
            .for_size(size.width, size.height)
            .unwrap_or(Mat4::IDENTITY);
        let initial = Transform::new(config.initial_view(), projection);

        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("rotor transforms"),
            contents: bytemuck::bytes_of(&TransformUniform::from(&initial)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let lighting_buffer = config.lighting.as_ref().map(|lighting| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("rotor lighting"),
                contents: bytemuck::bytes_of(&LightingUniform::from(lighting)),
                usage: wgpu::BufferUsages::UNIFORM,
            })
        });

        let mut uniform_entries = vec![uniform_layout_entry(0)];
        if lighting_buffer.is_some() {
            uniform_entries.push(uniform_layout_entry(1));
        }
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("rotor uniform layout"),
            entries: &uniform_entries,
        });

        let mut uniform_bindings = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: transform_buffer.as_entire_binding(),
        }];
        if let Some(buffer) = &lighting_buffer {
            uniform_bindings.push(wgpu::BindGroupEntry {
                binding: 1,
                resource: buffer.as_entire_binding(),
            });
        }
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("rotor uniforms"),
            layout: &uniform_layout,
            entries: &uniform_bindings,
        });

        // ── texture (group 1) ────────────────────────────────────────────
        let gpu_texture = texture.map(|image| GpuTexture::upload(device, queue, image, gpu.surface_format()));
        let texture_layout = gpu_texture.as_ref().map(|_| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("rotor texture layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            })
        });
        let texture_bind_group = gpu_texture
            .as_ref()
            .zip(texture_layout.as_ref())
            .map(|(tex, layout)| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("rotor texture"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&tex.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&tex.sampler),
                        },
                    ],
                })
            });

        // ── pipeline ─────────────────────────────────────────────────────
        let mut bind_group_layouts = vec![&uniform_layout];
        if let Some(layout) = &texture_layout {
            bind_group_layouts.push(layout);
        }
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("rotor pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = validated(device, "render pipeline", || {
            create_pipeline(gpu, config, &pipeline_layout, &layout)
        })
        .map_err(SetupError::ProgramLinkFailure)
        .inspect_err(|e| log::error!("scene '{}': {e}", config.name))?;

        // ── geometry ─────────────────────────────────────────────────────
        let vertices = geometry.interleaved();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("rotor vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_buffer = geometry.indices().map(|indices| {
            // COPY_BUFFER_ALIGNMENT: pad u16 indices to a multiple of 4 bytes.
            let mut padded = indices.to_vec();
            if padded.len() % 2 == 1 {
                padded.push(0);
            }
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("rotor indices"),
                contents: bytemuck::cast_slice(&padded),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        log::info!(
            "scene '{}' ready: {} vertices, {:?}, slots {:?}",
            config.name,
            geometry.vertex_count(),
            geometry.draw_count(),
            program.used
        );

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            transform_buffer,
            uniform_bind_group,
            texture_bind_group,
            _lighting_buffer: lighting_buffer,
            _texture: gpu_texture,
            projection,
        })
    }

    /// Replaces the projection used by subsequent frames.
    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Executes `plan` into `frame`, then presents it.
    ///
    /// Each draw gets its own submission so its vertex upload and world matrix
    /// are observed by that draw only. The first pass clears color and depth;
    /// later passes load them.
    pub fn render(&self, gpu: &Gpu<'_>, frame: GpuFrame, plan: &FramePlan) {
        let queue = gpu.queue();

        if plan.draws.is_empty() {
            let mut encoder = gpu.create_encoder("rotor clear");
            drop(self.begin_pass(&mut encoder, gpu, &frame, plan, true));
            gpu.submit(encoder);
        }

        for (i, draw) in plan.draws.iter().enumerate() {
            if let Some(vertices) = &draw.upload {
                queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
            }
            let transform = Transform {
                world: draw.world,
                view: plan.view,
                projection: self.projection,
            };
            queue.write_buffer(
                &self.transform_buffer,
                0,
                bytemuck::bytes_of(&TransformUniform::from(&transform)),
            );

            let mut encoder = gpu.create_encoder("rotor draw");
            {
                let mut pass = self.begin_pass(&mut encoder, gpu, &frame, plan, i == 0);
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                if let Some(group) = &self.texture_bind_group {
                    pass.set_bind_group(1, group, &[]);
                }
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                match (draw.count, &self.index_buffer) {
                    (DrawCount::Indexed(n), Some(indices)) => {
                        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
                        pass.draw_indexed(0..n, 0, 0..1);
                    }
                    (DrawCount::Vertices(n), _) => pass.draw(0..n, 0..1),
                    (DrawCount::Indexed(_), None) => {
                        log::warn!("indexed draw requested without an index buffer; skipped");
                    }
                }
            }
            gpu.submit(encoder);
        }

        gpu.present(frame);
    }

    fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        gpu: &Gpu<'_>,
        frame: &GpuFrame,
        plan: &FramePlan,
        clear: bool,
    ) -> wgpu::RenderPass<'e> {
        let (color_load, depth_load) = if clear {
            (
                wgpu::LoadOp::Clear(plan.clear.to_wgpu()),
                wgpu::LoadOp::Clear(1.0),
            )
        } else {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        };

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("rotor pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: gpu.depth_view(),
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

fn uniform_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Runs `build` inside a validation error scope and returns the captured
/// wgpu error as a message instead of letting it reach the uncaptured handler.
fn validated<T>(
    device: &wgpu::Device,
    what: &str,
    build: impl FnOnce() -> T,
) -> Result<T, String> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = build();
    match pollster::block_on(scope.pop()) {
        None => Ok(value),
        Some(err) => Err(format!("{what} rejected by the device: {err}")),
    }
}

fn create_pipeline(
    gpu: &Gpu<'_>,
    config: &DemoConfig,
    pipeline_layout: &wgpu::PipelineLayout,
    layout: &crate::scene::VertexLayout,
) -> wgpu::RenderPipeline {
    let device = gpu.device();

    let vs = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("rotor vertex shader"),
        source: wgpu::ShaderSource::Wgsl(config.shaders.vertex.clone()),
    });
    let fs = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("rotor fragment shader"),
        source: wgpu::ShaderSource::Wgsl(config.shaders.fragment.clone()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(config.name.as_str()),
        layout: Some(pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vs,
            entry_point: Some(VERTEX_ENTRY),
            buffers: &[layout.buffer_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fs,
            entry_point: Some(FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.surface_format(),
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: config.cull_back_faces.then_some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: gpu.depth_format(),
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Headless device, or `None` on machines without an adapter.
    fn headless_device() -> Option<wgpu::Device> {
        let instance = wgpu::Instance::default();
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        let (device, _queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()?;
        Some(device)
    }

    // ── validation scope ────────────────────────────────────────────────

    #[test]
    fn validated_passes_valid_work_through() {
        let Some(device) = headless_device() else {
            return;
        };
        let value = validated(&device, "buffer", || {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: None,
                size: 16,
                usage: wgpu::BufferUsages::UNIFORM,
                mapped_at_creation: false,
            })
        });
        assert!(value.is_ok());
    }

    #[test]
    fn validated_reports_device_rejection_as_error() {
        let Some(device) = headless_device() else {
            return;
        };
        // MAP_READ may only be paired with COPY_DST.
        let result = validated(&device, "buffer", || {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: None,
                size: 16,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::VERTEX,
                mapped_at_creation: false,
            })
        });
        let msg = result.err().unwrap_or_default();
        assert!(msg.starts_with("buffer rejected by the device"), "{msg}");
    }
}
