/// One acquired swapchain image.
///
/// Must be handed back through [`Gpu::present`](super::Gpu::present) promptly;
/// holding it blocks acquisition of the next image.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
