/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Render through an sRGB view, so shader output is treated as linear.
    ///
    /// Off by default: clear, vertex and texture colors are display values
    /// and reach the screen unconverted.
    pub prefer_srgb: bool,

    /// Present mode. FIFO is supported everywhere and paces to the display.
    pub present_mode: wgpu::PresentMode,

    /// Alpha mode preference. Ignored when the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint only; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Format of the depth buffer kept alongside the surface.
    pub depth_format: wgpu::TextureFormat,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            depth_format: wgpu::TextureFormat::Depth24Plus,
        }
    }
}
