use crate::math::CameraState;

/// Loop state carried from one tick to the next.
///
/// Owned by the caller and passed through [`FrameDriver::tick`](super::FrameDriver::tick),
/// which returns the successor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Rotation angle per drawn object, from the latest tick.
    pub angles: Vec<f32>,
    pub camera: CameraState,
    /// Clicks already applied to the palette.
    pub clicks: u32,
    /// Palette entry currently applied; `None` while the geometry keeps its own colors.
    pub palette_index: Option<usize>,
    pub frames: u64,
}
