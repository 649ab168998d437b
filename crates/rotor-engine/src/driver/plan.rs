use glam::Mat4;

use crate::scene::{Color, DrawCount};

/// One draw of the scene geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub world: Mat4,
    /// Interleaved vertex data to write into the shared vertex buffer before
    /// this draw. `None` keeps whatever the buffer holds.
    pub upload: Option<Vec<f32>>,
    pub count: DrawCount,
}

/// Everything one frame does, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub clear: Color,
    pub view: Mat4,
    pub draws: Vec<DrawCall>,
}

impl FramePlan {
    pub fn upload_count(&self) -> usize {
        self.draws.iter().filter(|d| d.upload.is_some()).count()
    }
}
