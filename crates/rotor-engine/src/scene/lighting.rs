use glam::Vec3;

/// Directional lighting constants for the lit variant. Set once at setup.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightingState {
    pub ambient: Vec3,
    /// Direction towards the light, in world space. Normalized on upload.
    pub light_direction: Vec3,
    pub light_color: Vec3,
}

impl LightingState {
    /// `light_direction` normalized, or +Y when it is degenerate.
    pub fn normalized_direction(&self) -> Vec3 {
        self.light_direction.try_normalize().unwrap_or(Vec3::Y)
    }
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.2),
            light_direction: Vec3::new(3.0, 4.0, -2.0),
            light_color: Vec3::splat(0.9),
        }
    }
}
