use crate::camera::Camera;
use crate::lighting::LightingUniformSet;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Per-frame values derived from the camera, in the order the frame loop
/// produces them: camera state first, then lighting, then matrices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub lighting: LightingUniformSet,
}

impl FrameUniforms {
    /// Refresh `lighting` from `camera` and derive the matrices.
    pub fn compute(camera: &Camera, lighting: &mut LightingUniformSet, aspect: f32) -> Self {
        lighting.refresh(camera);
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(aspect),
            eye: camera.position,
            fov_degrees: camera.fov,
            aspect,
            lighting: *lighting,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Aspect ratio of a viewport, guarding against zero-sized windows.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
