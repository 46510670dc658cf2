use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Rotation of `degrees` about `axis`. The axis does not need to be normalized.
    pub fn with_axis_angle(mut self, axis: Vec3, degrees: f32) -> Self {
        self.rotation = Quat::from_axis_angle(axis.normalize_or(Vec3::Y), degrees.to_radians());
        self
    }

    pub fn with_uniform_scale(mut self, factor: f32) -> Self {
        self.scale = Vec3::splat(factor);
        self
    }

    /// Copy of this transform with its scale multiplied by `factor`.
    pub fn scaled_by(self, factor: f32) -> Self {
        Self {
            scale: self.scale * factor,
            ..self
        }
    }

    /// Model matrix: translate * rotate * scale.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Linear RGB colour with all three channels set to `level`.
pub fn grey(level: f32) -> Vec3 {
    Vec3::splat(level)
}
