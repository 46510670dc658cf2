//! Light configuration pushed to the lit shading stage once per frame.
//!
//! Directional and point lights are fixed data. The spotlight is a view
//! over the camera: it sits at the eye and points along `front`, so it is
//! rebuilt from the camera on every [`LightingUniformSet::refresh`].

use crate::camera::Camera;
use glam::Vec3;
use lumen_common::grey;
use serde::{Deserialize, Serialize};

pub const POINT_LIGHT_COUNT: usize = 4;

/// Positions of the demo point lights, also used to place their marker cubes.
pub const POINT_LIGHT_POSITIONS: [Vec3; POINT_LIGHT_COUNT] = [
    Vec3::new(0.7, 0.2, 2.0),
    Vec3::new(2.3, -3.3, -4.0),
    Vec3::new(-4.0, 2.0, -12.0),
    Vec3::new(0.0, 0.0, -3.0),
];

pub const SPOT_INNER_DEGREES: f32 = 12.5;
pub const SPOT_OUTER_DEGREES: f32 = 15.0;
pub const MATERIAL_SHININESS: f32 = 64.0;

/// Distance falloff `1 / (constant + linear*d + quadratic*d^2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

impl Attenuation {
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.2, -1.0, -0.3),
            ambient: grey(0.2),
            diffuse: grey(0.8),
            specular: grey(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ambient: grey(0.05),
            diffuse: grey(0.8),
            specular: grey(1.0),
            attenuation: Attenuation::default(),
        }
    }
}

/// Cone light with a smooth edge between the inner and outer cutoffs.
///
/// Cutoffs are stored as cosines, so `inner_cutoff > outer_cutoff`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
    pub inner_cutoff: f32,
    pub outer_cutoff: f32,
}

impl SpotLight {
    /// Flashlight held by the camera.
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            position: camera.position,
            direction: camera.front,
            ambient: Vec3::ZERO,
            diffuse: grey(1.0),
            specular: grey(1.0),
            attenuation: Attenuation::default(),
            inner_cutoff: SPOT_INNER_DEGREES.to_radians().cos(),
            outer_cutoff: SPOT_OUTER_DEGREES.to_radians().cos(),
        }
    }

    pub fn follow(&mut self, camera: &Camera) {
        self.position = camera.position;
        self.direction = camera.front;
    }

    /// Intensity for a fragment whose direction to the light makes an angle
    /// with cosine `cos_theta` against the spot direction.
    pub fn cone_intensity(&self, cos_theta: f32) -> f32 {
        let epsilon = self.inner_cutoff - self.outer_cutoff;
        ((cos_theta - self.outer_cutoff) / epsilon).clamp(0.0, 1.0)
    }
}

/// Every value the lit shader needs besides matrices and textures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingUniformSet {
    pub view_position: Vec3,
    pub shininess: f32,
    pub directional: DirectionalLight,
    pub points: [PointLight; POINT_LIGHT_COUNT],
    pub spot: SpotLight,
}

impl LightingUniformSet {
    /// The demo light rig, with the spotlight attached to `camera`.
    pub fn demo(camera: &Camera) -> Self {
        Self {
            view_position: camera.position,
            shininess: MATERIAL_SHININESS,
            directional: DirectionalLight::default(),
            points: POINT_LIGHT_POSITIONS.map(PointLight::at),
            spot: SpotLight::from_camera(camera),
        }
    }

    /// Per-frame update: only the camera-dependent values change.
    pub fn refresh(&mut self, camera: &Camera) {
        self.view_position = camera.position;
        self.spot.follow(camera);
    }
}
