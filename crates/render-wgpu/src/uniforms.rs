//! GPU-side layouts of the per-frame uniforms.
//!
//! Every field is a `vec4` so the Rust structs match WGSL uniform layout
//! rules without hidden padding.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use lumen_render::{
    Attenuation, DirectionalLight, FrameUniforms, LightingUniformSet, POINT_LIGHT_COUNT,
    PointLight, SpotLight,
};

fn vec4(v: Vec3, w: f32) -> [f32; 4] {
    v.extend(w).to_array()
}

fn attenuation(a: &Attenuation) -> [f32; 4] {
    [a.constant, a.linear, a.quadratic, 0.0]
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub(crate) fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct DirLightUniform {
    direction: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
}

impl From<&DirectionalLight> for DirLightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: vec4(light.direction, 0.0),
            ambient: vec4(light.ambient, 1.0),
            diffuse: vec4(light.diffuse, 1.0),
            specular: vec4(light.specular, 1.0),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct PointLightUniform {
    position: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    attenuation: [f32; 4],
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: vec4(light.position, 1.0),
            ambient: vec4(light.ambient, 1.0),
            diffuse: vec4(light.diffuse, 1.0),
            specular: vec4(light.specular, 1.0),
            attenuation: attenuation(&light.attenuation),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct SpotLightUniform {
    position: [f32; 4],
    direction: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    attenuation: [f32; 4],
    cutoff: [f32; 4],
}

impl From<&SpotLight> for SpotLightUniform {
    fn from(light: &SpotLight) -> Self {
        Self {
            position: vec4(light.position, 1.0),
            direction: vec4(light.direction, 0.0),
            ambient: vec4(light.ambient, 1.0),
            diffuse: vec4(light.diffuse, 1.0),
            specular: vec4(light.specular, 1.0),
            attenuation: attenuation(&light.attenuation),
            cutoff: [light.inner_cutoff, light.outer_cutoff, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct LightingUniform {
    /// `w` carries the material shininess.
    view_position: [f32; 4],
    dir_light: DirLightUniform,
    point_lights: [PointLightUniform; POINT_LIGHT_COUNT],
    spot_light: SpotLightUniform,
}

impl From<&LightingUniformSet> for LightingUniform {
    fn from(set: &LightingUniformSet) -> Self {
        Self {
            view_position: vec4(set.view_position, set.shininess),
            dir_light: (&set.directional).into(),
            point_lights: set.points.each_ref().map(PointLightUniform::from),
            spot_light: (&set.spot).into(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct OutlineUniform {
    pub(crate) color: [f32; 4],
}

/// Model matrix columns, one per instance.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct InstanceData {
    model: [[f32; 4]; 4],
}

impl From<&Mat4> for InstanceData {
    fn from(model: &Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

pub(crate) fn frame_uniforms(frame: &FrameUniforms) -> (CameraUniform, LightingUniform) {
    (
        CameraUniform::new(frame.view, frame.projection),
        LightingUniform::from(&frame.lighting),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_render::{Camera, aspect_ratio};
    use std::mem::size_of;

    #[test]
    fn layouts_are_vec4_aligned() {
        assert_eq!(size_of::<CameraUniform>(), 128);
        assert_eq!(size_of::<DirLightUniform>(), 64);
        assert_eq!(size_of::<PointLightUniform>(), 80);
        assert_eq!(size_of::<SpotLightUniform>(), 112);
        assert_eq!(size_of::<LightingUniform>(), 16 + 64 + 4 * 80 + 112);
        assert_eq!(size_of::<LightingUniform>() % 16, 0);
        assert_eq!(size_of::<InstanceData>(), 64);
    }

    #[test]
    fn lighting_packing() {
        let mut cam = Camera::new();
        cam.move_up(2.0);
        let mut lights = LightingUniformSet::demo(&cam);
        let frame = FrameUniforms::compute(&cam, &mut lights, aspect_ratio(800, 600));
        let (camera, lighting) = frame_uniforms(&frame);

        assert_eq!(camera.view, cam.view_matrix().to_cols_array_2d());
        assert_eq!(lighting.view_position, [0.0, 2.0, 3.0, 64.0]);
        assert_eq!(lighting.point_lights[1].position, [2.3, -3.3, -4.0, 1.0]);
        assert_eq!(lighting.point_lights[1].attenuation, [1.0, 0.09, 0.032, 0.0]);
        assert_eq!(lighting.spot_light.position, [0.0, 2.0, 3.0, 1.0]);
        assert_eq!(lighting.spot_light.direction[3], 0.0);
        assert!(lighting.spot_light.cutoff[0] > lighting.spot_light.cutoff[1]);

        let bytes: &[u8] = bytemuck::bytes_of(&lighting);
        assert_eq!(bytes.len(), size_of::<LightingUniform>());
    }

    #[test]
    fn instance_matrix_is_column_major() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let instance = InstanceData::from(&model);
        assert_eq!(instance.model[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
