use crate::lighting::POINT_LIGHT_POSITIONS;
use glam::{Mat4, Vec3};
use lumen_common::Transform;
use serde::{Deserialize, Serialize};

const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

const CUBE_TILT_AXIS: Vec3 = Vec3::new(1.0, 0.3, 0.5);
const CUBE_TILT_STEP_DEGREES: f32 = 20.0;

/// Fixed placement of everything drawn in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    /// Textured, lit cubes. Each one also gets an outline.
    pub cubes: Vec<Transform>,
    /// Outline copies are scaled up by this factor around the cube centre.
    pub outline_scale: f32,
    pub outline_color: [f32; 4],
    /// Small unlit cubes marking point light positions.
    pub light_markers: Vec<Transform>,
    pub clear_color: [f64; 4],
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self::demo()
    }
}

impl SceneLayout {
    pub fn demo() -> Self {
        let cubes = CUBE_POSITIONS
            .iter()
            .enumerate()
            .map(|(i, &pos)| {
                Transform::from_position(pos)
                    .with_axis_angle(CUBE_TILT_AXIS, CUBE_TILT_STEP_DEGREES * i as f32)
            })
            .collect();

        let light_markers = POINT_LIGHT_POSITIONS
            .iter()
            .map(|&pos| Transform::from_position(pos).with_uniform_scale(0.2))
            .collect();

        Self {
            cubes,
            outline_scale: 1.05,
            outline_color: [0.04, 0.28, 0.26, 1.0],
            light_markers,
            clear_color: [0.1, 0.1, 0.1, 1.0],
        }
    }

    pub fn cube_models(&self) -> Vec<Mat4> {
        self.cubes.iter().map(Transform::model_matrix).collect()
    }

    pub fn outline_models(&self) -> Vec<Mat4> {
        self.cubes
            .iter()
            .map(|t| t.scaled_by(self.outline_scale).model_matrix())
            .collect()
    }

    pub fn light_marker_models(&self) -> Vec<Mat4> {
        self.light_markers
            .iter()
            .map(Transform::model_matrix)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_layout_counts() {
        let scene = SceneLayout::demo();
        assert_eq!(scene.cubes.len(), 10);
        assert_eq!(scene.light_markers.len(), 4);
        assert_eq!(scene.cube_models().len(), scene.outline_models().len());
    }

    #[test]
    fn cube_rotation_steps_by_twenty_degrees() {
        let scene = SceneLayout::demo();
        assert_eq!(scene.cubes[0].rotation, glam::Quat::IDENTITY);
        let (axis, angle) = scene.cubes[3].rotation.to_axis_angle();
        assert!((angle - 60.0_f32.to_radians()).abs() < 1e-4);
        assert!(axis.abs_diff_eq(CUBE_TILT_AXIS.normalize(), 1e-4));
    }

    #[test]
    fn outline_encloses_cube() {
        let scene = SceneLayout::demo();
        let cube = scene.cube_models()[4];
        let outline = scene.outline_models()[4];
        let corner = Vec3::splat(0.5);
        let center = scene.cubes[4].position;
        let inner = cube.transform_point3(corner).distance(center);
        let outer = outline.transform_point3(corner).distance(center);
        assert!((outer / inner - 1.05).abs() < 1e-4);
    }

    #[test]
    fn light_markers_sit_on_lights() {
        let scene = SceneLayout::demo();
        for (model, pos) in scene.light_marker_models().iter().zip(POINT_LIGHT_POSITIONS) {
            assert!(model.transform_point3(Vec3::ZERO).abs_diff_eq(pos, 1e-6));
            assert!(
                model
                    .transform_vector3(Vec3::X)
                    .abs_diff_eq(Vec3::new(0.2, 0.0, 0.0), 1e-6)
            );
        }
    }
}
