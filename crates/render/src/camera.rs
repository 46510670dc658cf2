use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Pitch is kept strictly inside the poles to avoid flipping the view.
pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 90.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
/// Degrees of rotation per unit of mouse movement.
pub const DEFAULT_SENSITIVITY: f32 = 0.1;

/// Free-look camera with position, yaw, pitch and field of view.
///
/// Angles are stored in degrees. Horizontal movement stays level with the
/// ground plane regardless of where the camera is looking; only
/// [`Camera::move_up`] changes height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the startup state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Walk along the horizontal projection of `front`.
    ///
    /// Looking straight up or down leaves no horizontal direction; the move
    /// is skipped in that case.
    pub fn move_forward(&mut self, speed: f32) {
        let level = Vec3::new(self.front.x, 0.0, self.front.z);
        match level.try_normalize() {
            Some(dir) => self.position += dir * speed,
            None => tracing::trace!("move_forward skipped: no horizontal heading"),
        }
    }

    /// Strafe along `front x up`, with the vertical component dropped.
    pub fn move_right(&mut self, speed: f32) {
        match self.front.cross(self.up).try_normalize() {
            Some(right) => {
                let step = right * speed;
                self.position += Vec3::new(step.x, 0.0, step.z);
            }
            None => tracing::trace!("move_right skipped: front is parallel to up"),
        }
    }

    /// Move along world up, independent of orientation.
    pub fn move_up(&mut self, speed: f32) {
        self.position.y += speed;
    }

    /// Rotate by a mouse delta. A positive `dy` looks up.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw += dx * sensitivity;
        self.pitch = (self.pitch + dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.front = front_from_angles(self.yaw, self.pitch);
    }

    /// Zoom by a scroll delta; scrolling up narrows the field of view.
    pub fn apply_scroll_delta(&mut self, dy: f32) {
        self.fov = (self.fov - dy).clamp(MIN_FOV, MAX_FOV);
    }

    /// Right-handed view matrix looking along `front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection for the given viewport aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Unit view direction for yaw/pitch in degrees.
pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn default_camera() {
        let cam = Camera::new();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cam.front, Vec3::NEG_Z);
        assert_eq!(cam.up, Vec3::Y);
        assert_eq!(cam.yaw, -90.0);
        assert_eq!(cam.pitch, 0.0);
        assert_eq!(cam.fov, 45.0);
        assert!(front_from_angles(cam.yaw, cam.pitch).abs_diff_eq(Vec3::NEG_Z, EPS));

        let vp = cam.view_projection(800.0 / 600.0);
        assert!(!vp.is_nan());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut cam = Camera::new();
        cam.move_up(4.0);
        cam.apply_mouse_delta(30.0, 12.0, DEFAULT_SENSITIVITY);
        cam.apply_scroll_delta(10.0);
        cam.reset();
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn pitch_stays_clamped() {
        let mut cam = Camera::new();
        let deltas = [500.0, 2000.0, -10_000.0, 3.0, 1e6, -7.5, -1e6, 880.0];
        for dy in deltas {
            cam.apply_mouse_delta(13.0, dy, DEFAULT_SENSITIVITY);
            assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&cam.pitch));
            // Re-clamping an already clamped value is a no-op.
            assert_eq!(cam.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT), cam.pitch);
        }
    }

    #[test]
    fn fov_stays_clamped() {
        let mut cam = Camera::new();
        for dy in [200.0, -3.0, -500.0, 0.5, 44.0, -1.0, 1e9] {
            cam.apply_scroll_delta(dy);
            assert!((MIN_FOV..=MAX_FOV).contains(&cam.fov));
        }
    }

    #[test]
    fn scroll_past_minimum_clamps_to_one() {
        let mut cam = Camera::new();
        cam.apply_scroll_delta(200.0);
        assert_eq!(cam.fov, 1.0);
    }

    #[test]
    fn front_is_unit_after_mouse_delta() {
        let mut cam = Camera::new();
        for i in 0..200 {
            let dx = (i as f32 * 7.3).sin() * 300.0;
            let dy = (i as f32 * 3.1).cos() * 150.0;
            cam.apply_mouse_delta(dx, dy, DEFAULT_SENSITIVITY);
            assert!((cam.front.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn large_upward_delta_clamps_pitch() {
        let mut cam = Camera::new();
        cam.apply_mouse_delta(0.0, 1000.0, DEFAULT_SENSITIVITY);
        assert_eq!(cam.pitch, 89.0);
        assert!((cam.front.y - 89.0_f32.to_radians().sin()).abs() < EPS);
        assert!((cam.front.y - 0.9998).abs() < 1e-4);
    }

    #[test]
    fn mouse_delta_scales_by_sensitivity() {
        let mut cam = Camera::new();
        cam.apply_mouse_delta(0.0, 100.0, DEFAULT_SENSITIVITY);
        assert!((cam.pitch - 10.0).abs() < EPS);
        assert_eq!(cam.yaw, -90.0);
    }

    #[test]
    fn move_up_changes_height_only() {
        let mut cam = Camera::new();
        cam.move_up(1.0);
        assert_eq!(cam.position, Vec3::new(0.0, 1.0, 3.0));
        assert_eq!(cam.front, Vec3::NEG_Z);
        assert_eq!(cam.yaw, -90.0);
        assert_eq!(cam.pitch, 0.0);
    }

    #[test]
    fn move_forward_along_negative_z() {
        let mut cam = Camera::new();
        cam.move_forward(2.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), EPS));
    }

    #[test]
    fn horizontal_moves_stay_level() {
        let mut cam = Camera::new();
        for i in 0..50 {
            cam.apply_mouse_delta(37.0, if i % 2 == 0 { 45.0 } else { -60.0 }, 1.0);
            let y = cam.position.y;
            cam.move_forward(1.5);
            cam.move_right(-0.75);
            assert!((cam.position.y - y).abs() < EPS);
        }
    }

    #[test]
    fn forward_speed_ignores_pitch() {
        let mut cam = Camera::new();
        cam.apply_mouse_delta(0.0, 600.0, DEFAULT_SENSITIVITY);
        let start = cam.position;
        cam.move_forward(1.0);
        assert!(((cam.position - start).length() - 1.0).abs() < EPS);
    }

    #[test]
    fn move_right_strafes_along_positive_x() {
        let mut cam = Camera::new();
        cam.move_right(1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(1.0, 0.0, 3.0), EPS));
    }

    #[test]
    fn vertical_front_skips_horizontal_moves() {
        let mut cam = Camera::new();
        cam.front = Vec3::Y;
        cam.move_forward(5.0);
        cam.move_right(5.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 3.0));
        assert!(!cam.position.is_nan());
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let cam = Camera::new();
        let target = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(target.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), EPS));
    }
}
