use crate::action::Action;
use lumen_render::{Camera, DEFAULT_SENSITIVITY};
use std::collections::BTreeSet;
use std::time::Instant;

/// Units per second for keyboard movement.
pub const DEFAULT_MOVEMENT_SPEED: f32 = 2.5;
/// Frames slower than this are treated as this long.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Turns absolute cursor positions into look deltas.
///
/// The first position after construction or [`MouseTracker::reset`] only
/// seeds the baseline, so a re-centred or freshly grabbed cursor does not
/// make the view jump.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseTracker {
    last: Option<(f32, f32)>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous position, with `y` flipped so that moving
    /// the cursor up yields a positive value.
    pub fn delta(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let delta = self.last.map(|(last_x, last_y)| (x - last_x, last_y - y));
        self.last = Some((x, y));
        delta
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn has_baseline(&self) -> bool {
        self.last.is_some()
    }
}

/// Elapsed time between frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_frame: Instant,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self { last_frame: start }
    }

    /// Seconds since the previous tick, capped at [`MAX_FRAME_DELTA`].
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt.min(MAX_FRAME_DELTA)
    }
}

/// Input state owned by the frame loop.
///
/// Events are recorded as they arrive and applied to the camera in one
/// step per frame by [`InputContext::drive`].
#[derive(Debug, Clone)]
pub struct InputContext {
    held: BTreeSet<Action>,
    mouse: MouseTracker,
    virtual_cursor: (f32, f32),
    clock: FrameClock,
    pending_look: Vec<(f32, f32)>,
    pending_scroll: Vec<f32>,
    quit_requested: bool,
    pub sensitivity: f32,
    pub movement_speed: f32,
}

impl InputContext {
    pub fn new(start: Instant) -> Self {
        Self {
            held: BTreeSet::new(),
            mouse: MouseTracker::new(),
            virtual_cursor: (0.0, 0.0),
            clock: FrameClock::new(start),
            pending_look: Vec::new(),
            pending_scroll: Vec::new(),
            quit_requested: false,
            sensitivity: DEFAULT_SENSITIVITY,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
        }
    }

    pub fn press(&mut self, action: Action) {
        if action == Action::Quit {
            tracing::debug!("quit requested");
            self.quit_requested = true;
            return;
        }
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        if let Some(delta) = self.mouse.delta(x, y) {
            self.pending_look.push(delta);
        }
    }

    /// Relative pointer motion from a captured cursor, in screen
    /// orientation (positive `dy` is downwards). Accumulated into an
    /// unbounded virtual cursor so it goes through the same baseline
    /// handling as absolute positions.
    pub fn pointer_motion(&mut self, dx: f32, dy: f32) {
        self.virtual_cursor.0 += dx;
        self.virtual_cursor.1 += dy;
        let (x, y) = self.virtual_cursor;
        self.cursor_moved(x, y);
    }

    pub fn scrolled(&mut self, dy: f32) {
        self.pending_scroll.push(dy);
    }

    /// Forget the cursor baseline and any held keys, e.g. after focus loss.
    pub fn reset_pointer(&mut self) {
        self.mouse.reset();
        self.held.clear();
    }

    /// Delta time for the frame starting at `now`.
    pub fn begin_frame(&mut self, now: Instant) -> f32 {
        self.clock.tick(now)
    }

    /// Apply held movement, then queued look and scroll deltas.
    pub fn drive(&mut self, camera: &mut Camera, dt: f32) {
        let speed = self.movement_speed * dt;
        for action in Action::MOVEMENT {
            if !self.held.contains(&action) {
                continue;
            }
            match action {
                Action::MoveForward => camera.move_forward(speed),
                Action::MoveBackward => camera.move_forward(-speed),
                Action::StrafeLeft => camera.move_right(-speed),
                Action::StrafeRight => camera.move_right(speed),
                Action::Ascend => camera.move_up(speed),
                Action::Descend => camera.move_up(-speed),
                Action::Quit => {}
            }
        }

        for (dx, dy) in self.pending_look.drain(..) {
            camera.apply_mouse_delta(dx, dy, self.sensitivity);
        }
        for dy in self.pending_scroll.drain(..) {
            camera.apply_scroll_delta(dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::time::Duration;

    #[test]
    fn first_mouse_event_seeds_baseline() {
        let mut mouse = MouseTracker::new();
        assert!(!mouse.has_baseline());
        assert_eq!(mouse.delta(400.0, 300.0), None);
        assert!(mouse.has_baseline());
        assert_eq!(mouse.delta(410.0, 290.0), Some((10.0, 10.0)));
    }

    #[test]
    fn reset_requires_new_baseline() {
        let mut mouse = MouseTracker::new();
        mouse.delta(0.0, 0.0);
        mouse.reset();
        assert_eq!(mouse.delta(900.0, 900.0), None);
        assert_eq!(mouse.delta(900.0, 910.0), Some((0.0, -10.0)));
    }

    #[test]
    fn frame_clock_caps_long_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        let dt = clock.tick(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-4);
        let dt = clock.tick(start + Duration::from_secs(5));
        assert_eq!(dt, MAX_FRAME_DELTA);
    }

    #[test]
    fn frame_clock_tolerates_time_going_backwards() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::new(start);
        assert_eq!(clock.tick(start - Duration::from_millis(5)), 0.0);
    }

    #[test]
    fn held_forward_walks_at_movement_speed() {
        let mut input = InputContext::new(Instant::now());
        let mut cam = Camera::new();
        input.press(Action::MoveForward);
        input.drive(&mut cam, 0.4);
        // 2.5 * 0.4 = 1.0 along -z
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-5));

        input.release(Action::MoveForward);
        input.drive(&mut cam, 0.4);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-5));
    }

    #[test]
    fn opposite_actions_cancel() {
        let mut input = InputContext::new(Instant::now());
        let mut cam = Camera::new();
        for action in Action::MOVEMENT {
            input.press(action);
        }
        input.drive(&mut cam, 0.1);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-5));
    }

    #[test]
    fn ascend_and_descend_move_vertically() {
        let mut input = InputContext::new(Instant::now());
        let mut cam = Camera::new();
        input.press(Action::Ascend);
        input.drive(&mut cam, 0.2);
        assert!((cam.position.y - 0.5).abs() < 1e-5);
        input.release(Action::Ascend);
        input.press(Action::Descend);
        input.drive(&mut cam, 0.4);
        assert!((cam.position.y + 0.5).abs() < 1e-5);
    }

    #[test]
    fn cursor_motion_rotates_camera_once_per_delta() {
        let mut input = InputContext::new(Instant::now());
        let mut cam = Camera::new();
        input.cursor_moved(400.0, 300.0);
        input.drive(&mut cam, 0.0);
        assert_eq!(cam, Camera::new());

        input.cursor_moved(500.0, 200.0);
        input.drive(&mut cam, 0.0);
        assert!((cam.yaw - -80.0).abs() < 1e-4);
        assert!((cam.pitch - 10.0).abs() < 1e-4);

        // Deltas are consumed.
        input.drive(&mut cam, 0.0);
        assert!((cam.yaw - -80.0).abs() < 1e-4);
    }

    #[test]
    fn pointer_motion_drops_first_sample_after_reset() {
        let mut input = InputContext::new(Instant::now());
        let mut cam = Camera::new();
        input.pointer_motion(250.0, 0.0);
        input.pointer_motion(100.0, -50.0);
        input.drive(&mut cam, 0.0);
        assert!((cam.yaw - -80.0).abs() < 1e-4);
        assert!((cam.pitch - 5.0).abs() < 1e-4);

        input.reset_pointer();
        input.pointer_motion(-400.0, 0.0);
        input.drive(&mut cam, 0.0);
        assert!((cam.yaw - -80.0).abs() < 1e-4);
    }

    #[test]
    fn scroll_zooms() {
        let mut input = InputContext::new(Instant::now());
        let mut cam = Camera::new();
        input.scrolled(5.0);
        input.scrolled(-2.0);
        input.drive(&mut cam, 0.0);
        assert_eq!(cam.fov, 42.0);
    }

    #[test]
    fn quit_is_latched_not_held() {
        let mut input = InputContext::new(Instant::now());
        input.press(Action::Quit);
        assert!(input.quit_requested());
        assert!(!input.is_held(Action::Quit));
    }

    #[test]
    fn reset_pointer_clears_held_keys() {
        let mut input = InputContext::new(Instant::now());
        input.press(Action::StrafeLeft);
        input.cursor_moved(1.0, 1.0);
        input.reset_pointer();
        assert!(!input.is_held(Action::StrafeLeft));
        let mut cam = Camera::new();
        input.cursor_moved(50.0, 50.0);
        input.drive(&mut cam, 0.0);
        assert_eq!(cam.yaw, -90.0);
    }
}
