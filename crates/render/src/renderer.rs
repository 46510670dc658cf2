use crate::frame::FrameUniforms;
use crate::scene::SceneLayout;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the fixed scene layout and the uniforms computed for
/// the current frame. It never mutates camera or lighting state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &SceneLayout, frame: &FrameUniforms) -> Self::Output;
}

/// Text renderer used by the CLI and tests.
///
/// Produces a human-readable dump of what a frame would upload.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneLayout, frame: &FrameUniforms) -> String {
        let mut out = String::new();
        let lights = &frame.lighting;
        let _ = writeln!(
            out,
            "=== Frame (cubes={}, lights={}) ===",
            scene.cubes.len(),
            lights.points.len()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) fov={:.1} aspect={:.3}",
            frame.eye.x, frame.eye.y, frame.eye.z, frame.fov_degrees, frame.aspect
        );

        let d = &lights.directional;
        let _ = writeln!(
            out,
            "Directional: dir=({:.2}, {:.2}, {:.2}) ambient={:.2} diffuse={:.2}",
            d.direction.x, d.direction.y, d.direction.z, d.ambient.x, d.diffuse.x
        );
        for (i, p) in lights.points.iter().enumerate() {
            let _ = writeln!(
                out,
                "  point[{i}] pos=({:.2}, {:.2}, {:.2}) atten=({}, {}, {})",
                p.position.x,
                p.position.y,
                p.position.z,
                p.attenuation.constant,
                p.attenuation.linear,
                p.attenuation.quadratic
            );
        }
        let s = &lights.spot;
        let _ = writeln!(
            out,
            "Spot: pos=({:.2}, {:.2}, {:.2}) dir=({:.3}, {:.3}, {:.3}) cutoff={:.4}/{:.4}",
            s.position.x,
            s.position.y,
            s.position.z,
            s.direction.x,
            s.direction.y,
            s.direction.z,
            s.inner_cutoff,
            s.outer_cutoff
        );

        for (i, model) in scene.cube_models().iter().enumerate() {
            let clip = frame.view_projection() * model.col(3);
            let visible = clip.w > 0.0
                && clip.x.abs() <= clip.w
                && clip.y.abs() <= clip.w
                && clip.z >= 0.0
                && clip.z <= clip.w;
            let p = scene.cubes[i].position;
            let _ = writeln!(
                out,
                "  cube[{i}] pos=({:.2}, {:.2}, {:.2}) {}",
                p.x,
                p.y,
                p.z,
                if visible { "visible" } else { "culled" }
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::frame::aspect_ratio;
    use crate::lighting::LightingUniformSet;

    fn demo_frame(camera: &Camera) -> FrameUniforms {
        let mut lights = LightingUniformSet::demo(camera);
        FrameUniforms::compute(camera, &mut lights, aspect_ratio(800, 600))
    }

    #[test]
    fn debug_renderer_lists_scene() {
        let scene = SceneLayout::demo();
        let frame = demo_frame(&Camera::new());
        let output = DebugTextRenderer::new().render(&scene, &frame);

        assert!(output.contains("cubes=10"));
        assert!(output.contains("lights=4"));
        assert!(output.contains("point[3]"));
        assert!(output.contains("cube[9]"));
        assert!(output.contains("fov=45.0"));
    }

    #[test]
    fn origin_cube_visible_from_start() {
        let scene = SceneLayout::demo();
        let frame = demo_frame(&Camera::new());
        let output = DebugTextRenderer::new().render(&scene, &frame);
        let line = output
            .lines()
            .find(|l| l.contains("cube[0]"))
            .expect("cube line");
        assert!(line.ends_with("visible"));
    }

    #[test]
    fn cubes_behind_camera_are_culled() {
        let scene = SceneLayout::demo();
        let mut cam = Camera::new();
        cam.apply_mouse_delta(1800.0, 0.0, 0.1);
        let frame = demo_frame(&cam);
        let output = DebugTextRenderer::new().render(&scene, &frame);
        let line = output
            .lines()
            .find(|l| l.contains("cube[1]"))
            .expect("cube line");
        assert!(line.ends_with("culled"));
    }
}
