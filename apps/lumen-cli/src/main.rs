use clap::{Parser, Subcommand};
use lumen_input::{Action, InputContext};
use lumen_render::{
    Camera, DebugTextRenderer, FrameUniforms, LightingUniformSet, Renderer, SceneLayout,
};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lumen-cli", about = "CLI tool for inspecting the lumen scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the uniforms for one frame seen from the default position
    Frame {
        /// Camera yaw in degrees
        #[arg(long, default_value = "-90", allow_hyphen_values = true)]
        yaw: f32,
        /// Camera pitch in degrees, clamped to the pitch limit
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pitch: f32,
        /// Field of view in degrees, clamped to the zoom range
        #[arg(long, default_value = "45")]
        fov: f32,
        /// Viewport aspect ratio
        #[arg(long, default_value = "1.3333334")]
        aspect: f32,
        /// Emit JSON instead of the text dump
        #[arg(long)]
        json: bool,
    },
    /// Simulate holding the forward key and print the camera path
    Walk {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "10")]
        frames: u32,
        /// Frame time in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
    },
}

/// Camera turned and zoomed from its default pose through the same
/// clamping paths as live input.
fn posed_camera(yaw: f32, pitch: f32, fov: f32) -> Camera {
    let mut camera = Camera::new();
    camera.apply_mouse_delta(yaw - camera.yaw, pitch - camera.pitch, 1.0);
    camera.apply_scroll_delta(camera.fov - fov);
    camera
}

/// Positions visited while forward is held for `frames` frames of `dt` seconds.
fn walk_path(frames: u32, dt: f32) -> Vec<Camera> {
    let start = Instant::now();
    let step = Duration::try_from_secs_f32(dt).unwrap_or_default();
    let mut input = InputContext::new(start);
    let mut camera = Camera::new();
    input.press(Action::MoveForward);

    let mut now = start;
    (0..frames)
        .map(|_| {
            now += step;
            let frame_dt = input.begin_frame(now);
            input.drive(&mut camera, frame_dt);
            camera
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("lumen-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", lumen_common::crate_info());
            println!("render: {}", lumen_render::crate_info());
            println!("input: {}", lumen_input::crate_info());
            println!("assets: {}", lumen_assets::crate_info());
            let scene = SceneLayout::demo();
            println!(
                "scene: cubes={}, point lights={}",
                scene.cubes.len(),
                scene.light_markers.len()
            );
        }
        Commands::Frame {
            yaw,
            pitch,
            fov,
            aspect,
            json,
        } => {
            let camera = posed_camera(yaw, pitch, fov);
            tracing::debug!(
                yaw = camera.yaw,
                pitch = camera.pitch,
                fov = camera.fov,
                "posed camera"
            );
            let mut lighting = LightingUniformSet::demo(&camera);
            let frame = FrameUniforms::compute(&camera, &mut lighting, aspect);
            if json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                let text = DebugTextRenderer::new().render(&SceneLayout::demo(), &frame);
                print!("{text}");
            }
        }
        Commands::Walk { frames, dt } => {
            println!("Walking forward: frames={frames}, dt={dt}");
            for (i, camera) in walk_path(frames, dt).iter().enumerate() {
                let p = camera.position;
                println!("frame {:>4}: ({:.3}, {:.3}, {:.3})", i + 1, p.x, p.y, p.z);
            }
        }
    }

    Ok(())
}
