use anyhow::{Context, Result};
use clap::Parser;
use lumen_assets::{AssetPaths, decode_texture};
use lumen_input::{Action, InputContext};
use lumen_render::{Camera, FrameUniforms, LightingUniformSet, SceneLayout, aspect_ratio};
use lumen_render_wgpu::{GpuContext, GpuTexture, MaterialTextures, ShaderSet, WgpuRenderer};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

const WINDOW_TITLE: &str = "lumen";
const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
/// Pixel scroll deltas (touchpads) are converted to wheel lines.
const PIXELS_PER_SCROLL_LINE: f32 = 20.0;
/// Exit status for window or graphics-context failures (-1 as a byte).
const STARTUP_FAILURE: u8 = 255;

#[derive(Parser)]
#[command(name = "lumen-desktop", about = "Lit cube scene with stencil outlines")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Resource directory holding shaders/ and textures/
    #[arg(long, default_value = "res")]
    res_dir: PathBuf,
}

fn bind_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::KeyW => Some(Action::MoveForward),
        KeyCode::KeyS => Some(Action::MoveBackward),
        KeyCode::KeyA => Some(Action::StrafeLeft),
        KeyCode::KeyD => Some(Action::StrafeRight),
        KeyCode::Space => Some(Action::Ascend),
        KeyCode::ShiftLeft => Some(Action::Descend),
        KeyCode::Escape => Some(Action::Quit),
        _ => None,
    }
}

fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_SCROLL_LINE,
    }
}

/// Scene state advanced once per frame.
struct AppState {
    camera: Camera,
    lighting: LightingUniformSet,
    scene: SceneLayout,
    input: InputContext,
    aspect: f32,
    focused: bool,
}

impl AppState {
    fn new() -> Self {
        let camera = Camera::new();
        Self {
            lighting: LightingUniformSet::demo(&camera),
            camera,
            scene: SceneLayout::demo(),
            input: InputContext::new(Instant::now()),
            aspect: aspect_ratio(WINDOW_WIDTH, WINDOW_HEIGHT),
            focused: true,
        }
    }

    /// Input, then camera, then lighting and matrices.
    fn update(&mut self, now: Instant) -> FrameUniforms {
        let dt = self.input.begin_frame(now);
        self.input.drive(&mut self.camera, dt);
        FrameUniforms::compute(&self.camera, &mut self.lighting, self.aspect)
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        let Some(action) = bind_key(key) else {
            return;
        };
        if pressed {
            self.input.press(action);
        } else {
            self.input.release(action);
        }
    }
}

fn load_texture_or_fallback(
    gpu: &GpuContext,
    path: &Path,
    fallback: [u8; 4],
    label: &str,
) -> GpuTexture {
    match decode_texture(path) {
        Ok(image) => GpuTexture::from_decoded(&gpu.device, &gpu.queue, &image, label),
        Err(e) => {
            tracing::warn!("{e}; using a flat {label} texture");
            GpuTexture::solid(&gpu.device, &gpu.queue, fallback, label)
        }
    }
}

fn capture_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        tracing::warn!("cursor grab unavailable: {e}");
    }
    window.set_cursor_visible(false);
}

struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: WgpuRenderer,
}

struct GpuApp {
    state: AppState,
    paths: AssetPaths,
    graphics: Option<Graphics>,
    startup_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(paths: AssetPaths) -> Self {
        Self {
            state: AppState::new(),
            paths,
            graphics: None,
            startup_error: None,
        }
    }

    fn init_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        capture_cursor(&window);

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)
            .context("failed to initialize graphics context")?;

        let shaders = ShaderSet::load(&self.paths).context("failed to load shaders")?;
        let material = MaterialTextures {
            diffuse: load_texture_or_fallback(
                &gpu,
                &self.paths.diffuse_texture(),
                [255, 255, 255, 255],
                "diffuse",
            ),
            specular: load_texture_or_fallback(
                &gpu,
                &self.paths.specular_texture(),
                [0, 0, 0, 255],
                "specular",
            ),
        };

        let (width, height) = gpu.size();
        let renderer = WgpuRenderer::new(
            &gpu.device,
            gpu.format(),
            width,
            height,
            &shaders,
            &self.state.scene,
            material,
        );

        Ok(Graphics {
            window,
            gpu,
            renderer,
        })
    }

    fn redraw(&mut self) {
        let frame = self.state.update(Instant::now());
        let Some(graphics) = &self.graphics else {
            return;
        };
        let gpu = &graphics.gpu;

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        graphics
            .renderer
            .render(&gpu.device, &gpu.queue, &view, &frame);
        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match self.init_graphics(event_loop) {
            Ok(graphics) => {
                let (width, height) = graphics.gpu.size();
                self.state.aspect = aspect_ratio(width, height);
                self.graphics = Some(graphics);
                tracing::info!("lumen-desktop ready ({width}x{height})");
            }
            Err(e) => {
                tracing::error!("{e:#}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.gpu.resize(new_size.width, new_size.height);
                    let (width, height) = graphics.gpu.size();
                    graphics.renderer.resize(&graphics.gpu.device, width, height);
                    self.state.aspect = aspect_ratio(width, height);
                }
            }
            WindowEvent::Focused(focused) => {
                self.state.focused = focused;
                self.state.input.reset_pointer();
                if let (true, Some(graphics)) = (focused, &self.graphics) {
                    capture_cursor(&graphics.window);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
                if self.state.input.quit_requested() {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.input.scrolled(scroll_lines(delta));
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(graphics) = &self.graphics {
                    graphics.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.focused {
                self.state
                    .input
                    .pointer_motion(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = self.graphics.take() {
            graphics.renderer.release();
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to open the windowing system")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AssetPaths::new(cli.res_dir));
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("lumen-desktop starting");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("exiting: {e:#}");
            ExitCode::from(STARTUP_FAILURE)
        }
    }
}
