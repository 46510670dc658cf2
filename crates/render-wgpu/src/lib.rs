//! wgpu render backend for the lumen demo.
//!
//! Renders ten textured cubes lit by a directional light, four point lights
//! and a camera-held spotlight, outlines them through the stencil buffer and
//! draws a marker cube at each point light.
//!
//! # Invariants
//! - The renderer never mutates camera or lighting state; it only uploads
//!   the [`lumen_render::FrameUniforms`] it is given.
//! - All passes share one `Depth24PlusStencil8` attachment.

mod context;
mod error;
mod gpu;
mod mesh;
mod shaders;
mod texture;
mod uniforms;

pub use context::GpuContext;
pub use error::RenderError;
pub use gpu::{DEPTH_STENCIL_FORMAT, MaterialTextures, WgpuRenderer};
pub use shaders::ShaderSet;
pub use texture::GpuTexture;
