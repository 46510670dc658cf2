//! Renderer-agnostic core of the lumen demo.
//!
//! Owns the free-look [`Camera`], the [`LightingUniformSet`] assembled from
//! it every frame, and the fixed [`SceneLayout`]. GPU backends consume
//! [`FrameUniforms`] and never reach back into camera state.
//!
//! # Invariants
//! - Camera pitch stays within `[-89, 89]` degrees and fov within `[1, 90]`.
//! - Horizontal camera movement never changes height.
//! - The spotlight always matches the camera after a refresh.

mod camera;
mod frame;
mod lighting;
mod renderer;
mod scene;

pub use camera::{
    Camera, DEFAULT_SENSITIVITY, FAR_PLANE, MAX_FOV, MIN_FOV, NEAR_PLANE, PITCH_LIMIT,
    front_from_angles,
};
pub use frame::{FrameUniforms, aspect_ratio};
pub use lighting::{
    Attenuation, DirectionalLight, LightingUniformSet, MATERIAL_SHININESS, POINT_LIGHT_COUNT,
    POINT_LIGHT_POSITIONS, PointLight, SpotLight,
};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::SceneLayout;

pub fn crate_info() -> &'static str {
    "lumen-render v0.1.0"
}
