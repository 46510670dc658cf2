//! Input handling: raw window events folded into an explicit context that
//! drives the camera once per frame.
//!
//! # Invariants
//! - The first cursor position after a reset never produces a look delta.
//! - Movement is scaled by `movement_speed * delta_time`.

pub mod action;
mod context;

pub use action::Action;
pub use context::{
    DEFAULT_MOVEMENT_SPEED, FrameClock, InputContext, MAX_FRAME_DELTA, MouseTracker,
};

pub fn crate_info() -> &'static str {
    "lumen-input v0.1.0"
}
