//! Shared types for the lumen workspace.

mod types;

pub use types::{Transform, grey};

pub fn crate_info() -> &'static str {
    "lumen-common v0.1.0"
}
