//! Shared configuration crate holding constants used across the workspace.
//!
//! The `constants` module exposes strongly typed settings so downstream crates
//! avoid sprinkling magic numbers. Example:
//!
//! ```
//! use config::constants::{WELD_THRESHOLD, approx_equal};
//!
//! assert!(approx_equal(WELD_THRESHOLD, 0.025));
//! ```

pub mod constants;

pub use constants::{
    approx_equal, approx_zero, BOOLEAN_EPSILON, CHAMFER_FAR, CHAMFER_NEAR,
    DEFAULT_SMOOTH_SHADING_DEGREES, POSITION_KEY_SCALE, PREVIEW_SCALE, WELD_THRESHOLD,
};
