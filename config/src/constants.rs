//! # Configuration Constants
//!
//! Centralized constants for the skeletal mesh pipeline. Geometry tolerances,
//! welding and quantization parameters, and preview scaling all live here.
//!
//! ## Categories
//!
//! - **Precision**: floating-point comparison tolerances
//! - **Welding**: seam weld threshold
//! - **Quantization**: position-key fixed precision
//! - **Shading**: smooth-normal crease defaults

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Plane-classification epsilon for the boolean (CSG) engine.
///
/// Points closer than this to a splitting plane are treated as coplanar.
/// Wider than [`EPSILON`]: boolean clipping accumulates rounding error
/// across many plane splits.
pub const BOOLEAN_EPSILON: f64 = 1e-5;

// =============================================================================
// QUANTIZATION CONSTANTS
// =============================================================================

/// Scaling factor for quantizing f64 coordinates into integer position keys.
///
/// Two vertices whose coordinates agree after scaling and rounding hash to
/// the same key, so coincident floating-point vertices compare equal.
///
/// # Example
///
/// ```rust
/// use config::constants::POSITION_KEY_SCALE;
///
/// let quantized = (1.0004_f64 * POSITION_KEY_SCALE).round() as i64;
/// assert_eq!(quantized, 1000);
/// ```
pub const POSITION_KEY_SCALE: f64 = 1000.0;

// =============================================================================
// WELDING CONSTANTS
// =============================================================================

/// Distance under which two seam vertices are welded into one.
///
/// Applied repeatedly on the final combined mesh until a pass makes no
/// change; vertices that existed before any boolean step are excluded.
pub const WELD_THRESHOLD: f64 = 0.025;

// =============================================================================
// CUT FACE CONSTANTS
// =============================================================================

/// Chamfer interpolation factor toward the near end of a cut-polygon edge.
pub const CHAMFER_NEAR: f64 = 0.8;

/// Chamfer interpolation factor toward the far end of a cut-polygon edge.
///
/// Chamfering replaces each edge `(a, b)` with the two points
/// `CHAMFER_NEAR·a + CHAMFER_FAR·b` and `CHAMFER_FAR·a + CHAMFER_NEAR·b`,
/// doubling the vertex count of the polygon.
pub const CHAMFER_FAR: f64 = 0.2;

// =============================================================================
// SHADING CONSTANTS
// =============================================================================

/// Default crease angle (degrees) for smooth vertex-normal generation.
///
/// Adjacent face normals within this angle are averaged; sharper creases
/// keep faceted normals.
pub const DEFAULT_SMOOTH_SHADING_DEGREES: f64 = 60.0;

// =============================================================================
// PREVIEW CONSTANTS
// =============================================================================

/// Scale applied to trimmed preview vertices.
///
/// Trimming normalizes a part into a half-unit box around the origin; the
/// preview widget expects the unit box, hence the doubling.
pub const PREVIEW_SCALE: f64 = 2.0;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
