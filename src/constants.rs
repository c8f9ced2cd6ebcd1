//! Global constants for glyphgrid
//!
//! Consolidates atlas ratios, scene defaults and visual defaults
//! to eliminate magic numbers throughout the codebase.

// ============================================================================
// Atlas Constants
// ============================================================================

/// Font size relative to the atlas cell size
pub const FONT_SIZE_RATIO: f32 = 0.8;

/// Baseline offset from the cell top, relative to the cell size
/// (keeps the glyph baseline near the cell bottom with headroom above)
pub const BASELINE_RATIO: f32 = 0.8;

/// Largest atlas width or height in pixels
pub const MAX_ATLAS_DIMENSION: u32 = 32768;

/// Default glyph fill color (RRGGBB or RRGGBBAA)
pub const DEFAULT_GLYPH_COLOR: &str = "ffffff";

// ============================================================================
// Visual Defaults
// ============================================================================

/// Number of character quads in the mesh
pub const DEFAULT_NUM_CHARS: u32 = 1;

/// Width of one character quad in world units
pub const DEFAULT_CHAR_WIDTH: f32 = 50.0;

/// Atlas columns per row
pub const DEFAULT_GRID_COLS: u32 = 1;

/// Atlas cell size in pixels
pub const DEFAULT_CELL_SIZE: f32 = 128.0;

/// Default text baked into the atlas
pub const DEFAULT_TEXT: &str = "A";

/// Default font family
pub const DEFAULT_FONT_FAMILY: &str = "Cabin Sketch";

/// Wireframe material color (RRGGBB or RRGGBBAA)
pub const DEFAULT_WIREFRAME_COLOR: &str = "000000";

// ============================================================================
// Scene Constants
// ============================================================================

/// Vertical field of view in degrees
pub const CAMERA_FOV_DEG: f32 = 35.0;

/// Near clip plane
pub const CAMERA_NEAR: f32 = 10.0;

/// Far clip plane
pub const CAMERA_FAR: f32 = 1000.0;

/// Camera distance from the origin along +Z
pub const CAMERA_DISTANCE: f32 = 300.0;

/// Upper bound for device pixel ratio
pub const MAX_PIXEL_RATIO: f32 = 2.0;
