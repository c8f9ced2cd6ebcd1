//! Font loading and glyph atlas baking
//!
//! Handles:
//! - Font file discovery and background loading (one-shot readiness)
//! - Family registry with fallback substitution
//! - Raster surfaces (injected, fontdue-backed by default)
//! - Glyph atlas baking onto a shared grid layout

pub mod atlas;
pub mod book;
#[cfg(feature = "system-fonts")]
pub mod fontconfig;
pub mod loader;
pub mod surface;

pub use atlas::GlyphAtlasTextureBaker;
pub use book::FontBook;
pub use loader::{FontActive, FontLoader, FontReady, FontRequest};
pub use surface::{PixelSurface, PixelSurfaceFactory, RasterSurface, SurfaceFactory, TextAlign, TextStyle};
