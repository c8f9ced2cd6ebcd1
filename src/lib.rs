//! glyphgrid - glyph grid meshes and character texture atlases
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              AtlasLayout                 │
//! │      (grid cols, cell size, slots)       │
//! ├────────────────────┬─────────────────────┤
//! │  geometry::build   │  GlyphAtlasTexture- │
//! │  → GridMesh        │  Baker → Texture    │
//! ├────────────────────┴─────────────────────┤
//! │        FloatingChars (mesh + atlas)      │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Fonts are loaded in the background ([`font::FontLoader`]); the
//! application awaits readiness, registers the families in a
//! [`font::FontBook`] and only then bakes.

pub mod config;
pub mod constants;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod scene;
pub mod texture;
pub mod utils;
pub mod visual;

pub use error::{GridError, GridResult};
pub use font::{FontBook, GlyphAtlasTextureBaker};
pub use geometry::{GlyphGridGeometryBuilder, GridMesh, Vertex};
pub use layout::{AtlasLayout, GlyphSlot};
pub use texture::AtlasTexture;
pub use visual::FloatingChars;
