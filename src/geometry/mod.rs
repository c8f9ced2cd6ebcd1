//! Procedural geometry for glyph grids
//!
//! Builds planar meshes with one quad per character slot,
//! texture coordinates addressing the matching atlas cell.

pub mod grid;

pub use grid::{build, build_for_layout, GlyphGridGeometryBuilder, GridMesh, Vertex};
