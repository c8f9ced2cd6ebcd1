//! Floating characters visual
//!
//! Glyph grid mesh, wireframe material and baked atlas stored side by side.
//! A renderer draws `geometry` with `material` at `transform`, sampling
//! `texture` once one has been baked.

use log::debug;

use crate::constants::DEFAULT_WIREFRAME_COLOR;
use crate::error::GridResult;
use crate::font::GlyphAtlasTextureBaker;
use crate::geometry::{build_for_layout, GridMesh};
use crate::layout::AtlasLayout;
use crate::texture::AtlasTexture;
use crate::utils::color::parse_hex_color_to_rgba;

/// Which triangle faces are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

/// Flat-color material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// RGBA (0.0-1.0)
    pub color: [f32; 4],
    /// Draw edges only (see [`GridMesh::wireframe_indices`])
    pub wireframe: bool,
    pub side: Side,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: parse_hex_color_to_rgba(DEFAULT_WIREFRAME_COLOR),
            wireframe: true,
            side: Side::Double,
        }
    }
}

impl Material {
    /// Material with a hex color (RRGGBB or RRGGBBAA)
    pub fn from_hex(hex: &str, wireframe: bool) -> Self {
        Self {
            color: parse_hex_color_to_rgba(hex),
            wireframe,
            side: Side::Double,
        }
    }
}

/// Position, Euler rotation (radians, XYZ order) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl Transform {
    /// Column-major model matrix: T * Rz * Ry * Rx * S
    pub fn matrix(&self) -> [f32; 16] {
        let (sx, cx) = self.rotation[0].sin_cos();
        let (sy, cy) = self.rotation[1].sin_cos();
        let (sz, cz) = self.rotation[2].sin_cos();
        let [kx, ky, kz] = self.scale;
        let [tx, ty, tz] = self.position;

        // Columns of R = Rz * Ry * Rx
        let c0 = [cz * cy, sz * cy, -sy];
        let c1 = [cz * sy * sx - sz * cx, sz * sy * sx + cz * cx, cy * sx];
        let c2 = [cz * sy * cx + sz * sx, sz * sy * cx - cz * sx, cy * cx];

        [
            c0[0] * kx, c0[1] * kx, c0[2] * kx, 0.0,
            c1[0] * ky, c1[1] * ky, c1[2] * ky, 0.0,
            c2[0] * kz, c2[1] * kz, c2[2] * kz, 0.0,
            tx, ty, tz, 1.0,
        ]
    }
}

/// Glyph quads plus their atlas
#[derive(Debug)]
pub struct FloatingChars {
    layout: AtlasLayout,
    pub geometry: GridMesh,
    pub material: Material,
    pub transform: Transform,
    texture: Option<AtlasTexture>,
}

impl FloatingChars {
    /// # Arguments
    ///
    /// * `num_chars` - Number of quads
    /// * `char_width` - Quad width in world units
    /// * `grid_cols` - Atlas cells per row
    /// * `cell_size` - Atlas cell size in pixels
    pub fn new(num_chars: u32, char_width: f32, grid_cols: u32, cell_size: f32) -> GridResult<Self> {
        let layout = AtlasLayout::new(num_chars, grid_cols, cell_size)?;
        let geometry = build_for_layout(&layout, char_width)?;
        Ok(Self {
            layout,
            geometry,
            material: Material::default(),
            transform: Transform::default(),
            texture: None,
        })
    }

    pub fn layout(&self) -> &AtlasLayout {
        &self.layout
    }

    /// Bake `text` onto this visual's grid, replacing any previous atlas
    ///
    /// `text` may be shorter than the quad count (remaining cells stay empty)
    /// but not longer.
    pub fn create_text_texture(
        &mut self,
        baker: &GlyphAtlasTextureBaker,
        text: &str,
        font_family: &str,
    ) -> GridResult<&AtlasTexture> {
        let texture = baker.bake_layout(text, font_family, &self.layout)?;
        if self.texture.is_some() {
            debug!("Replacing glyph atlas ({:?})", text);
        }
        Ok(self.texture.insert(texture))
    }

    pub fn texture(&self) -> Option<&AtlasTexture> {
        self.texture.as_ref()
    }

    /// Mutable access for the renderer (e.g. to clear `needs_upload`)
    pub fn texture_mut(&mut self) -> Option<&mut AtlasTexture> {
        self.texture.as_mut()
    }

    /// True when a baked atlas is waiting to be uploaded
    pub fn texture_needs_upload(&self) -> bool {
        self.texture.as_ref().is_some_and(|t| t.needs_upload)
    }
}
