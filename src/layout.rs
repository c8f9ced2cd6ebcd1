//! Atlas grid layout
//!
//! One value describes how character slots map onto atlas cells.
//! Both the mesh builder and the atlas baker read row/column positions
//! from here, so texture coordinates and glyph placement cannot drift apart.

use crate::constants::MAX_ATLAS_DIMENSION;
use crate::error::{GridError, GridResult};

/// One character position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSlot {
    /// Linear index (0-based)
    pub index: u32,
    /// Column in the atlas grid (index mod grid_cols)
    pub col: u32,
    /// Row in the atlas grid (index div grid_cols)
    pub row: u32,
}

/// Grid shared by geometry and atlas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasLayout {
    slot_count: u32,
    grid_cols: u32,
    cell_size: f32,
}

impl AtlasLayout {
    /// Create a layout
    ///
    /// `slot_count` may be 0 (an empty atlas still has one row).
    /// The atlas may be at most [`MAX_ATLAS_DIMENSION`] pixels on each side.
    pub fn new(slot_count: u32, grid_cols: u32, cell_size: f32) -> GridResult<Self> {
        if grid_cols == 0 {
            return Err(GridError::invalid("grid_cols", grid_cols));
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::invalid("cell_size", cell_size));
        }
        let layout = Self {
            slot_count,
            grid_cols,
            cell_size,
        };
        if layout.pixel_buffer_len().is_none() {
            let (w, h) = layout.extent();
            return Err(GridError::invalid("atlas size", format!("{}x{}", w, h)));
        }
        Ok(layout)
    }

    /// Layout with one slot per character of `text`
    pub fn for_text(text: &str, grid_cols: u32, cell_size: f32) -> GridResult<Self> {
        let count = u32::try_from(text.chars().count())
            .map_err(|_| GridError::invalid("text length", text.chars().count()))?;
        Self::new(count, grid_cols, cell_size)
    }

    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    pub fn grid_cols(&self) -> u32 {
        self.grid_cols
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of atlas rows (at least 1)
    pub fn rows(&self) -> u32 {
        self.slot_count.div_ceil(self.grid_cols).max(1)
    }

    /// Slot for a linear index
    #[inline]
    pub fn slot(&self, index: u32) -> GlyphSlot {
        GlyphSlot {
            index,
            col: index % self.grid_cols,
            row: index / self.grid_cols,
        }
    }

    /// All slots in index order
    pub fn slots(&self) -> impl Iterator<Item = GlyphSlot> + '_ {
        (0..self.slot_count).map(move |i| self.slot(i))
    }

    /// Texture coordinate rectangle of a slot: [u0, v0, u1, v1]
    ///
    /// v0 is the cell's top raster row (atlas is not flipped).
    pub fn uv_rect(&self, slot: GlyphSlot) -> [f32; 4] {
        let cols = self.grid_cols as f32;
        let rows = self.rows() as f32;
        [
            slot.col as f32 / cols,
            slot.row as f32 / rows,
            (slot.col + 1) as f32 / cols,
            (slot.row + 1) as f32 / rows,
        ]
    }

    /// Top-left pixel of a slot's cell in the atlas
    pub fn cell_origin(&self, slot: GlyphSlot) -> (f32, f32) {
        (
            slot.col as f32 * self.cell_size,
            slot.row as f32 * self.cell_size,
        )
    }

    /// Atlas surface size in pixels (width, height)
    pub fn atlas_size(&self) -> (u32, u32) {
        let (w, h) = self.extent();
        (w as u32, h as u32)
    }

    /// RGBA8 byte length of the atlas
    ///
    /// None when either side exceeds [`MAX_ATLAS_DIMENSION`] or the length
    /// does not fit in `usize`.
    pub fn pixel_buffer_len(&self) -> Option<usize> {
        let (w, h) = self.extent();
        let max = MAX_ATLAS_DIMENSION as f64;
        if w > max || h > max {
            return None;
        }
        (w as usize).checked_mul(h as usize)?.checked_mul(4)
    }

    fn extent(&self) -> (f64, f64) {
        let cell = self.cell_size as f64;
        (
            (self.grid_cols as f64 * cell).ceil(),
            (self.rows() as f64 * cell).ceil(),
        )
    }
}
