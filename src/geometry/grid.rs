//! Glyph grid mesh
//!
//! Slot i occupies x in [i*w, (i+1)*w], y in [0, w], z = 0.
//! Quads share no vertices so each one can carry its own atlas cell.

use log::debug;

use crate::error::{GridError, GridResult};
use crate::layout::AtlasLayout;

/// Vertex with position and texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Texture coordinate (0.0-1.0, v = 0 at atlas top row)
    pub uv: [f32; 2],
}

/// Generated glyph grid geometry
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    /// 4 vertices per slot: bottom-left, bottom-right, top-right, top-left
    pub vertices: Vec<Vertex>,
    /// Triangle list, 6 indices per slot
    pub indices: Vec<u32>,
    /// Layout the texture coordinates were computed from
    pub layout: AtlasLayout,
    /// Quad width (and height) in model units
    pub cell_width: f32,
}

impl GridMesh {
    /// Number of quads
    pub fn slot_count(&self) -> u32 {
        self.layout.slot_count()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Line list of quad outlines for wireframe drawing (8 indices per slot)
    ///
    /// Diagonals are omitted; each quad contributes its 4 border edges.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut lines = Vec::with_capacity(self.slot_count() as usize * 8);
        for quad in 0..self.slot_count() {
            let b = quad * 4;
            lines.extend_from_slice(&[b, b + 1, b + 1, b + 2, b + 2, b + 3, b + 3, b]);
        }
        lines
    }

    /// Axis-aligned bounds: (min, max)
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for v in &self.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(v.position[axis]);
                max[axis] = max[axis].max(v.position[axis]);
            }
        }
        (min, max)
    }

    /// Copy translated so the bounding box is centered on the origin
    pub fn centered(&self) -> Self {
        let (min, max) = self.bounds();
        let offset = [
            (min[0] + max[0]) * 0.5,
            (min[1] + max[1]) * 0.5,
            (min[2] + max[2]) * 0.5,
        ];
        let mut mesh = self.clone();
        for v in &mut mesh.vertices {
            v.position[0] -= offset[0];
            v.position[1] -= offset[1];
            v.position[2] -= offset[2];
        }
        mesh
    }

    /// Interleaved position + uv floats (5 per vertex) for buffer upload
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertices.len() * 5);
        for v in &self.vertices {
            out.extend_from_slice(&v.position);
            out.extend_from_slice(&v.uv);
        }
        out
    }
}

/// Builder for glyph grid meshes
///
/// Holds the quad width; the grid comes from an [`AtlasLayout`].
#[derive(Debug, Clone, Copy)]
pub struct GlyphGridGeometryBuilder {
    cell_width: f32,
}

impl GlyphGridGeometryBuilder {
    pub fn new(cell_width: f32) -> GridResult<Self> {
        if !(cell_width.is_finite() && cell_width > 0.0) {
            return Err(GridError::invalid("cell_width", cell_width));
        }
        Ok(Self { cell_width })
    }

    /// Build one quad per slot of `layout`
    pub fn build(&self, layout: &AtlasLayout) -> GridResult<GridMesh> {
        let slot_count = layout.slot_count();
        if slot_count == 0 {
            return Err(GridError::invalid("slot_count", slot_count));
        }

        let w = self.cell_width;
        let mut vertices = Vec::with_capacity(slot_count as usize * 4);
        let mut indices = Vec::with_capacity(slot_count as usize * 6);

        for slot in layout.slots() {
            let x0 = slot.index as f32 * w;
            let x1 = x0 + w;
            let [u0, v0, u1, v1] = layout.uv_rect(slot);

            // Quad top samples the cell's top raster row (v0)
            let base = vertices.len() as u32;
            vertices.push(Vertex { position: [x0, 0.0, 0.0], uv: [u0, v1] });
            vertices.push(Vertex { position: [x1, 0.0, 0.0], uv: [u1, v1] });
            vertices.push(Vertex { position: [x1, w, 0.0], uv: [u1, v0] });
            vertices.push(Vertex { position: [x0, w, 0.0], uv: [u0, v0] });

            // Counter-clockwise seen from +Z
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        debug!(
            "Glyph grid built: {} quads, {} vertices, {}x{} grid",
            slot_count,
            vertices.len(),
            layout.grid_cols(),
            layout.rows()
        );

        Ok(GridMesh {
            vertices,
            indices,
            layout: *layout,
            cell_width: w,
        })
    }
}

/// Build a glyph grid mesh
///
/// `cell_width` is used for both the quad size and the layout's cell size.
pub fn build(slot_count: u32, cell_width: f32, grid_cols: u32) -> GridResult<GridMesh> {
    let layout = AtlasLayout::new(slot_count, grid_cols, cell_width)?;
    build_for_layout(&layout, cell_width)
}

/// Build a mesh whose texture coordinates follow an existing atlas layout
pub fn build_for_layout(layout: &AtlasLayout, cell_width: f32) -> GridResult<GridMesh> {
    GlyphGridGeometryBuilder::new(cell_width)?.build(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_uv_rect(mesh: &GridMesh, slot: usize) -> [f32; 4] {
        let quad = &mesh.vertices[slot * 4..slot * 4 + 4];
        let us = quad.iter().map(|v| v.uv[0]);
        let vs = quad.iter().map(|v| v.uv[1]);
        [
            us.clone().fold(f32::INFINITY, f32::min),
            vs.clone().fold(f32::INFINITY, f32::min),
            us.fold(f32::NEG_INFINITY, f32::max),
            vs.fold(f32::NEG_INFINITY, f32::max),
        ]
    }

    #[test]
    fn test_single_quad() {
        let mesh = build(1, 50.0, 1).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0]);
        let (min, max) = mesh.bounds();
        assert_eq!(min, [0.0, 0.0, 0.0]);
        assert_eq!(max, [50.0, 50.0, 0.0]);
        assert_eq!(quad_uv_rect(&mesh, 0), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_counts() {
        for &(n, cols) in &[(1, 1), (2, 5), (7, 3), (16, 4), (33, 1)] {
            let mesh = build(n, 10.0, cols).unwrap();
            assert_eq!(mesh.vertices.len(), 4 * n as usize);
            assert_eq!(mesh.indices.len(), 6 * n as usize);
            assert_eq!(mesh.wireframe_indices().len(), 8 * n as usize);
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        }
    }

    #[test]
    fn test_uv_rect_per_slot() {
        let mesh = build(5, 20.0, 2).unwrap();
        let rows = 3.0;
        for i in 0..5u32 {
            let col = (i % 2) as f32;
            let row = (i / 2) as f32;
            let expected = [col / 2.0, row / rows, (col + 1.0) / 2.0, (row + 1.0) / rows];
            let got = quad_uv_rect(&mesh, i as usize);
            for k in 0..4 {
                assert!((got[k] - expected[k]).abs() < 1e-6, "slot {} uv {:?}", i, got);
            }
        }
    }

    #[test]
    fn test_quads_advance_along_x() {
        let mesh = build(3, 50.0, 3).unwrap();
        assert_eq!(mesh.vertices[4].position, [50.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[9].position, [150.0, 0.0, 0.0]);
        // Top edge samples the top of the cell
        assert_eq!(mesh.vertices[3].uv[1], 0.0);
        assert_eq!(mesh.vertices[0].uv[1], 1.0);
    }

    #[test]
    fn test_consistent_winding() {
        let mesh = build(4, 8.0, 2).unwrap();
        for tri in mesh.indices.chunks(3) {
            let a = mesh.vertices[tri[0] as usize].position;
            let b = mesh.vertices[tri[1] as usize].position;
            let c = mesh.vertices[tri[2] as usize].position;
            let cross_z = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross_z > 0.0);
        }
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(build(6, 12.5, 4).unwrap(), build(6, 12.5, 4).unwrap());
    }

    #[test]
    fn test_centered() {
        let mesh = build(2, 50.0, 2).unwrap().centered();
        let (min, max) = mesh.bounds();
        assert_eq!(min, [-50.0, -25.0, 0.0]);
        assert_eq!(max, [50.0, 25.0, 0.0]);
    }

    #[test]
    fn test_interleaved_layout() {
        let mesh = build(1, 2.0, 1).unwrap();
        let data = mesh.interleaved();
        assert_eq!(data.len(), 20);
        assert_eq!(&data[5..10], &[2.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            build(0, 50.0, 1),
            Err(GridError::InvalidArgument { what: "slot_count", .. })
        ));
        assert!(build(1, 0.0, 1).is_err());
        assert!(build(1, -1.0, 1).is_err());
        assert!(build(1, 50.0, 0).is_err());
    }
}
