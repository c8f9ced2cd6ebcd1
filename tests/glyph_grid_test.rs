//! End-to-end checks through the public API
//!
//! No font files are needed: bakes without a registered font produce blank
//! atlases of the correct size.

use glyphgrid::font::{RasterSurface, SurfaceFactory, TextStyle};
use glyphgrid::geometry;
use glyphgrid::{AtlasLayout, FloatingChars, FontBook, GlyphAtlasTextureBaker, GridError};
use std::cell::RefCell;
use std::rc::Rc;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn single_char_mesh() {
    let mesh = geometry::build(1, 50.0, 1).unwrap();
    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0]);

    let positions: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();
    assert_eq!(
        positions,
        vec![
            [0.0, 0.0, 0.0],
            [50.0, 0.0, 0.0],
            [50.0, 50.0, 0.0],
            [0.0, 50.0, 0.0],
        ]
    );
    // Whole texture on the single quad, top edge at v = 0
    assert_eq!(mesh.vertices[0].uv, [0.0, 1.0]);
    assert_eq!(mesh.vertices[2].uv, [1.0, 0.0]);
}

#[test]
fn mesh_counts_scale_with_slots() {
    for n in [1u32, 2, 5, 12] {
        let mesh = geometry::build(n, 10.0, 4).unwrap();
        assert_eq!(mesh.vertices.len(), 4 * n as usize);
        assert_eq!(mesh.indices.len(), 6 * n as usize);
        assert!(mesh.indices.iter().all(|&i| i < 4 * n));
    }
}

#[test]
fn mesh_uvs_match_baked_cells() {
    let layout = AtlasLayout::new(5, 2, 64.0).unwrap();
    let mesh = geometry::build_for_layout(&layout, 20.0).unwrap();

    let baker = GlyphAtlasTextureBaker::new(FontBook::new());
    let tex = baker.bake_layout("HELLO", "Cabin Sketch", &layout).unwrap();
    assert_eq!((tex.width, tex.height), (128, 192));

    // Slot 3 sits at column 1, row 1: pixels x 64..128, y 64..128
    let quad = &mesh.vertices[12..16];
    let us: Vec<f32> = quad.iter().map(|v| v.uv[0] * tex.width as f32).collect();
    let vs: Vec<f32> = quad.iter().map(|v| v.uv[1] * tex.height as f32).collect();
    assert!(us.iter().all(|&u| approx(u, 64.0) || approx(u, 128.0)));
    assert!(vs.iter().all(|&v| approx(v, 64.0) || approx(v, 128.0)));
    // Upper vertices sample the upper raster row
    assert!(approx(vs[2], 64.0) && approx(vs[3], 64.0));
}

#[test]
fn bake_sizes() {
    let baker = GlyphAtlasTextureBaker::new(FontBook::new());

    let tex = baker.bake("AB", "Cabin Sketch", 128.0, 2).unwrap();
    assert_eq!((tex.width, tex.height), (256, 128));

    let tex = baker.bake("ABC", "Cabin Sketch", 128.0, 2).unwrap();
    assert_eq!((tex.width, tex.height), (256, 256));

    let tex = baker.bake("", "Cabin Sketch", 32.0, 3).unwrap();
    assert_eq!((tex.width, tex.height), (96, 32));
    assert!(tex.is_blank());
    assert!(tex.needs_upload);
    assert!(!tex.flip_y);
}

#[test]
fn invalid_arguments() {
    assert!(matches!(
        geometry::build(0, 50.0, 1),
        Err(GridError::InvalidArgument { .. })
    ));
    assert!(geometry::build(1, 50.0, 0).is_err());
    assert!(geometry::build(1, -1.0, 1).is_err());

    let baker = GlyphAtlasTextureBaker::new(FontBook::new());
    assert!(baker.bake("A", "Cabin Sketch", 0.0, 1).is_err());
    assert!(baker.bake("A", "Cabin Sketch", 64.0, 0).is_err());
}

#[derive(Default)]
struct Calls(Vec<(char, f32, f32)>);

struct Recorder(Rc<RefCell<Calls>>);

struct Surface {
    width: u32,
    height: u32,
    calls: Rc<RefCell<Calls>>,
}

impl SurfaceFactory for Recorder {
    fn create_surface(&self, width: u32, height: u32) -> Box<dyn RasterSurface> {
        self.0.borrow_mut().0.clear();
        Box::new(Surface {
            width,
            height,
            calls: self.0.clone(),
        })
    }
}

impl RasterSurface for Surface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {}

    fn fill_text(&mut self, ch: char, x: f32, y: f32, _style: &TextStyle) {
        self.calls.borrow_mut().0.push((ch, x, y));
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        vec![0; self.width as usize * self.height as usize * 4]
    }
}

#[test]
fn rebake_uses_fresh_surface() {
    let calls = Rc::new(RefCell::new(Calls::default()));
    let baker = GlyphAtlasTextureBaker::new(FontBook::new())
        .with_factory(Box::new(Recorder(calls.clone())));

    let mut chars = FloatingChars::new(3, 50.0, 2, 128.0).unwrap();
    chars.create_text_texture(&baker, "ABC", "Cabin Sketch").unwrap();
    assert_eq!(calls.borrow().0.len(), 3);

    chars.create_text_texture(&baker, "Z", "Cabin Sketch").unwrap();
    let recorded = &calls.borrow().0;
    assert_eq!(recorded.len(), 1);
    let (ch, x, y) = recorded[0];
    assert_eq!(ch, 'Z');
    assert!(approx(x, 64.0) && approx(y, 102.4));

    // Same grid either way
    let tex = chars.texture().unwrap();
    assert_eq!((tex.width, tex.height), (256, 256));
}
