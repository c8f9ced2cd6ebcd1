//! Glyph atlas baker
//!
//! Draws one character per grid cell onto a fresh raster surface
//! and hands the pixels back as an [`AtlasTexture`].
//! Cell placement comes from [`AtlasLayout`], the same layout the
//! mesh builder uses for texture coordinates.

use log::{debug, info, warn};

use super::book::FontBook;
use super::surface::{PixelSurfaceFactory, SurfaceFactory, TextAlign, TextStyle};
use crate::constants::{BASELINE_RATIO, FONT_SIZE_RATIO};
use crate::error::{GridError, GridResult};
use crate::layout::AtlasLayout;
use crate::texture::AtlasTexture;

/// Bakes strings into glyph atlas textures
pub struct GlyphAtlasTextureBaker {
    fonts: FontBook,
    factory: Box<dyn SurfaceFactory>,
    /// Glyph fill color (RGBA8)
    fill: [u8; 4],
}

impl GlyphAtlasTextureBaker {
    /// Baker drawing white glyphs onto software surfaces
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            factory: Box::new(PixelSurfaceFactory),
            fill: [255, 255, 255, 255],
        }
    }

    /// Replace the surface factory
    pub fn with_factory(mut self, factory: Box<dyn SurfaceFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Replace the glyph fill color
    pub fn with_fill(mut self, fill: [u8; 4]) -> Self {
        self.fill = fill;
        self
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Register more families after construction (e.g. once a load completes)
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Bake `text` with `grid_cols` cells per row, each `cell_size` pixels square
    pub fn bake(
        &self,
        text: &str,
        font_family: &str,
        cell_size: f32,
        grid_cols: u32,
    ) -> GridResult<AtlasTexture> {
        let layout = AtlasLayout::for_text(text, grid_cols, cell_size)?;
        self.bake_layout(text, font_family, &layout)
    }

    /// Bake `text` onto an existing layout
    ///
    /// The layout must have at least one slot per character.
    pub fn bake_layout(
        &self,
        text: &str,
        font_family: &str,
        layout: &AtlasLayout,
    ) -> GridResult<AtlasTexture> {
        let char_count = text.chars().count();
        if char_count > layout.slot_count() as usize {
            return Err(GridError::invalid("layout slot_count", layout.slot_count()));
        }

        let (width, height) = layout.atlas_size();
        let cell = layout.cell_size();

        let mut surface = self.factory.create_surface(width, height);
        surface.clear();

        let font = self.fonts.resolve(font_family);
        if font.is_none() && char_count > 0 {
            warn!(
                "No font available for \"{}\", atlas left blank",
                font_family
            );
        }

        let style = TextStyle {
            font,
            size: cell * FONT_SIZE_RATIO,
            align: TextAlign::Center,
            fill: self.fill,
            max_width: Some(cell),
        };

        for (i, ch) in text.chars().enumerate() {
            let slot = layout.slot(i as u32);
            let (cell_x, cell_y) = layout.cell_origin(slot);
            let x = cell_x + cell * 0.5;
            let y = cell_y + cell * BASELINE_RATIO;
            debug!("Atlas cell {} ({}, {}): '{}'", i, slot.col, slot.row, ch);
            surface.fill_text(ch, x, y, &style);
        }

        let pixels = surface.finish();

        info!(
            "Glyph atlas baked: {}x{}, {} chars, {} cols, font=\"{}\"",
            width,
            height,
            char_count,
            layout.grid_cols(),
            font_family
        );

        Ok(AtlasTexture::new(width, height, pixels, *layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::surface::{PixelSurface, RasterSurface};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct DrawCall {
        ch: char,
        x: f32,
        y: f32,
        size: f32,
        align: TextAlign,
        max_width: Option<f32>,
    }

    #[derive(Default, Clone)]
    struct Recorder {
        surfaces: Rc<RefCell<Vec<(u32, u32)>>>,
        calls: Rc<RefCell<Vec<DrawCall>>>,
        clears: Rc<RefCell<usize>>,
    }

    struct RecordingSurface {
        width: u32,
        height: u32,
        recorder: Recorder,
    }

    impl RasterSurface for RecordingSurface {
        fn width(&self) -> u32 {
            self.width
        }
        fn height(&self) -> u32 {
            self.height
        }
        fn clear(&mut self) {
            *self.recorder.clears.borrow_mut() += 1;
        }
        fn fill_text(&mut self, ch: char, x: f32, y: f32, style: &TextStyle<'_>) {
            self.recorder.calls.borrow_mut().push(DrawCall {
                ch,
                x,
                y,
                size: style.size,
                align: style.align,
                max_width: style.max_width,
            });
        }
        fn finish(self: Box<Self>) -> Vec<u8> {
            vec![0u8; self.width as usize * self.height as usize * 4]
        }
    }

    impl SurfaceFactory for Recorder {
        fn create_surface(&self, width: u32, height: u32) -> Box<dyn RasterSurface> {
            self.surfaces.borrow_mut().push((width, height));
            Box::new(RecordingSurface {
                width,
                height,
                recorder: self.clone(),
            })
        }
    }

    fn recording_baker() -> (GlyphAtlasTextureBaker, Recorder) {
        let recorder = Recorder::default();
        let baker = GlyphAtlasTextureBaker::new(FontBook::new())
            .with_factory(Box::new(recorder.clone()));
        (baker, recorder)
    }

    fn assert_near(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{} != {}", a, b);
    }

    #[test]
    fn test_two_chars_one_row() {
        let (baker, rec) = recording_baker();
        let tex = baker.bake("AB", "Arial", 128.0, 2).unwrap();
        assert_eq!((tex.width, tex.height), (256, 128));
        assert_eq!(*rec.clears.borrow(), 1);

        let calls = rec.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].ch, 'A');
        assert_near(calls[0].x, 64.0);
        assert_near(calls[0].y, 102.4);
        assert_eq!(calls[1].ch, 'B');
        assert_near(calls[1].x, 192.0);
        assert_near(calls[1].y, 102.4);
        assert_near(calls[0].size, 102.4);
        assert_eq!(calls[0].align, TextAlign::Center);
        assert_eq!(calls[0].max_width, Some(128.0));
    }

    #[test]
    fn test_three_chars_wrap_to_second_row() {
        let (baker, rec) = recording_baker();
        let tex = baker.bake("ABC", "Arial", 128.0, 2).unwrap();
        assert_eq!((tex.width, tex.height), (256, 256));
        let calls = rec.calls.borrow();
        assert_eq!(calls[2].ch, 'C');
        assert_near(calls[2].x, 64.0);
        assert_near(calls[2].y, 230.4);
    }

    #[test]
    fn test_empty_text_has_one_row() {
        let (baker, rec) = recording_baker();
        let tex = baker.bake("", "Arial", 64.0, 3).unwrap();
        assert_eq!((tex.width, tex.height), (192, 64));
        assert!(rec.calls.borrow().is_empty());
        assert!(tex.is_blank());
    }

    #[test]
    fn test_texture_flags() {
        let (baker, _) = recording_baker();
        let tex = baker.bake("x", "Arial", 32.0, 1).unwrap();
        assert!(!tex.flip_y);
        assert!(tex.needs_upload);
        assert_eq!(tex.layout.slot_count(), 1);
    }

    #[test]
    fn test_fresh_surface_per_bake() {
        let (baker, rec) = recording_baker();
        baker.bake("AB", "Arial", 16.0, 2).unwrap();
        baker.bake("ABCDE", "Arial", 16.0, 2).unwrap();
        assert_eq!(*rec.surfaces.borrow(), vec![(32, 16), (32, 48)]);
    }

    /// Paints a 3x3 block of the fill color around each anchor point
    struct StampFactory;

    struct StampSurface {
        surface: PixelSurface,
    }

    impl SurfaceFactory for StampFactory {
        fn create_surface(&self, width: u32, height: u32) -> Box<dyn RasterSurface> {
            Box::new(StampSurface {
                surface: PixelSurface::new(width, height),
            })
        }
    }

    impl RasterSurface for StampSurface {
        fn width(&self) -> u32 {
            self.surface.width()
        }
        fn height(&self) -> u32 {
            self.surface.height()
        }
        fn clear(&mut self) {
            self.surface.clear();
        }
        fn fill_text(&mut self, _ch: char, x: f32, y: f32, style: &TextStyle<'_>) {
            let (x, y) = (x.round() as i32, y.round() as i32);
            self.surface
                .blit_coverage(x - 1, y - 1, 3, 3, &[255; 9], style.fill);
        }
        fn finish(self: Box<Self>) -> Vec<u8> {
            Box::new(self.surface).finish()
        }
    }

    #[test]
    fn test_rebake_leaves_previous_pixels_alone() {
        let baker = GlyphAtlasTextureBaker::new(FontBook::new())
            .with_factory(Box::new(StampFactory))
            .with_fill([200, 100, 50, 255]);

        let first = baker.bake("AB", "Arial", 16.0, 2).unwrap();
        let snapshot = first.pixels().to_vec();
        assert_eq!(first.pixel(8, 13), Some([200, 100, 50, 255]));
        assert_eq!(first.pixel(24, 13), Some([200, 100, 50, 255]));
        assert_eq!(first.pixel(16, 4), Some([0, 0, 0, 0]));

        let second = baker.bake("WWW", "Arial", 16.0, 2).unwrap();
        assert_eq!(first.pixels(), &snapshot[..]);
        assert_eq!((second.width, second.height), (32, 32));
        // Third glyph wraps to the second row; first texture has no such row
        assert_eq!(second.pixel(8, 29), Some([200, 100, 50, 255]));
        assert_eq!(first.pixel(8, 29), None);
    }

    #[test]
    fn test_multibyte_chars_counted_once() {
        let (baker, rec) = recording_baker();
        let tex = baker.bake("あいう", "Noto Sans CJK JP", 10.0, 3).unwrap();
        assert_eq!((tex.width, tex.height), (30, 10));
        assert_eq!(rec.calls.borrow().len(), 3);
    }

    #[test]
    fn test_layout_too_small() {
        let (baker, _) = recording_baker();
        let layout = AtlasLayout::new(1, 1, 8.0).unwrap();
        assert!(matches!(
            baker.bake_layout("AB", "Arial", &layout),
            Err(GridError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_invalid_arguments() {
        let (baker, _) = recording_baker();
        assert!(baker.bake("A", "Arial", 0.0, 1).is_err());
        assert!(baker.bake("A", "Arial", 16.0, 0).is_err());
    }

    #[test]
    fn test_missing_font_still_bakes() {
        let baker = GlyphAtlasTextureBaker::new(FontBook::new());
        let tex = baker.bake("AB", "Missing Family", 16.0, 2).unwrap();
        assert_eq!(tex.pixels().len(), 32 * 16 * 4);
        assert!(tex.is_blank());
    }
}
