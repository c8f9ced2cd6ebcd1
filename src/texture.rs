//! Baked atlas texture
//!
//! CPU-side RGBA8 image plus the flags a renderer needs to upload it.

use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::path::Path;

use crate::layout::AtlasLayout;

/// Result of one atlas bake
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasTexture {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row 0 of `pixels` is texture v = 0; renderers must not flip on upload
    pub flip_y: bool,
    /// Pixel data must be (re)transferred to the GPU before next use
    pub needs_upload: bool,
    /// Grid the glyphs were placed on
    pub layout: AtlasLayout,
    /// RGBA8, non-premultiplied, top row first
    pixels: Vec<u8>,
}

impl AtlasTexture {
    pub(crate) fn new(width: u32, height: u32, pixels: Vec<u8>, layout: AtlasLayout) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            flip_y: false,
            needs_upload: true,
            layout,
            pixels,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA at (x, y), None outside the texture
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// True when no pixel has any alpha
    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|p| p[3] == 0)
    }

    /// Renderer calls this after transferring pixel data
    pub fn mark_uploaded(&mut self) {
        self.needs_upload = false;
    }

    /// Encode as PNG
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        Ok(())
    }

    /// Save as PNG file
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.write_png(std::io::BufWriter::new(file))
            .with_context(|| format!("Failed to encode {}", path.display()))?;
        info!(
            "Atlas saved: {} ({}x{})",
            path.display(),
            self.width,
            self.height
        );
        Ok(())
    }
}
