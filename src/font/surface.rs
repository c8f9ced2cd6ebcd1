//! Off-screen raster surfaces
//!
//! The atlas baker never creates pixel buffers itself: it asks a
//! [`SurfaceFactory`] for a [`RasterSurface`] and issues canvas-like
//! `fill_text` calls. [`PixelSurface`] is the default software target,
//! rasterizing with fontdue into an RGBA8 buffer.

use fontdue::Font;
use log::trace;
use std::borrow::Cow;

use crate::utils::color::blend_over;

/// Horizontal anchor of `fill_text` relative to x
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Text drawing state for one bake
#[derive(Clone, Copy)]
pub struct TextStyle<'a> {
    /// Resolved font (None = no font available, nothing is drawn)
    pub font: Option<&'a Font>,
    /// Font size in pixels
    pub size: f32,
    /// Horizontal anchor
    pub align: TextAlign,
    /// Fill color (RGBA8)
    pub fill: [u8; 4],
    /// Glyphs wider than this are condensed horizontally to fit
    pub max_width: Option<f32>,
}

impl std::fmt::Debug for TextStyle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStyle")
            .field("font", &self.font.map(|_| "<font>"))
            .field("size", &self.size)
            .field("align", &self.align)
            .field("fill", &self.fill)
            .field("max_width", &self.max_width)
            .finish()
    }
}

/// Drawing target for one atlas
pub trait RasterSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Reset every pixel to transparent black
    fn clear(&mut self);
    /// Draw one character with its baseline at `y`, anchored at `x` per `style.align`
    fn fill_text(&mut self, ch: char, x: f32, y: f32, style: &TextStyle<'_>);
    /// Consume the surface, returning RGBA8 rows (top row first)
    fn finish(self: Box<Self>) -> Vec<u8>;
}

/// Creates raster surfaces on demand
pub trait SurfaceFactory {
    fn create_surface(&self, width: u32, height: u32) -> Box<dyn RasterSurface>;
}

/// Factory for [`PixelSurface`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelSurfaceFactory;

impl SurfaceFactory for PixelSurfaceFactory {
    fn create_surface(&self, width: u32, height: u32) -> Box<dyn RasterSurface> {
        Box::new(PixelSurface::new(width, height))
    }
}

/// Software RGBA8 surface
pub struct PixelSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// RGBA at (x, y), None outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Blend a coverage bitmap with its top-left corner at (x0, y0); clips at the edges
    pub(crate) fn blit_coverage(&mut self, x0: i32, y0: i32, bw: usize, bh: usize, coverage: &[u8], fill: [u8; 4]) {
        for by in 0..bh {
            let y = y0 + by as i32;
            if y < 0 || y >= self.height as i32 {
                continue;
            }
            for bx in 0..bw {
                let x = x0 + bx as i32;
                if x < 0 || x >= self.width as i32 {
                    continue;
                }
                let c = coverage[by * bw + bx];
                if c == 0 {
                    continue;
                }
                let i = (y as usize * self.width as usize + x as usize) * 4;
                let dst = [
                    self.data[i],
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ];
                let out = blend_over(dst, fill, c as f32 / 255.0);
                self.data[i..i + 4].copy_from_slice(&out);
            }
        }
    }
}

impl RasterSurface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.data.fill(0);
    }

    fn fill_text(&mut self, ch: char, x: f32, y: f32, style: &TextStyle<'_>) {
        let Some(font) = style.font else {
            return;
        };

        let (metrics, bitmap) = font.rasterize(ch, style.size);

        // Over-wide glyphs are condensed horizontally only, height is kept
        let scale_x = match style.max_width {
            Some(max_width) if metrics.advance_width > max_width && max_width > 0.0 => {
                max_width / metrics.advance_width
            }
            _ => 1.0,
        };
        let (coverage, bitmap_width) =
            condense_columns(&bitmap, metrics.width, metrics.height, scale_x);

        let advance = metrics.advance_width * scale_x;
        let pen_x = match style.align {
            TextAlign::Left => x,
            TextAlign::Center => x - advance * 0.5,
            TextAlign::Right => x - advance,
        };

        // fontdue ymin is the bitmap bottom relative to the baseline (Y up)
        let left = (pen_x + metrics.xmin as f32 * scale_x).round() as i32;
        let top = (y - (metrics.ymin as f32 + metrics.height as f32)).round() as i32;

        trace!(
            "fill_text '{}' at ({:.1}, {:.1}) scale_x={:.3} bitmap={}x{}",
            ch,
            x,
            y,
            scale_x,
            bitmap_width,
            metrics.height
        );

        self.blit_coverage(left, top, bitmap_width, metrics.height, &coverage, style.fill);
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        self.data
    }
}

/// Horizontally resample a `width` x `height` coverage bitmap by `scale` (<= 1)
///
/// Each output column averages the source columns it covers, weighted by
/// overlap. Returns the bitmap and its new width.
fn condense_columns(coverage: &[u8], width: usize, height: usize, scale: f32) -> (Cow<'_, [u8]>, usize) {
    if scale >= 1.0 || width == 0 || height == 0 {
        return (Cow::Borrowed(coverage), width);
    }
    let out_width = ((width as f32 * scale).ceil() as usize).max(1);
    let step = 1.0 / scale;
    let mut out = vec![0u8; out_width * height];

    for row in 0..height {
        let src = &coverage[row * width..(row + 1) * width];
        for (dx, dst) in out[row * out_width..(row + 1) * out_width].iter_mut().enumerate() {
            let start = dx as f32 * step;
            let end = ((dx + 1) as f32 * step).min(width as f32);
            if end <= start {
                continue;
            }
            let mut sum = 0.0;
            let mut sx = start.floor() as usize;
            while sx < width && (sx as f32) < end {
                let overlap = end.min(sx as f32 + 1.0) - start.max(sx as f32);
                sum += src[sx] as f32 * overlap;
                sx += 1;
            }
            *dst = (sum / (end - start)).round().clamp(0.0, 255.0) as u8;
        }
    }
    (Cow::Owned(out), out_width)
}
