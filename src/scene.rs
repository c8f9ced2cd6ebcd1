//! Viewport and camera
//!
//! The application passes window size in as a value and calls
//! [`PerspectiveCamera::handle_resize`] when it changes; nothing here
//! reads window state on its own.

use log::debug;

use crate::constants::{CAMERA_DISTANCE, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, MAX_PIXEL_RATIO};

/// Window size in CSS/logical pixels plus device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Render pixel ratio: device ratio capped at MAX_PIXEL_RATIO (1.0 if unknown)
    pub fn pixel_ratio(&self) -> f32 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Drawing buffer size in device pixels
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let r = self.pixel_ratio();
        (
            (self.width as f32 * r).round() as u32,
            (self.height as f32 * r).round() as u32,
        )
    }
}

/// Perspective camera looking down -Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            aspect: 1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: [0.0, 0.0, CAMERA_DISTANCE],
        }
    }
}

impl PerspectiveCamera {
    /// Update aspect ratio for a new viewport
    pub fn handle_resize(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
        debug!(
            "Camera resized: {}x{} (aspect {:.3})",
            viewport.width, viewport.height, self.aspect
        );
    }

    /// Column-major projection matrix (OpenGL clip space, z in [-1, 1])
    pub fn projection_matrix(&self) -> [f32; 16] {
        let f = 1.0 / (self.fov_deg.to_radians() * 0.5).tan();
        let nf = 1.0 / (self.near - self.far);
        [
            f / self.aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (self.far + self.near) * nf, -1.0,
            0.0, 0.0, 2.0 * self.far * self.near * nf, 0.0,
        ]
    }

    /// Column-major view matrix (translation only)
    pub fn view_matrix(&self) -> [f32; 16] {
        let [x, y, z] = self.position;
        [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            -x, -y, -z, 1.0,
        ]
    }
}
