//! Color + depth target for software rendering

use image::RgbaImage;

use super::types::Color;

/// Depth value the buffer resets to (far plane in NDC)
pub const DEPTH_CLEAR: f32 = 1.0;

/// Framebuffer for software rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel, row 0 at the top
    pub zbuffer: Vec<f32>,  // Depth buffer, indexed in rasterizer space (row 0 at the bottom)
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![DEPTH_CLEAR; width * height],
            width,
            height,
        }
    }

    /// Reset color to `color` and depth to the far plane
    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(DEPTH_CLEAR);
    }

    /// Write a color at image coordinates. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Read a color at image coordinates
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let p = &self.pixels[idx..idx + 4];
            Some(Color::with_alpha(p[0], p[1], p[2], p[3]))
        } else {
            None
        }
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.zbuffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Depth test in rasterizer coordinates. Passes when `z` is in front of
    /// the near plane and not behind the stored depth (ties go to the newest
    /// write); on pass the stored depth is replaced.
    pub fn test_and_set_depth(&mut self, x: usize, y: usize, z: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y * self.width + x;
        if z >= -1.0 && z <= self.zbuffer[idx] {
            self.zbuffer[idx] = z;
            true
        } else {
            false
        }
    }

    /// Copy into an owned image for encoding
    pub fn to_image(&self) -> RgbaImage {
        // Buffer length always matches width * height * 4
        RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width as u32, self.height as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_color_and_depth() {
        let mut fb = Framebuffer::new(3, 2);
        fb.set_pixel(1, 1, Color::RED);
        assert!(fb.test_and_set_depth(1, 1, 0.0));
        fb.clear(Color::BACKGROUND);
        assert_eq!(fb.pixel(1, 1), Some(Color::BACKGROUND));
        assert_eq!(fb.depth(1, 1), Some(DEPTH_CLEAR));
    }

    #[test]
    fn test_depth_less_or_equal_wins() {
        let mut fb = Framebuffer::new(1, 1);
        assert!(fb.test_and_set_depth(0, 0, 0.5));
        assert!(fb.test_and_set_depth(0, 0, 0.5));
        assert!(!fb.test_and_set_depth(0, 0, 0.6));
        assert!(fb.test_and_set_depth(0, 0, -0.2));
        assert_eq!(fb.depth(0, 0), Some(-0.2));
    }

    #[test]
    fn test_depth_rejects_in_front_of_near_plane() {
        let mut fb = Framebuffer::new(1, 1);
        assert!(!fb.test_and_set_depth(0, 0, -1.01));
        assert!(fb.test_and_set_depth(0, 0, -1.0));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut fb = Framebuffer::new(2, 2);
        fb.set_pixel(2, 0, Color::RED);
        assert!(!fb.test_and_set_depth(0, 2, 0.0));
        assert_eq!(fb.pixel(2, 0), None);
    }

    #[test]
    fn test_to_image_matches_pixels() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(Color::BLACK);
        fb.set_pixel(1, 0, Color::GREEN);
        let img = fb.to_image();
        assert_eq!(img.get_pixel(1, 0).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0, 255]);
    }
}
