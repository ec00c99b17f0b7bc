//! Core types for the rasterizer

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::math::{Vec2, Vec3, Vec4};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    /// Frame clear color
    pub const BACKGROUND: Color = Color { r: 127, g: 127, b: 127, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from 0.0-1.0 channels, rounding to the nearest
    /// 8-bit step. Out-of-range values saturate.
    pub fn from_unit(rgb: Vec3) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: channel(rgb.x),
            g: channel(rgb.y),
            b: channel(rgb.z),
            a: 255,
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A vertex with position, texture coordinate, and normal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self { pos, uv, normal }
    }
}

/// Decoded texture in the canonical sampling format: tightly packed RGBA,
/// row 0 at the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
            name: String::new(),
        }
    }

    /// Convert any decoded image into the canonical RGBA layout
    pub fn from_image(img: &image::DynamicImage, name: String) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        }
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Nearest-neighbour sample with repeat wrapping.
    ///
    /// The image is stored top-down, so texel row `ty` is read from stored
    /// row `height - ty`. `ty = 0` has no such row and reads the last stored
    /// row, same as `ty = 1`.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::BLACK;
        }

        let u = wrap_unit(u);
        let v = wrap_unit(v);

        let tx = ((u * self.width as f32) as usize).min(self.width - 1);
        let ty = ((v * self.height as f32) as usize).min(self.height - 1);
        let row = (self.height - ty).min(self.height - 1);
        self.pixels[row * self.width + tx]
    }
}

/// Wrap a texture coordinate into [0, 1)
pub fn wrap_unit(t: f32) -> f32 {
    let f = t % 1.0;
    if f < 0.0 {
        // -1e-9 + 1.0 rounds to 1.0 in f32
        (f + 1.0).min(1.0 - f32::EPSILON)
    } else {
        f
    }
}

/// Texture attached to a triangle
#[derive(Debug, Clone, Default)]
pub enum TextureBinding {
    #[default]
    None,
    Bound(Arc<Texture>),
}

impl TextureBinding {
    pub fn bound(texture: Texture) -> Self {
        TextureBinding::Bound(Arc::new(texture))
    }

    pub fn texture(&self) -> Option<&Texture> {
        match self {
            TextureBinding::None => None,
            TextureBinding::Bound(tex) => Some(tex),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, TextureBinding::Bound(_))
    }
}

/// Source triangle: three attribute bundles plus its texture.
/// Built once by scene preparation and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub texture: TextureBinding,
}

impl Triangle {
    pub fn new(vertices: [Vertex; 3], texture: TextureBinding) -> Self {
        Self { vertices, texture }
    }
}

/// Per-vertex values interpolated across a triangle.
///
/// Slot layout when flattened (see [`Varyings::to_slots`]):
///
/// | slot | meaning |
/// |------|---------|
/// | 0-2  | lit diffuse color R, G, B in 0.0-1.0 |
/// | 3-4  | texture coordinate U, V |
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Varyings {
    pub color: Vec3,
    pub uv: Vec2,
}

impl Varyings {
    pub const SLOTS: usize = 5;

    pub fn new(color: Vec3, uv: Vec2) -> Self {
        Self { color, uv }
    }

    pub fn to_slots(self) -> [f32; Self::SLOTS] {
        [self.color.x, self.color.y, self.color.z, self.uv.x, self.uv.y]
    }

    pub fn from_slots(s: [f32; Self::SLOTS]) -> Self {
        Self {
            color: Vec3::new(s[0], s[1], s[2]),
            uv: Vec2::new(s[3], s[4]),
        }
    }

    /// Weighted blend of three vertices' varyings
    pub fn blend(v: &[Varyings; 3], weights: [f32; 3]) -> Self {
        let slots = [v[0].to_slots(), v[1].to_slots(), v[2].to_slots()];
        Self::from_slots(interpolate(&slots, weights))
    }
}

/// Blend any fixed number of scalar interpolants with three weights
pub fn interpolate<const N: usize>(values: &[[f32; N]; 3], weights: [f32; 3]) -> [f32; N] {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = values[0][i] * weights[0] + values[1][i] * weights[1] + values[2][i] * weights[2];
    }
    out
}

/// Per-frame derived triangle, ready for rasterization
#[derive(Debug, Clone)]
pub struct TransformedTriangle {
    /// Homogeneous clip-space positions
    pub clip: [Vec4; 3],
    pub varyings: [Varyings; 3],
    pub texture: TextureBinding,
}
