//! Core rendering functions
//! Triangle rasterization with depth testing and perspective-correct shading

use log::{debug, warn};

use super::framebuffer::Framebuffer;
use super::math::{barycentric, Vec3, Vec4};
use super::transform::{CameraPose, FrameTransforms, Lighting, ModelPose, Projection};
use super::types::{Color, Texture, TransformedTriangle, Triangle, Varyings};

/// Triangles with a smaller signed NDC area (twice the geometric area) are
/// treated as collinear and skipped before any per-pixel work.
pub const DEGENERATE_AREA: f32 = 1e-10;

/// Rasterizer settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSettings {
    pub projection: Projection,
    pub lighting: Lighting,
    /// Frame clear color
    pub background: Color,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            projection: Projection::default(),
            lighting: Lighting::default(),
            background: Color::BACKGROUND,
        }
    }
}

/// What happened to a single triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterOutcome {
    /// Clockwise or zero signed area
    BackFacing,
    /// Positive but below [`DEGENERATE_AREA`], or not a number
    Degenerate,
    /// Every vertex beyond the same face of the NDC cube
    Clipped,
    /// Walked; `pixels` passed the depth test and were written to the image
    Drawn { pixels: usize },
}

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub submitted: usize,
    pub back_facing: usize,
    pub degenerate: usize,
    pub clipped: usize,
    pub rasterized: usize,
    pub pixels_written: usize,
    /// Lighting was skipped because the model-view matrix was singular
    pub lighting_fallback: bool,
}

impl FrameStats {
    pub fn record(&mut self, outcome: RasterOutcome) {
        self.submitted += 1;
        match outcome {
            RasterOutcome::BackFacing => self.back_facing += 1,
            RasterOutcome::Degenerate => self.degenerate += 1,
            RasterOutcome::Clipped => self.clipped += 1,
            RasterOutcome::Drawn { pixels } => {
                self.rasterized += 1;
                self.pixels_written += pixels;
            }
        }
    }
}

/// Divide x, y, z by w
pub fn perspective_divide(v: Vec4) -> Vec3 {
    let inv_w = 1.0 / v.w;
    Vec3::new(v.x * inv_w, v.y * inv_w, v.z * inv_w)
}

/// Twice the signed area of the 2D triangle; positive when counter-clockwise
pub fn signed_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    a.x * b.y - b.x * a.y + b.x * c.y - c.x * b.y + c.x * a.y - a.x * c.y
}

/// Which side of the line (x0,y0)->(x1,y1) the point lies on
fn side(x0: f32, y0: f32, x1: f32, y1: f32, px: f32, py: f32) -> bool {
    (x1 - x0) * (py - y0) - (y1 - y0) * (px - x0) > 0.0
}

/// True when all three vertices fail the same bound of the [-1, 1] cube
fn outside_same_bound(a: Vec3, b: Vec3, c: Vec3) -> bool {
    let all = |f: fn(Vec3) -> bool| f(a) && f(b) && f(c);
    all(|v| v.x < -1.0)
        || all(|v| v.x > 1.0)
        || all(|v| v.y < -1.0)
        || all(|v| v.y > 1.0)
        || all(|v| v.z < -1.0)
        || all(|v| v.z > 1.0)
}

/// Map an NDC coordinate to a continuous pixel coordinate (pixel centers at integers)
pub fn ndc_to_pixel(ndc: f32, size: usize) -> f32 {
    (ndc + 1.0) / 2.0 * size as f32 - 0.5
}

/// Map a pixel index to the NDC coordinate of its center
pub fn pixel_center_to_ndc(p: usize, size: usize) -> f32 {
    (p as f32 + 0.5) / size as f32 * 2.0 - 1.0
}

/// Inclusive pixel span covering [min_ndc, max_ndc], clamped to the target.
/// `None` when the span misses the target entirely.
fn pixel_span(min_ndc: f32, max_ndc: f32, size: usize) -> Option<(usize, usize)> {
    if size == 0 {
        return None;
    }
    let last = (size - 1) as f32;
    let lo = ndc_to_pixel(min_ndc, size).floor();
    let hi = ndc_to_pixel(max_ndc, size).ceil();
    if hi < 0.0 || lo > last {
        return None;
    }
    Some((lo.max(0.0) as usize, hi.min(last) as usize))
}

/// Weight each barycentric coordinate by 1/w and renormalize
pub fn perspective_weights(bary: Vec3, w: [f32; 3]) -> [f32; 3] {
    let ia = bary.x / w[0];
    let ib = bary.y / w[1];
    let ic = bary.z / w[2];
    let sum = ia + ib + ic;
    [ia / sum, ib / sum, ic / sum]
}

fn resolve_color(varyings: &Varyings, texture: Option<&Texture>) -> Color {
    match texture {
        None => Color::from_unit(varyings.color),
        Some(tex) => tex.sample(varyings.uv.x, varyings.uv.y),
    }
}

/// Rasterize a single triangle
pub fn rasterize_triangle(fb: &mut Framebuffer, tri: &TransformedTriangle) -> RasterOutcome {
    let [ra, rb, rc] = tri.clip;
    let a = perspective_divide(ra);
    let b = perspective_divide(rb);
    let c = perspective_divide(rc);

    // Only counter-clockwise triangles face the camera
    let area = signed_area(a, b, c);
    if area <= 0.0 {
        return RasterOutcome::BackFacing;
    }
    if area.is_nan() || area < DEGENERATE_AREA {
        return RasterOutcome::Degenerate;
    }

    if outside_same_bound(a, b, c) {
        return RasterOutcome::Clipped;
    }

    let min_x = a.x.min(b.x).min(c.x);
    let max_x = a.x.max(b.x).max(c.x);
    let min_y = a.y.min(b.y).min(c.y);
    let max_y = a.y.max(b.y).max(c.y);

    let (Some((min_px, max_px)), Some((min_py, max_py))) = (
        pixel_span(min_x, max_x, fb.width),
        pixel_span(min_y, max_y, fb.height),
    ) else {
        return RasterOutcome::Clipped;
    };

    let w = [ra.w, rb.w, rc.w];
    let texture = tri.texture.texture();
    let mut pixels = 0;

    for py in min_py..=max_py {
        let y = pixel_center_to_ndc(py, fb.height);
        for px in min_px..=max_px {
            let x = pixel_center_to_ndc(px, fb.width);

            let s0 = side(a.x, a.y, b.x, b.y, x, y);
            let s1 = side(b.x, b.y, c.x, c.y, x, y);
            let s2 = side(c.x, c.y, a.x, a.y, x, y);
            if s0 != s1 || s1 != s2 {
                continue;
            }

            // Depth is linear in NDC z, not perspective corrected
            let bc = barycentric(x, y, a, b, c);
            let depth = bc.x * a.z + bc.y * b.z + bc.z * c.z;
            if !fb.test_and_set_depth(px, py, depth) {
                continue;
            }

            // Origin is bottom-left: rasterizer row py lands on image row
            // height - py, so row 0 falls past the last image row and is dropped
            if py == 0 {
                continue;
            }

            let varyings = Varyings::blend(&tri.varyings, perspective_weights(bc, w));
            let color = resolve_color(&varyings, texture);
            fb.set_pixel(px, fb.height - py, color);
            pixels += 1;
        }
    }

    RasterOutcome::Drawn { pixels }
}

/// Rasterize already-transformed triangles in submission order
pub fn draw_triangles(fb: &mut Framebuffer, triangles: &[TransformedTriangle]) -> FrameStats {
    let mut stats = FrameStats::default();
    for tri in triangles {
        stats.record(rasterize_triangle(fb, tri));
    }
    stats
}

/// Render one full frame: clear, transform, rasterize
pub fn render_frame(
    fb: &mut Framebuffer,
    triangles: &[Triangle],
    camera: &CameraPose,
    model: &ModelPose,
    settings: &RasterSettings,
) -> FrameStats {
    fb.clear(settings.background);

    let aspect = fb.width as f32 / fb.height.max(1) as f32;
    let projection = settings.projection.matrix(aspect);

    let mut lighting_fallback = false;
    let transforms = match FrameTransforms::new(camera, model, &projection, &settings.lighting) {
        Ok(xf) => xf,
        Err(e) => {
            warn!("{}; rendering this frame unlit", e);
            lighting_fallback = true;
            FrameTransforms::without_normals(camera, model, &projection, &settings.lighting)
        }
    };

    let transformed = transforms.transform_triangles(triangles, &settings.lighting);
    let mut stats = draw_triangles(fb, &transformed);
    stats.lighting_fallback = lighting_fallback;

    debug!(
        "frame: {} tris, {} back-facing, {} degenerate, {} clipped, {} drawn, {} px",
        stats.submitted,
        stats.back_facing,
        stats.degenerate,
        stats.clipped,
        stats.rasterized,
        stats.pixels_written
    );

    stats
}
