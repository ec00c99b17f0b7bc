//! Software triangle rasterizer
//!
//! Pipeline per frame:
//! - Transform: model/view/projection to clip space, per-vertex diffuse lighting
//! - Clip: back-face culling and trivial reject against the NDC cube
//! - Rasterize: bounding-box walk with edge-side inside test
//! - Shade: perspective-correct interpolation, texture lookup, depth test

mod math;
mod types;
mod framebuffer;
mod transform;
mod render;

pub use math::*;
pub use types::*;
pub use framebuffer::*;
pub use transform::*;
pub use render::*;

/// Default framebuffer dimensions
pub const WIDTH: usize = 512;
pub const HEIGHT: usize = 512;
