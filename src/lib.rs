//! Softraster: a software triangle rasterizer
//!
//! Loads OBJ/MTL scenes and renders them entirely on the CPU:
//! - Model/view/projection transforms with per-vertex diffuse lighting
//! - Back-face culling and trivial reject against the clip cube
//! - Depth buffering and perspective-correct interpolation
//! - Nearest-neighbour texture sampling with repeat wrapping

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod rasterizer;
pub mod scene;
pub mod config;
pub mod record;
pub mod app;
