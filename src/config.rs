//! Viewer configuration, stored as RON
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```ron
//! (
//!   width: 800,
//!   height: 600,
//!   scene: Some("assets/head.obj"),
//! )
//! ```

use std::f32::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rasterizer::{
    CameraPose, Color, Lighting, ModelPose, Projection, RasterSettings, Vec3, HEIGHT, WIDTH,
};

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    SerializeError(#[from] ron::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Frame capture settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    pub enabled: bool,
    /// Stop and write the animation after this many frames
    pub frames: usize,
    pub output: PathBuf,
    /// Model rotation added per recorded frame (radians)
    pub spin_per_frame: f32,
    /// GIF frame delay in milliseconds
    pub frame_delay_ms: u32,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frames: 200,
            output: PathBuf::from("out.gif"),
            spin_per_frame: PI / 100.0,
            frame_delay_ms: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// OBJ file to load; the built-in cube is shown when unset
    pub scene: Option<PathBuf>,
    pub projection: Projection,
    pub lighting: Lighting,
    pub background: Color,
    pub camera: CameraPose,
    pub model: ModelPose,
    /// Camera speed in units per second
    pub move_speed: f32,
    /// Radians of turn per pixel of mouse travel
    pub mouse_sensitivity: f32,
    /// Model rotation per key press (radians)
    pub rotation_step: f32,
    pub record: RecordConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            scene: None,
            projection: Projection::default(),
            lighting: Lighting::default(),
            background: Color::BACKGROUND,
            camera: CameraPose::default(),
            model: ModelPose {
                scale: Vec3::new(3.0, 3.0, 3.0),
                rotation_y: 0.0,
                rotation_x: 0.0,
                translation: Vec3::new(-0.1, -0.5, -0.5),
            },
            move_speed: 10.0,
            mouse_sensitivity: 0.01,
            rotation_step: 0.1,
            record: RecordConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn raster_settings(&self) -> RasterSettings {
        RasterSettings {
            projection: self.projection,
            lighting: self.lighting,
            background: self.background,
        }
    }

    /// Reject values the pipeline cannot render with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "framebuffer size {}x{} is empty",
                self.width, self.height
            )));
        }
        let p = &self.projection;
        if !(p.near > 0.0 && p.far > p.near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far (near {}, far {})",
                p.near, p.far
            )));
        }
        if !(p.fov_degrees > 0.0 && p.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!("field of view {} out of range", p.fov_degrees)));
        }
        if self.record.enabled && self.record.frames == 0 {
            return Err(ConfigError::Invalid("recording needs at least one frame".to_string()));
        }
        Ok(())
    }
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<RenderConfig, ConfigError> {
    let config: RenderConfig = ron::from_str(s)?;
    config.validate()?;
    Ok(config)
}
