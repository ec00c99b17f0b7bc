//! Scene loading: OBJ/MTL files to renderable triangles

mod obj;
mod prepare;

pub use obj::*;
pub use prepare::*;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::rasterizer::Triangle;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: {kind} index {index} out of range")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
    },
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Load an OBJ file and prepare its triangles
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Vec<Triangle>, SceneError> {
    let path = path.as_ref();
    let objects = load_obj(path)?;
    let triangles = prepare_triangles(&objects);
    log::info!(
        "loaded {}: {} objects, {} triangles",
        path.display(),
        objects.len(),
        triangles.len()
    );
    Ok(triangles)
}
