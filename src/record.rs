//! Frame capture: animated GIF and single PNG stills

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use log::info;
use thiserror::Error;

use crate::rasterizer::Framebuffer;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no frames recorded")]
    Empty,
}

/// Collects rendered frames up to a fixed count
#[derive(Debug)]
pub struct Recorder {
    frames: Vec<RgbaImage>,
    limit: usize,
    delay_ms: u32,
}

impl Recorder {
    pub fn new(limit: usize, delay_ms: u32) -> Self {
        Self {
            frames: Vec::with_capacity(limit),
            limit,
            delay_ms,
        }
    }

    /// Capture the framebuffer. Returns true once the limit is reached;
    /// frames past the limit are ignored.
    pub fn push(&mut self, fb: &Framebuffer) -> bool {
        if self.frames.len() < self.limit {
            self.frames.push(fb.to_image());
        }
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Encode all frames as a looping GIF
    pub fn write_gif<P: AsRef<Path>>(self, path: P) -> Result<(), RecordError> {
        let path = path.as_ref();
        if self.frames.is_empty() {
            return Err(RecordError::Empty);
        }

        let file = File::create(path).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let encode_err = |source| RecordError::Encode {
            path: path.to_path_buf(),
            source,
        };

        let count = self.frames.len();
        let delay = Delay::from_numer_denom_ms(self.delay_ms, 1);
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder.set_repeat(Repeat::Infinite).map_err(encode_err)?;
        encoder
            .encode_frames(self.frames.into_iter().map(|img| Frame::from_parts(img, 0, 0, delay)))
            .map_err(encode_err)?;

        info!("wrote {} frames to {}", count, path.display());
        Ok(())
    }
}

/// Save the framebuffer as a single image; format follows the extension
pub fn save_frame<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<(), RecordError> {
    let path = path.as_ref();
    fb.to_image().save(path).map_err(|source| RecordError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    info!("saved frame to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("softraster-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_recorder_stops_at_limit() {
        let fb = Framebuffer::new(4, 4);
        let mut rec = Recorder::new(2, 10);
        assert!(!rec.push(&fb));
        assert!(rec.push(&fb));
        assert!(rec.push(&fb));
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn test_write_gif() {
        let path = scratch("anim.gif");
        let mut fb = Framebuffer::new(8, 8);
        let mut rec = Recorder::new(3, 10);
        for color in [Color::RED, Color::GREEN, Color::BLUE] {
            fb.clear(color);
            rec.push(&fb);
        }
        rec.write_gif(&path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 8);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_empty_recording_is_an_error() {
        let rec = Recorder::new(5, 10);
        assert!(matches!(rec.write_gif(scratch("empty.gif")), Err(RecordError::Empty)));
    }

    #[test]
    fn test_save_png_frame() {
        let path = scratch("still.png");
        let mut fb = Framebuffer::new(3, 2);
        fb.clear(Color::BACKGROUND);
        fb.set_pixel(2, 0, Color::RED);
        save_frame(&fb, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 1).0, [127, 127, 127, 255]);
        std::fs::remove_file(&path).ok();
    }
}
