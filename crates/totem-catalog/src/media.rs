//! Media decoding
//!
//! Turns catalog files into frames the renderers can paint. Decoding goes
//! through the [`MediaSource`] trait so renderers and the interpreter can be
//! tested without image files on disk.

use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, DynamicImage};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use totem_core::{AnimationFrame, ImageFrame};
use tracing::debug;

/// Delay used for GIF frames that declare none
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// Media errors
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Animation has no frames: {0}")]
    EmptyAnimation(PathBuf),

    #[error("Text file is empty: {0}")]
    EmptyText(PathBuf),

    #[error("Invalid artwork name: {0}")]
    InvalidName(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),
}

/// Loads catalog files into frames
pub trait MediaSource: Send + Sync {
    /// Decode a still image
    fn load_still(&self, path: &Path) -> Result<ImageFrame, MediaError>;

    /// Decode every frame of an animation with its display duration
    fn load_animation(&self, path: &Path) -> Result<Vec<AnimationFrame>, MediaError>;

    /// Read the first line of a text file
    fn load_text(&self, path: &Path) -> Result<String, MediaError>;
}

/// [`MediaSource`] backed by the `image` crate
///
/// Frames larger than the logical panel are shrunk to fit, keeping their
/// aspect ratio; smaller frames are left as they are.
#[derive(Debug, Clone, Copy)]
pub struct ImageMediaSource {
    pub width: u32,
    pub height: u32,
}

impl ImageMediaSource {
    /// Create a source for a logical panel size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn to_frame(&self, img: DynamicImage) -> ImageFrame {
        let img = if img.width() > self.width || img.height() > self.height {
            img.resize(self.width, self.height, FilterType::Lanczos3)
        } else {
            img
        };
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        ImageFrame {
            width,
            height,
            data: rgb.into_raw(),
        }
    }
}

impl Default for ImageMediaSource {
    fn default() -> Self {
        Self::new(64, 64)
    }
}

impl MediaSource for ImageMediaSource {
    fn load_still(&self, path: &Path) -> Result<ImageFrame, MediaError> {
        let img = image::open(path)?;
        Ok(self.to_frame(img))
    }

    fn load_animation(&self, path: &Path) -> Result<Vec<AnimationFrame>, MediaError> {
        let reader = BufReader::new(File::open(path)?);
        let decoder = GifDecoder::new(reader)?;

        let mut frames = Vec::new();
        for frame in decoder.into_frames() {
            let frame = frame?;
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom == 0 { 0 } else { numer / denom };
            let duration_ms = if delay_ms == 0 {
                DEFAULT_FRAME_DELAY_MS
            } else {
                delay_ms
            };
            let image = self.to_frame(DynamicImage::from(frame.into_buffer()));
            frames.push(AnimationFrame::new(image, duration_ms));
        }

        if frames.is_empty() {
            return Err(MediaError::EmptyAnimation(path.to_path_buf()));
        }

        debug!(path = %path.display(), frames = frames.len(), "Decoded animation");
        Ok(frames)
    }

    fn load_text(&self, path: &Path) -> Result<String, MediaError> {
        let content = std::fs::read_to_string(path)?;
        let line = content.lines().next().unwrap_or_default().trim_end();
        if line.is_empty() {
            return Err(MediaError::EmptyText(path.to_path_buf()));
        }
        Ok(line.to_string())
    }
}
