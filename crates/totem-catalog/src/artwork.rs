//! Artwork ingestion
//!
//! New content arrives as raw image bytes, either uploaded directly or
//! fetched from a URL by an [`ArtworkFetcher`]. It is resized to the logical
//! panel size and saved under the images root so the next scan finds it too.

use crate::catalog::{CatalogEntry, ContentKind};
use crate::media::MediaError;
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{AnimationDecoder, Frame, ImageFormat};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use tracing::info;

/// Retrieves artwork bytes from a URL
pub trait ArtworkFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MediaError>;
}

/// Validate and normalise an artwork name
///
/// Names become file stems, so anything that could escape the images root is
/// rejected.
pub fn artwork_name(name: &str) -> Result<String, MediaError> {
    let name = name.trim().to_lowercase();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(MediaError::InvalidName(name));
    }
    Ok(name)
}

/// Resize artwork and write it to `<dir>/<name>.png` or `<dir>/<name>.gif`
///
/// GIF input keeps every frame and its delay; everything else is stored as a
/// single PNG.
pub fn store_artwork(
    bytes: &[u8],
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
) -> Result<CatalogEntry, MediaError> {
    let name = artwork_name(name)?;
    std::fs::create_dir_all(dir)?;

    let format = image::guess_format(bytes)?;
    let entry = if format == ImageFormat::Gif {
        let path = dir.join(format!("{name}.gif"));
        store_gif(bytes, &path, width, height)?;
        CatalogEntry {
            name,
            path,
            kind: ContentKind::Animated,
        }
    } else {
        let path = dir.join(format!("{name}.png"));
        image::load_from_memory(bytes)?
            .resize_exact(width, height, FilterType::Lanczos3)
            .save_with_format(&path, ImageFormat::Png)?;
        CatalogEntry {
            name,
            path,
            kind: ContentKind::Still,
        }
    };

    info!(name = %entry.name, path = %entry.path.display(), "Stored artwork");
    Ok(entry)
}

fn store_gif(bytes: &[u8], path: &Path, width: u32, height: u32) -> Result<(), MediaError> {
    let decoder = GifDecoder::new(Cursor::new(bytes))?;
    let frames = decoder
        .into_frames()
        .map(|frame| {
            let frame = frame?;
            let delay = frame.delay();
            let resized =
                image::imageops::resize(frame.buffer(), width, height, FilterType::Lanczos3);
            Ok(Frame::from_parts(resized, 0, 0, delay))
        })
        .collect::<Result<Vec<_>, image::ImageError>>()?;

    let mut encoder = GifEncoder::new(BufWriter::new(File::create(path)?));
    encoder.set_repeat(Repeat::Infinite)?;
    encoder.encode_frames(frames)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Delay, ImageEncoder, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 255, 0, 255]));
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    fn gif_bytes() -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut out);
            let frames = (0..3).map(|i| {
                Frame::from_parts(
                    RgbaImage::from_pixel(100, 100, Rgba([i * 80, 0, 0, 255])),
                    0,
                    0,
                    Delay::from_numer_denom_ms(80, 1),
                )
            });
            encoder.encode_frames(frames).unwrap();
        }
        out
    }

    #[test]
    fn test_artwork_name() {
        assert_eq!(artwork_name(" Shrek ").unwrap(), "shrek");
        assert!(artwork_name("../etc").is_err());
        assert!(artwork_name("a/b").is_err());
        assert!(artwork_name("").is_err());
    }

    #[test]
    fn test_store_still() {
        let temp_dir = TempDir::new().unwrap();
        let entry = store_artwork(&png_bytes(200, 100), temp_dir.path(), "Frog", 64, 64).unwrap();

        assert_eq!(entry.name, "frog");
        assert_eq!(entry.kind, ContentKind::Still);
        assert_eq!(entry.path, temp_dir.path().join("frog.png"));

        let stored = image::open(&entry.path).unwrap();
        assert_eq!((stored.width(), stored.height()), (64, 64));
    }

    #[test]
    fn test_store_gif_keeps_frames() {
        let temp_dir = TempDir::new().unwrap();
        let entry = store_artwork(&gif_bytes(), temp_dir.path(), "pulse", 64, 64).unwrap();

        assert_eq!(entry.kind, ContentKind::Animated);

        let reader = std::io::BufReader::new(File::open(&entry.path).unwrap());
        let frames = GifDecoder::new(reader)
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].buffer().dimensions(), (64, 64));
    }

    #[test]
    fn test_store_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        assert!(store_artwork(b"nope", temp_dir.path(), "x", 64, 64).is_err());
    }
}
