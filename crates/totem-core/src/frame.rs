//! RGB pixel frames

use crate::color::{Brightness, Rgb};

/// Image frame - packed RGB8 pixel buffer, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Raw pixel data, 3 bytes per pixel
    pub data: Vec<u8>,
}

impl ImageFrame {
    /// Create a new black frame
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 3) as usize],
        }
    }

    /// Wrap existing RGB8 data
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width * height * 3) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Get pixel at position
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) as usize) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Set pixel at position, ignoring out-of-bounds writes
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) as usize) * 3;
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }

    /// Signed variant of [`set_pixel`](Self::set_pixel) for drawing code that
    /// works with off-screen coordinates
    pub fn plot(&mut self, x: i32, y: i32, rgb: Rgb) {
        if x < 0 || y < 0 {
            return;
        }
        self.set_pixel(x as u32, y as u32, rgb);
    }

    /// Fill entire frame with a color
    pub fn fill(&mut self, rgb: Rgb) {
        for px in self.data.chunks_exact_mut(3) {
            px.copy_from_slice(&rgb);
        }
    }

    /// Reset to black
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Copy `src` into this frame with its top-left corner at `(x, y)`
    pub fn blit(&mut self, src: &ImageFrame, x: i32, y: i32) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                if let Some(px) = src.get_pixel(sx, sy) {
                    self.plot(x + sx as i32, y + sy as i32, px);
                }
            }
        }
    }

    /// Scale every channel by `brightness`
    pub fn dim(&mut self, brightness: Brightness) {
        if brightness == Brightness::FULL {
            return;
        }
        for channel in &mut self.data {
            *channel = brightness.scale(*channel);
        }
    }

    /// Whether every pixel is black
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|b| *b == 0)
    }
}
