//! Pixel codec and panel composition
//!
//! The browser canvas sends one byte per pixel packed as `RRRGGGBB`. The
//! physical panel is a stack of logical-sized faces; one logical frame is
//! duplicated onto every face.

use crate::color::Rgb;
use crate::frame::ImageFrame;
use serde::{Deserialize, Serialize};

/// Decode a 3-3-2 packed byte into RGBA
///
/// Each field is scaled with `round(field / max * 255)`; alpha is always 255.
pub fn decode_color(byte: u8) -> [u8; 4] {
    let r3 = (byte >> 5) & 0x07;
    let g3 = (byte >> 2) & 0x07;
    let b2 = byte & 0x03;

    [scale(r3, 7), scale(g3, 7), scale(b2, 3), 255]
}

fn scale(field: u8, max: u8) -> u8 {
    (field as f32 / max as f32 * 255.0).round() as u8
}

/// Pack an RGB color into 3-3-2 by keeping the top bits of each channel
pub fn encode_color(rgb: Rgb) -> u8 {
    let r3 = rgb[0] >> 5;
    let g3 = rgb[1] >> 5;
    let b2 = rgb[2] >> 6;
    (r3 << 5) | (g3 << 2) | b2
}

/// Decode a row-major grid of packed bytes into an RGB frame
///
/// Missing cells (short input) stay black.
pub fn decode_grid(cells: &[u8], width: u32, height: u32) -> ImageFrame {
    let mut frame = ImageFrame::new(width, height);
    for (i, byte) in cells.iter().take((width * height) as usize).enumerate() {
        let [r, g, b, _] = decode_color(*byte);
        let x = i as u32 % width;
        let y = i as u32 / width;
        frame.set_pixel(x, y, [r, g, b]);
    }
    frame
}

/// How extra faces of the physical panel are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Duplication {
    /// Every face shows the logical frame as-is
    #[default]
    Repeat,
    /// Odd faces show the frame flipped vertically and mirrored horizontally
    MirrorFlip,
}

/// Geometry of the physical panel in terms of logical faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelLayout {
    /// Logical width in pixels
    pub width: u32,
    /// Logical height in pixels
    pub height: u32,
    /// Number of stacked faces (the physical height is `height * faces`)
    pub faces: u32,
    /// Fill policy for faces after the first
    pub duplication: Duplication,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            faces: 2,
            duplication: Duplication::Repeat,
        }
    }
}

impl PanelLayout {
    /// Physical panel width
    pub fn physical_width(&self) -> u32 {
        self.width
    }

    /// Physical panel height
    pub fn physical_height(&self) -> u32 {
        self.height * self.faces.max(1)
    }

    /// Y offset of every face
    pub fn face_offsets(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.faces.max(1)).map(move |f| (f * self.height) as i32)
    }

    /// Build the physical frame from one logical frame
    ///
    /// Source pixels outside the logical frame read as black, so frames of a
    /// different size are cropped or padded rather than rejected.
    pub fn compose(&self, logical: &ImageFrame) -> ImageFrame {
        let mut physical = ImageFrame::new(self.physical_width(), self.physical_height());

        for face in 0..self.faces.max(1) {
            let flipped = self.duplication == Duplication::MirrorFlip && face % 2 == 1;
            let y_base = face * self.height;

            for y in 0..self.height {
                for x in 0..self.width {
                    let (sx, sy) = if flipped {
                        (self.width - 1 - x, self.height - 1 - y)
                    } else {
                        (x, y)
                    };
                    if let Some(px) = logical.get_pixel(sx, sy) {
                        physical.set_pixel(x, y_base + y, px);
                    }
                }
            }
        }

        physical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_extremes() {
        assert_eq!(decode_color(0x00), [0, 0, 0, 255]);
        assert_eq!(decode_color(0xFF), [255, 255, 255, 255]);
        assert_eq!(decode_color(0b1110_0000), [255, 0, 0, 255]);
        assert_eq!(decode_color(0b0001_1100), [0, 255, 0, 255]);
        assert_eq!(decode_color(0b0000_0011), [0, 0, 255, 255]);
    }

    #[test]
    fn test_decode_scaling_rounds() {
        // 3/7 * 255 = 109.28, 1/3 * 255 = 85
        assert_eq!(decode_color(0b0110_0001), [109, 0, 85, 255]);
    }

    #[test]
    fn test_decode_every_byte_is_opaque_and_deterministic() {
        for b in 0..=255u8 {
            let first = decode_color(b);
            assert_eq!(first[3], 255);
            assert_eq!(first, decode_color(b));
        }
    }

    #[test]
    fn test_encode_keeps_top_bits() {
        assert_eq!(encode_color([255, 255, 255]), 0xFF);
        assert_eq!(encode_color([255, 0, 0]), 0b1110_0000);
        // Lossy: decoding does not recover the original value
        let [r, g, b, _] = decode_color(encode_color([100, 150, 200]));
        assert_eq!([r, g, b], [109, 146, 255]);
    }

    #[test]
    fn test_decode_grid() {
        let frame = decode_grid(&[0xFF, 0x00, 0x00, 0xE0], 2, 2);
        assert_eq!(frame.get_pixel(0, 0), Some([255, 255, 255]));
        assert_eq!(frame.get_pixel(1, 1), Some([255, 0, 0]));
    }

    #[test]
    fn test_compose_repeat() {
        let layout = PanelLayout {
            width: 2,
            height: 2,
            faces: 2,
            duplication: Duplication::Repeat,
        };
        let mut logical = ImageFrame::new(2, 2);
        logical.set_pixel(0, 0, [1, 2, 3]);

        let physical = layout.compose(&logical);
        assert_eq!((physical.width, physical.height), (2, 4));
        assert_eq!(physical.get_pixel(0, 0), Some([1, 2, 3]));
        assert_eq!(physical.get_pixel(0, 2), Some([1, 2, 3]));
        assert_eq!(physical.get_pixel(1, 3), Some([0, 0, 0]));
    }

    #[test]
    fn test_compose_mirror_flip() {
        let layout = PanelLayout {
            width: 2,
            height: 2,
            faces: 2,
            duplication: Duplication::MirrorFlip,
        };
        let mut logical = ImageFrame::new(2, 2);
        logical.set_pixel(0, 0, [1, 2, 3]);

        let physical = layout.compose(&logical);
        assert_eq!(physical.get_pixel(0, 0), Some([1, 2, 3]));
        // Top-left of the logical frame lands bottom-right of the second face
        assert_eq!(physical.get_pixel(1, 3), Some([1, 2, 3]));
        assert_eq!(physical.get_pixel(0, 2), Some([0, 0, 0]));
    }

    #[test]
    fn test_face_offsets() {
        let layout = PanelLayout::default();
        assert_eq!(layout.face_offsets().collect::<Vec<_>>(), vec![0, 64]);
        assert_eq!(layout.physical_height(), 128);
    }
}
