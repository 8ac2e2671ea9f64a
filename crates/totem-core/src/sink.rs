//! Frame sink contract
//!
//! The frame sink is whatever owns the panel's pixel memory: the LED driver on
//! hardware, a terminal emulator during development, or [`MemorySink`] in
//! tests. Renderers paint into the writable buffer and hand it over with
//! [`FrameSink::swap_on_vsync`]; nothing may assume the buffer still holds the
//! previous frame after a swap.

use crate::color::{Brightness, Rgb};
use crate::frame::ImageFrame;
use std::time::Duration;
use thiserror::Error;

/// Refresh quantum of the panel; `swap_on_vsync(n)` holds a frame for `n` of these
pub const VSYNC_QUANTUM: Duration = Duration::from_micros(6250);

/// Frame sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Display disconnected")]
    Disconnected,
}

/// Bitmap font faces available on the panel
///
/// Names follow the BDF fonts the panel firmware ships with; `text` is drawn
/// with `y` as the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    /// 4x6
    Tiny,
    /// 6x13
    Small,
    /// 6x13B
    SmallBold,
    /// 7x13, card ranks
    Rank,
    /// 7x13B
    MediumBold,
    /// 8x13B
    LargeBold,
    /// 9x18, the default text face
    Normal,
    /// 10x20, card suits
    Suit,
}

impl FontFace {
    /// Horizontal advance per character
    pub fn advance(&self) -> u32 {
        match self {
            Self::Tiny => 4,
            Self::Small | Self::SmallBold => 6,
            Self::Rank | Self::MediumBold => 7,
            Self::LargeBold => 8,
            Self::Normal => 9,
            Self::Suit => 10,
        }
    }

    /// Line height
    pub fn height(&self) -> u32 {
        match self {
            Self::Tiny => 6,
            Self::Small | Self::SmallBold | Self::Rank | Self::MediumBold | Self::LargeBold => 13,
            Self::Normal => 18,
            Self::Suit => 20,
        }
    }

    /// BDF file the face corresponds to
    pub fn bdf_name(&self) -> &'static str {
        match self {
            Self::Tiny => "4x6.bdf",
            Self::Small => "6x13.bdf",
            Self::SmallBold => "6x13B.bdf",
            Self::Rank => "7x13.bdf",
            Self::MediumBold => "7x13B.bdf",
            Self::LargeBold => "8x13B.bdf",
            Self::Normal => "9x18.bdf",
            Self::Suit => "10x20.bdf",
        }
    }
}

/// Double-buffered display surface
pub trait FrameSink: Send {
    /// Physical width in pixels
    fn width(&self) -> u32;

    /// Physical height in pixels
    fn height(&self) -> u32;

    /// Clear the writable buffer
    fn clear(&mut self);

    /// Set one pixel in the writable buffer
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb);

    /// Draw text at a baseline, returning the advance width in pixels
    fn draw_text(&mut self, font: FontFace, x: i32, y: i32, color: Rgb, text: &str) -> i32;

    /// Measure text without drawing it
    fn text_width(&self, font: FontFace, text: &str) -> i32 {
        (font.advance() as usize * text.chars().count()) as i32
    }

    /// Copy a full frame into the writable buffer
    fn set_image(&mut self, image: &ImageFrame);

    /// Brightness applied to everything painted from now on
    fn set_brightness(&mut self, brightness: Brightness);

    fn brightness(&self) -> Brightness;

    /// Present the writable buffer at the next vertical sync
    ///
    /// `framerate_fraction` holds the frame on screen for that many refresh
    /// quanta (at least one). Blocks until the frame is shown.
    fn swap_on_vsync(&mut self, framerate_fraction: u32) -> Result<(), SinkError>;
}

/// A text draw call recorded by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDraw {
    pub font: FontFace,
    pub x: i32,
    pub y: i32,
    pub color: Rgb,
    pub text: String,
}

/// Call counters kept by [`MemorySink`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub clears: u64,
    pub pixels: u64,
    pub texts: u64,
    pub images: u64,
    pub swaps: u64,
}

impl SinkStats {
    /// Total number of calls that touch pixels
    pub fn paint_calls(&self) -> u64 {
        self.clears + self.pixels + self.texts + self.images + self.swaps
    }
}

/// In-memory sink for tests and headless runs
///
/// Swaps return immediately unless vsync pacing is enabled with
/// [`MemorySink::with_vsync`]; text is recorded rather than rasterised.
pub struct MemorySink {
    front: ImageFrame,
    back: ImageFrame,
    pending_texts: Vec<TextDraw>,
    presented_texts: Vec<TextDraw>,
    stats: SinkStats,
    last_fraction: u32,
    vsync: Option<Duration>,
    brightness: Brightness,
}

impl MemorySink {
    /// Create a sink with the given physical size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            front: ImageFrame::new(width, height),
            back: ImageFrame::new(width, height),
            pending_texts: Vec::new(),
            presented_texts: Vec::new(),
            stats: SinkStats::default(),
            last_fraction: 0,
            vsync: None,
            brightness: Brightness::FULL,
        }
    }

    /// Sleep `fraction * quantum` on every swap, like a real panel
    pub fn with_vsync(mut self, quantum: Duration) -> Self {
        self.vsync = Some(quantum);
        self
    }

    /// Counters since creation
    pub fn stats(&self) -> SinkStats {
        self.stats
    }

    /// The frame currently on "screen"
    pub fn front(&self) -> &ImageFrame {
        &self.front
    }

    /// Text drawn into the frame currently on "screen"
    pub fn presented_texts(&self) -> &[TextDraw] {
        &self.presented_texts
    }

    /// Text drawn into the writable buffer since the last clear or swap
    pub fn pending_texts(&self) -> &[TextDraw] {
        &self.pending_texts
    }

    /// Fraction passed to the last swap
    pub fn last_fraction(&self) -> u32 {
        self.last_fraction
    }
}

impl FrameSink for MemorySink {
    fn width(&self) -> u32 {
        self.back.width
    }

    fn height(&self) -> u32 {
        self.back.height
    }

    fn clear(&mut self) {
        self.stats.clears += 1;
        self.back.clear();
        self.pending_texts.clear();
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        self.stats.pixels += 1;
        self.back.plot(x, y, self.brightness.apply(color));
    }

    fn draw_text(&mut self, font: FontFace, x: i32, y: i32, color: Rgb, text: &str) -> i32 {
        self.stats.texts += 1;
        self.pending_texts.push(TextDraw {
            font,
            x,
            y,
            color: self.brightness.apply(color),
            text: text.to_string(),
        });
        self.text_width(font, text)
    }

    fn set_image(&mut self, image: &ImageFrame) {
        self.stats.images += 1;
        self.back.clear();
        self.back.blit(image, 0, 0);
        self.back.dim(self.brightness);
    }

    fn set_brightness(&mut self, brightness: Brightness) {
        self.brightness = brightness;
    }

    fn brightness(&self) -> Brightness {
        self.brightness
    }

    fn swap_on_vsync(&mut self, framerate_fraction: u32) -> Result<(), SinkError> {
        self.stats.swaps += 1;
        self.last_fraction = framerate_fraction.max(1);
        if let Some(quantum) = self.vsync {
            std::thread::sleep(quantum * self.last_fraction);
        }
        std::mem::swap(&mut self.front, &mut self.back);
        self.presented_texts = std::mem::take(&mut self.pending_texts);
        Ok(())
    }
}
