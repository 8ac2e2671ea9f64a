//! Colors and the command palette
//!
//! Text directives can carry a trailing `-<key>` suffix that selects a fixed
//! color or the rainbow-cycling "party" mode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// RGB color triple
pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];
pub const GREY: Rgb = [128, 128, 128];
pub const RED: Rgb = [255, 0, 0];
pub const GREEN: Rgb = [0, 255, 0];
pub const BLUE: Rgb = [0, 0, 255];

/// Red, green and blue, used by multi-line renderers outside party mode
pub const RGB_CYCLE: [Rgb; 3] = [RED, GREEN, BLUE];

/// The 20-entry rainbow walked by party mode
pub const RAINBOW: [Rgb; 20] = [
    [255, 0, 0],
    [255, 76, 0],
    [255, 153, 0],
    [255, 229, 0],
    [203, 255, 0],
    [127, 255, 0],
    [51, 255, 0],
    [0, 255, 25],
    [0, 255, 102],
    [0, 255, 178],
    [0, 255, 255],
    [0, 178, 255],
    [0, 102, 255],
    [0, 25, 255],
    [50, 0, 255],
    [127, 0, 255],
    [204, 0, 255],
    [255, 0, 229],
    [255, 0, 152],
    [255, 0, 76],
];

/// How a text renderer picks its color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// A single fixed color
    Fixed(Rgb),
    /// Rainbow indexed by scroll position
    #[default]
    Party,
}

impl ColorMode {
    /// Color to use at a given position counter
    ///
    /// Party mode uses `RAINBOW[(position / 2) mod 20]` with floored division,
    /// so negative positions keep cycling instead of panicking.
    pub fn at(&self, position: i32) -> Rgb {
        match self {
            Self::Fixed(rgb) => *rgb,
            Self::Party => rainbow_at(position),
        }
    }

    /// Whether this is the party mode
    pub fn is_party(&self) -> bool {
        matches!(self, Self::Party)
    }
}

/// Rainbow entry for a position counter
pub fn rainbow_at(position: i32) -> Rgb {
    let idx = position.div_euclid(2).rem_euclid(RAINBOW.len() as i32);
    RAINBOW[idx as usize]
}

/// Rejected brightness value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Brightness must be between 1 and 100, got {0}")]
pub struct BrightnessOutOfRange(pub u32);

/// Panel brightness in percent, 1 to 100
///
/// Applies to colors as they are painted, so a running renderer has to
/// repaint before a change shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Brightness(u8);

impl Brightness {
    /// No dimming
    pub const FULL: Self = Self(100);

    /// Level the panel starts at
    pub const DEFAULT: Self = Self(50);

    pub fn new(percent: u32) -> Result<Self, BrightnessOutOfRange> {
        match percent {
            1..=100 => Ok(Self(percent as u8)),
            _ => Err(BrightnessOutOfRange(percent)),
        }
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Scale one channel
    pub fn scale(&self, channel: u8) -> u8 {
        (u16::from(channel) * u16::from(self.0) / 100) as u8
    }

    /// Scale a color
    pub fn apply(&self, color: Rgb) -> Rgb {
        color.map(|c| self.scale(c))
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Brightness {
    type Error = BrightnessOutOfRange;

    fn try_from(percent: u32) -> Result<Self, Self::Error> {
        Self::new(percent)
    }
}

impl From<Brightness> for u32 {
    fn from(brightness: Brightness) -> Self {
        u32::from(brightness.0)
    }
}

/// Color keys accepted as command suffixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: BTreeMap<String, ColorMode>,
}

impl Palette {
    /// Create an empty palette
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The standard key table: r, g, b, w, p and party
    pub fn standard() -> Self {
        Self::empty()
            .with("r", ColorMode::Fixed(RED))
            .with("g", ColorMode::Fixed(GREEN))
            .with("b", ColorMode::Fixed(BLUE))
            .with("w", ColorMode::Fixed(WHITE))
            .with("p", ColorMode::Party)
            .with("party", ColorMode::Party)
    }

    /// Add a key (stored lower-cased)
    pub fn with(mut self, key: &str, mode: ColorMode) -> Self {
        self.entries.insert(key.to_lowercase(), mode);
        self
    }

    /// Look up a key, case-insensitively
    pub fn get(&self, key: &str) -> Option<ColorMode> {
        self.entries.get(&key.to_lowercase()).copied()
    }

    /// Known keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}
