//! Render directives
//!
//! A directive is the resolved meaning of a command: which renderer runs and
//! with what parameters. Exactly one directive is active at a time.

use crate::color::ColorMode;
use crate::frame::ImageFrame;
use std::fmt;
use std::path::PathBuf;

/// One frame of a looping animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrame {
    /// Logical-sized pixels
    pub image: ImageFrame,
    /// How long the frame stays on screen
    pub duration_ms: u32,
}

impl AnimationFrame {
    /// Create a new animation frame
    pub fn new(image: ImageFrame, duration_ms: u32) -> Self {
        Self { image, duration_ms }
    }
}

/// The executable meaning of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDirective {
    /// Paint one still image, decoded while interpreting
    ShowImage { path: PathBuf, image: ImageFrame },
    /// Loop over pre-decoded frames
    PlayLoop { frames: Vec<AnimationFrame> },
    /// Scroll a line of text right to left, forever
    ScrollText { text: String, color: ColorMode },
    /// Walk a shuffled playlist of a catalog subdirectory
    CycleDirectory {
        name: String,
        is_gif: bool,
        iterations: u32,
        framerate: u32,
    },
    /// "You are ..." affirmation words
    Affirmations { subject: String, color: ColorMode },
    /// A catalog image followed by a caption, repeating
    Single { name: String, caption: String },
    /// Scrolling lists of available commands; a fixed color paints the
    /// three lines red, green and blue
    Help { color: ColorMode },
    /// Poker pre-flop quiz with periodic ad
    PokerQuiz,
    /// Mirror of the remote canvas
    CanvasMirror,
    /// Onboarding message
    Howto,
}

/// Discriminant of [`RenderDirective`], convenient for logging and responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    ShowImage,
    PlayLoop,
    ScrollText,
    CycleDirectory,
    Affirmations,
    Single,
    Help,
    PokerQuiz,
    CanvasMirror,
    Howto,
}

impl DirectiveKind {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShowImage => "show_image",
            Self::PlayLoop => "play_loop",
            Self::ScrollText => "scroll_text",
            Self::CycleDirectory => "cycle_directory",
            Self::Affirmations => "affirmations",
            Self::Single => "single",
            Self::Help => "help",
            Self::PokerQuiz => "poker_quiz",
            Self::CanvasMirror => "canvas_mirror",
            Self::Howto => "howto",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RenderDirective {
    /// Get the directive kind
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Self::ShowImage { .. } => DirectiveKind::ShowImage,
            Self::PlayLoop { .. } => DirectiveKind::PlayLoop,
            Self::ScrollText { .. } => DirectiveKind::ScrollText,
            Self::CycleDirectory { .. } => DirectiveKind::CycleDirectory,
            Self::Affirmations { .. } => DirectiveKind::Affirmations,
            Self::Single { .. } => DirectiveKind::Single,
            Self::Help { .. } => DirectiveKind::Help,
            Self::PokerQuiz => DirectiveKind::PokerQuiz,
            Self::CanvasMirror => DirectiveKind::CanvasMirror,
            Self::Howto => DirectiveKind::Howto,
        }
    }

    /// Create a scrolling text directive
    pub fn scroll(text: impl Into<String>, color: ColorMode) -> Self {
        Self::ScrollText {
            text: text.into(),
            color,
        }
    }
}
