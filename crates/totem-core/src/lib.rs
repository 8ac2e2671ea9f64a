//! Totem Core - shared types for the LED matrix render engine
//!
//! Totem turns a single command string into something continuously rendered
//! on a physical LED matrix: a still image, a looping animation, scrolling
//! text, a quiz overlay or a canvas painted remotely from a browser.
//!
//! # Data Flow
//!
//! ```text
//! Command → Interpreter → RenderDirective → Supervisor → Renderer
//!                                                           │
//!                                                           ▼
//!                                   Pixel Codec → FrameSink (panel / emulator)
//! ```
//!
//! This crate holds the types every other crate agrees on: colors and the
//! command palette, RGB frames, the 3-3-2 pixel codec with panel composition,
//! the directive enum, the frame sink contract and the remote canvas.

pub mod canvas;
pub mod codec;
pub mod color;
pub mod directive;
pub mod frame;
pub mod sink;

// Re-export commonly used types
pub use canvas::{CanvasSnapshot, RemoteCanvas, UpdateOutcome};
pub use codec::{Duplication, PanelLayout, decode_color, decode_grid, encode_color};
pub use color::{Brightness, BrightnessOutOfRange, ColorMode, Palette, RAINBOW, Rgb};
pub use directive::{AnimationFrame, DirectiveKind, RenderDirective};
pub use frame::ImageFrame;
pub use sink::{FontFace, FrameSink, MemorySink, SinkError, SinkStats, TextDraw, VSYNC_QUANTUM};
