//! Totem Terminal Backend
//!
//! Emulates the LED panel in a true color terminal, two pixel rows per
//! character cell.

pub mod font;
pub mod output;
pub mod sink;

// Re-export commonly used types
pub use output::{OutputError, PanelOutput};
pub use sink::TerminalSink;
