//! Totem API - HTTP transport
//!
//! Exposes the controller over HTTP.
//!
//! ```text
//! client ── POST /api/command ──► TotemController ──► RenderSupervisor
//!        ── POST /api/canvas  ──► RemoteCanvas ◄── mirror renderer
//!        ── POST /api/artwork ──► ContentCatalog
//!        ── POST /api/brightness ──► FrameSink
//! ```

pub mod messages;
pub mod server;

// Re-export commonly used types
pub use messages::{
    ArtworkReply, BrightnessBody, CanvasReply, CommandBody, CommandReply, StatusReply,
};
pub use server::{ServerConfig, ServerError, TotemServer, router};
