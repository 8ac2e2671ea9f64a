//! Totem Pipeline - Render Orchestration
//!
//! This crate turns command strings into content on the panel.
//!
//! # Architecture
//!
//! ```text
//! command → [Interpreter] → RenderDirective → [build_renderer] → Renderer
//!                ↑                                                  │
//!             Catalog                                  [Supervisor] ticks it
//!                                                                   ↓
//!                                                              FrameSink
//! ```
//!
//! The [`TotemController`] ties the pieces together and is what transports
//! call.

pub mod controller;
pub mod interpreter;
pub mod renderer;
pub mod renderers;
pub mod supervisor;

// Re-export commonly used types
pub use controller::{
    CommandOutcome, CommandRequest, ControllerConfig, ControllerStatus, TotemController,
};
pub use interpreter::{CommandInterpreter, InterpretContext};
pub use renderer::{HOWTO_MESSAGE, RenderEnv, RenderError, Renderer, Tick, build_renderer};
pub use renderers::{QuizAction, QuizConfig, QuizQuestion};
pub use supervisor::{RenderSupervisor, SharedSink, StopToken, SupervisorError, shared_sink};
