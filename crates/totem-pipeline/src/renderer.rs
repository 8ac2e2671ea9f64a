//! Renderer abstraction
//!
//! A renderer is a small state machine. Each call to [`Renderer::tick`] paints
//! at most one frame into the sink and says how long to wait before the next
//! call; the supervisor owns the loop, the waiting and the cancellation.

use crate::renderers::{
    AffirmationsRenderer, AnimationRenderer, CycleRenderer, HelpRenderer, MirrorRenderer,
    QuizConfig, QuizRenderer, ScrollRenderer, SingleRenderer, StillRenderer, help_lines,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use totem_catalog::{CatalogError, ContentCatalog, ContentKind, MediaError, MediaSource};
use totem_core::{ColorMode, FrameSink, PanelLayout, RemoteCanvas, RenderDirective, SinkError};
use tracing::warn;

/// Text scrolled by the `howto` command
pub const HOWTO_MESSAGE: &str = "Welcome! Send any text to the totem and it will scroll across. \
     Type 'help' for available commands, or just type any text you want!";

/// What the supervisor should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Wait this long, then tick again
    Continue(Duration),
    /// Nothing more to paint
    Finished,
}

/// Renderer errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// A content state machine driven by the supervisor
pub trait Renderer: Send {
    /// Paint the next frame
    fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError>;

    /// Renderer name for logging and thread names
    fn name(&self) -> &'static str;
}

/// Process-lifetime collaborators the renderers need
#[derive(Clone)]
pub struct RenderEnv {
    pub layout: PanelLayout,
    pub media: Arc<dyn MediaSource>,
    pub canvas: Arc<RemoteCanvas>,
    pub quiz: QuizConfig,
    /// Names starting with these are left out of the help screen
    pub hidden_prefixes: Vec<String>,
}

impl RenderEnv {
    /// Create an environment with the default quiz and no hidden names
    pub fn new(layout: PanelLayout, media: Arc<dyn MediaSource>, canvas: Arc<RemoteCanvas>) -> Self {
        Self {
            layout,
            media,
            canvas,
            quiz: QuizConfig::default(),
            hidden_prefixes: Vec::new(),
        }
    }

    /// Set the quiz content
    pub fn with_quiz(mut self, quiz: QuizConfig) -> Self {
        self.quiz = quiz;
        self
    }

    /// Set the help screen's hidden prefixes
    pub fn with_hidden_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.hidden_prefixes = prefixes;
        self
    }
}

/// Build the renderer that executes a directive
pub fn build_renderer(
    directive: RenderDirective,
    catalog: &ContentCatalog,
    env: &RenderEnv,
) -> Box<dyn Renderer> {
    let layout = env.layout;
    match directive {
        RenderDirective::ShowImage { image, .. } => Box::new(StillRenderer::new(image, layout)),
        RenderDirective::PlayLoop { frames } => Box::new(AnimationRenderer::new(frames, layout)),
        RenderDirective::ScrollText { text, color } => {
            Box::new(ScrollRenderer::new(text, color, layout))
        }
        RenderDirective::Howto => Box::new(ScrollRenderer::new(
            HOWTO_MESSAGE.to_string(),
            ColorMode::Party,
            layout,
        )),
        RenderDirective::CycleDirectory {
            name,
            is_gif,
            iterations,
            framerate,
        } => {
            let files = catalog.directory_files(&name).unwrap_or_else(|e| {
                warn!(directory = %name, error = %e, "Cannot list cycle directory");
                Vec::new()
            });
            let wanted = if is_gif {
                ContentKind::Animated
            } else {
                ContentKind::Still
            };
            let playlist = files.into_iter().filter(|e| e.kind == wanted).collect();
            Box::new(
                CycleRenderer::new(name, playlist, iterations, framerate, Arc::clone(&env.media), layout)
                    .shuffled(&mut rand::thread_rng()),
            )
        }
        RenderDirective::Affirmations { subject, color } => {
            Box::new(AffirmationsRenderer::new(subject, color, layout))
        }
        RenderDirective::Single { name, caption } => {
            let path = catalog
                .get(&name)
                .filter(|e| e.kind != ContentKind::Text)
                .map(|e| e.path.clone());
            Box::new(SingleRenderer::new(path, caption, Arc::clone(&env.media), layout))
        }
        RenderDirective::Help { color } => Box::new(HelpRenderer::new(
            help_lines(catalog, &env.hidden_prefixes),
            color,
            layout,
        )),
        RenderDirective::PokerQuiz => Box::new(
            QuizRenderer::new(env.quiz.questions.clone(), layout)
                .shuffled_if(env.quiz.shuffle, &mut rand::thread_rng()),
        ),
        RenderDirective::CanvasMirror => {
            Box::new(MirrorRenderer::new(Arc::clone(&env.canvas), layout))
        }
    }
}
