//! Totem controller
//!
//! The single entry point every transport calls. It owns the catalog, the
//! remote canvas and the render supervisor, and turns each command into a
//! running renderer.

use crate::interpreter::{CommandInterpreter, InterpretContext};
use crate::renderer::{RenderEnv, build_renderer};
use crate::renderers::{DEFAULT_SUBJECT, QuizConfig};
use crate::supervisor::{RenderSupervisor, SharedSink};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use totem_catalog::{
    ArtworkFetcher, CatalogEntry, ContentCatalog, ImageMediaSource, MediaError, MediaSource,
    PacingTable, artwork_name, store_artwork,
};
use totem_core::{
    Brightness, BrightnessOutOfRange, DirectiveKind, Palette, PanelLayout, RemoteCanvas,
};
use tracing::{error, info, warn};

/// Controller configuration
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub layout: PanelLayout,
    /// Subject of `affirmations` when the command names none
    pub subject: String,
    pub palette: Palette,
    pub pacing: PacingTable,
    pub quiz: QuizConfig,
    /// Names starting with these are left out of the help screen
    pub hidden_prefixes: Vec<String>,
    /// Panel brightness at start-up
    pub brightness: Brightness,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            layout: PanelLayout::default(),
            subject: DEFAULT_SUBJECT.to_string(),
            palette: Palette::standard(),
            pacing: PacingTable::default(),
            quiz: QuizConfig::default(),
            hidden_prefixes: Vec::new(),
            brightness: Brightness::default(),
        }
    }
}

/// A command as it arrives from a transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRequest {
    pub command: String,
    /// Where to fetch artwork for the command when the catalog lacks it
    pub artwork_url: Option<String>,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            artwork_url: None,
        }
    }

    pub fn with_artwork_url(mut self, url: impl Into<String>) -> Self {
        self.artwork_url = Some(url.into());
        self
    }
}

/// What a command resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    pub kind: DirectiveKind,
}

/// Point-in-time view of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerStatus {
    /// Last command handled
    pub command: Option<String>,
    /// Renderer of the live worker
    pub task: Option<&'static str>,
    /// Stamp of the latest accepted canvas update
    pub canvas_updated_at: u64,
    pub brightness: Brightness,
}

/// Owns every process-lifetime collaborator
pub struct TotemController {
    catalog: RwLock<ContentCatalog>,
    supervisor: Mutex<RenderSupervisor>,
    current: Mutex<Option<String>>,
    interpreter: CommandInterpreter,
    env: RenderEnv,
    config: ControllerConfig,
    fetcher: Option<Arc<dyn ArtworkFetcher>>,
}

impl TotemController {
    /// Create a controller painting into `sink`
    pub fn new(config: ControllerConfig, catalog: ContentCatalog, sink: SharedSink) -> Self {
        let layout = config.layout;
        let media: Arc<dyn MediaSource> = Arc::new(ImageMediaSource::new(layout.width, layout.height));
        let canvas = Arc::new(RemoteCanvas::new(layout.width, layout.height));
        let env = RenderEnv::new(layout, media, canvas)
            .with_quiz(config.quiz.clone())
            .with_hidden_prefixes(config.hidden_prefixes.clone());
        sink.lock().set_brightness(config.brightness);

        Self {
            catalog: RwLock::new(catalog),
            supervisor: Mutex::new(RenderSupervisor::new(sink)),
            current: Mutex::new(None),
            interpreter: CommandInterpreter::new(),
            env,
            config,
            fetcher: None,
        }
    }

    /// Replace the media source used for decoding
    pub fn with_media(mut self, media: Arc<dyn MediaSource>) -> Self {
        self.env.media = media;
        self
    }

    /// Set the fetcher used for `artwork_url` requests
    pub fn with_fetcher(mut self, fetcher: Arc<dyn ArtworkFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Interpret a command and start its renderer
    ///
    /// Never fails: unknown commands scroll as text, and renderer start-up
    /// errors are logged.
    pub fn handle(&self, request: &CommandRequest) -> CommandOutcome {
        let command = request.command.trim().to_string();

        if let Some(url) = &request.artwork_url {
            self.ingest_from_url(&command, url);
        }

        let (directive, renderer) = {
            let catalog = self.catalog.read();
            let ctx = InterpretContext {
                catalog: &catalog,
                palette: &self.config.palette,
                pacing: &self.config.pacing,
                media: self.env.media.as_ref(),
                default_subject: &self.config.subject,
            };
            let directive = self
                .interpreter
                .interpret(&command, &ctx, &mut rand::thread_rng());
            let renderer = build_renderer(directive.clone(), &catalog, &self.env);
            (directive, renderer)
        };

        let kind = directive.kind();
        let mut supervisor = self.supervisor.lock();
        info!(command = %command, kind = %kind, "Handling command");
        if let Err(e) = supervisor.submit(renderer) {
            error!(command = %command, error = %e, "Failed to start renderer");
        }
        *self.current.lock() = Some(command.clone());

        CommandOutcome { command, kind }
    }

    /// Change the panel brightness
    ///
    /// Colors are scaled as they are painted, so the current command is
    /// restarted to repaint at the new level.
    pub fn set_brightness(&self, percent: u32) -> Result<Brightness, BrightnessOutOfRange> {
        let brightness = Brightness::new(percent)?;
        {
            let mut supervisor = self.supervisor.lock();
            supervisor.stop();
            supervisor.sink().lock().set_brightness(brightness);
        }
        info!(brightness = brightness.percent(), "Changed brightness");

        let current = self.current.lock().clone();
        if let Some(command) = current {
            self.handle(&CommandRequest::new(command));
        }
        Ok(brightness)
    }

    /// Resize, persist and register uploaded artwork
    pub fn store_artwork(&self, name: &str, bytes: &[u8]) -> Result<CatalogEntry, MediaError> {
        let root = self.catalog.read().root().to_path_buf();
        let layout = self.env.layout;
        let entry = store_artwork(bytes, &root, name, layout.width, layout.height)?;
        self.catalog.write().insert(entry.clone());
        Ok(entry)
    }

    fn ingest_from_url(&self, command: &str, url: &str) {
        let name = match artwork_name(command) {
            Ok(name) => name,
            Err(e) => {
                warn!(command, error = %e, "Not fetching artwork");
                return;
            }
        };
        if self.catalog.read().contains(&name) {
            return;
        }
        let Some(fetcher) = &self.fetcher else {
            warn!(name = %name, url, "No artwork fetcher configured");
            return;
        };

        let stored = fetcher
            .fetch(url)
            .and_then(|bytes| self.store_artwork(&name, &bytes));
        if let Err(e) = stored {
            warn!(name = %name, url, error = %e, "Artwork ingestion failed");
        }
    }

    /// Current command, live task and canvas stamp
    pub fn status(&self) -> ControllerStatus {
        let (task, brightness) = {
            let supervisor = self.supervisor.lock();
            let brightness = supervisor.sink().lock().brightness();
            (supervisor.active_task(), brightness)
        };
        ControllerStatus {
            command: self.current.lock().clone(),
            task,
            canvas_updated_at: self.env.canvas.last_updated_at(),
            brightness,
        }
    }

    /// The remote canvas the mirror renderer shows
    pub fn canvas(&self) -> &Arc<RemoteCanvas> {
        &self.env.canvas
    }

    pub fn layout(&self) -> PanelLayout {
        self.env.layout
    }

    /// Run `f` against the catalog
    pub fn with_catalog<T>(&self, f: impl FnOnce(&ContentCatalog) -> T) -> T {
        f(&self.catalog.read())
    }

    /// Stop the active renderer and join its worker
    pub fn shutdown(&self) {
        self.supervisor.lock().stop();
        info!("Controller shut down");
    }
}
