//! Directory cycling
//!
//! Walks a playlist built from one catalog subdirectory. Stills stay up for a
//! fixed pause; animations play a number of full passes at the directory's
//! framerate. The playlist is shuffled once and then repeats in that order.

use super::present_image;
use crate::renderer::{RenderError, Renderer, Tick};
use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use totem_catalog::{CatalogEntry, ContentKind, CyclePacing, MediaSource};
use totem_core::{AnimationFrame, FrameSink, PanelLayout};
use tracing::{debug, warn};

/// How long each still stays on screen
pub const STILL_PAUSE: Duration = Duration::from_secs(2);

struct Playing {
    frames: Vec<AnimationFrame>,
    frame: usize,
    passes: u32,
}

/// Cycles through the entries of a directory
pub struct CycleRenderer {
    directory: String,
    playlist: Vec<CatalogEntry>,
    index: usize,
    pacing: CyclePacing,
    playing: Option<Playing>,
    failures: usize,
    media: Arc<dyn MediaSource>,
    layout: PanelLayout,
}

impl CycleRenderer {
    /// Create a renderer that plays `playlist` in the given order
    pub fn new(
        directory: String,
        playlist: Vec<CatalogEntry>,
        iterations: u32,
        framerate: u32,
        media: Arc<dyn MediaSource>,
        layout: PanelLayout,
    ) -> Self {
        Self {
            directory,
            playlist,
            index: 0,
            pacing: CyclePacing::new(iterations.max(1), framerate),
            playing: None,
            failures: 0,
            media,
            layout,
        }
    }

    /// Shuffle the playlist once
    pub fn shuffled<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.playlist.shuffle(rng);
        self
    }

    fn advance(&mut self) {
        self.playing = None;
        self.index = (self.index + 1) % self.playlist.len();
    }

    /// Move past an entry that could not be shown; give up once every entry
    /// in a row has failed
    fn skip_entry(&mut self) {
        self.failures += 1;
        self.advance();
        if self.failures >= self.playlist.len() {
            warn!(directory = %self.directory, "No entry in directory could be shown");
            self.playlist.clear();
        }
    }

    fn play_frame(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
        let Some(playing) = self.playing.as_mut() else {
            return Ok(Tick::Continue(Duration::ZERO));
        };

        present_image(sink, &self.layout, &playing.frames[playing.frame].image, 1)?;

        playing.frame += 1;
        if playing.frame == playing.frames.len() {
            playing.frame = 0;
            playing.passes += 1;
            if playing.passes >= self.pacing.iterations {
                self.advance();
            }
        }

        Ok(Tick::Continue(Duration::from_millis(
            self.pacing.frame_ms() as u64,
        )))
    }
}

impl Renderer for CycleRenderer {
    fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
        if self.playlist.is_empty() {
            warn!(directory = %self.directory, "Nothing to cycle through");
            return Ok(Tick::Finished);
        }

        if self.playing.is_some() {
            return self.play_frame(sink);
        }

        let entry = self.playlist[self.index].clone();
        debug!(directory = %self.directory, entry = %entry.name, "Cycling to next entry");

        let loaded = match entry.kind {
            ContentKind::Still => self.media.load_still(&entry.path).map(|image| {
                vec![AnimationFrame::new(image, 0)]
            }),
            ContentKind::Animated => self.media.load_animation(&entry.path),
            ContentKind::Text => Ok(Vec::new()),
        };

        let frames = match loaded {
            Ok(frames) if !frames.is_empty() => frames,
            Ok(_) => {
                self.skip_entry();
                return Ok(Tick::Continue(Duration::ZERO));
            }
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "Skipping unreadable entry");
                self.skip_entry();
                return Ok(Tick::Continue(Duration::ZERO));
            }
        };
        self.failures = 0;

        if entry.kind == ContentKind::Still {
            present_image(sink, &self.layout, &frames[0].image, 1)?;
            self.advance();
            return Ok(Tick::Continue(STILL_PAUSE));
        }

        self.playing = Some(Playing {
            frames,
            frame: 0,
            passes: 0,
        });
        self.play_frame(sink)
    }

    fn name(&self) -> &'static str {
        "cycle"
    }
}
