//! Remote canvas mirror

use super::present_image;
use crate::renderer::{RenderError, Renderer, Tick};
use std::sync::Arc;
use std::time::Duration;
use totem_core::{FrameSink, PanelLayout, RemoteCanvas};
use tracing::trace;

const TICK_INTERVAL: Duration = Duration::from_millis(15);

/// Repaints the panel whenever the remote canvas changes
pub struct MirrorRenderer {
    canvas: Arc<RemoteCanvas>,
    last_rendered_at: Option<u64>,
    layout: PanelLayout,
}

impl MirrorRenderer {
    pub fn new(canvas: Arc<RemoteCanvas>, layout: PanelLayout) -> Self {
        Self {
            canvas,
            last_rendered_at: None,
            layout,
        }
    }

    /// Stamp of the snapshot last painted
    pub fn last_rendered_at(&self) -> Option<u64> {
        self.last_rendered_at
    }
}

impl Renderer for MirrorRenderer {
    fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
        let snapshot = self.canvas.snapshot();
        if self.last_rendered_at == Some(snapshot.updated_at) {
            trace!("Canvas unchanged");
            return Ok(Tick::Continue(TICK_INTERVAL));
        }

        present_image(sink, &self.layout, &snapshot.to_frame(), 1)?;
        self.last_rendered_at = Some(snapshot.updated_at);
        Ok(Tick::Continue(TICK_INTERVAL))
    }

    fn name(&self) -> &'static str {
        "mirror"
    }
}
