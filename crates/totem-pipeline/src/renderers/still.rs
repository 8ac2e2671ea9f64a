//! Static image

use super::present_image;
use crate::renderer::{RenderError, Renderer, Tick};
use totem_core::{FrameSink, ImageFrame, PanelLayout};

/// Paints one image and finishes
pub struct StillRenderer {
    image: ImageFrame,
    layout: PanelLayout,
}

impl StillRenderer {
    pub fn new(image: ImageFrame, layout: PanelLayout) -> Self {
        Self { image, layout }
    }
}

impl Renderer for StillRenderer {
    fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
        present_image(sink, &self.layout, &self.image, 1)?;
        Ok(Tick::Finished)
    }

    fn name(&self) -> &'static str {
        "still"
    }
}
