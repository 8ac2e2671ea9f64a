//! A catalog image followed by a caption, repeating

use super::present_image;
use super::scroll::ScrollRenderer;
use crate::renderer::{RenderError, Renderer, Tick};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use totem_catalog::MediaSource;
use totem_core::{ColorMode, FrameSink, PanelLayout};

/// How long the image stays up before the caption
pub const IMAGE_HOLD: Duration = Duration::from_secs(5);
const CAPTION_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Image,
    Caption,
}

pub struct SingleRenderer {
    path: Option<PathBuf>,
    caption: ScrollRenderer,
    phase: Phase,
    media: Arc<dyn MediaSource>,
    layout: PanelLayout,
}

impl SingleRenderer {
    /// `path` is `None` when the name was not found, which ends the renderer
    /// on its first tick
    pub fn new(
        path: Option<PathBuf>,
        caption: String,
        media: Arc<dyn MediaSource>,
        layout: PanelLayout,
    ) -> Self {
        Self {
            path,
            caption: ScrollRenderer::new(caption, ColorMode::Party, layout)
                .once()
                .with_interval(CAPTION_INTERVAL),
            phase: Phase::Image,
            media,
            layout,
        }
    }
}

impl Renderer for SingleRenderer {
    fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
        let Some(path) = &self.path else {
            return Ok(Tick::Finished);
        };

        match self.phase {
            Phase::Image => {
                let image = self.media.load_still(path)?;
                present_image(sink, &self.layout, &image, 1)?;
                self.phase = Phase::Caption;
                Ok(Tick::Continue(IMAGE_HOLD))
            }
            Phase::Caption => match self.caption.tick(sink)? {
                Tick::Finished => {
                    self.caption.restart();
                    self.phase = Phase::Image;
                    Ok(Tick::Continue(CAPTION_INTERVAL))
                }
                other => Ok(other),
            },
        }
    }

    fn name(&self) -> &'static str {
        "single"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;
    use totem_catalog::ImageMediaSource;
    use totem_core::MemorySink;

    #[test]
    fn test_image_then_caption_then_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tim.png");
        RgbImage::from_pixel(64, 64, Rgb([10, 20, 30])).save(&path).unwrap();

        let mut single = SingleRenderer::new(
            Some(path),
            "is single".into(),
            Arc::new(ImageMediaSource::default()),
            PanelLayout::default(),
        );
        let mut sink = MemorySink::new(64, 128);

        assert_eq!(single.tick(&mut sink).unwrap(), Tick::Continue(IMAGE_HOLD));
        assert_eq!(sink.front().get_pixel(0, 0), Some([10, 20, 30]));

        assert_eq!(single.tick(&mut sink).unwrap(), Tick::Continue(CAPTION_INTERVAL));
        assert_eq!(sink.presented_texts()[0].text, "is single");
        assert_eq!(sink.presented_texts()[0].x, 64);

        // "is single" is 81px wide: x runs from 64 down to -81
        for _ in 0..(64 + 81) {
            single.tick(&mut sink).unwrap();
        }
        assert_eq!(single.tick(&mut sink).unwrap(), Tick::Continue(IMAGE_HOLD));
        assert_eq!(sink.stats().images, 2);
    }

    #[test]
    fn test_unknown_name_finishes() {
        let mut single = SingleRenderer::new(
            None,
            "x".into(),
            Arc::new(ImageMediaSource::default()),
            PanelLayout::default(),
        );
        let mut sink = MemorySink::new(64, 128);
        assert_eq!(single.tick(&mut sink).unwrap(), Tick::Finished);
    }
}
