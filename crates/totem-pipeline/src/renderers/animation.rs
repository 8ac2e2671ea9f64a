//! Looping animation

use super::present_image;
use crate::renderer::{RenderError, Renderer, Tick};
use std::time::Duration;
use totem_core::{AnimationFrame, FrameSink, PanelLayout, VSYNC_QUANTUM};

/// Number of refresh quanta a frame of `duration_ms` is held for
///
/// `max(floor(duration_ms / 6.25), 1)`
pub fn framerate_fraction(duration_ms: u32) -> u32 {
    let quantum_us = VSYNC_QUANTUM.as_micros() as u64;
    ((duration_ms as u64 * 1000 / quantum_us) as u32).max(1)
}

/// Plays decoded frames in order, forever
///
/// Frame timing comes from the sink's vsync; the renderer itself never sleeps.
pub struct AnimationRenderer {
    frames: Vec<AnimationFrame>,
    index: usize,
    layout: PanelLayout,
}

impl AnimationRenderer {
    pub fn new(frames: Vec<AnimationFrame>, layout: PanelLayout) -> Self {
        Self {
            frames,
            index: 0,
            layout,
        }
    }
}

impl Renderer for AnimationRenderer {
    fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
        let Some(frame) = self.frames.get(self.index) else {
            return Ok(Tick::Finished);
        };

        present_image(sink, &self.layout, &frame.image, framerate_fraction(frame.duration_ms))?;
        self.index = (self.index + 1) % self.frames.len();
        Ok(Tick::Continue(Duration::ZERO))
    }

    fn name(&self) -> &'static str {
        "animation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use totem_core::{ImageFrame, MemorySink};

    fn frame(value: u8, duration_ms: u32) -> AnimationFrame {
        let mut image = ImageFrame::new(64, 64);
        image.fill([value, value, value]);
        AnimationFrame::new(image, duration_ms)
    }

    #[test]
    fn test_framerate_fraction() {
        assert_eq!(framerate_fraction(0), 1);
        assert_eq!(framerate_fraction(6), 1);
        assert_eq!(framerate_fraction(100), 16);
        assert_eq!(framerate_fraction(70), 11);
    }

    #[test]
    fn test_frames_wrap() {
        let mut renderer =
            AnimationRenderer::new(vec![frame(10, 100), frame(20, 50)], PanelLayout::default());
        let mut sink = MemorySink::new(64, 128);

        let mut seen = Vec::new();
        for _ in 0..5 {
            assert_eq!(renderer.tick(&mut sink).unwrap(), Tick::Continue(Duration::ZERO));
            seen.push((sink.front().get_pixel(0, 0).unwrap()[0], sink.last_fraction()));
        }
        assert_eq!(seen, vec![(10, 16), (20, 8), (10, 16), (20, 8), (10, 16)]);
    }

    #[test]
    fn test_empty_animation_finishes() {
        let mut renderer = AnimationRenderer::new(Vec::new(), PanelLayout::default());
        let mut sink = MemorySink::new(64, 128);
        assert_eq!(renderer.tick(&mut sink).unwrap(), Tick::Finished);
    }
}
