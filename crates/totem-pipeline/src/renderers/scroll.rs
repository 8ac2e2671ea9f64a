//! Scrolling text

use super::draw_text_faces;
use crate::renderer::{RenderError, Renderer, Tick};
use std::time::Duration;
use totem_core::{ColorMode, FontFace, FrameSink, PanelLayout};

/// Tick interval for text commands
pub const SCROLL_INTERVAL: Duration = Duration::from_millis(40);

/// Text baseline
const BASELINE_Y: i32 = 32;

/// Scrolls one line right to left, wrapping back to the right edge
pub struct ScrollRenderer {
    text: String,
    color: ColorMode,
    x: Option<i32>,
    once: bool,
    interval: Duration,
    layout: PanelLayout,
}

impl ScrollRenderer {
    /// Scroll forever at the text command interval
    pub fn new(text: String, color: ColorMode, layout: PanelLayout) -> Self {
        Self {
            text,
            color,
            x: None,
            once: false,
            interval: SCROLL_INTERVAL,
            layout,
        }
    }

    /// Finish after the text has fully left the screen once
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Override the tick interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start the next pass from the right edge
    pub fn restart(&mut self) {
        self.x = None;
    }
}

impl Renderer for ScrollRenderer {
    fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
        let width = self.layout.width as i32;
        let x = *self.x.get_or_insert(width);
        let color = self.color.at(x);

        sink.clear();
        let length = draw_text_faces(
            sink,
            &self.layout,
            FontFace::Normal,
            x,
            BASELINE_Y,
            color,
            &self.text,
        );

        let mut next = x - 1;
        let mut finished = false;
        if next + length < 0 {
            next = width;
            finished = self.once;
        }
        self.x = Some(next);

        sink.swap_on_vsync(1)?;

        if finished {
            Ok(Tick::Finished)
        } else {
            Ok(Tick::Continue(self.interval))
        }
    }

    fn name(&self) -> &'static str {
        "scroll"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use totem_core::{MemorySink, RAINBOW};

    #[test]
    fn test_scroll_starts_at_right_edge_and_moves_left() {
        let mut renderer = ScrollRenderer::new(
            "hi".into(),
            ColorMode::Fixed([255, 0, 0]),
            PanelLayout::default(),
        );
        let mut sink = MemorySink::new(64, 128);

        renderer.tick(&mut sink).unwrap();
        let first = &sink.presented_texts()[0];
        assert_eq!((first.x, first.y, first.color), (64, 32, [255, 0, 0]));
        assert_eq!(sink.presented_texts()[1].y, 96);

        assert_eq!(renderer.tick(&mut sink).unwrap(), Tick::Continue(SCROLL_INTERVAL));
        assert_eq!(sink.presented_texts()[0].x, 63);
    }

    #[test]
    fn test_scroll_wraps_after_text_leaves() {
        // "hi" is 18px wide, so it is gone once x + 18 < 0
        let mut renderer = ScrollRenderer::new("hi".into(), ColorMode::Party, PanelLayout::default());
        let mut sink = MemorySink::new(64, 128);

        let ticks = 64 + 18 + 1;
        for _ in 0..ticks {
            renderer.tick(&mut sink).unwrap();
        }
        assert_eq!(sink.presented_texts()[0].x, -18);

        renderer.tick(&mut sink).unwrap();
        assert_eq!(sink.presented_texts()[0].x, 64);
        assert_eq!(sink.presented_texts()[0].color, RAINBOW[12]);
    }

    #[test]
    fn test_scroll_once_finishes() {
        let mut renderer =
            ScrollRenderer::new("a".into(), ColorMode::Party, PanelLayout::default()).once();
        let mut sink = MemorySink::new(64, 128);

        let mut ticks = 1;
        while renderer.tick(&mut sink).unwrap() != Tick::Finished {
            ticks += 1;
        }
        // x runs from 64 down to -9
        assert_eq!(ticks, 74);

        renderer.restart();
        renderer.tick(&mut sink).unwrap();
        assert_eq!(sink.presented_texts()[0].x, 64);
    }
}
