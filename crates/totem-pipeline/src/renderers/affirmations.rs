//! "You are ..." affirmations
//!
//! Two fixed label lines with a word sliding in from the left underneath. The
//! word pauses once its centre crosses the middle of the panel, then carries
//! on off the right edge and the next word starts.

use super::draw_text_faces;
use crate::renderer::{RenderError, Renderer, Tick};
use std::time::Duration;
use totem_core::{ColorMode, FontFace, FrameSink, PanelLayout, Rgb};

/// Words cycled through, none longer than seven letters so they fit
pub const AFFIRMATION_WORDS: [&str; 7] = [
    "enough", "loved", "needed", "unique", "strong", "perfect", "worthy",
];

/// Subject that gets the "You are" labels
pub const DEFAULT_SUBJECT: &str = "You";

const TICK_INTERVAL: Duration = Duration::from_millis(50);
const PAUSE_TICKS: u32 = 32;
const WORD_Y: i32 = 44;

pub struct AffirmationsRenderer {
    subject: String,
    color: ColorMode,
    counter: i32,
    paused: u32,
    word: usize,
    layout: PanelLayout,
}

impl AffirmationsRenderer {
    pub fn new(subject: String, color: ColorMode, layout: PanelLayout) -> Self {
        Self {
            subject,
            color,
            counter: 0,
            paused: 0,
            word: 0,
            layout,
        }
    }

    fn draw_labels(&self, sink: &mut dyn FrameSink, color: Rgb) {
        if self.subject == DEFAULT_SUBJECT {
            draw_text_faces(sink, &self.layout, FontFace::Normal, 19, 20, color, "You");
            draw_text_faces(sink, &self.layout, FontFace::Normal, 19, 32, color, "are");
        } else {
            draw_text_faces(sink, &self.layout, FontFace::Normal, 19, 32, color, "is");
            draw_text_faces(sink, &self.layout, FontFace::Small, 8, 20, color, &self.subject);
        }
    }
}

impl Renderer for AffirmationsRenderer {
    fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
        let width = self.layout.width as i32;
        let color = self.color.at(self.counter);
        let word = AFFIRMATION_WORDS[self.word];
        let x = self.counter - word.len() as i32 * FontFace::Normal.advance() as i32;
        self.counter += 1;

        sink.clear();
        self.draw_labels(sink, color);
        let length = draw_text_faces(sink, &self.layout, FontFace::Normal, x, WORD_Y, color, word);

        if x + length / 2 > width / 2 && self.paused < PAUSE_TICKS {
            self.paused += 1;
            self.counter -= 1;
        }

        if x > width {
            self.counter = 0;
            self.paused = 0;
            self.word = (self.word + 1) % AFFIRMATION_WORDS.len();
        }

        sink.swap_on_vsync(1)?;
        Ok(Tick::Continue(TICK_INTERVAL))
    }

    fn name(&self) -> &'static str {
        "affirmations"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use totem_core::MemorySink;

    fn word_x(sink: &MemorySink, word: &str) -> Option<i32> {
        sink.presented_texts()
            .iter()
            .find(|t| t.text == word)
            .map(|t| t.x)
    }

    #[test]
    fn test_default_subject_labels() {
        let mut renderer =
            AffirmationsRenderer::new("You".into(), ColorMode::Party, PanelLayout::default());
        let mut sink = MemorySink::new(64, 128);

        renderer.tick(&mut sink).unwrap();
        let texts = sink
            .presented_texts()
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["You", "You", "are", "are", "enough", "enough"]);
        assert_eq!(word_x(&sink, "enough"), Some(-54));
    }

    #[test]
    fn test_named_subject_labels() {
        let mut renderer = AffirmationsRenderer::new(
            "Tim".into(),
            ColorMode::Fixed([0, 0, 255]),
            PanelLayout::default(),
        );
        let mut sink = MemorySink::new(64, 128);

        renderer.tick(&mut sink).unwrap();
        let name = sink.presented_texts().iter().find(|t| t.text == "Tim").unwrap();
        assert_eq!((name.font, name.x, name.y), (FontFace::Small, 8, 20));
        assert!(sink.presented_texts().iter().any(|t| t.text == "is"));
        assert!(sink.presented_texts().iter().all(|t| t.color == [0, 0, 255]));
    }

    #[test]
    fn test_word_pauses_then_advances() {
        let mut renderer =
            AffirmationsRenderer::new("You".into(), ColorMode::Party, PanelLayout::default());
        let mut sink = MemorySink::new(64, 128);

        // "enough" is 54px wide: it pauses once x + 27 > 32, i.e. at x = 6
        let mut xs = Vec::new();
        for _ in 0..100 {
            renderer.tick(&mut sink).unwrap();
            xs.push(word_x(&sink, "enough").unwrap());
        }
        let at_pause = xs.iter().filter(|x| **x == 6).count();
        assert_eq!(at_pause, PAUSE_TICKS as usize + 1);

        let mut next_word = false;
        for _ in 0..200 {
            renderer.tick(&mut sink).unwrap();
            if word_x(&sink, "loved").is_some() {
                next_word = true;
                break;
            }
        }
        assert!(next_word);
    }
}
