//! Help screen: three independently scrolling lines listing what can be shown

use super::draw_text_faces;
use crate::renderer::{RenderError, Renderer, Tick};
use std::time::Duration;
use totem_catalog::{ContentCatalog, ContentKind};
use totem_core::color::{RGB_CYCLE, rainbow_at};
use totem_core::{ColorMode, FontFace, FrameSink, PanelLayout, Rgb};

const TICK_INTERVAL: Duration = Duration::from_millis(15);
const LINE_Y: [i32; 3] = [14, 32, 50];
const SPECIAL_COMMANDS: &str = "special commands: affirmations | help | howto | random";

/// Build the three help lines from the catalog
///
/// Names starting with any of `hidden_prefixes` are left out.
pub fn help_lines(catalog: &ContentCatalog, hidden_prefixes: &[String]) -> [String; 3] {
    let visible = |name: &&str| !hidden_prefixes.iter().any(|p| name.starts_with(p.as_str()));
    let names_of = |kind: ContentKind| {
        catalog
            .entries_of(kind)
            .map(|e| e.name.as_str())
            .filter(visible)
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let commands = std::iter::once(SPECIAL_COMMANDS)
        .chain(catalog.directories())
        .collect::<Vec<_>>()
        .join(" | ");

    [
        commands,
        format!("stills available: {}", names_of(ContentKind::Still)),
        format!("gifs available: {}", names_of(ContentKind::Animated)),
    ]
}

pub struct HelpRenderer {
    lines: [String; 3],
    xs: [i32; 3],
    color: ColorMode,
    color_counter: i32,
    layout: PanelLayout,
}

impl HelpRenderer {
    pub fn new(lines: [String; 3], color: ColorMode, layout: PanelLayout) -> Self {
        let width = layout.width as i32;
        Self {
            lines,
            xs: [width; 3],
            color,
            color_counter: 0,
            layout,
        }
    }

    fn colors(&mut self) -> [Rgb; 3] {
        match self.color {
            ColorMode::Party => {
                self.color_counter += 1;
                [rainbow_at(self.color_counter); 3]
            }
            ColorMode::Fixed(_) => RGB_CYCLE,
        }
    }
}

impl Renderer for HelpRenderer {
    fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
        let width = self.layout.width as i32;
        let colors = self.colors();

        sink.clear();
        for i in 0..3 {
            let length = draw_text_faces(
                sink,
                &self.layout,
                FontFace::Normal,
                self.xs[i],
                LINE_Y[i],
                colors[i],
                &self.lines[i],
            );
            self.xs[i] -= 1;
            if self.xs[i] + length < 0 {
                self.xs[i] = width;
            }
        }

        sink.swap_on_vsync(1)?;
        Ok(Tick::Continue(TICK_INTERVAL))
    }

    fn name(&self) -> &'static str {
        "help"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use totem_catalog::CatalogEntry;
    use totem_core::MemorySink;

    fn catalog() -> ContentCatalog {
        let mut catalog = ContentCatalog::new("images");
        for path in ["images/shrek.png", "images/duck1.png", "images/dance.gif", "images/m.txt"] {
            catalog.insert(CatalogEntry::from_path(path).unwrap());
        }
        catalog.insert_directory("anime");
        catalog
    }

    #[test]
    fn test_help_lines() {
        let lines = help_lines(&catalog(), &["duck".to_string()]);
        assert_eq!(
            lines[0],
            "special commands: affirmations | help | howto | random | anime"
        );
        assert_eq!(lines[1], "stills available: shrek");
        assert_eq!(lines[2], "gifs available: dance");
    }

    #[test]
    fn test_lines_scroll_independently() {
        let lines = ["a".to_string(), "bbbbbbbbbb".to_string(), "cc".to_string()];
        let mut renderer = HelpRenderer::new(lines, ColorMode::Party, PanelLayout::default());
        let mut sink = MemorySink::new(64, 128);

        // "a" is 9px wide and wraps after 74 ticks; the longer lines are still moving
        for _ in 0..74 {
            renderer.tick(&mut sink).unwrap();
        }
        renderer.tick(&mut sink).unwrap();

        let x_of = |text: &str| {
            sink.presented_texts()
                .iter()
                .find(|t| t.text == text)
                .map(|t| t.x)
                .unwrap()
        };
        assert_eq!(x_of("a"), 64);
        assert_eq!(x_of("bbbbbbbbbb"), -10);
        assert_eq!(x_of("cc"), -10);
    }

    #[test]
    fn test_fixed_color_uses_rgb_lines() {
        let lines = ["a".to_string(), "b".to_string(), "c".to_string()];
        let mut renderer =
            HelpRenderer::new(lines, ColorMode::Fixed([9, 9, 9]), PanelLayout::default());
        let mut sink = MemorySink::new(64, 128);

        renderer.tick(&mut sink).unwrap();
        let colors = sink
            .presented_texts()
            .iter()
            .step_by(2)
            .map(|t| t.color)
            .collect::<Vec<_>>();
        assert_eq!(colors, RGB_CYCLE.to_vec());
    }
}
