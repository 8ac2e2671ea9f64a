//! Content renderers, one per directive kind

mod affirmations;
mod animation;
mod cycle;
mod help;
mod mirror;
mod quiz;
mod scroll;
mod single;
mod still;

pub use affirmations::{AFFIRMATION_WORDS, AffirmationsRenderer, DEFAULT_SUBJECT};
pub use animation::{AnimationRenderer, framerate_fraction};
pub use cycle::CycleRenderer;
pub use help::{HelpRenderer, help_lines};
pub use mirror::MirrorRenderer;
pub use quiz::{
    FRAMES_PER_QUESTION, FRAMES_PER_STATE, QuestionState, QuizAction, QuizConfig, QuizQuestion,
    QuizRenderer, question_index, question_state,
};
pub use scroll::ScrollRenderer;
pub use single::SingleRenderer;
pub use still::StillRenderer;

use totem_core::{FontFace, FrameSink, ImageFrame, PanelLayout, Rgb, SinkError};

/// Draw text on every face of the panel, returning the advance width
pub(crate) fn draw_text_faces(
    sink: &mut dyn FrameSink,
    layout: &PanelLayout,
    font: FontFace,
    x: i32,
    y: i32,
    color: Rgb,
    text: &str,
) -> i32 {
    let mut width = 0;
    for offset in layout.face_offsets() {
        width = sink.draw_text(font, x, y + offset, color, text);
    }
    width
}

/// Compose a logical frame onto the physical panel and present it
pub(crate) fn present_image(
    sink: &mut dyn FrameSink,
    layout: &PanelLayout,
    image: &ImageFrame,
    framerate_fraction: u32,
) -> Result<(), SinkError> {
    sink.set_image(&layout.compose(image));
    sink.swap_on_vsync(framerate_fraction)
}
