//! Poker pre-flop quiz with a periodic advertisement
//!
//! Each question is shown for two phases: first the hand and the possible
//! actions in white, then with the correct action highlighted. Every few
//! questions the quiz steps aside for a scrolling ad, then resumes.
//!
//! All timing is counted in ticks of 15 ms.

use super::draw_text_faces;
use crate::renderer::{RenderError, Renderer, Tick};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use totem_core::color::{GREEN, GREY, RED, WHITE};
use totem_core::{FontFace, FrameSink, PanelLayout, Rgb};
use tracing::{debug, warn};

const TICK_INTERVAL: Duration = Duration::from_millis(15);

/// `round(1 / 0.015)`
pub const FPS: u32 = 67;
/// Ticks per question phase
pub const FRAMES_PER_STATE: u32 = FPS;
/// Ticks per question, both phases
pub const FRAMES_PER_QUESTION: u32 = 2 * FRAMES_PER_STATE;
/// Ad duration, `round(FPS * 5)`
///
/// The quiz resumes once this many ticks have passed, so the ad is painted
/// on `AD_TICKS + 1` ticks.
pub const AD_TICKS: u32 = 335;
/// Questions between two ads
pub const QUESTIONS_PER_AD: u32 = 3;

const AD_TEXT: &str = "get.pokerscope.app";
const AD_Y: i32 = 16;
const AD_SUITS: [char; 4] = ['s', 'h', 'd', 'c'];

const HERO_Y: i32 = 20;
const PADDING_X: i32 = 4;
const CARD_GAP: i32 = 2;
const ACTION_GAP: i32 = 8;

/// Possible answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizAction {
    Fold,
    Open,
}

impl QuizAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fold => "Fold",
            Self::Open => "Open",
        }
    }
}

/// One quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Hero's table position, e.g. `UTG`
    pub position: String,
    /// Hole cards as rank/suit pairs, e.g. `AhKh`
    pub cards: String,
    /// Correct action
    pub answer: QuizAction,
}

impl QuizQuestion {
    pub fn new(position: &str, cards: &str, answer: QuizAction) -> Self {
        Self {
            position: position.to_string(),
            cards: cards.to_string(),
            answer,
        }
    }
}

/// Quiz content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Shuffle questions once when the quiz starts
    pub shuffle: bool,
    pub questions: Vec<QuizQuestion>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            shuffle: false,
            questions: vec![
                QuizQuestion::new("UTG", "AhKh", QuizAction::Open),
                QuizQuestion::new("BU", "8d8s", QuizAction::Open),
            ],
        }
    }
}

/// Question phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    /// Actions shown, no answer yet
    Question,
    /// Correct action highlighted
    Answer,
}

/// Index of the question shown at `frame`
pub fn question_index(frame: u32, questions: usize) -> usize {
    (frame / FRAMES_PER_QUESTION) as usize % questions.max(1)
}

/// Phase of the question shown at `frame`
pub fn question_state(frame: u32) -> QuestionState {
    if (frame / FRAMES_PER_STATE) % 2 == 0 {
        QuestionState::Question
    } else {
        QuestionState::Answer
    }
}

fn suit_color(suit: char) -> Rgb {
    match suit {
        'h' => RED,
        'd' => [155, 155, 255],
        'c' => GREEN,
        _ => WHITE,
    }
}

fn suit_glyph(suit: char) -> char {
    match suit {
        'c' => '♣',
        'd' => '♦',
        'h' => '♥',
        's' => '♠',
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Quiz,
    Ad { ticks: u32, x: i32 },
}

pub struct QuizRenderer {
    questions: Vec<QuizQuestion>,
    frame: u32,
    questions_shown: u32,
    phase: Phase,
    layout: PanelLayout,
}

impl QuizRenderer {
    pub fn new(questions: Vec<QuizQuestion>, layout: PanelLayout) -> Self {
        Self {
            questions,
            frame: 0,
            questions_shown: 0,
            phase: Phase::Quiz,
            layout,
        }
    }

    /// Shuffle the questions once when `shuffle` is set
    pub fn shuffled_if<R: Rng + ?Sized>(mut self, shuffle: bool, rng: &mut R) -> Self {
        if shuffle {
            self.questions.shuffle(rng);
        }
        self
    }

    fn advance_quiz(&mut self) {
        let cycle = self.questions.len() as u32 * FRAMES_PER_QUESTION;
        self.frame += 1;
        if self.frame >= cycle {
            self.frame = 0;
        }

        if self.frame % FRAMES_PER_QUESTION == 0 {
            self.questions_shown += 1;
        }

        if self.questions_shown >= QUESTIONS_PER_AD {
            debug!("Switching to ad");
            self.questions_shown = 0;
            self.phase = Phase::Ad {
                ticks: 0,
                x: self.layout.width as i32,
            };
        }
    }

    fn draw_question(&self, sink: &mut dyn FrameSink) {
        let question = &self.questions[question_index(self.frame, self.questions.len())];
        let state = question_state(self.frame);
        let font = FontFace::SmallBold;

        let hero_width = sink.text_width(font, &question.position);
        let hero_x = (self.layout.width as i32 - hero_width) / 2;
        draw_text_faces(sink, &self.layout, font, hero_x, HERO_Y, WHITE, &question.position);

        let x = PADDING_X;
        let y = HERO_Y + font.height() as i32 + 6;
        let cards_width = self.draw_hole_cards(sink, &question.cards, x, y);

        let mut offset_y = 0;
        for (i, action) in [QuizAction::Fold, QuizAction::Open].into_iter().enumerate() {
            let color = match state {
                QuestionState::Question => WHITE,
                QuestionState::Answer if action == question.answer => GREEN,
                QuestionState::Answer => GREY,
            };
            draw_text_faces(
                sink,
                &self.layout,
                font,
                x + cards_width + ACTION_GAP,
                y + i as i32 * offset_y,
                color,
                action.label(),
            );
            offset_y = font.height() as i32;
        }
    }

    fn draw_hole_cards(&self, sink: &mut dyn FrameSink, cards: &str, x: i32, y: i32) -> i32 {
        let chars = cards.chars().collect::<Vec<_>>();
        if chars.len() != 4 {
            return draw_text_faces(sink, &self.layout, FontFace::MediumBold, x, y, WHITE, cards);
        }

        let first = self.draw_card(sink, chars[0], chars[1], x, y);
        let second = self.draw_card(sink, chars[2], chars[3], x + first + CARD_GAP, y);
        first + second + CARD_GAP
    }

    /// Rank above suit, the narrower of the two centred
    fn draw_card(&self, sink: &mut dyn FrameSink, rank: char, suit: char, x: i32, y: i32) -> i32 {
        let rank = rank.to_string();
        let glyph = suit_glyph(suit).to_string();
        let rank_width = sink.text_width(FontFace::Rank, &rank);
        let suit_width = sink.text_width(FontFace::Suit, &glyph);

        let (rank_pad, suit_pad) = if rank_width < suit_width {
            ((suit_width - rank_width + 1) / 2, 0)
        } else {
            (0, (rank_width - suit_width + 1) / 2)
        };

        let color = suit_color(suit);
        draw_text_faces(sink, &self.layout, FontFace::Rank, x + rank_pad, y, color, &rank);
        draw_text_faces(
            sink,
            &self.layout,
            FontFace::Suit,
            x + suit_pad,
            y + FontFace::Rank.height() as i32,
            color,
            &glyph,
        );

        rank_width.max(suit_width)
    }

    /// The ad line in every suit color, one below the other
    fn draw_ad(&self, sink: &mut dyn FrameSink, x: i32) -> i32 {
        let font = FontFace::MediumBold;
        let mut width = 0;
        for (i, suit) in AD_SUITS.into_iter().enumerate() {
            let y = AD_Y + i as i32 * font.height() as i32;
            width = draw_text_faces(sink, &self.layout, font, x, y, suit_color(suit), AD_TEXT);
        }
        width
    }
}

impl Renderer for QuizRenderer {
    fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
        if self.questions.is_empty() {
            warn!("Quiz has no questions");
            return Ok(Tick::Finished);
        }

        sink.clear();
        match self.phase {
            Phase::Quiz => {
                self.advance_quiz();
                self.draw_question(sink);
            }
            Phase::Ad { ticks, x } => {
                let ad_width = self.draw_ad(sink, x);
                let ticks = ticks + 1;
                let mut x = x - 1;
                if x + ad_width < 0 {
                    x = self.layout.width as i32;
                }
                self.phase = if ticks > AD_TICKS {
                    debug!("Ad finished, resuming quiz");
                    Phase::Quiz
                } else {
                    Phase::Ad { ticks, x }
                };
            }
        }

        sink.swap_on_vsync(1)?;
        Ok(Tick::Continue(TICK_INTERVAL))
    }

    fn name(&self) -> &'static str {
        "quiz"
    }
}
