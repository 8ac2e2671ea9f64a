//! Command interpretation
//!
//! A command string is matched against an ordered list of rules; the first
//! rule that produces a directive wins. Anything no rule claims is scrolled
//! as literal text, so interpretation never fails.

use rand::RngCore;
use rand::seq::SliceRandom;
use totem_catalog::{CatalogEntry, ContentCatalog, ContentKind, MediaSource, PacingTable};
use totem_core::{ColorMode, Palette, RenderDirective};
use tracing::{debug, warn};

/// Everything the interpreter consults besides the command itself
pub struct InterpretContext<'a> {
    pub catalog: &'a ContentCatalog,
    pub palette: &'a Palette,
    pub pacing: &'a PacingTable,
    pub media: &'a dyn MediaSource,
    /// Subject of `affirmations` when the command names none
    pub default_subject: &'a str,
}

/// A command in trimmed and case-folded forms
struct Command<'c> {
    /// Trimmed, case preserved
    raw: &'c str,
    /// Trimmed, lower-cased
    folded: String,
}

type RuleFn = fn(&Command<'_>, &InterpretContext<'_>, &mut dyn RngCore) -> Option<RenderDirective>;

/// One dispatch rule
struct Rule {
    name: &'static str,
    apply: RuleFn,
}

/// Rules in priority order
const RULES: &[Rule] = &[
    Rule {
        name: "affirmations",
        apply: affirmations,
    },
    Rule {
        name: "single",
        apply: single,
    },
    Rule {
        name: "directory",
        apply: directory,
    },
    Rule {
        name: "random",
        apply: random,
    },
    Rule {
        name: "help",
        apply: help,
    },
    Rule {
        name: "pokerscope",
        apply: |c, _, _| (c.folded == "pokerscope").then_some(RenderDirective::PokerQuiz),
    },
    Rule {
        name: "canvas",
        apply: |c, _, _| (c.folded == "canvas").then_some(RenderDirective::CanvasMirror),
    },
    Rule {
        name: "howto",
        apply: |c, _, _| (c.folded == "howto").then_some(RenderDirective::Howto),
    },
    Rule {
        name: "catalog",
        apply: catalog_entry,
    },
];

/// Resolves command strings into render directives
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandInterpreter;

impl CommandInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// Rule names in the order they are tried
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> {
        RULES.iter().map(|r| r.name)
    }

    /// Resolve a command
    pub fn interpret<R: RngCore>(
        &self,
        command: &str,
        ctx: &InterpretContext<'_>,
        rng: &mut R,
    ) -> RenderDirective {
        let raw = command.trim();
        let command = Command {
            raw,
            folded: raw.to_lowercase(),
        };

        for rule in RULES {
            if let Some(directive) = (rule.apply)(&command, ctx, rng) {
                debug!(rule = rule.name, kind = %directive.kind(), "Command matched");
                return directive;
            }
        }

        let directive = literal(command.raw, ctx.palette);
        debug!(rule = "literal", kind = %directive.kind(), "Command matched");
        directive
    }
}

fn affirmations(
    command: &Command<'_>,
    ctx: &InterpretContext<'_>,
    _rng: &mut dyn RngCore,
) -> Option<RenderDirective> {
    if !command.folded.starts_with("affirmations") {
        return None;
    }

    let subject = command
        .folded
        .split(':')
        .nth(1)
        .and_then(|segment| segment.split('-').next())
        .map(title_case)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ctx.default_subject.to_string());

    let parts = command.folded.split('-').collect::<Vec<_>>();
    let color = match parts.as_slice() {
        ["affirmations", key] => ctx.palette.get(key).unwrap_or_default(),
        _ => ColorMode::Party,
    };

    Some(RenderDirective::Affirmations { subject, color })
}

fn single(
    command: &Command<'_>,
    _ctx: &InterpretContext<'_>,
    _rng: &mut dyn RngCore,
) -> Option<RenderDirective> {
    if !command.folded.starts_with("single:") {
        return None;
    }

    let mut segments = command.folded.split(':').skip(1);
    let first_token = |segment: &str| segment.split('-').next().unwrap_or_default().to_string();
    let name = first_token(segments.next()?);
    let caption = first_token(segments.next()?);
    if name.is_empty() || caption.is_empty() {
        return None;
    }

    Some(RenderDirective::Single { name, caption })
}

fn help(
    command: &Command<'_>,
    ctx: &InterpretContext<'_>,
    _rng: &mut dyn RngCore,
) -> Option<RenderDirective> {
    let color = match command.folded.strip_prefix("help") {
        Some("") => ColorMode::Party,
        Some(suffix) => ctx.palette.get(suffix.strip_prefix('-')?)?,
        None => return None,
    };
    Some(RenderDirective::Help { color })
}

fn directory(
    command: &Command<'_>,
    ctx: &InterpretContext<'_>,
    _rng: &mut dyn RngCore,
) -> Option<RenderDirective> {
    if !ctx.catalog.is_directory(&command.folded) {
        return None;
    }

    let pacing = ctx.pacing.get(&command.folded);
    Some(RenderDirective::CycleDirectory {
        name: command.folded.clone(),
        is_gif: ctx.catalog.directory_has_animation(&command.folded),
        iterations: pacing.iterations,
        framerate: pacing.framerate,
    })
}

fn random(
    command: &Command<'_>,
    ctx: &InterpretContext<'_>,
    rng: &mut dyn RngCore,
) -> Option<RenderDirective> {
    if command.folded != "random" {
        return None;
    }

    let names = ctx.catalog.names();
    let chosen = names.choose(rng)?;
    debug!(name = chosen, "Randomly chose catalog entry");
    resolve_entry(ctx.catalog.get(chosen)?, ctx)
}

fn catalog_entry(
    command: &Command<'_>,
    ctx: &InterpretContext<'_>,
    _rng: &mut dyn RngCore,
) -> Option<RenderDirective> {
    resolve_entry(ctx.catalog.get(&command.folded)?, ctx)
}

/// Directive for a catalog entry; decode failures count as a miss
fn resolve_entry(entry: &CatalogEntry, ctx: &InterpretContext<'_>) -> Option<RenderDirective> {
    match entry.kind {
        ContentKind::Still => match ctx.media.load_still(&entry.path) {
            Ok(image) => Some(RenderDirective::ShowImage {
                path: entry.path.clone(),
                image,
            }),
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "Cannot decode image");
                None
            }
        },
        ContentKind::Animated => match ctx.media.load_animation(&entry.path) {
            Ok(frames) => Some(RenderDirective::PlayLoop { frames }),
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "Cannot decode animation");
                None
            }
        },
        ContentKind::Text => match ctx.media.load_text(&entry.path) {
            Ok(text) => Some(RenderDirective::scroll(text, ColorMode::Party)),
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "Cannot read text entry");
                None
            }
        },
    }
}

/// Scroll the command itself, honouring a trailing `-<colorkey>`
fn literal(raw: &str, palette: &Palette) -> RenderDirective {
    if let Some((text, key)) = raw.rsplit_once('-') {
        if let Some(color) = palette.get(key) {
            return RenderDirective::scroll(text, color);
        }
    }
    RenderDirective::scroll(raw, ColorMode::Party)
}

/// Upper-case the first letter of every word, lower-case the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::DEFAULT_SUBJECT;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::Path;
    use totem_catalog::{CyclePacing, MediaError};
    use totem_core::color::{BLUE, RED};
    use totem_core::{AnimationFrame, DirectiveKind, ImageFrame};

    /// Decodes every image into a blank frame and every text file into its stem
    struct FakeMedia;

    impl MediaSource for FakeMedia {
        fn load_still(&self, path: &Path) -> Result<ImageFrame, MediaError> {
            if path.to_string_lossy().contains("broken") {
                return Err(MediaError::Io(std::io::ErrorKind::InvalidData.into()));
            }
            Ok(ImageFrame::new(64, 64))
        }

        fn load_animation(&self, path: &Path) -> Result<Vec<AnimationFrame>, MediaError> {
            if path.to_string_lossy().contains("broken") {
                return Err(MediaError::EmptyAnimation(path.to_path_buf()));
            }
            Ok(vec![AnimationFrame::new(ImageFrame::new(64, 64), 100)])
        }

        fn load_text(&self, path: &Path) -> Result<String, MediaError> {
            Ok(format!("text of {}", path.file_stem().unwrap().to_string_lossy()))
        }
    }

    struct Fixture {
        catalog: ContentCatalog,
        palette: Palette,
        pacing: PacingTable,
    }

    impl Fixture {
        fn new(paths: &[&str]) -> Self {
            let mut catalog = ContentCatalog::new("images");
            for path in paths {
                catalog.insert(CatalogEntry::from_path(*path).unwrap());
            }
            Self {
                catalog,
                palette: Palette::standard(),
                pacing: PacingTable::default(),
            }
        }

        fn interpret(&self, command: &str) -> RenderDirective {
            let ctx = InterpretContext {
                catalog: &self.catalog,
                palette: &self.palette,
                pacing: &self.pacing,
                media: &FakeMedia,
                default_subject: DEFAULT_SUBJECT,
            };
            CommandInterpreter::new().interpret(command, &ctx, &mut StdRng::seed_from_u64(7))
        }
    }

    #[test]
    fn test_literal_with_color_suffix() {
        let fixture = Fixture::new(&[]);
        assert_eq!(
            fixture.interpret("hello-r"),
            RenderDirective::scroll("hello", ColorMode::Fixed(RED))
        );
        assert_eq!(
            fixture.interpret("  Hi There-B "),
            RenderDirective::scroll("Hi There", ColorMode::Fixed(BLUE))
        );
    }

    #[test]
    fn test_literal_unknown_suffix_kept() {
        let fixture = Fixture::new(&[]);
        assert_eq!(
            fixture.interpret("well-known"),
            RenderDirective::scroll("well-known", ColorMode::Party)
        );
        assert_eq!(
            fixture.interpret("anything"),
            RenderDirective::scroll("anything", ColorMode::Party)
        );
    }

    #[test]
    fn test_literal_splits_at_last_dash() {
        let fixture = Fixture::new(&[]);
        assert_eq!(
            fixture.interpret("a-b-g"),
            RenderDirective::scroll("a-b", ColorMode::Fixed(totem_core::color::GREEN))
        );
    }

    #[test]
    fn test_affirmations() {
        let fixture = Fixture::new(&[]);
        assert_eq!(
            fixture.interpret("affirmations"),
            RenderDirective::Affirmations {
                subject: "You".into(),
                color: ColorMode::Party
            }
        );
        assert_eq!(
            fixture.interpret("Affirmations-r"),
            RenderDirective::Affirmations {
                subject: "You".into(),
                color: ColorMode::Fixed(RED)
            }
        );
        assert_eq!(
            fixture.interpret("affirmations:tim-r"),
            RenderDirective::Affirmations {
                subject: "Tim".into(),
                color: ColorMode::Party
            }
        );
        assert_eq!(
            fixture.interpret("affirmations-zz"),
            RenderDirective::Affirmations {
                subject: "You".into(),
                color: ColorMode::Party
            }
        );
    }

    #[test]
    fn test_single() {
        let fixture = Fixture::new(&[]);
        assert_eq!(
            fixture.interpret("single:Tim-x:is single-r"),
            RenderDirective::Single {
                name: "tim".into(),
                caption: "is single".into()
            }
        );
        // Missing caption falls through to literal text
        assert_eq!(fixture.interpret("single:tim").kind(), DirectiveKind::ScrollText);
    }

    #[test]
    fn test_directory_cycle_uses_pacing() {
        let mut fixture = Fixture::new(&[]);
        fixture.catalog.insert_directory("aot");
        fixture.pacing = PacingTable::default();

        match fixture.interpret("AOT") {
            RenderDirective::CycleDirectory {
                name,
                is_gif,
                iterations,
                framerate,
            } => {
                assert_eq!(name, "aot");
                // Directory does not exist on disk, so nothing animated is found
                assert!(!is_gif);
                assert_eq!(CyclePacing::new(iterations, framerate), CyclePacing::new(1, 15));
            }
            other => panic!("unexpected directive {other:?}"),
        }
    }

    #[test]
    fn test_special_commands() {
        let fixture = Fixture::new(&[]);
        assert_eq!(
            fixture.interpret("HELP"),
            RenderDirective::Help {
                color: ColorMode::Party
            }
        );
        assert_eq!(fixture.interpret("pokerscope"), RenderDirective::PokerQuiz);
        assert_eq!(fixture.interpret(" canvas "), RenderDirective::CanvasMirror);
        assert_eq!(fixture.interpret("howto"), RenderDirective::Howto);
    }

    #[test]
    fn test_help_color_suffix() {
        let fixture = Fixture::new(&[]);
        assert_eq!(
            fixture.interpret("help-r"),
            RenderDirective::Help {
                color: ColorMode::Fixed(RED)
            }
        );
        assert_eq!(
            fixture.interpret("help-party"),
            RenderDirective::Help {
                color: ColorMode::Party
            }
        );
        // Unknown suffixes and longer words are plain text
        assert_eq!(
            fixture.interpret("help-zz"),
            RenderDirective::scroll("help-zz", ColorMode::Party)
        );
        assert_eq!(fixture.interpret("helpful").kind(), DirectiveKind::ScrollText);
    }

    #[test]
    fn test_catalog_kinds() {
        let fixture = Fixture::new(&["images/cat.png", "images/dog.gif", "images/motd.txt"]);

        for _ in 0..2 {
            assert_eq!(fixture.interpret("Cat").kind(), DirectiveKind::ShowImage);
            assert_eq!(fixture.interpret("dog").kind(), DirectiveKind::PlayLoop);
        }
        assert_eq!(
            fixture.interpret("motd"),
            RenderDirective::scroll("text of motd", ColorMode::Party)
        );
    }

    #[test]
    fn test_undecodable_entry_is_a_miss() {
        let fixture = Fixture::new(&["images/broken.gif"]);
        assert_eq!(
            fixture.interpret("broken"),
            RenderDirective::scroll("broken", ColorMode::Party)
        );
    }

    #[test]
    fn test_undecodable_still_is_a_miss() {
        let fixture = Fixture::new(&["images/broken.png"]);
        assert_eq!(
            fixture.interpret("broken-r"),
            RenderDirective::scroll("broken", ColorMode::Fixed(RED))
        );
    }

    #[test]
    fn test_random_only_picks_catalog_entries() {
        let fixture = Fixture::new(&["images/cat.png", "images/dog.gif"]);
        let ctx = InterpretContext {
            catalog: &fixture.catalog,
            palette: &fixture.palette,
            pacing: &fixture.pacing,
            media: &FakeMedia,
            default_subject: DEFAULT_SUBJECT,
        };
        let interpreter = CommandInterpreter::new();
        let mut rng = StdRng::seed_from_u64(42);

        let mut kinds = std::collections::HashSet::new();
        for _ in 0..50 {
            let kind = interpreter.interpret("random", &ctx, &mut rng).kind();
            assert!(matches!(kind, DirectiveKind::ShowImage | DirectiveKind::PlayLoop));
            kinds.insert(kind);
        }
        assert_eq!(kinds.len(), 2);
    }

    #[test]
    fn test_random_on_empty_catalog_is_literal() {
        let fixture = Fixture::new(&[]);
        assert_eq!(
            fixture.interpret("random"),
            RenderDirective::scroll("random", ColorMode::Party)
        );
    }

    #[test]
    fn test_rule_order() {
        let names = CommandInterpreter::new().rule_names().collect::<Vec<_>>();
        assert_eq!(names.first(), Some(&"affirmations"));
        assert_eq!(names.last(), Some(&"catalog"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("tim"), "Tim");
        assert_eq!(title_case("mary jane"), "Mary Jane");
    }
}
