//! Command resolution preview

use crate::config::TotemConfig;
use totem_catalog::{ContentCatalog, ImageMediaSource};
use totem_core::{Palette, RenderDirective};
use totem_pipeline::{CommandInterpreter, InterpretContext};
use tracing::warn;

pub fn run(config: &TotemConfig, command: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ContentCatalog::scan(&config.images_dir).unwrap_or_else(|e| {
        warn!(error = %e, "Cannot scan catalog, interpreting against an empty one");
        ContentCatalog::new(&config.images_dir)
    });
    let palette = Palette::standard();
    let media = ImageMediaSource::new(config.layout.width, config.layout.height);

    let ctx = InterpretContext {
        catalog: &catalog,
        palette: &palette,
        pacing: &config.pacing,
        media: &media,
        default_subject: &config.subject,
    };
    let directive = CommandInterpreter::new().interpret(command, &ctx, &mut rand::thread_rng());

    println!("{}", directive.kind());
    match directive {
        RenderDirective::PlayLoop { frames } => {
            let total: u32 = frames.iter().map(|f| f.duration_ms).sum();
            println!("  {} frames, {} ms per loop", frames.len(), total);
        }
        RenderDirective::ShowImage { path, image } => {
            println!("  {} ({}x{})", path.display(), image.width, image.height);
        }
        other => println!("  {other:?}"),
    }
    Ok(())
}
