//! Catalog listing command

use crate::config::TotemConfig;
use totem_catalog::ContentCatalog;

pub fn run(config: &TotemConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ContentCatalog::scan(&config.images_dir)?;

    println!("Content in {}", catalog.root().display());
    println!("{}", "=".repeat(40));
    for entry in catalog.entries() {
        println!(
            "  {:<24} {:<9} {}",
            entry.name,
            entry.kind.as_str(),
            entry.path.display()
        );
    }

    println!();
    println!("Cycle directories");
    println!("{}", "=".repeat(40));
    for name in catalog.directories() {
        let pacing = config.pacing.get(name);
        println!(
            "  {:<24} {} x {} fps",
            name, pacing.iterations, pacing.framerate
        );
    }

    println!();
    println!(
        "{} entries, {} directories",
        catalog.len(),
        catalog.directories().count()
    );
    Ok(())
}
