//! Totem CLI - LED Matrix Display
//!
//! Runs the totem: scans the content catalog, shows the default command,
//! and takes new commands over HTTP and stdin.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod config;

use config::TotemConfig;

/// Totem - LED matrix display driver
#[derive(Parser)]
#[command(name = "totem")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the display
    Run {
        /// Render into memory instead of the terminal
        #[arg(long)]
        headless: bool,

        /// Listen address, overriding the config
        #[arg(short, long)]
        listen: Option<String>,

        /// Do not read commands from stdin
        #[arg(long)]
        no_stdin: bool,
    },

    /// List catalog entries and cycle directories
    Catalog,

    /// Show what a command resolves to
    Interpret {
        /// Command text
        command: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = TotemConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            headless,
            listen,
            no_stdin,
        } => {
            if let Some(listen) = listen {
                config.listen_address = listen;
            }
            commands::run::run(config, headless, !no_stdin).await?;
        }

        Commands::Catalog => {
            commands::catalog::run(&config)?;
        }

        Commands::Interpret { command } => {
            commands::interpret::run(&config, &command)?;
        }
    }

    Ok(())
}
