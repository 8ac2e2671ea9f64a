//! Run command
//!
//! Owns the process lifecycle: build the controller, show the start-up
//! command, take commands from stdin and HTTP, and stop the active renderer
//! on Ctrl+C.

use crate::config::TotemConfig;
use std::io::BufRead;
use std::sync::{Arc, Weak};
use totem_api::{ServerConfig, TotemServer};
use totem_backend_terminal::{OutputError, TerminalSink};
use totem_catalog::{ContentCatalog, HttpArtworkFetcher};
use totem_core::{MemorySink, VSYNC_QUANTUM};
use totem_pipeline::{CommandRequest, SharedSink, TotemController, shared_sink};
use tracing::{info, warn};

pub async fn run(
    config: TotemConfig,
    headless: bool,
    read_stdin: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ContentCatalog::scan(&config.images_dir).unwrap_or_else(|e| {
        warn!(error = %e, "Cannot scan catalog, starting empty");
        ContentCatalog::new(&config.images_dir)
    });
    let startup = config.startup_command()?;

    let sink = open_sink(&config, headless)?;
    let controller = Arc::new(
        TotemController::new(config.controller_config(), catalog, sink)
            .with_fetcher(Arc::new(HttpArtworkFetcher::new())),
    );

    let first = Arc::clone(&controller);
    tokio::task::spawn_blocking(move || first.handle(&CommandRequest::new(startup))).await?;

    if read_stdin {
        spawn_stdin_reader(Arc::downgrade(&controller))?;
    }

    let server = TotemServer::new(
        ServerConfig {
            listen_address: config.listen_address.clone(),
        },
        Arc::clone(&controller),
    );
    server
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Unable to listen for Ctrl+C");
            }
            info!("Shutting down");
        })
        .await?;

    let last = Arc::clone(&controller);
    tokio::task::spawn_blocking(move || last.shutdown()).await?;
    Ok(())
}

fn open_sink(config: &TotemConfig, headless: bool) -> Result<SharedSink, OutputError> {
    let width = config.layout.physical_width();
    let height = config.layout.physical_height();
    let memory = || shared_sink(MemorySink::new(width, height).with_vsync(VSYNC_QUANTUM));

    if headless {
        info!(width, height, "Rendering headless");
        return Ok(memory());
    }

    match TerminalSink::stdout(width, height) {
        Ok(sink) => Ok(shared_sink(sink)),
        Err(OutputError::NotAvailable) => {
            warn!("Stdout is not a terminal, rendering headless");
            Ok(memory())
        }
        Err(e) => Err(e),
    }
}

/// One command per line; an empty line ends intake
///
/// The reader only holds a weak handle so it never keeps the controller (and
/// with it the terminal) alive past shutdown.
fn spawn_stdin_reader(controller: Weak<TotemController>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    info!("Empty line, stopping stdin intake");
                    break;
                }
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                controller.handle(&CommandRequest::new(line));
            }
        })?;
    Ok(())
}
