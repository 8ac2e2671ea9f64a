//! HTTP command and canvas server

use crate::messages::{
    ArtworkReply, BrightnessBody, CANVAS_TIMESTAMP_HEADER, CanvasReply, CommandBody, CommandReply,
    StatusReply,
};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use totem_catalog::MediaError;
use totem_core::UpdateOutcome;
use totem_pipeline::TotemController;
use tracing::{debug, info, warn};

type HandlerError = (StatusCode, String);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub listen_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the API router around a controller
pub fn router(controller: Arc<TotemController>) -> Router {
    Router::new()
        .route("/api/hello", get(|| async { "hello" }))
        .route("/api/command", post(post_command))
        .route("/api/status", get(get_status))
        .route("/api/canvas", post(post_canvas))
        .route("/api/artwork/:name", post(post_artwork))
        .route("/api/brightness", get(get_brightness).post(post_brightness))
        .with_state(controller)
}

/// HTTP front end for a [`TotemController`]
pub struct TotemServer {
    config: ServerConfig,
    controller: Arc<TotemController>,
}

impl TotemServer {
    pub fn new(config: ServerConfig, controller: Arc<TotemController>) -> Self {
        Self { config, controller }
    }

    /// Serve until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = self.config.listen_address;
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.clone(),
                source,
            })?;
        info!(address = %address, "HTTP server listening");

        axum::serve(listener, router(self.controller))
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("HTTP server stopped");
        Ok(())
    }
}

/// Run a controller call on the blocking pool
async fn blocking<T, F>(f: F) -> Result<T, HandlerError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("controller task failed: {e}")))
}

/// Parse a JSON body without insisting on a content type
fn json_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, HandlerError> {
    serde_json::from_slice(body)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid JSON body: {e}")))
}

async fn post_command(
    State(controller): State<Arc<TotemController>>,
    body: Bytes,
) -> Result<Json<CommandReply>, HandlerError> {
    let request = json_body::<CommandBody>(&body)?
        .into_request()
        .ok_or((StatusCode::BAD_REQUEST, "missing command".to_string()))?;

    let outcome = blocking(move || controller.handle(&request)).await?;
    Ok(Json(outcome.into()))
}

async fn get_status(
    State(controller): State<Arc<TotemController>>,
) -> Result<Json<StatusReply>, HandlerError> {
    let status = blocking(move || controller.status()).await?;
    Ok(Json(status.into()))
}

async fn get_brightness(
    State(controller): State<Arc<TotemController>>,
) -> Result<Json<BrightnessBody>, HandlerError> {
    let status = blocking(move || controller.status()).await?;
    Ok(Json(status.brightness.into()))
}

async fn post_brightness(
    State(controller): State<Arc<TotemController>>,
    body: Bytes,
) -> Result<Json<BrightnessBody>, HandlerError> {
    let BrightnessBody { brightness } = json_body(&body)?;
    let changed = blocking(move || controller.set_brightness(brightness)).await?;
    match changed {
        Ok(brightness) => Ok(Json(brightness.into())),
        Err(e) => {
            warn!(error = %e, "Brightness change rejected");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn post_canvas(
    State(controller): State<Arc<TotemController>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CanvasReply>, HandlerError> {
    let timestamp = headers
        .get(CANVAS_TIMESTAMP_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .ok_or((
            StatusCode::BAD_REQUEST,
            format!("missing or invalid {CANVAS_TIMESTAMP_HEADER} header"),
        ))?;

    let canvas = controller.canvas();
    let outcome = canvas.apply_push(timestamp, &body);
    match outcome {
        UpdateOutcome::Accepted => debug!(timestamp, "Canvas updated"),
        UpdateOutcome::Stale => debug!(timestamp, "Dropped stale canvas update"),
        UpdateOutcome::ShapeMismatch => {
            warn!(timestamp, len = body.len(), "Dropped malformed canvas update")
        }
    }

    Ok(Json(CanvasReply::new(outcome, canvas.last_updated_at())))
}

async fn post_artwork(
    State(controller): State<Arc<TotemController>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ArtworkReply>, HandlerError> {
    let stored = blocking(move || controller.store_artwork(&name, &body)).await?;
    match stored {
        Ok(entry) => Ok(Json(entry.into())),
        Err(e) => {
            warn!(error = %e, "Artwork upload rejected");
            let status = match e {
                MediaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            };
            Err((status, e.to_string()))
        }
    }
}
