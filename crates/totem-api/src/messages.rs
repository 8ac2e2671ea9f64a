//! HTTP request and response bodies

use serde::{Deserialize, Serialize};
use totem_catalog::CatalogEntry;
use totem_core::{Brightness, UpdateOutcome};
use totem_pipeline::{CommandOutcome, CommandRequest, ControllerStatus};

/// Header carrying the client clock of a canvas push
pub const CANVAS_TIMESTAMP_HEADER: &str = "x-canvas-timestamp";

/// `POST /api/command` body
///
/// `command` is optional here so a missing one can be answered with 400
/// instead of a deserialisation rejection. The body is parsed as JSON
/// whatever its content type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandBody {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
}

impl CommandBody {
    /// Convert into a controller request, `None` without a command
    pub fn into_request(self) -> Option<CommandRequest> {
        let mut request = CommandRequest::new(self.command?);
        request.artwork_url = self.artwork_url.filter(|url| !url.trim().is_empty());
        Some(request)
    }
}

/// `POST /api/command` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    pub command: String,
    /// Directive kind, e.g. `scroll_text`
    pub directive: String,
}

impl From<CommandOutcome> for CommandReply {
    fn from(outcome: CommandOutcome) -> Self {
        Self {
            command: outcome.command,
            directive: outcome.kind.as_str().to_string(),
        }
    }
}

/// `GET /api/status` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub command: Option<String>,
    pub task: Option<String>,
    pub canvas_updated_at: u64,
    /// Percent, 1 to 100
    pub brightness: u8,
}

impl From<ControllerStatus> for StatusReply {
    fn from(status: ControllerStatus) -> Self {
        Self {
            command: status.command,
            task: status.task.map(str::to_string),
            canvas_updated_at: status.canvas_updated_at,
            brightness: status.brightness.percent(),
        }
    }
}

/// `POST /api/brightness` body and `/api/brightness` reply
///
/// Wide enough to carry out-of-range values to the controller, which
/// rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrightnessBody {
    pub brightness: u32,
}

impl From<Brightness> for BrightnessBody {
    fn from(brightness: Brightness) -> Self {
        Self {
            brightness: brightness.into(),
        }
    }
}

/// `POST /api/canvas` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasReply {
    pub accepted: bool,
    /// `accepted`, `stale` or `shape_mismatch`
    pub outcome: String,
    /// Canvas stamp after the push
    pub updated_at: u64,
}

impl CanvasReply {
    pub fn new(outcome: UpdateOutcome, updated_at: u64) -> Self {
        let label = match outcome {
            UpdateOutcome::Accepted => "accepted",
            UpdateOutcome::Stale => "stale",
            UpdateOutcome::ShapeMismatch => "shape_mismatch",
        };
        Self {
            accepted: outcome.is_accepted(),
            outcome: label.to_string(),
            updated_at,
        }
    }
}

/// `POST /api/artwork/{name}` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkReply {
    pub name: String,
    pub kind: String,
    pub path: String,
}

impl From<CatalogEntry> for ArtworkReply {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            name: entry.name,
            kind: entry.kind.as_str().to_string(),
            path: entry.path.display().to_string(),
        }
    }
}
