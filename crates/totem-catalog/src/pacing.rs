//! Per-directory cycle pacing

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a directory cycle plays animated entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePacing {
    /// Full passes through each animation before moving on
    pub iterations: u32,
    /// Frames per second
    pub framerate: u32,
}

impl CyclePacing {
    pub const fn new(iterations: u32, framerate: u32) -> Self {
        Self {
            iterations,
            framerate,
        }
    }

    /// How long each frame is held
    pub fn frame_ms(&self) -> u32 {
        1000 / self.framerate.max(1)
    }
}

/// Pacing lookup with a fallback entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingTable {
    pub default: CyclePacing,
    pub directories: HashMap<String, CyclePacing>,
}

impl PacingTable {
    /// Table with only a fallback entry
    pub fn new(default: CyclePacing) -> Self {
        Self {
            default,
            directories: HashMap::new(),
        }
    }

    /// Set pacing for one directory
    pub fn with(mut self, name: &str, pacing: CyclePacing) -> Self {
        self.directories.insert(name.to_lowercase(), pacing);
        self
    }

    /// Pacing for a directory, falling back to the default
    pub fn get(&self, name: &str) -> CyclePacing {
        self.directories
            .get(&name.to_lowercase())
            .copied()
            .unwrap_or(self.default)
    }
}

impl Default for PacingTable {
    fn default() -> Self {
        Self::new(CyclePacing::new(2, 10))
            .with("aot", CyclePacing::new(1, 15))
            .with("anime", CyclePacing::new(1, 10))
            .with("fireforce", CyclePacing::new(1, 12))
            .with("demon", CyclePacing::new(1, 10))
            .with("pope", CyclePacing::new(1, 10))
    }
}
