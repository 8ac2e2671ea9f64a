//! TOML configuration
//!
//! Every key is optional; anything left out keeps its default.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use totem_catalog::{CyclePacing, PacingTable};
use totem_core::{Brightness, Duplication, Palette, PanelLayout};
use totem_pipeline::renderers::DEFAULT_SUBJECT;
use totem_pipeline::{ControllerConfig, QuizConfig};
use tracing::{debug, info};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    images_dir: Option<PathBuf>,
    listen_address: Option<String>,
    default_command: Option<String>,
    default_command_file: Option<PathBuf>,
    subject: Option<String>,
    brightness: Option<Brightness>,
    panel: Option<PanelSection>,
    pacing: Option<PacingSection>,
    quiz: Option<QuizConfig>,
    help: Option<HelpSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PanelSection {
    width: Option<u32>,
    height: Option<u32>,
    faces: Option<u32>,
    duplication: Option<Duplication>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PacingSection {
    default: Option<CyclePacing>,
    #[serde(default)]
    directories: HashMap<String, CyclePacing>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HelpSection {
    hidden_prefixes: Option<Vec<String>>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct TotemConfig {
    pub images_dir: PathBuf,
    pub listen_address: String,
    pub default_command: String,
    pub default_command_file: Option<PathBuf>,
    pub subject: String,
    pub brightness: Brightness,
    pub layout: PanelLayout,
    pub pacing: PacingTable,
    pub quiz: QuizConfig,
    pub hidden_prefixes: Vec<String>,
}

impl Default for TotemConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("images"),
            listen_address: "0.0.0.0:8080".to_string(),
            default_command: "shrek".to_string(),
            default_command_file: None,
            subject: DEFAULT_SUBJECT.to_string(),
            brightness: Brightness::default(),
            layout: PanelLayout::default(),
            pacing: PacingTable::default(),
            quiz: QuizConfig::default(),
            hidden_prefixes: Vec::new(),
        }
    }
}

impl TotemConfig {
    /// Load from `path`; a missing file means defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        match std::fs::read_to_string(path) {
            Ok(text) => {
                info!(path = %path.display(), "Loaded config");
                Self::parse(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse TOML text over the defaults
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = Self::default();

        if let Some(v) = file.images_dir {
            config.images_dir = v;
        }
        if let Some(v) = file.listen_address {
            config.listen_address = v;
        }
        if let Some(v) = file.default_command {
            config.default_command = v;
        }
        config.default_command_file = file.default_command_file;
        if let Some(v) = file.subject {
            config.subject = v;
        }
        if let Some(v) = file.brightness {
            config.brightness = v;
        }

        let panel = file.panel.unwrap_or_default();
        if let Some(v) = panel.width {
            config.layout.width = v;
        }
        if let Some(v) = panel.height {
            config.layout.height = v;
        }
        if let Some(v) = panel.faces {
            config.layout.faces = v.max(1);
        }
        if let Some(v) = panel.duplication {
            config.layout.duplication = v;
        }

        let pacing = file.pacing.unwrap_or_default();
        if let Some(v) = pacing.default {
            config.pacing.default = v;
        }
        for (name, v) in &pacing.directories {
            config.pacing = config.pacing.with(name, *v);
        }

        if let Some(v) = file.quiz {
            config.quiz = v;
        }
        if let Some(v) = file.help.and_then(|h| h.hidden_prefixes) {
            config.hidden_prefixes = v;
        }

        Ok(config)
    }

    /// Command to show at start-up
    ///
    /// With a default command file, its trimmed contents win; the file is
    /// created holding `default_command` when it does not exist yet.
    pub fn startup_command(&self) -> Result<String, ConfigError> {
        let Some(path) = &self.default_command_file else {
            return Ok(self.default_command.clone());
        };
        let io_err = |source| ConfigError::Io {
            path: path.clone(),
            source,
        };

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
            std::fs::write(path, &self.default_command).map_err(io_err)?;
            info!(path = %path.display(), "Created default command file");
        }

        let command = std::fs::read_to_string(path).map_err(io_err)?;
        let command = command.trim();
        if command.is_empty() {
            return Ok(self.default_command.clone());
        }
        Ok(command.to_string())
    }

    /// Controller settings derived from this config
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            layout: self.layout,
            subject: self.subject.clone(),
            palette: Palette::standard(),
            pacing: self.pacing.clone(),
            quiz: self.quiz.clone(),
            hidden_prefixes: self.hidden_prefixes.clone(),
            brightness: self.brightness,
        }
    }
}
