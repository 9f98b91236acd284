//! Notation configuration: loads optional ~/.textsaber/notation.yaml to
//! override the symbol alphabets.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notation::grid::{
    AlphabetError, GridCodec, DEFAULT_BOMB, DEFAULT_DIRECTIONS, DEFAULT_OBSTACLE_CLOSE,
    DEFAULT_OBSTACLE_OPEN, DEFAULT_POSITIONS,
};
use crate::notation::Notation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),
}

/// Notation settings as written in YAML. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NotationConfig {
    /// 24 position symbols: red cells row by row from the bottom, then blue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<String>,
    /// 9 direction symbols in the order up, down, left, right, up-left,
    /// up-right, down-left, down-right, any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bomb: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obstacle_open: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obstacle_close: Option<char>,
    /// Reject positions written before a direction instead of placing bombs.
    #[serde(default)]
    pub strict_directions: bool,
}

impl NotationConfig {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Build the notation, filling unset fields with the defaults.
    pub fn to_notation(&self) -> Result<Notation, ConfigError> {
        let codec = GridCodec::new(
            self.positions.as_deref().unwrap_or(DEFAULT_POSITIONS),
            self.directions.as_deref().unwrap_or(DEFAULT_DIRECTIONS),
            self.bomb.unwrap_or(DEFAULT_BOMB),
            self.obstacle_open.unwrap_or(DEFAULT_OBSTACLE_OPEN),
            self.obstacle_close.unwrap_or(DEFAULT_OBSTACLE_CLOSE),
        )?;
        Ok(Notation::new(codec, self.strict_directions))
    }
}

/// Default location of the notation config.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".textsaber").join("notation.yaml"))
}

/// Load a notation config from a YAML file.
pub fn load_config(path: &Path) -> Result<NotationConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    NotationConfig::from_yaml(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the notation to use: an explicit file must load, the default
/// file is used only if it exists, otherwise the built-in alphabets apply.
pub fn resolve_notation(explicit: Option<&Path>) -> Result<Notation, ConfigError> {
    let config = match explicit {
        Some(path) => load_config(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => load_config(&path)?,
            None => NotationConfig::default(),
        },
    };
    config.to_notation()
}
