// Settings loading and API key lookup
//
// Settings live in <config_dir>/mrua_motion/settings.toml. The API key is
// never stored there; it is read from the environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chart::DEFAULT_SIZE;
use crate::error::ConfigError;
use crate::motion_parameters::MotionParameters;

/// Environment variables checked for the assistant key, in order.
pub const API_KEY_VARS: [&str; 2] = ["MRUA_OPENAI_KEY", "OPENAI_API_KEY"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub motion: MotionSettings,
    pub assistant: AssistantSettings,
    pub chart: ChartSettings,
}

/// Initial conditions offered when the user gives none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    pub initial_velocity: f64,
    pub acceleration: f64,
    pub max_time: f64,
    /// Upper bound on the samples a single request may produce
    pub max_samples: usize,
}

impl Default for MotionSettings {
    fn default() -> Self {
        let defaults = MotionParameters::default();
        Self {
            initial_velocity: defaults.initial_velocity,
            acceleration: defaults.acceleration,
            max_time: defaults.max_time,
            max_samples: 1_000_000,
        }
    }
}

impl MotionSettings {
    pub fn parameters(&self) -> MotionParameters {
        MotionParameters::new(self.initial_velocity, self.acceleration, self.max_time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub temperature: f32,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            timeout_secs: 30,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
        }
    }
}

impl Settings {
    /// Default location of the settings file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mrua_motion")
            .join("settings.toml")
    }

    /// Loads an explicit settings file. Every error is reported.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the settings from the default location, falling back to defaults
    /// when the file is missing or unreadable.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Explicit path if given, default location otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::load()),
        }
    }
}

/// Where the API key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Environment variable with the given name
    Environment(&'static str),
    None,
}

/// Result of key lookup
#[derive(Debug, Clone)]
pub struct KeyLookup {
    pub key: Option<String>,
    pub source: KeySource,
}

/// Looks up the assistant API key in the process environment.
pub fn api_key() -> KeyLookup {
    api_key_with(|name| env::var(name).ok())
}

/// Looks up the API key through `lookup`, skipping empty values.
pub fn api_key_with<F>(lookup: F) -> KeyLookup
where
    F: Fn(&str) -> Option<String>,
{
    for name in API_KEY_VARS {
        if let Some(key) = lookup(name).filter(|k| !k.trim().is_empty()) {
            return KeyLookup {
                key: Some(key),
                source: KeySource::Environment(name),
            };
        }
    }
    KeyLookup {
        key: None,
        source: KeySource::None,
    }
}
