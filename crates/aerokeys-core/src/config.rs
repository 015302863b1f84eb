//! Settings file and data paths.
//!
//! Settings live in `~/.config/aerokeys/config.toml`. Every field is
//! optional; a missing or broken file means defaults.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::source::{AerospaceCli, ConfigFileSource, ModeSource, DEFAULT_CANDIDATES, DEFAULT_TIMEOUT};

const DEFAULT_COLUMNS: u16 = 3;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aerospace: Option<AerospaceSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplaySettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AerospaceSettings {
    /// Explicit path to the `aerospace` binary; skips probing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Read bindings from this `aerospace.toml` instead of the CLI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DisplaySettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_on_main: Option<bool>,
}

/// Base data directory: `~/.local/share/aerokeys/`
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("aerokeys"))
}

/// Path to the settings file: `~/.config/aerokeys/config.toml`
pub fn config_path() -> Option<PathBuf> {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
    Some(config_dir.join("aerokeys").join("config.toml"))
}

/// Replace a leading `~` with the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(path),
    }
}

impl Settings {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings, falling back to defaults on invalid TOML.
    pub fn from_toml_str(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "invalid settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Settings with every field filled in, for `config init`.
    pub fn defaults_populated() -> Self {
        Self {
            aerospace: Some(AerospaceSettings {
                binary: None,
                candidates: Some(DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect()),
                timeout_secs: Some(DEFAULT_TIMEOUT.as_secs()),
                config_file: None,
            }),
            display: Some(DisplaySettings {
                columns: Some(DEFAULT_COLUMNS),
                hide_on_main: Some(false),
            }),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.aerospace
            .as_ref()
            .and_then(|a| a.timeout_secs)
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn columns(&self) -> u16 {
        self.display
            .as_ref()
            .and_then(|d| d.columns)
            .filter(|c| *c > 0)
            .unwrap_or(DEFAULT_COLUMNS)
    }

    pub fn hide_on_main(&self) -> bool {
        self.display
            .as_ref()
            .and_then(|d| d.hide_on_main)
            .unwrap_or(false)
    }

    /// Path of the `aerospace` binary: the configured one, else the first
    /// existing candidate.
    pub fn aerospace_binary(&self) -> PathBuf {
        let aerospace = self.aerospace.as_ref();
        if let Some(binary) = aerospace.and_then(|a| a.binary.as_deref()) {
            return expand_tilde(binary);
        }
        let candidates: Vec<PathBuf> = match aerospace.and_then(|a| a.candidates.as_ref()) {
            Some(list) => list.iter().map(|c| expand_tilde(c)).collect(),
            None => DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect(),
        };
        AerospaceCli::locate(&candidates)
    }

    pub fn config_file(&self) -> Option<PathBuf> {
        self.aerospace
            .as_ref()
            .and_then(|a| a.config_file.as_deref())
            .map(expand_tilde)
    }

    /// The binding source these settings describe.
    pub fn mode_source(&self) -> Box<dyn ModeSource> {
        match self.config_file() {
            Some(path) => Box::new(ConfigFileSource::new(path)),
            None => Box::new(AerospaceCli::new(self.aerospace_binary(), self.timeout())),
        }
    }
}

pub fn save_settings(settings: &Settings) -> io::Result<()> {
    let path = config_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "cannot determine config path"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(settings)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&path, content)
}
