//! Shared settings for the fish-gauge CLI and GUI.
//! Persisted in the platform-specific config directory via `directories::ProjectDirs`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{SpeciesTable, SpeciesTableError, DEFAULT_SPECIES};
use crate::measure::{SessionConfig, DEFAULT_LURE_LENGTH_CM, DEFAULT_SESSION_PERSPECTIVE};

/// Last-used parameters that can be saved and loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Language code ("fr" or "en")
    pub lang: String,
    /// Lure length in cm
    pub lure_length_cm: f64,
    /// Perspective correction factor
    pub perspective_factor: f64,
    /// Species label used for classification (empty = no classification)
    pub species: String,
    /// Species table JSON file (empty = built-in table)
    pub species_file: String,
    /// Last photo path
    pub image_path: String,
    /// Font used to label annotated images (empty = no labels)
    pub font_path: String,
    /// Last lure points, as typed
    pub lure_points: String,
    /// Last fish points, as typed
    pub fish_points: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            lang: "fr".to_string(),
            lure_length_cm: DEFAULT_LURE_LENGTH_CM,
            perspective_factor: DEFAULT_SESSION_PERSPECTIVE,
            species: DEFAULT_SPECIES.to_string(),
            species_file: String::new(),
            image_path: String::new(),
            font_path: String::new(),
            lure_points: String::new(),
            fish_points: String::new(),
        }
    }
}

impl AppSettings {
    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "fish-gauge", "fish-gauge")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path.
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load settings from the config file.
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from a specific file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let loaded: Self = fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        loaded.backfilled()
    }

    /// Save settings to the config file.
    pub fn save(&self) -> Result<(), String> {
        let dir = Self::config_dir().ok_or("Cannot determine config directory")?;
        self.save_to(&dir.join("settings.json"))
    }

    /// Save settings to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            // Create config directory if it doesn't exist
            fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(path, content).map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }

    /// Get logs directory path.
    pub fn logs_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "fish-gauge", "fish-gauge")
            .map(|dirs| dirs.data_dir().join("logs"))
    }

    /// Session parameters described by these settings.
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::default()
            .with_reference_length(self.lure_length_cm)
            .with_perspective_factor(self.perspective_factor);
        if !self.species.trim().is_empty() {
            config = config.with_species(self.species.trim());
        }
        if !self.image_path.trim().is_empty() {
            config = config.with_image_path(self.image_path.trim());
        }
        config
    }

    /// Load the configured species table, or the built-in one.
    pub fn species_table(&self) -> Result<SpeciesTable, SpeciesTableError> {
        let path = Some(self.species_file.trim())
            .filter(|p| !p.is_empty())
            .map(Path::new);
        SpeciesTable::load_or_default(path)
    }

    /// Replace values an older or hand-edited file left unusable.
    fn backfilled(mut self) -> Self {
        let defaults = Self::default();

        if self.lang.is_empty() {
            self.lang = defaults.lang;
        }
        if !(self.lure_length_cm.is_finite() && self.lure_length_cm > 0.0) {
            self.lure_length_cm = defaults.lure_length_cm;
        }
        if !(self.perspective_factor.is_finite() && self.perspective_factor > 0.0) {
            self.perspective_factor = defaults.perspective_factor;
        }

        self
    }
}
