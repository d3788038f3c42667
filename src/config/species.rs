//! Species size limits.
//!
//! The table is plain data: new species or new limits are added by editing a
//! JSON file, not the code. The built-in table only knows the sea bass.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::measure::{classify, MeasureError, MeasureResult, SizeVerdict};

/// Species selected when nothing else is configured.
pub const DEFAULT_SPECIES: &str = "Bar";

/// Legal size of the default species, in cm.
pub const DEFAULT_SIZE_LIMIT_CM: f64 = 42.0;

/// Species table errors.
#[derive(Error, Debug)]
pub enum SpeciesTableError {
    #[error("Failed to read species table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse species table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid size limit for {species}: {value}")]
    InvalidLimit { species: String, value: f64 },
    #[error("Empty species label")]
    EmptyLabel,
}

/// Minimum legal length for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeClass {
    pub species: String,
    pub size_limit_cm: f64,
}

impl SizeClass {
    pub fn new(species: impl Into<String>, size_limit_cm: f64) -> Self {
        Self {
            species: species.into(),
            size_limit_cm,
        }
    }

    /// Compare a corrected length with this limit.
    pub fn verdict(&self, corrected_length_cm: f64) -> SizeVerdict {
        SizeVerdict {
            species: self.species.clone(),
            size_limit_cm: self.size_limit_cm,
            meets_limit: classify(corrected_length_cm, self.size_limit_cm),
        }
    }

    /// Label for pick lists, e.g. `Bar (maille 42 cm)`.
    pub fn display_label(&self, lang: &str) -> String {
        let word = super::get_messages(lang).size_limit;
        format!("{} ({} {} cm)", self.species, word, self.size_limit_cm)
    }

    fn validate(&self) -> Result<(), SpeciesTableError> {
        if self.species.trim().is_empty() {
            return Err(SpeciesTableError::EmptyLabel);
        }
        if !(self.size_limit_cm.is_finite() && self.size_limit_cm > 0.0) {
            return Err(SpeciesTableError::InvalidLimit {
                species: self.species.clone(),
                value: self.size_limit_cm,
            });
        }
        Ok(())
    }
}

/// Ordered species → size limit table.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesTable {
    entries: Vec<SizeClass>,
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self {
            entries: vec![SizeClass::new(DEFAULT_SPECIES, DEFAULT_SIZE_LIMIT_CM)],
        }
    }
}

impl SpeciesTable {
    /// Create an empty table.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a table from entries. Later duplicates replace earlier ones.
    pub fn from_entries(
        entries: impl IntoIterator<Item = SizeClass>,
    ) -> Result<Self, SpeciesTableError> {
        let mut table = Self::empty();
        for entry in entries {
            table.insert(entry)?;
        }
        Ok(table)
    }

    /// Load a table from a JSON file (a list of `{species, size_limit_cm}`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpeciesTableError> {
        let content = fs::read_to_string(path.as_ref())?;
        let entries: Vec<SizeClass> = serde_json::from_str(&content)?;
        Self::from_entries(entries)
    }

    /// Load from `path` when given, otherwise use the built-in table.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SpeciesTableError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save the table as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SpeciesTableError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, class: SizeClass) -> Result<(), SpeciesTableError> {
        class.validate()?;
        let class = SizeClass::new(class.species.trim(), class.size_limit_cm);
        match self.entries.iter_mut().find(|e| e.species == class.species) {
            Some(existing) => *existing = class,
            None => self.entries.push(class),
        }
        Ok(())
    }

    /// Remove an entry, returning it if present.
    pub fn remove(&mut self, label: &str) -> Option<SizeClass> {
        let idx = self.entries.iter().position(|e| e.species == label)?;
        Some(self.entries.remove(idx))
    }

    /// Look up a species. Exact match first, then case-insensitive.
    pub fn get(&self, label: &str) -> Option<&SizeClass> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|e| e.species == label)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.species.eq_ignore_ascii_case(label))
            })
    }

    /// Resolve a label or fail with [`MeasureError::UnknownClassificationTarget`].
    pub fn resolve(&self, label: &str) -> MeasureResult<&SizeClass> {
        self.get(label)
            .ok_or_else(|| MeasureError::unknown_species(label))
    }

    /// Classify a corrected length against a species limit.
    pub fn classify(&self, label: &str, corrected_length_cm: f64) -> MeasureResult<SizeVerdict> {
        self.resolve(label)
            .map(|class| class.verdict(corrected_length_cm))
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.species.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SizeClass> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
