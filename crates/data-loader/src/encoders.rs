//! The encoder bundle fitted at training time.
//!
//! Stored as JSON next to the model:
//!
//! ```json
//! {
//!   "director_classes": ["Christopher Nolan", "..."],
//!   "cast_classes": ["Christian Bale,Heath Ledger,Aaron Eckhart", "..."],
//!   "month_categories": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
//!   "language_categories": ["english", "french", "..."],
//!   "genres": ["Action", "Drama", "..."]
//! }
//! ```
//!
//! Class lists keep the order the label encoders were fitted with, so the
//! position of a class is its code.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::types::Month;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderBundle {
    pub director_classes: Vec<String>,
    pub cast_classes: Vec<String>,
    pub month_categories: Vec<Month>,
    pub language_categories: Vec<String>,
    pub genres: Vec<String>,
}

impl EncoderBundle {
    /// Load and validate the bundle from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading encoders from {:?}", path);
        let raw = fs::read_to_string(path).map_err(|e| DataLoadError::from_io(path, e))?;
        let bundle = Self::from_json(&raw)?;
        info!(
            "Loaded encoders: {} directors, {} cast combinations, {} languages, {} genres",
            bundle.director_classes.len(),
            bundle.cast_classes.len(),
            bundle.language_categories.len(),
            bundle.genres.len()
        );
        Ok(bundle)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(raw)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Check that:
    /// - Month categories are real months
    /// - No category list repeats a value
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.month_categories.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(DataLoadError::InvalidValue {
                field: "month_categories".to_string(),
                value: bad.to_string(),
            });
        }
        ensure_unique("director_classes", &self.director_classes)?;
        ensure_unique("cast_classes", &self.cast_classes)?;
        ensure_unique("month_categories", &self.month_categories)?;
        ensure_unique("language_categories", &self.language_categories)?;
        ensure_unique("genres", &self.genres)?;
        Ok(())
    }
}

fn ensure_unique<T: std::hash::Hash + Eq + std::fmt::Display>(field: &str, values: &[T]) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(DataLoadError::ValidationError(format!(
                "duplicate entry '{}' in {}",
                value, field
            )));
        }
    }
    Ok(())
}
