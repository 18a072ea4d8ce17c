//! Where the startup artifacts live.

use std::path::{Path, PathBuf};

/// File name of the historical movie table inside an artifacts directory
pub const HISTORY_FILE: &str = "movies_encoded_for_ml.csv";
/// File name of the fitted encoder vocabularies
pub const ENCODERS_FILE: &str = "encoders.json";
/// File name of the model manifest
pub const MODEL_FILE: &str = "model.json";

/// Paths to the three artifacts the predictor loads at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub history: PathBuf,
    pub encoders: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    /// Default file names under one directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            history: dir.join(HISTORY_FILE),
            encoders: dir.join(ENCODERS_FILE),
            model: dir.join(MODEL_FILE),
        }
    }

    /// Replace individual paths where an override is given
    pub fn with_overrides(
        mut self,
        history: Option<PathBuf>,
        encoders: Option<PathBuf>,
        model: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = history {
            self.history = path;
        }
        if let Some(path) = encoders {
            self.encoders = path;
        }
        if let Some(path) = model {
            self.model = path;
        }
        self
    }
}
