//! The ordered feature list the model was trained on.

use crate::error::{ModelError, Result};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(ModelError::InvalidSchema("no features".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(ModelError::InvalidSchema(format!("duplicate feature '{}'", dup)));
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Reindex named values onto the schema.
    ///
    /// The result has exactly one entry per schema feature, in schema
    /// order. Features the input doesn't name are 0; input names the schema
    /// doesn't know are dropped. NaN inputs are kept for the imputer.
    pub fn align<'a>(&self, values: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<f64> {
        let lookup: HashMap<&str, f64> = values.into_iter().collect();
        self.names
            .iter()
            .map(|name| lookup.get(name.as_str()).copied().unwrap_or(0.0))
            .collect()
    }
}
