//! Feature engineering for a movie query.
//!
//! This module turns the raw request fields into the named feature values
//! the trained model expects. Historical aggregates come precomputed from
//! [`HistoricalStats`]; the fitted vocabularies come from the encoder
//! bundle.

use std::collections::HashMap;
use std::sync::Arc;

use data_loader::{EncoderBundle, HistoricalDataset, Month};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::encoding::{LabelEncoder, OneHotEncoder};
use crate::franchise::detect_franchise;
use crate::normalize::{month_from_name, normalize_genres, title_case};
use crate::track_record::HistoricalStats;

/// Language assumed when the request doesn't name one
pub const DEFAULT_LANGUAGE: &str = "english";

/// Raw movie description as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieQuery {
    pub director: String,
    /// Up to three billed actors, in billing order
    pub actors: Vec<String>,
    pub genres: Vec<String>,
    pub language: String,
    /// Full English month name, e.g. "March"
    pub release_month: String,
    pub title: String,
}

impl Default for MovieQuery {
    fn default() -> Self {
        Self {
            director: String::new(),
            actors: Vec::new(),
            genres: Vec::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            release_month: String::new(),
            title: String::new(),
        }
    }
}

/// A query after categorical normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    pub director: String,
    /// Non-empty actor names, title-cased
    pub actors: Vec<String>,
    /// Label-encoder key for the whole cast: actors joined with ','
    pub cast_key: String,
    pub genres: Vec<String>,
    pub language: String,
    pub month: Month,
    pub title: String,
}

/// The scalar features derived for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFeatures {
    pub release_month: Month,
    pub director_encoded: i64,
    pub cast_encoded: i64,
    pub actor_track_record: f64,
    pub director_track_record: f64,
    pub franchise_track_record: f64,
    pub genre_seasonal_score: f64,
    pub franchise: Option<&'static str>,
}

/// Named feature values in assembly order.
///
/// Setting a name that already exists overwrites the value in place, so a
/// later block of columns can never reorder an earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    values: Vec<(String, f64)>,
    positions: HashMap<String, usize>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.positions.get(&name) {
            Some(&idx) => self.values[idx].1 = value,
            None => {
                self.positions.insert(name.clone(), self.values.len());
                self.values.push((name, value));
            }
        }
    }

    pub fn extend(&mut self, columns: impl IntoIterator<Item = (String, f64)>) {
        for (name, value) in columns {
            self.set(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.positions.get(name).map(|&idx| self.values[idx].1)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// Computes model features for movie queries.
///
/// Cheap to clone: the historical aggregates are shared.
#[derive(Debug, Clone)]
pub struct FeatureEngineer {
    stats: Arc<HistoricalStats>,
    director_encoder: LabelEncoder,
    cast_encoder: LabelEncoder,
    month_encoder: OneHotEncoder<Month>,
    language_encoder: OneHotEncoder<String>,
    genres: Vec<String>,
}

impl FeatureEngineer {
    /// Precompute the historical aggregates and rebuild the encoders
    pub fn new(dataset: &HistoricalDataset, encoders: &EncoderBundle) -> Self {
        let stats = HistoricalStats::compute(dataset, &encoders.genres);
        Self::with_stats(Arc::new(stats), encoders)
    }

    pub fn with_stats(stats: Arc<HistoricalStats>, encoders: &EncoderBundle) -> Self {
        Self {
            stats,
            director_encoder: LabelEncoder::new(&encoders.director_classes),
            cast_encoder: LabelEncoder::new(&encoders.cast_classes),
            month_encoder: OneHotEncoder::new("month", encoders.month_categories.clone()),
            language_encoder: OneHotEncoder::new("lang", encoders.language_categories.clone()),
            genres: encoders.genres.clone(),
        }
    }

    pub fn stats(&self) -> &HistoricalStats {
        &self.stats
    }

    /// Apply the categorical normalization rules to a raw query
    pub fn normalize(&self, query: &MovieQuery) -> NormalizedQuery {
        let actors: Vec<String> = query
            .actors
            .iter()
            .take(3)
            .map(|a| title_case(a))
            .filter(|a| !a.is_empty())
            .collect();

        NormalizedQuery {
            director: title_case(&query.director),
            cast_key: actors.join(","),
            actors,
            genres: normalize_genres(&query.genres),
            language: query.language.clone(),
            month: month_from_name(&query.release_month),
            title: title_case(&query.title),
        }
    }

    /// Encodings and track records for a normalized query
    pub fn derive(&self, query: &NormalizedQuery) -> DerivedFeatures {
        let fallback = self.stats.fallback();

        let actor_track_record = self.stats.actor_track_record(&query.actors).unwrap_or_else(|| {
            debug!("No actor history for {:?}, using dataset mean", query.actors);
            fallback.actor
        });

        let director_track_record = self
            .stats
            .director_track_record(&query.director)
            .unwrap_or_else(|| {
                debug!("No director history for '{}', using dataset mean", query.director);
                fallback.director
            });

        let franchise = detect_franchise(&query.title);
        let franchise_track_record = self
            .stats
            .franchise_track_record(franchise)
            .unwrap_or_else(|| {
                debug!("No franchise history for {:?}, using dataset mean", franchise);
                fallback.franchise
            });

        let genre_seasonal_score = self
            .stats
            .genre_seasonal_score(&query.genres, query.month)
            .unwrap_or_else(|| {
                debug!(
                    "No seasonal history for {:?} in month {}, using dataset mean",
                    query.genres, query.month
                );
                fallback.genre_seasonal
            });

        DerivedFeatures {
            release_month: query.month,
            director_encoded: self.director_encoder.transform(&query.director),
            cast_encoded: self.cast_encoder.transform(&query.cast_key),
            actor_track_record,
            director_track_record,
            franchise_track_record,
            genre_seasonal_score,
            franchise,
        }
    }

    /// Assemble every named feature for a normalized query.
    ///
    /// Order: scalar features, month one-hot, language one-hot, genre
    /// indicators. A month or language outside the fitted vocabulary
    /// leaves all of its indicator columns at 0.
    pub fn assemble(&self, query: &NormalizedQuery, derived: &DerivedFeatures) -> FeatureRecord {
        let mut record = FeatureRecord::new();
        record.set("release_month", derived.release_month as f64);
        record.set("director_encoded", derived.director_encoded as f64);
        record.set("cast_encoded", derived.cast_encoded as f64);
        record.set("actor_track_record", derived.actor_track_record);
        record.set("director_track_record", derived.director_track_record);
        record.set("franchise_track_record", derived.franchise_track_record);
        record.set("genre_seasonal_score", derived.genre_seasonal_score);

        if !self.month_encoder.contains(&query.month) {
            debug!("Month {} outside the fitted vocabulary", query.month);
        }
        record.extend(self.month_encoder.encode(&query.month));

        if !self.language_encoder.contains(&query.language) {
            debug!("Language '{}' outside the fitted vocabulary", query.language);
        }
        record.extend(self.language_encoder.encode(&query.language));

        for genre in &self.genres {
            let hit = if query.genres.contains(genre) { 1.0 } else { 0.0 };
            record.set(format!("genre_{}", genre), hit);
        }

        record
    }

    /// Normalize, derive and assemble in one step
    pub fn compute_features(&self, query: &MovieQuery) -> FeatureRecord {
        let normalized = self.normalize(query);
        let derived = self.derive(&normalized);
        debug!(?derived, "Derived features for '{}'", normalized.title);
        self.assemble(&normalized, &derived)
    }

    /// Compute features for many queries in parallel, preserving order
    pub fn compute_batch(&self, queries: &[MovieQuery]) -> Vec<FeatureRecord> {
        queries
            .par_iter()
            .map(|query| self.compute_features(query))
            .collect()
    }
}
