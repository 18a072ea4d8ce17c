//! Core domain types for the historical movie table.
//!
//! The table is the one produced by the training notebook
//! (`movies_encoded_for_ml.csv`): one row per past release with its score,
//! credits, genre flags and the precomputed track-record columns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// Type Aliases
// =============================================================================

/// Calendar year of a release (e.g. 2019)
pub type Year = i32;

/// Calendar month of a release, 1 = January
pub type Month = u32;

// =============================================================================
// Movie Rows
// =============================================================================

/// One row of the historical dataset.
///
/// Every column that pandas could have read as NaN is an `Option` here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMovie {
    pub score: Option<f64>,
    pub release_year: Option<Year>,
    pub release_month: Option<Month>,
    /// Up to three credited actors, trimmed, empty cells skipped
    pub cast: Vec<String>,
    pub director: Option<String>,
    pub franchise: Option<String>,
    /// Genre names whose `genre_<Name>` flag is set
    pub genres: BTreeSet<String>,

    // Precomputed at training time, only used for their column means
    pub actor_track_record: Option<f64>,
    pub director_track_record: Option<f64>,
    pub franchise_track_record: Option<f64>,
    pub genre_seasonal_score: Option<f64>,
}

impl HistoricalMovie {
    /// True when this row carries the given genre flag
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.contains(genre)
    }
}

/// Which optional columns were present in the source table.
///
/// Seasonal statistics are only derived when the table carries both
/// `genres_list` and `release_month`; without `release_year` the decay
/// anchor falls back to the wall-clock year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPresence {
    pub release_year: bool,
    pub seasonal: bool,
}

impl Default for ColumnPresence {
    fn default() -> Self {
        Self {
            release_year: true,
            seasonal: true,
        }
    }
}

/// Dataset-wide means of the precomputed track-record columns.
///
/// A column with no values has a NaN mean; the imputer fills it later.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackRecordMeans {
    pub actor: f64,
    pub director: f64,
    pub franchise: f64,
    pub genre_seasonal: f64,
}

// =============================================================================
// HistoricalDataset - read-only table loaded once at startup
// =============================================================================

/// The historical table plus the facts about its shape that feature
/// derivation needs.
#[derive(Debug, Clone)]
pub struct HistoricalDataset {
    pub(crate) movies: Vec<HistoricalMovie>,
    pub(crate) columns: ColumnPresence,
}

impl HistoricalDataset {
    /// Creates a new, empty dataset with every optional column present
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            columns: ColumnPresence::default(),
        }
    }

    /// Creates a dataset from rows already in memory
    pub fn from_movies(movies: Vec<HistoricalMovie>, columns: ColumnPresence) -> Self {
        Self { movies, columns }
    }

    /// All rows, in file order
    pub fn movies(&self) -> &[HistoricalMovie] {
        &self.movies
    }

    pub fn columns(&self) -> ColumnPresence {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Insert a row (used while building test fixtures)
    pub fn insert_movie(&mut self, movie: HistoricalMovie) {
        self.movies.push(movie);
    }

    /// Override the column presence flags
    pub fn set_columns(&mut self, columns: ColumnPresence) {
        self.columns = columns;
    }
}

impl Default for HistoricalDataset {
    fn default() -> Self {
        Self::new()
    }
}
