//! Loading the historical dataset and computing its column-level facts.
//!
//! Per-entity aggregates (actor, director, franchise, seasonal) live in the
//! pipeline crate; this module only knows about whole-column statistics.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{info, warn};

impl HistoricalDataset {
    /// Load the historical table from a CSV file
    ///
    /// Steps:
    /// 1. Parse every row
    /// 2. Record which optional columns were present
    /// 3. Validate the result
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading historical dataset from {:?}", path);

        let (movies, columns) = parser::parse_history(path)?;
        let dataset = Self::from_movies(movies, columns);
        dataset.validate()?;

        let scored = dataset.movies.iter().filter(|m| m.score.is_some()).count();
        info!(
            "Loaded {} historical movies ({} with a score)",
            dataset.len(),
            scored
        );
        if !columns.release_year {
            warn!("No release_year column; track records decay from the current year");
        }
        if !columns.seasonal {
            warn!("No genres_list/release_month columns; seasonal genre scores disabled");
        }

        Ok(dataset)
    }

    /// Latest release year in the table.
    ///
    /// `None` when the column is absent or has no values.
    pub fn max_release_year(&self) -> Option<Year> {
        if !self.columns.release_year {
            return None;
        }
        self.movies.iter().filter_map(|m| m.release_year).max()
    }

    /// Means of the precomputed track-record columns, skipping missing cells
    pub fn track_record_means(&self) -> TrackRecordMeans {
        TrackRecordMeans {
            actor: column_mean(self.movies.iter().map(|m| m.actor_track_record)),
            director: column_mean(self.movies.iter().map(|m| m.director_track_record)),
            franchise: column_mean(self.movies.iter().map(|m| m.franchise_track_record)),
            genre_seasonal: column_mean(self.movies.iter().map(|m| m.genre_seasonal_score)),
        }
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - The table is not empty
    /// - Release months fall within 1..=12
    /// - Release years are not negative
    pub fn validate(&self) -> Result<()> {
        if self.movies.is_empty() {
            return Err(DataLoadError::ValidationError(
                "historical dataset has no rows".to_string(),
            ));
        }
        for movie in &self.movies {
            if let Some(month) = movie.release_month {
                if !(1..=12).contains(&month) {
                    return Err(DataLoadError::InvalidValue {
                        field: "release_month".to_string(),
                        value: month.to_string(),
                    });
                }
            }
            if let Some(year) = movie.release_year {
                if year < 0 {
                    return Err(DataLoadError::InvalidValue {
                        field: "release_year".to_string(),
                        value: year.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Arithmetic mean of the present values; NaN when there are none
pub fn column_mean(values: impl Iterator<Item = Option<f64>>) -> f64 {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
