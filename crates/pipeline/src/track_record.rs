//! Historical aggregates behind the track-record features.
//!
//! Everything here is computed once from the historical dataset and then
//! only read. Lookups return `None` when the key has no historical rows;
//! the caller decides on the fallback. A key whose rows carry no usable
//! score maps to NaN, which the model's imputer fills.

use chrono::Datelike;
use data_loader::{HistoricalDataset, Month, TrackRecordMeans, Year};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Per-year decay applied to older scores
pub const DECAY: f64 = 0.9;

/// A historical score together with its release year (0 = unknown)
pub type ScoredYear = (f64, Year);

/// Year-decayed weighted average of `(score, year)` pairs.
///
/// Each pair weighs `DECAY^(current_year - year)`. Pairs with year 0 or a
/// non-finite score are skipped. Returns `None` when nothing contributes.
pub fn weighted_average(scores_years: &[ScoredYear], current_year: Year) -> Option<f64> {
    let (weighted_sum, total_weight) = scores_years
        .iter()
        .filter(|(score, year)| *year != 0 && score.is_finite())
        .fold((0.0, 0.0), |(sum, total), &(score, year)| {
            let weight = DECAY.powi(current_year - year);
            (sum + score * weight, total + weight)
        });

    if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}

/// Precomputed historical statistics.
#[derive(Debug, Clone)]
pub struct HistoricalStats {
    current_year: Year,
    /// All scored appearances of each actor
    actor_history: HashMap<String, Vec<ScoredYear>>,
    director_records: HashMap<String, f64>,
    franchise_means: HashMap<String, f64>,
    /// genre -> release month -> mean score
    seasonal: HashMap<String, BTreeMap<Month, f64>>,
    fallback: TrackRecordMeans,
}

impl HistoricalStats {
    /// Compute every aggregate, anchoring decay at the dataset's latest year
    pub fn compute(dataset: &HistoricalDataset, genres: &[String]) -> Self {
        let current_year = dataset
            .max_release_year()
            .unwrap_or_else(|| chrono::Utc::now().year());
        Self::compute_with_year(dataset, genres, current_year)
    }

    /// Compute every aggregate with an explicit decay anchor
    pub fn compute_with_year(
        dataset: &HistoricalDataset,
        genres: &[String],
        current_year: Year,
    ) -> Self {
        let stats = Self {
            current_year,
            actor_history: collect_actor_history(dataset),
            director_records: compute_director_records(dataset, current_year),
            franchise_means: compute_franchise_means(dataset),
            seasonal: if dataset.columns().seasonal {
                compute_seasonal_scores(dataset, genres)
            } else {
                HashMap::new()
            },
            fallback: dataset.track_record_means(),
        };

        debug!(
            "Historical stats: {} actors, {} directors, {} franchises, {} seasonal genres (anchor year {})",
            stats.actor_history.len(),
            stats.director_records.len(),
            stats.franchise_means.len(),
            stats.seasonal.len(),
            current_year
        );
        stats
    }

    pub fn current_year(&self) -> Year {
        self.current_year
    }

    /// Dataset means used when a lookup has no history
    pub fn fallback(&self) -> &TrackRecordMeans {
        &self.fallback
    }

    /// Weighted average over every historical appearance of the given actors.
    ///
    /// NaN when appearances exist but none has a known year.
    pub fn actor_track_record(&self, actors: &[String]) -> Option<f64> {
        let scores_years: Vec<ScoredYear> = actors
            .iter()
            .filter_map(|actor| self.actor_history.get(actor))
            .flatten()
            .copied()
            .collect();
        if scores_years.is_empty() {
            return None;
        }
        Some(weighted_average(&scores_years, self.current_year).unwrap_or(f64::NAN))
    }

    pub fn director_track_record(&self, director: &str) -> Option<f64> {
        self.director_records.get(director).copied()
    }

    pub fn franchise_track_record(&self, franchise: Option<&str>) -> Option<f64> {
        franchise.and_then(|f| self.franchise_means.get(f).copied())
    }

    /// Mean of the (genre, month) averages that exist for these genres
    pub fn genre_seasonal_score(&self, genres: &[String], month: Month) -> Option<f64> {
        let scores: Vec<f64> = genres
            .iter()
            .filter_map(|genre| self.seasonal.get(genre))
            .filter_map(|by_month| by_month.get(&month).copied())
            .collect();
        mean(&scores)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Every scored row, credited to each of its cast members
fn collect_actor_history(dataset: &HistoricalDataset) -> HashMap<String, Vec<ScoredYear>> {
    let mut history: HashMap<String, Vec<ScoredYear>> = HashMap::new();
    for movie in dataset.movies() {
        let Some(score) = movie.score else { continue };
        let year = movie.release_year.unwrap_or(0);
        for actor in &movie.cast {
            history
                .entry(actor.clone())
                .or_insert_with(Vec::new)
                .push((score, year));
        }
    }
    history
}

/// Weighted average per director, NaN for directors with no usable rows
fn compute_director_records(
    dataset: &HistoricalDataset,
    current_year: Year,
) -> HashMap<String, f64> {
    let mut by_director: HashMap<&str, Vec<ScoredYear>> = HashMap::new();
    for movie in dataset.movies() {
        if let Some(director) = movie.director.as_deref() {
            by_director
                .entry(director)
                .or_insert_with(Vec::new)
                .push((
                    movie.score.unwrap_or(f64::NAN),
                    movie.release_year.unwrap_or(0),
                ));
        }
    }

    by_director
        .par_iter()
        .map(|(&director, scores_years)| {
            let record = weighted_average(scores_years, current_year).unwrap_or(f64::NAN);
            (director.to_string(), record)
        })
        .collect()
}

/// Plain mean score per franchise, NaN when none of its rows is scored
fn compute_franchise_means(dataset: &HistoricalDataset) -> HashMap<String, f64> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for movie in dataset.movies() {
        let Some(franchise) = movie.franchise.as_deref() else { continue };
        let entry = sums.entry(franchise).or_insert((0.0, 0));
        if let Some(score) = movie.score {
            entry.0 += score;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(franchise, (sum, count))| {
            let mean = if count > 0 { sum / count as f64 } else { f64::NAN };
            (franchise.to_string(), mean)
        })
        .collect()
}

/// Mean score per (genre, release month) over rows flagged with the genre
fn compute_seasonal_scores(
    dataset: &HistoricalDataset,
    genres: &[String],
) -> HashMap<String, BTreeMap<Month, f64>> {
    genres
        .par_iter()
        .filter_map(|genre| {
            let mut sums: BTreeMap<Month, (f64, usize)> = BTreeMap::new();
            for movie in dataset.movies().iter().filter(|m| m.has_genre(genre)) {
                if let (Some(month), Some(score)) = (movie.release_month, movie.score) {
                    let entry = sums.entry(month).or_insert((0.0, 0));
                    entry.0 += score;
                    entry.1 += 1;
                }
            }
            if sums.is_empty() {
                return None;
            }
            let by_month = sums
                .into_iter()
                .map(|(month, (sum, count))| (month, sum / count as f64))
                .collect();
            Some((genre.clone(), by_month))
        })
        .collect()
}
