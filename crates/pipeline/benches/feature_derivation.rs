//! Benchmarks for feature derivation
//!
//! Run with: cargo bench --package pipeline
//!
//! Builds a synthetic history table, then measures precomputing the
//! aggregates and assembling features for single and batched queries.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use data_loader::{ColumnPresence, EncoderBundle, HistoricalDataset, HistoricalMovie};
use pipeline::{FeatureEngineer, HistoricalStats, MONTH_NAMES, MovieQuery};

const GENRES: [&str; 6] = ["Action", "Comedy", "Drama", "Horror", "Romance", "Thriller"];

fn synthetic_dataset(rows: usize) -> HistoricalDataset {
    let movies = (0..rows)
        .map(|i| HistoricalMovie {
            score: Some(40.0 + (i % 60) as f64),
            release_year: Some(1980 + (i % 45) as i32),
            release_month: Some((i % 12) as u32 + 1),
            cast: (0..3).map(|k| format!("Actor {}", (i * 3 + k) % 2000)).collect(),
            director: Some(format!("Director {}", i % 500)),
            franchise: (i % 20 == 0).then(|| "Batman".to_string()),
            genres: GENRES
                .iter()
                .enumerate()
                .filter(|(g, _)| (i + g) % 3 == 0)
                .map(|(_, name)| name.to_string())
                .collect(),
            actor_track_record: Some(65.0),
            director_track_record: Some(66.0),
            franchise_track_record: Some(60.0),
            genre_seasonal_score: Some(62.0),
        })
        .collect();
    HistoricalDataset::from_movies(movies, ColumnPresence::default())
}

fn encoders() -> EncoderBundle {
    EncoderBundle {
        director_classes: (0..500).map(|i| format!("Director {}", i)).collect(),
        cast_classes: (0..2000).map(|i| format!("Actor {}", i)).collect(),
        month_categories: (1..=12).collect(),
        language_categories: vec!["english".to_string(), "french".to_string()],
        genres: GENRES.iter().map(|g| g.to_string()).collect(),
    }
}

fn queries(count: usize) -> Vec<MovieQuery> {
    (0..count)
        .map(|i| MovieQuery {
            director: format!("director {}", i % 600),
            actors: vec![format!("actor {}", i % 2100), format!("actor {}", i + 7)],
            genres: vec![GENRES[i % GENRES.len()].to_lowercase()],
            release_month: MONTH_NAMES[i % 12].to_string(),
            title: if i % 5 == 0 { "Batman Forever".to_string() } else { format!("Movie {}", i) },
            ..Default::default()
        })
        .collect()
}

fn bench_compute_stats(c: &mut Criterion) {
    let dataset = synthetic_dataset(10_000);
    let encoders = encoders();

    c.bench_function("historical_stats_compute", |b| {
        b.iter(|| {
            let stats = HistoricalStats::compute(black_box(&dataset), &encoders.genres);
            black_box(stats)
        })
    });
}

fn bench_single_query(c: &mut Criterion) {
    let engineer = FeatureEngineer::new(&synthetic_dataset(10_000), &encoders());
    let query = queries(1).remove(0);

    c.bench_function("compute_features_single", |b| {
        b.iter(|| black_box(engineer.compute_features(black_box(&query))))
    });
}

fn bench_batch(c: &mut Criterion) {
    let engineer = FeatureEngineer::new(&synthetic_dataset(10_000), &encoders());

    c.bench_function("compute_features_batch_1000", |b| {
        b.iter_batched(
            || queries(1000),
            |batch| black_box(engineer.compute_batch(&batch)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_compute_stats, bench_single_query, bench_batch);
criterion_main!(benches);
