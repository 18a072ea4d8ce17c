use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::EncoderBundle;
use pipeline::{MONTH_NAMES, MovieQuery};
use rand::Rng;
use rand::seq::IndexedRandom;
use server::{ArtifactPaths, PredictRequest, Predictor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// ReelScore - Movie Score Prediction
#[derive(Parser)]
#[command(name = "reel-score")]
#[command(about = "Predict a movie's critic score from its cast, crew and release", long_about = None)]
struct Cli {
    /// Directory holding the history table, encoders and model manifest
    #[arg(short, long, env = "REEL_SCORE_ARTIFACTS", default_value = "artifacts")]
    artifacts_dir: PathBuf,

    /// Override the historical movie table
    #[arg(long)]
    history: Option<PathBuf>,

    /// Override the encoder bundle
    #[arg(long)]
    encoders: Option<PathBuf>,

    /// Override the model manifest
    #[arg(long)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP prediction endpoint
    Serve {
        /// Address to listen on
        #[arg(long, env = "REEL_SCORE_BIND", default_value = "127.0.0.1:5000")]
        bind: String,
    },

    /// Predict a single movie from the command line
    Predict {
        #[arg(long)]
        director: Option<String>,

        /// Billed actor, up to three in billing order
        #[arg(long = "actor")]
        actors: Vec<String>,

        /// Genre, repeatable
        #[arg(long = "genre")]
        genres: Vec<String>,

        #[arg(long)]
        language: Option<String>,

        /// Full English month name, e.g. "March"
        #[arg(long)]
        month: Option<String>,

        #[arg(long)]
        title: Option<String>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let paths = ArtifactPaths::from_dir(&cli.artifacts_dir).with_overrides(
        cli.history,
        cli.encoders,
        cli.model,
    );

    println!("Loading artifacts from {}...", cli.artifacts_dir.display());
    let start = Instant::now();
    let predictor = Arc::new(Predictor::load(&paths).context("Failed to load artifacts")?);
    println!("{} Loaded artifacts in {:?}", "✓".green(), start.elapsed());

    match cli.command {
        Commands::Serve { bind } => {
            info!("Starting prediction server on {}", bind);
            server::serve(&bind, predictor).await?
        }
        Commands::Predict {
            director,
            actors,
            genres,
            language,
            month,
            title,
            json,
        } => {
            let request = build_request(director, actors, genres, language, month, title)?;
            handle_predict(&predictor, request, json)?
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(predictor, &paths, requests, concurrent).await?,
    }

    Ok(())
}

fn build_request(
    director: Option<String>,
    actors: Vec<String>,
    genres: Vec<String>,
    language: Option<String>,
    month: Option<String>,
    title: Option<String>,
) -> Result<PredictRequest> {
    if actors.len() > 3 {
        bail!("At most three actors are used, got {}", actors.len());
    }
    let mut actors = actors.into_iter();
    Ok(PredictRequest {
        director,
        actor1: actors.next(),
        actor2: actors.next(),
        actor3: actors.next(),
        genres: (!genres.is_empty()).then_some(genres),
        language,
        release_month: month,
        title,
    })
}

/// Handle the 'predict' command
fn handle_predict(predictor: &Predictor, request: PredictRequest, json: bool) -> Result<()> {
    let title = request.title.clone().unwrap_or_default();
    let response = predictor.predict(&request.into())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", "Prediction:".bold().blue());
    if !title.is_empty() {
        println!("{}Title: {}", "• ".green(), title);
    }
    println!("{}Score: {:.2}", "• ".green(), response.score);
    println!("{}Confidence: {:.2}", "• ".cyan(), response.confidence);
    Ok(())
}

/// Random queries drawn from the fitted vocabularies, with some misses
fn random_queries(encoders: &EncoderBundle, count: usize) -> Vec<MovieQuery> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let director = match encoders.director_classes.choose(&mut rng) {
                Some(name) if !rng.random_bool(0.1) => name.clone(),
                _ => "Unknown Director".to_string(),
            };
            let actors = encoders
                .cast_classes
                .choose(&mut rng)
                .map(|cast| cast.split(',').map(str::to_string).collect())
                .unwrap_or_default();
            let genres = encoders
                .genres
                .choose_multiple(&mut rng, 2)
                .cloned()
                .collect();
            let language = encoders
                .language_categories
                .choose(&mut rng)
                .cloned()
                .unwrap_or_else(|| pipeline::DEFAULT_LANGUAGE.to_string());
            let release_month = MONTH_NAMES[rng.random_range(0..MONTH_NAMES.len())].to_string();

            MovieQuery {
                director,
                actors,
                genres,
                language,
                release_month,
                title: "Benchmark".to_string(),
            }
        })
        .collect()
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    predictor: Arc<Predictor>,
    paths: &ArtifactPaths,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("requests and concurrent must both be positive");
    }
    let encoders =
        EncoderBundle::load_from_file(&paths.encoders).context("Failed to load encoders")?;
    let queries = random_queries(&encoders, requests);
    info!(
        "Benchmarking {} predictions with {} concurrent",
        requests, concurrent
    );

    // Use tokio::spawn to make concurrent requests
    let permits = Arc::new(Semaphore::new(concurrent));
    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for query in queries {
        let predictor = Arc::clone(&predictor);
        let permits = Arc::clone(&permits);
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            predictor.predict_blocking(query).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / total_time.as_secs_f64();
    info!("Benchmark finished in {:?}", total_time);

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}
