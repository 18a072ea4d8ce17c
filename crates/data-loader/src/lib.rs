//! # Data Loader Crate
//!
//! Loads the two static inputs the predictor reads at startup: the
//! historical movie table and the encoder bundle fitted at training time.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (HistoricalMovie, HistoricalDataset)
//! - **parser**: Parse the pandas-written CSV into Rust structs
//! - **index**: Load the dataset and compute column-level statistics
//! - **encoders**: The fitted label/one-hot vocabularies
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{EncoderBundle, HistoricalDataset};
//! use std::path::Path;
//!
//! let dataset = HistoricalDataset::load_from_file(Path::new("artifacts/movies_encoded_for_ml.csv"))?;
//! let encoders = EncoderBundle::load_from_file(Path::new("artifacts/encoders.json"))?;
//!
//! println!("{} rows, latest year {:?}", dataset.len(), dataset.max_release_year());
//! ```

// Public modules
pub mod encoders;
pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use encoders::EncoderBundle;
pub use error::{DataLoadError, Result};
pub use index::column_mean;
pub use types::{
    // Type aliases
    Month,
    Year,
    // Core types
    ColumnPresence,
    HistoricalDataset,
    HistoricalMovie,
    TrackRecordMeans,
};
