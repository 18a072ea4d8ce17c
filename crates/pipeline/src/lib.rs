//! Feature engineering for movie score prediction.
//!
//! This crate provides:
//! - Categorical normalization of request fields
//! - Label and one-hot encoders rebuilt from the fitted vocabularies
//! - Historical track records (actor, director, franchise) and seasonal
//!   genre scores, precomputed once from the historical dataset
//! - FeatureEngineer, which assembles the named feature record
//!
//! ## Architecture
//! A query flows through three stages:
//! 1. `normalize` title-cases names and resolves the month
//! 2. `derive` encodes director/cast and looks up track records, falling
//!    back to dataset means where there is no history
//! 3. `assemble` lays out scalars, one-hot columns and genre indicators
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FeatureEngineer, MovieQuery};
//!
//! let engineer = FeatureEngineer::new(&dataset, &encoders);
//! let record = engineer.compute_features(&MovieQuery {
//!     director: "greta gerwig".to_string(),
//!     release_month: "July".to_string(),
//!     ..Default::default()
//! });
//! assert_eq!(record.get("release_month"), Some(7.0));
//! ```

pub mod encoding;
pub mod features;
pub mod franchise;
pub mod normalize;
pub mod track_record;

// Re-export main types
pub use encoding::{LabelEncoder, OneHotEncoder};
pub use features::{
    DEFAULT_LANGUAGE, DerivedFeatures, FeatureEngineer, FeatureRecord, MovieQuery, NormalizedQuery,
};
pub use franchise::{FRANCHISE_KEYWORDS, detect_franchise};
pub use normalize::{MONTH_NAMES, month_from_name, title_case};
pub use track_record::{DECAY, HistoricalStats, weighted_average};
