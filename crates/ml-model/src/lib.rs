//! Model bundle for score prediction.
//!
//! This crate owns everything between the named feature record and the
//! raw model output:
//! - The ordered feature list the model was trained on
//! - The fitted missing-value imputer
//! - The `Regressor` trait and its `gbdt`-backed implementation
//!
//! The output of [`ModelBundle::predict_log`] is on the model's training
//! scale (log1p of the score); inverting it is the caller's job.

pub mod bundle;
pub mod error;
pub mod imputer;
pub mod regressor;
pub mod schema;

pub use bundle::{ModelBundle, ModelFormat, ModelManifest};
pub use error::{ModelError, Result};
pub use imputer::{ImputeStrategy, Imputer};
pub use regressor::{GbdtRegressor, Regressor};
pub use schema::FeatureSchema;
