//! `rowfuse-merge` — Multi-source CSV merge engine.
//!
//! Pure engine crate: receives raw CSV texts plus a merge config, returns
//! merged records and derived metadata. No CLI or IO dependencies.

pub mod aggregate;
pub mod compose;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod record;
pub mod tokenize;

pub use config::MergeConfig;
pub use engine::run;
pub use error::MergeError;
pub use model::{Dataset, MergeInput, MergeResult, Record, SourceText};
