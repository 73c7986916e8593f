//! Persona derivation for multi-round deliberation datasets.
//!
//! Loads per-round vote and free-text tables, turns every participant into a
//! six-dimensional behavioral feature vector, clusters the standardized
//! vectors with seeded k-means (k chosen by silhouette score), and profiles
//! each cluster as a named persona. The result is exported as the JSON
//! document the personas front-end serves.

pub mod error;
pub mod exporter;
pub mod features;
pub mod kmeans;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod scaling;
pub mod selector;
pub mod sentiment;

pub use error::{AnalysisError, ExportError, FeatureError, LoadError};
pub use exporter::{read_document, to_json, write_result, ExportSummary, PersonaDocument};
pub use features::engineer_features;
pub use loader::{load_round, load_rounds, RoundDataset};
pub use pipeline::{analyze_rounds, run_analysis, AnalysisRun, PipelineOptions};
pub use profiler::{build_profiles, describe, ARCHETYPE_NAMES};
pub use selector::{select_k, silhouette_score, ClusteringOptions, Selection};
pub use sentiment::polarity;
