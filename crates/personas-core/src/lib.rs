//! Shared vocabulary for the deliberation personas pipeline.
//!
//! Raw per-round records, the derived per-participant feature vector, the
//! persona profile types that make up the exported artifact, and the
//! application config.

pub mod app_config;
pub mod config;
pub mod personas;
pub mod records;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, parse_rounds};
pub use personas::{
    AnalysisResult, Characteristics, FeatureGlossary, ParticipantFeatures, PersonaProfile,
    FEATURE_NAMES,
};
pub use records::{AggregateRecord, RosterRecord, TextRecord, Vote, VoteRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
