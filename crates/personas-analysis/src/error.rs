use std::path::PathBuf;

use thiserror::Error;

/// Failure reading one of a round's datasets. The pipeline logs these and
/// skips the round.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {context}: {source}")]
    Csv {
        context: String,
        #[source]
        source: csv::Error,
    },

    #[error("{context} has no {column:?} column")]
    MissingColumn {
        context: String,
        column: &'static str,
    },
}

/// Failure deriving one participant's features. The participant is logged
/// and left out of the feature set.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("participant id is empty")]
    EmptyParticipantId,

    #[error("feature {feature} for participant {participant} is not finite: {value}")]
    InvalidValue {
        participant: String,
        feature: &'static str,
        value: f64,
    },
}

/// Failure writing the exported artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("persona {persona} has non-finite {field}: {value}")]
    NonFiniteValue {
        persona: usize,
        field: &'static str,
        value: f64,
    },

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a persona document: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("insufficient data: {participants} participant(s), need at least {min_clusters}")]
    InsufficientData {
        participants: usize,
        min_clusters: usize,
    },

    #[error("{labels} cluster label(s) for {participants} participant(s)")]
    LabelMismatch { participants: usize, labels: usize },

    #[error(transparent)]
    Export(#[from] ExportError),
}
