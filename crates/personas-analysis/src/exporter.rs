//! JSON export of an [`AnalysisResult`].
//!
//! The document shape is what the web front-end reads:
//!
//! ```json
//! {
//!   "personas": { "0": { "id": 0, "name": "...", "size": 12, "percentage": 40.0,
//!                        "characteristics": { "consensus_alignment": 0.71, ... },
//!                        "description": "This persona ..." } },
//!   "feature_importance": { "consensus_alignment": "...", ... },
//!   "total_participants": 30
//! }
//! ```
//!
//! Persona keys are cluster labels as strings. Labels stay below 10, so key
//! order matches label order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use personas_core::{AnalysisResult, FeatureGlossary, PersonaProfile};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ExportError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaDocument {
    pub personas: BTreeMap<String, PersonaProfile>,
    pub feature_importance: FeatureGlossary,
    pub total_participants: usize,
}

/// Where and what was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub bytes: usize,
    /// Lowercase hex SHA-256 of the written bytes.
    pub sha256: String,
}

fn check_finite(persona: usize, field: &'static str, value: f64) -> Result<(), ExportError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ExportError::NonFiniteValue {
            persona,
            field,
            value,
        })
    }
}

/// Convert a result into its exported document.
///
/// # Errors
///
/// Returns [`ExportError::NonFiniteValue`] if any percentage or
/// characteristic is NaN or infinite. JSON has no representation for these
/// and `serde_json` would silently write `null`.
pub fn to_document(result: &AnalysisResult) -> Result<PersonaDocument, ExportError> {
    let mut personas = BTreeMap::new();
    for (&label, profile) in &result.personas {
        check_finite(label, "percentage", profile.percentage)?;
        for (field, value) in profile.characteristics.named() {
            check_finite(label, field, value)?;
        }
        personas.insert(label.to_string(), profile.clone());
    }

    Ok(PersonaDocument {
        personas,
        feature_importance: result.feature_importance.clone(),
        total_participants: result.total_participants,
    })
}

/// Render a result as pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`ExportError`] if validation or serialization fails.
pub fn to_json(result: &AnalysisResult) -> Result<String, ExportError> {
    let document = to_document(result)?;
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}

/// Write a result to `path`, replacing any previous file.
///
/// # Errors
///
/// Returns [`ExportError`] if validation, serialization, or the write fails.
pub fn write_result(result: &AnalysisResult, path: &Path) -> Result<ExportSummary, ExportError> {
    let json = to_json(result)?;
    std::fs::write(path, &json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let summary = ExportSummary {
        path: path.to_path_buf(),
        bytes: json.len(),
        sha256: format!("{:x}", Sha256::digest(json.as_bytes())),
    };
    tracing::info!(
        path = %summary.path.display(),
        bytes = summary.bytes,
        sha256 = %summary.sha256,
        "wrote persona results"
    );
    Ok(summary)
}

/// Read a previously exported document.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the file cannot be read and
/// [`ExportError::Parse`] if it is not a persona document.
pub fn read_document(path: &Path) -> Result<PersonaDocument, ExportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ExportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use personas_core::Characteristics;

    use super::*;

    fn sample_result() -> AnalysisResult {
        let characteristics = Characteristics::from_vector([0.8, 0.1, 0.3, 0.05, 0.9, 0.25]);
        let profile = PersonaProfile {
            id: 0,
            name: "The Optimistic Architect".to_string(),
            size: 3,
            percentage: 100.0,
            characteristics,
            description: "This persona tends to agree with majority opinions.".to_string(),
        };
        AnalysisResult {
            personas: BTreeMap::from([(0, profile)]),
            feature_importance: FeatureGlossary::default(),
            total_participants: 3,
        }
    }

    #[test]
    fn exported_shape_matches_front_end_contract() {
        let json = to_json(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_participants"], 3);
        let persona = &value["personas"]["0"];
        assert_eq!(persona["id"], 0);
        assert_eq!(persona["name"], "The Optimistic Architect");
        assert_eq!(persona["size"], 3);
        assert_eq!(persona["percentage"], 100.0);
        assert_eq!(persona["characteristics"]["consensus_alignment"], 0.8);
        assert_eq!(persona["characteristics"].as_object().unwrap().len(), 6);
        assert!(persona["description"].is_string());
        assert_eq!(value["feature_importance"].as_object().unwrap().len(), 6);
    }

    #[test]
    fn non_finite_values_fail_loudly() {
        let mut result = sample_result();
        result
            .personas
            .get_mut(&0)
            .unwrap()
            .characteristics
            .avg_sentiment = f64::NAN;
        let err = to_json(&result).unwrap_err();
        assert!(
            matches!(
                err,
                ExportError::NonFiniteValue {
                    persona: 0,
                    field: "avg_sentiment",
                    ..
                }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn empty_result_exports_empty_personas() {
        let json = to_json(&AnalysisResult::empty()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["personas"].as_object().unwrap().is_empty());
        assert_eq!(value["total_participants"], 0);
    }

    #[test]
    fn rendering_is_stable() {
        let a = to_json(&sample_result()).unwrap();
        let b = to_json(&sample_result()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn written_file_reads_back_with_digest() {
        let path = std::env::temp_dir().join(format!(
            "personas-export-{}.json",
            std::process::id()
        ));
        let summary = write_result(&sample_result(), &path).unwrap();
        assert_eq!(summary.sha256.len(), 64);

        let document = read_document(&path).unwrap();
        assert_eq!(document, to_document(&sample_result()).unwrap());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn reading_garbage_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "personas-export-garbage-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json").unwrap();
        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, ExportError::Parse { .. }), "got {err:?}");
        std::fs::remove_file(&path).ok();
    }
}
