//! Per-round dataset loading.
//!
//! Round `n` lives in `{data_dir}/GD{n}/` as four CSV files. A round is only
//! usable when all four read cleanly; [`load_rounds`] logs and skips rounds
//! that fail so one bad round never aborts the run.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use personas_core::{AggregateRecord, RosterRecord, TextRecord, Vote, VoteRecord};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::LoadError;

const PARTICIPANT_COLUMN: &str = "Participant ID";

/// Columns the aggregate table is expected to carry. Missing ones are logged,
/// not fatal.
const AGGREGATE_COLUMNS: [&str; 4] = ["Question ID", "Question Type", "Question", "Responses"];

/// All datasets of one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundDataset {
    pub round_id: u32,
    pub aggregate: Vec<AggregateRecord>,
    pub votes: Vec<VoteRecord>,
    pub texts: Vec<TextRecord>,
    pub roster: Vec<RosterRecord>,
}

/// File locations of one round's datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPaths {
    pub aggregate: PathBuf,
    pub votes: PathBuf,
    pub texts: PathBuf,
    pub roster: PathBuf,
}

impl RoundPaths {
    #[must_use]
    pub fn for_round(data_dir: &Path, round_id: u32) -> Self {
        let dir = data_dir.join(format!("GD{round_id}"));
        let file = |suffix: &str| dir.join(format!("GD{round_id}_{suffix}.csv"));
        Self {
            aggregate: file("aggregate_standardized"),
            votes: file("binary"),
            texts: file("verbatim_map"),
            roster: file("participants"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VoteRow {
    #[serde(rename = "Participant ID")]
    participant_id: String,
    #[serde(rename = "Vote")]
    vote: String,
}

#[derive(Debug, Deserialize)]
struct TextRow {
    #[serde(rename = "Participant ID")]
    participant_id: String,
    #[serde(rename = "Thought Text", default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Participant ID")]
    participant_id: String,
}

#[derive(Debug, Deserialize)]
struct AggregateRow {
    #[serde(rename = "Question ID", default)]
    question_id: Option<String>,
    #[serde(rename = "Question Type", default)]
    question_type: Option<String>,
    #[serde(rename = "Question", default)]
    question: Option<String>,
    #[serde(rename = "Responses", default)]
    responses: Option<String>,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

/// Read every row after checking that the header names each of `required`.
fn read_rows<T, R>(
    reader: R,
    context: &str,
    required: &[&'static str],
) -> Result<Vec<T>, LoadError>
where
    T: DeserializeOwned,
    R: Read,
{
    let csv_err = |source| LoadError::Csv {
        context: context.to_string(),
        source,
    };

    let mut rdr = csv_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?;
    if let Some(&column) = required
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(LoadError::MissingColumn {
            context: context.to_string(),
            column,
        });
    }

    rdr.deserialize::<T>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)
}

/// Parse a binary vote table (`Participant ID`, `Vote`).
///
/// # Errors
///
/// Returns [`LoadError::MissingColumn`] if either column is absent and
/// [`LoadError::Csv`] if a row cannot be read.
pub fn parse_votes<R: Read>(reader: R, round_id: u32) -> Result<Vec<VoteRecord>, LoadError> {
    let rows: Vec<VoteRow> = read_rows(
        reader,
        &format!("votes of round {round_id}"),
        &[PARTICIPANT_COLUMN, "Vote"],
    )?;
    Ok(rows
        .into_iter()
        .map(|row| VoteRecord {
            participant_id: row.participant_id.trim().to_string(),
            vote: Vote::from(row.vote.as_str()),
            round_id,
        })
        .collect())
}

/// Parse a free-text table (`Participant ID`, `Thought Text`). Empty cells
/// become `None`.
///
/// # Errors
///
/// Returns [`LoadError::MissingColumn`] if either column is absent and
/// [`LoadError::Csv`] if a row cannot be read.
pub fn parse_texts<R: Read>(reader: R, round_id: u32) -> Result<Vec<TextRecord>, LoadError> {
    let rows: Vec<TextRow> = read_rows(
        reader,
        &format!("texts of round {round_id}"),
        &[PARTICIPANT_COLUMN, "Thought Text"],
    )?;
    Ok(rows
        .into_iter()
        .map(|row| TextRecord {
            participant_id: row.participant_id.trim().to_string(),
            text: row.text.filter(|t| !t.is_empty()),
            round_id,
        })
        .collect())
}

/// Parse a participant roster (`Participant ID`).
///
/// # Errors
///
/// Returns [`LoadError::MissingColumn`] without a `Participant ID` column and
/// [`LoadError::Csv`] if a row cannot be read.
pub fn parse_roster<R: Read>(reader: R, round_id: u32) -> Result<Vec<RosterRecord>, LoadError> {
    let rows: Vec<RosterRow> = read_rows(
        reader,
        &format!("roster of round {round_id}"),
        &[PARTICIPANT_COLUMN],
    )?;
    Ok(rows
        .into_iter()
        .map(|row| RosterRecord {
            participant_id: row.participant_id.trim().to_string(),
            round_id,
        })
        .collect())
}

/// Parse a standardized aggregate table. Every column is optional; missing
/// expected columns are logged.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] if the header or a row cannot be read.
pub fn parse_aggregate<R: Read>(
    reader: R,
    round_id: u32,
) -> Result<Vec<AggregateRecord>, LoadError> {
    let context = format!("aggregate of round {round_id}");
    let csv_err = |source| LoadError::Csv {
        context: context.clone(),
        source,
    };

    let mut rdr = csv_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let missing: Vec<&str> = AGGREGATE_COLUMNS
        .into_iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(
            round = round_id,
            missing = ?missing,
            "aggregate table is missing expected columns"
        );
    }

    rdr.deserialize::<AggregateRow>()
        .map(|row| {
            row.map(|row| AggregateRecord {
                question_id: row.question_id,
                question_type: row.question_type,
                question: row.question,
                responses: row.responses,
                round_id,
            })
            .map_err(csv_err)
        })
        .collect()
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Load all four datasets of one round.
///
/// # Errors
///
/// Returns [`LoadError`] if any of the four files is missing or malformed.
pub fn load_round(data_dir: &Path, round_id: u32) -> Result<RoundDataset, LoadError> {
    let paths = RoundPaths::for_round(data_dir, round_id);

    let aggregate = parse_aggregate(open(&paths.aggregate)?, round_id)?;
    let votes = parse_votes(open(&paths.votes)?, round_id)?;
    let texts = parse_texts(open(&paths.texts)?, round_id)?;
    let roster = parse_roster(open(&paths.roster)?, round_id)?;

    Ok(RoundDataset {
        round_id,
        aggregate,
        votes,
        texts,
        roster,
    })
}

/// Load every requested round, skipping (and logging) rounds that fail.
///
/// The returned bundles keep the order of `round_ids`. An empty result is
/// valid; downstream stages turn it into an empty analysis.
#[must_use]
pub fn load_rounds(data_dir: &Path, round_ids: &[u32]) -> Vec<RoundDataset> {
    let mut rounds = Vec::with_capacity(round_ids.len());
    for &round_id in round_ids {
        match load_round(data_dir, round_id) {
            Ok(round) => {
                tracing::info!(
                    round = round_id,
                    votes = round.votes.len(),
                    texts = round.texts.len(),
                    roster = round.roster.len(),
                    "loaded round"
                );
                rounds.push(round);
            }
            Err(e) => {
                tracing::warn!(round = round_id, error = %e, "failed to load round, skipping");
            }
        }
    }
    rounds
}
