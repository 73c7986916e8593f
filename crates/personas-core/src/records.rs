//! Raw per-round records, one type per dataset kind.
//!
//! Every record carries the round it was loaded from. Round identity is kept
//! for traceability only; feature engineering merges rounds per participant.

/// A binary vote value as recorded in the `Vote` column.
///
/// Only the exact value `Agree` counts as agreement; anything that is not
/// `Agree` or `Disagree` is preserved verbatim in [`Vote::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vote {
    Agree,
    Disagree,
    Other(String),
}

impl Vote {
    #[must_use]
    pub fn is_agree(&self) -> bool {
        matches!(self, Vote::Agree)
    }
}

impl From<&str> for Vote {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "Agree" => Vote::Agree,
            "Disagree" => Vote::Disagree,
            other => Vote::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub participant_id: String,
    pub vote: Vote,
    pub round_id: u32,
}

/// A free-text contribution. `text` is `None` when the cell was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub participant_id: String,
    pub text: Option<String>,
    pub round_id: u32,
}

impl TextRecord {
    /// The contribution text if it contains anything besides whitespace.
    #[must_use]
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRecord {
    pub participant_id: String,
    pub round_id: u32,
}

/// One row of a round's standardized aggregate table.
///
/// Loaded for completeness of the round bundle; clustering does not use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRecord {
    pub question_id: Option<String>,
    pub question_type: Option<String>,
    pub question: Option<String>,
    pub responses: Option<String>,
    pub round_id: u32,
}
