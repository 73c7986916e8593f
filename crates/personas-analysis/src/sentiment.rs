//! Lexicon polarity scorer for deliberation contributions.

use std::sync::LazyLock;

use regex::Regex;

/// Word polarities.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("wonderful", 1.0),
    ("love", 0.5),
    ("like", 0.3),
    ("happy", 0.8),
    ("hope", 0.4),
    ("hopeful", 0.5),
    ("optimistic", 0.5),
    ("exciting", 0.6),
    ("promising", 0.5),
    ("beneficial", 0.6),
    ("helpful", 0.5),
    ("useful", 0.4),
    ("positive", 0.4),
    ("better", 0.5),
    ("best", 1.0),
    ("fair", 0.4),
    ("trust", 0.4),
    ("safe", 0.5),
    ("agree", 0.3),
    ("important", 0.4),
    ("valuable", 0.5),
    ("progress", 0.3),
    ("empower", 0.5),
    ("support", 0.3),
    // Negative
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("worst", -1.0),
    ("worse", -0.4),
    ("hate", -0.8),
    ("fear", -0.6),
    ("afraid", -0.6),
    ("scary", -0.5),
    ("worried", -0.5),
    ("worry", -0.4),
    ("concern", -0.3),
    ("concerned", -0.4),
    ("dangerous", -0.6),
    ("harmful", -0.6),
    ("risk", -0.3),
    ("risky", -0.5),
    ("threat", -0.6),
    ("unfair", -0.5),
    ("wrong", -0.5),
    ("problem", -0.3),
    ("fail", -0.5),
    ("failure", -0.5),
    ("lose", -0.4),
    ("loss", -0.4),
    ("misuse", -0.5),
    ("sad", -0.5),
    ("disagree", -0.3),
];

/// Words that flip and halve the polarity of the next lexicon word.
const NEGATORS: &[&str] = &["not", "no", "never", "nor", "cannot"];

/// Words that scale the polarity of the next lexicon word.
const INTENSIFIERS: &[&str] = &["very", "really", "extremely", "so", "highly", "truly"];

const NEGATION_FACTOR: f64 = -0.5;
const INTENSIFIER_FACTOR: f64 = 1.3;

/// Words with at most one inner apostrophe, straight or typographic.
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]+(?:['\x{2019}][A-Za-z]+)?").expect("valid word regex")
});

fn polarity_of(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|&&(lex_word, _)| lex_word == word)
        .map(|&(_, weight)| weight)
}

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}

/// Score the polarity of a text in `[-1.0, 1.0]`.
///
/// The score is the mean weight of the lexicon words found. A negator right
/// before a lexicon word (optionally with one intensifier in between) flips
/// and halves its weight; an intensifier scales it. Returns `0.0` for empty
/// text or text without lexicon words.
#[must_use]
pub fn polarity(text: &str) -> f64 {
    let words: Vec<String> = WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase().replace('\u{2019}', "'"))
        .collect();

    let mut total = 0.0_f64;
    let mut hits = 0_u32;
    for (idx, word) in words.iter().enumerate() {
        let Some(mut weight) = polarity_of(word) else {
            continue;
        };

        let prev = idx.checked_sub(1).map(|i| words[i].as_str());
        let intensified = prev.is_some_and(|p| INTENSIFIERS.contains(&p));
        if intensified {
            weight *= INTENSIFIER_FACTOR;
        }

        let negator_at = if intensified {
            idx.checked_sub(2)
        } else {
            idx.checked_sub(1)
        };
        if negator_at.is_some_and(|i| is_negator(&words[i])) {
            weight *= NEGATION_FACTOR;
        }

        total += weight.clamp(-1.0, 1.0);
        hits += 1;
    }

    if hits == 0 {
        return 0.0;
    }
    (total / f64::from(hits)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_returns_zero() {
        assert_eq!(polarity(""), 0.0);
    }

    #[test]
    fn unknown_text_returns_zero() {
        assert_eq!(polarity("no comment"), 0.0);
    }

    #[test]
    fn positive_word_scores_its_weight() {
        assert!((polarity("I love this") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn negative_word_returns_negative() {
        let score = polarity("this is dangerous");
        assert!(score < 0.0, "expected negative score, got {score}");
    }

    #[test]
    fn score_is_mean_of_hits() {
        // good (0.7) + bad (-0.7)
        assert!(polarity("good and bad").abs() < 1e-12);
    }

    #[test]
    fn negation_flips_and_halves() {
        assert!((polarity("not good") + 0.35).abs() < 1e-12);
        assert!((polarity("don't like it") + 0.15).abs() < 1e-12);
    }

    #[test]
    fn typographic_apostrophe_still_negates() {
        let straight = polarity("I don't like it");
        let curly = polarity("I don\u{2019}t like it");
        assert!((curly + 0.15).abs() < 1e-12, "got {curly}");
        assert!((curly - straight).abs() < 1e-12);
        assert!(polarity("isn\u{2019}t good") < 0.0);
    }

    #[test]
    fn intensifier_scales_and_clamps() {
        assert!((polarity("very good") - 0.91).abs() < 1e-12);
        assert_eq!(polarity("very excellent"), 1.0);
    }

    #[test]
    fn negated_intensifier_still_negates() {
        assert!(polarity("not very good") < 0.0);
    }

    #[test]
    fn punctuation_and_case_are_ignored() {
        assert!((polarity("GREAT!") - 0.8).abs() < 1e-12);
    }

    #[test]
    fn score_stays_in_range() {
        let text = "worst terrible awful hate fear threat dangerous harmful";
        let score = polarity(text);
        assert!((-1.0..=1.0).contains(&score), "out of range: {score}");
    }
}
