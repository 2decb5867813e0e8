//! Score classifier: maps raw engine output to POSITIVE / NEGATIVE / NEUTRAL
//!
//! Label rules (case-insensitive, first match wins):
//! - contains "POSITIVE" or equals "LABEL_2" → POSITIVE, score = +confidence
//! - contains "NEGATIVE" or equals "LABEL_0" → NEGATIVE, score = -confidence
//! - anything else → NEUTRAL, score = 0.0
//!
//! Some models emit class indices instead of words; both conventions
//! resolve to the same three-way output.

use crate::types::{NormalizedSentiment, RawResult, SentimentLabel};

const PLACEHOLDER_POSITIVE: &str = "LABEL_2";
const PLACEHOLDER_NEGATIVE: &str = "LABEL_0";

/// Stateless classifier
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoreClassifier;

impl ScoreClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Normalize engine output
    ///
    /// Returns `None` only for a detailed result with no entries, which is an
    /// engine contract violation for the caller to report.
    pub fn normalize(&self, raw: &RawResult) -> Option<NormalizedSentiment> {
        let best = raw.best()?;
        let confidence = best.score;

        let sentiment = match label_of(&best.label) {
            SentimentLabel::Positive => NormalizedSentiment {
                label: SentimentLabel::Positive,
                confidence,
                score: confidence,
                is_positive: Some(true),
            },
            SentimentLabel::Negative => NormalizedSentiment {
                label: SentimentLabel::Negative,
                confidence,
                score: -confidence,
                is_positive: Some(false),
            },
            SentimentLabel::Neutral => NormalizedSentiment {
                label: SentimentLabel::Neutral,
                confidence,
                score: 0.0,
                is_positive: None,
            },
        };
        Some(sentiment)
    }
}

fn label_of(raw_label: &str) -> SentimentLabel {
    let label = raw_label.to_uppercase();
    if label.contains("POSITIVE") || label == PLACEHOLDER_POSITIVE {
        SentimentLabel::Positive
    } else if label.contains("NEGATIVE") || label == PLACEHOLDER_NEGATIVE {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

// =============================================================================
// TESTS
// =============================================================================
