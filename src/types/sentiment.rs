//! Raw engine output and the normalized sentiment handed to callers

use serde::{Deserialize, Serialize};

use crate::types::EngineError;

/// One (label, score) pair as emitted by an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub label: String,
    pub score: f64,
}

impl ScoreEntry {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Engine output for a single text
///
/// The engine decides the shape: some configurations report only the best
/// label, others report every class they consider.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// Best label only
    Simple(ScoreEntry),
    /// Scores for all classes, in engine order
    Detailed(Vec<ScoreEntry>),
}

impl RawResult {
    /// Entry with the highest score (first one wins on ties)
    pub fn best(&self) -> Option<&ScoreEntry> {
        match self {
            RawResult::Simple(entry) => Some(entry),
            RawResult::Detailed(entries) => entries.iter().fold(None, |best, entry| match best {
                Some(b) if b.score >= entry.score => Some(b),
                _ => Some(entry),
            }),
        }
    }

    /// Reject output that breaks the engine contract
    pub fn validate(&self) -> Result<(), EngineError> {
        let entries: &[ScoreEntry] = match self {
            RawResult::Simple(entry) => std::slice::from_ref(entry),
            RawResult::Detailed(entries) => entries,
        };
        if entries.is_empty() {
            return Err(EngineError::Malformed("engine returned no scores".to_string()));
        }
        for entry in entries {
            if !entry.score.is_finite() || !(0.0..=1.0).contains(&entry.score) {
                return Err(EngineError::Malformed(format!(
                    "score {} for label '{}' is outside [0, 1]",
                    entry.score, entry.label
                )));
            }
        }
        Ok(())
    }
}

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        };
        write!(f, "{}", name)
    }
}

/// Classification result, produced fresh for every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSentiment {
    #[serde(rename = "sentiment")]
    pub label: SentimentLabel,
    /// Score of the selected entry, in [0, 1]
    pub confidence: f64,
    /// Signed score in [-1, 1]; zero for neutral
    pub score: f64,
    /// `None` when the label is neutral
    pub is_positive: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_prefers_first_on_tie() {
        let raw = RawResult::Detailed(vec![
            ScoreEntry::new("a", 0.4),
            ScoreEntry::new("b", 0.4),
            ScoreEntry::new("c", 0.2),
        ]);
        assert_eq!(raw.best().map(|e| e.label.as_str()), Some("a"));
    }

    #[test]
    fn test_validate_rejects_empty_detailed() {
        assert!(RawResult::Detailed(vec![]).validate().is_err());
        assert!(RawResult::Detailed(vec![]).best().is_none());
    }

    #[test]
    fn test_validate_rejects_out_of_range_score() {
        assert!(RawResult::Simple(ScoreEntry::new("POSITIVE", 1.5)).validate().is_err());
        assert!(RawResult::Simple(ScoreEntry::new("POSITIVE", f64::NAN)).validate().is_err());
        assert!(RawResult::Simple(ScoreEntry::new("POSITIVE", 0.7)).validate().is_ok());
    }

    #[test]
    fn test_sentiment_serializes_with_wire_names() {
        let s = NormalizedSentiment {
            label: SentimentLabel::Neutral,
            confidence: 0.6,
            score: 0.0,
            is_positive: None,
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["sentiment"], "NEUTRAL");
        assert!(json["is_positive"].is_null());
    }
}
