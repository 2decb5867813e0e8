//! Batch results

use serde::Serialize;

use crate::types::NormalizedSentiment;

/// Outcome for one input of a batch, tagged with its input index
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Analyzed {
        index: usize,
        /// Input echo, truncated to `TEXT_ECHO_LIMIT` characters
        text: String,
        #[serde(flatten)]
        sentiment: NormalizedSentiment,
    },
    Failed {
        index: usize,
        error: String,
    },
}

impl BatchItem {
    pub fn index(&self) -> usize {
        match self {
            BatchItem::Analyzed { index, .. } | BatchItem::Failed { index, .. } => *index,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, BatchItem::Failed { .. })
    }

    pub fn sentiment(&self) -> Option<&NormalizedSentiment> {
        match self {
            BatchItem::Analyzed { sentiment, .. } => Some(sentiment),
            BatchItem::Failed { .. } => None,
        }
    }
}

/// All items of a batch in input order, plus counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub results: Vec<BatchItem>,
    pub processed_count: usize,
    pub error_count: usize,
}

impl BatchResult {
    pub fn from_items(results: Vec<BatchItem>) -> Self {
        let error_count = results.iter().filter(|item| item.is_error()).count();
        Self {
            processed_count: results.len() - error_count,
            error_count,
            results,
        }
    }
}
