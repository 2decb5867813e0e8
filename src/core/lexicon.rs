//! Lexicon engine: offline word-list sentiment
//!
//! Counts positive and negative words (a negator up to two tokens before a
//! word flips it), turns the net polarity into three class logits and
//! reports softmax scores for negative / neutral / positive.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::core::InferenceEngine;
use crate::types::{EngineError, RawResult, ScoreEntry};

pub const LEXICON_MODEL_NAME: &str = "builtin-lexicon";

/// Logit added per unit of net polarity
const POLARITY_WEIGHT: f64 = 2.0;

/// Constant logit of the neutral class
const NEUTRAL_BIAS: f64 = 1.0;

/// How many preceding tokens are checked for a negator
const NEGATION_WINDOW: usize = 2;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "awesome", "fantastic", "wonderful", "delicious",
    "tasty", "fresh", "friendly", "love", "loved", "lovely", "like", "liked", "enjoy", "enjoyed",
    "best", "perfect", "nice", "pleasant", "happy", "recommend", "recommended", "superb",
    "outstanding", "brilliant", "beautiful", "cozy", "clean", "fast", "helpful", "favorite",
    "impressive", "incredible", "attentive", "generous", "worth",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "disgusting", "poor", "worst", "hate", "hated",
    "rude", "cold", "stale", "bland", "dirty", "slow", "overpriced", "disappointing",
    "disappointed", "mediocre", "gross", "greasy", "undercooked", "overcooked", "burnt",
    "boring", "noisy", "unfriendly", "sick", "avoid", "waste", "sad", "angry",
    "broken", "wrong", "inedible", "soggy",
];

const NEGATORS: &[&str] = &[
    "not", "no", "isn't", "wasn't", "aren't", "weren't", "don't", "doesn't", "didn't",
    "hardly", "barely", "won't", "can't", "cannot", "nothing", "neither", "nor",
];

lazy_static! {
    static ref RE_TOKEN: Regex = Regex::new(r"[a-z]+(?:'[a-z]+)?").unwrap();
    static ref POSITIVE: HashSet<&'static str> = POSITIVE_WORDS.iter().copied().collect();
    static ref NEGATIVE: HashSet<&'static str> = NEGATIVE_WORDS.iter().copied().collect();
    static ref NEGATOR: HashSet<&'static str> = NEGATORS.iter().copied().collect();
}

/// Word hits for one text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolarityHits {
    pub positive: u32,
    pub negative: u32,
    pub tokens: usize,
}

impl PolarityHits {
    pub fn net(&self) -> f64 {
        self.positive as f64 - self.negative as f64
    }
}

/// Word-list engine, constructible without I/O
#[derive(Debug, Default)]
pub struct LexiconEngine;

impl LexiconEngine {
    pub fn new() -> Self {
        Self
    }

    /// Count polarity words with negation flipping
    pub fn hits(&self, text: &str) -> PolarityHits {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = RE_TOKEN.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut hits = PolarityHits {
            tokens: tokens.len(),
            ..Default::default()
        };

        for (i, token) in tokens.iter().enumerate() {
            let positive = if POSITIVE.contains(token) {
                true
            } else if NEGATIVE.contains(token) {
                false
            } else {
                continue;
            };

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            let negated = window.iter().any(|t| NEGATOR.contains(t));

            if positive != negated {
                hits.positive += 1;
            } else {
                hits.negative += 1;
            }
        }

        hits
    }
}

impl InferenceEngine for LexiconEngine {
    fn model(&self) -> &str {
        LEXICON_MODEL_NAME
    }

    fn infer(&self, text: &str) -> Result<RawResult, EngineError> {
        let net = self.hits(text).net();

        let logits = [
            ("negative", POLARITY_WEIGHT * (-net).max(0.0)),
            ("neutral", NEUTRAL_BIAS),
            ("positive", POLARITY_WEIGHT * net.max(0.0)),
        ];
        let max = logits.iter().map(|(_, l)| *l).fold(f64::MIN, f64::max);
        let exps: Vec<f64> = logits.iter().map(|(_, l)| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();

        let entries = logits
            .iter()
            .zip(exps)
            .map(|((label, _), e)| ScoreEntry::new(*label, e / total))
            .collect();

        Ok(RawResult::Detailed(entries))
    }
}

// =============================================================================
// TESTS
// =============================================================================
