//! Signal value types: sentiment, context framing, similarity, language.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::stance::StanceLabel;

/// Sentiment polarity distribution: `[negative, neutral, positive]`.
///
/// Each component is in [0, 1] and the triple sums to ~1. Normalization is
/// owned by the sentiment model; it is not re-normalized here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentTriple {
    pub negative: f32,
    pub neutral: f32,
    pub positive: f32,
}

impl SentimentTriple {
    /// Build from the model's ordered `[negative, neutral, positive]` output.
    pub fn from_array(values: [f32; 3]) -> Self {
        Self {
            negative: values[0],
            neutral: values[1],
            positive: values[2],
        }
    }

    /// The triple in model output order.
    pub fn as_array(&self) -> [f32; 3] {
        [self.negative, self.neutral, self.positive]
    }
}

/// The closed set of contextual-framing categories.
///
/// Variant order is the feature-vector order for context probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextFrame {
    /// Criticism directed at the government.
    PoliticalCriticism,
    /// Criticism directed at the country.
    NationalCriticism,
    /// Praise directed at the government.
    PoliticalPraise,
    /// Praise directed at the country.
    NationalPraise,
}

impl ContextFrame {
    /// All frames in feature-vector order.
    pub const ALL: [ContextFrame; 4] = [
        ContextFrame::PoliticalCriticism,
        ContextFrame::NationalCriticism,
        ContextFrame::PoliticalPraise,
        ContextFrame::NationalPraise,
    ];

    /// The fixed zero-shot hypothesis string for this frame.
    ///
    /// These are the candidate labels sent to the context collaborator and
    /// the keys its scores are matched back against. Changing them breaks
    /// the score re-ordering contract.
    pub fn hypothesis(&self) -> &'static str {
        match self {
            Self::PoliticalCriticism => "criticism of the government",
            Self::NationalCriticism => "criticism of the country",
            Self::PoliticalPraise => "praise of the government",
            Self::NationalPraise => "praise of the country",
        }
    }

    /// All hypothesis strings in feature-vector order.
    pub fn hypotheses() -> [&'static str; 4] {
        Self::ALL.map(|frame| frame.hypothesis())
    }
}

/// Contextual-framing probabilities in [`ContextFrame::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextProbabilities(pub [f32; 4]);

impl ContextProbabilities {
    /// The uniform fallback emitted when the context collaborator is
    /// unavailable or fails.
    pub const UNIFORM: ContextProbabilities = ContextProbabilities([0.25, 0.25, 0.25, 0.25]);

    /// Re-order collaborator scores (label -> score, arbitrary order) into
    /// the fixed frame order. Unmatched frames default to 0.0.
    pub fn from_scores(scores: &HashMap<String, f32>) -> Self {
        let mut probs = [0.0_f32; 4];
        for (i, frame) in ContextFrame::ALL.iter().enumerate() {
            probs[i] = scores.get(frame.hypothesis()).copied().unwrap_or(0.0);
        }
        Self(probs)
    }

    /// Probability for a single frame.
    pub fn get(&self, frame: ContextFrame) -> f32 {
        let index = ContextFrame::ALL
            .iter()
            .position(|f| *f == frame)
            .expect("frame is a member of ALL");
        self.0[index]
    }
}

/// Per-label anchor similarity scores, each in [-1, 1].
///
/// Only labels whose anchor sets loaded are present; a label missing here
/// means its anchor file was absent or empty at startup. Nothing is
/// zero-filled at this layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScores(BTreeMap<StanceLabel, f32>);

impl SimilarityScores {
    /// Create an empty score map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the similarity for a label.
    pub fn insert(&mut self, label: StanceLabel, score: f32) {
        self.0.insert(label, score);
    }

    /// Similarity for a label, if its anchor set loaded.
    pub fn get(&self, label: StanceLabel) -> Option<f32> {
        self.0.get(&label).copied()
    }

    /// Number of labels present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no labels are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels present, in stable order.
    pub fn labels(&self) -> impl Iterator<Item = StanceLabel> + '_ {
        self.0.keys().copied()
    }
}

/// One ranked language-detection candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageScore {
    /// Language code (ISO 639-1 where known).
    pub code: String,
    /// Detector confidence in [0, 1].
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_round_trips_array() {
        let triple = SentimentTriple::from_array([0.7, 0.2, 0.1]);
        assert_eq!(triple.negative, 0.7);
        assert_eq!(triple.as_array(), [0.7, 0.2, 0.1]);
    }

    #[test]
    fn context_from_scores_reorders() {
        let mut scores = HashMap::new();
        // Collaborators return scores sorted by magnitude, not frame order.
        scores.insert("praise of the country".to_string(), 0.5);
        scores.insert("criticism of the government".to_string(), 0.3);
        scores.insert("criticism of the country".to_string(), 0.15);
        scores.insert("praise of the government".to_string(), 0.05);

        let probs = ContextProbabilities::from_scores(&scores);
        assert_eq!(probs.0, [0.3, 0.15, 0.05, 0.5]);
    }

    #[test]
    fn context_unmatched_labels_default_to_zero() {
        let mut scores = HashMap::new();
        scores.insert("praise of the contry".to_string(), 0.9); // typo'd key
        scores.insert("criticism of the government".to_string(), 0.1);

        let probs = ContextProbabilities::from_scores(&scores);
        assert_eq!(probs.0, [0.1, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn context_uniform_fallback() {
        assert_eq!(ContextProbabilities::UNIFORM.0, [0.25; 4]);
    }

    #[test]
    fn similarity_scores_absent_label() {
        let mut scores = SimilarityScores::new();
        scores.insert(StanceLabel::Neutral, 0.4);
        assert_eq!(scores.get(StanceLabel::Neutral), Some(0.4));
        assert_eq!(scores.get(StanceLabel::ProIndia), None);
        assert_eq!(scores.len(), 1);
    }
}
