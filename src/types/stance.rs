//! Stance labels and the per-call classification result.

use serde::{Deserialize, Serialize};

use super::signals::SentimentTriple;

/// The closed set of stance labels the engine can emit.
///
/// The variant order is the classifier's output order: probability vectors
/// returned by the underlying model are indexed by [`StanceLabel::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StanceLabel {
    /// Text expresses support for the country.
    ProIndia,
    /// Text expresses opposition to the country.
    AntiIndia,
    /// Text expresses support for the sitting government.
    ProGovernment,
    /// Text expresses opposition to the sitting government.
    AntiGovernment,
    /// Text does not express a clear stance.
    Neutral,
}

impl StanceLabel {
    /// All labels in classifier output order.
    pub const ALL: [StanceLabel; 5] = [
        StanceLabel::ProIndia,
        StanceLabel::AntiIndia,
        StanceLabel::ProGovernment,
        StanceLabel::AntiGovernment,
        StanceLabel::Neutral,
    ];

    /// Stable snake_case key, used for anchor file names and artifact labels.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ProIndia => "pro_india",
            Self::AntiIndia => "anti_india",
            Self::ProGovernment => "pro_government",
            Self::AntiGovernment => "anti_government",
            Self::Neutral => "neutral",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ProIndia => "Pro-India",
            Self::AntiIndia => "Anti-India",
            Self::ProGovernment => "Pro-Government",
            Self::AntiGovernment => "Anti-Government",
            Self::Neutral => "Neutral",
        }
    }

    /// Label at the given classifier output index.
    pub fn from_index(index: usize) -> Option<StanceLabel> {
        Self::ALL.get(index).copied()
    }

    /// Parse a snake_case key back into a label.
    pub fn from_key(key: &str) -> Option<StanceLabel> {
        Self::ALL.into_iter().find(|label| label.key() == key)
    }
}

impl std::fmt::Display for StanceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Result of classifying one text.
///
/// Created per call and owned by the caller; nothing is persisted.
/// Language metadata describes the *original* input text, not the
/// (possibly translated) canonical text the signals were computed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The cleaned original text.
    pub original_text: String,
    /// Detected language of the original text (ISO 639-1 where known).
    pub detected_language: String,
    /// Confidence of the language detection, in [0, 1].
    pub language_confidence: f64,
    /// The winning stance label.
    pub label: StanceLabel,
    /// Margin confidence in [0, 1]: `(p_best - p_second) / p_best`.
    pub confidence: f32,
    /// Sarcasm probability in [0, 1].
    pub sarcasm_score: f32,
    /// Sentiment polarity distribution of the canonical text.
    pub sentiment: SentimentTriple,
}
