//! Feature-vector assembly.
//!
//! Merges anchor similarity, sentiment, sarcasm, and context framing into
//! the fixed-order 13-float vector the classifier was trained on. Field
//! order is the training contract; see
//! [`FEATURE_NAMES`](crate::types::FEATURE_NAMES).

use crate::error::{Result, VordrError};
use crate::types::{
    ContextProbabilities, FEATURE_DIM, FeatureVector, SentimentTriple, SimilarityScores,
    StanceLabel,
};

/// Assembles classification feature vectors.
///
/// A classifier trained on a 13-dimensional contract cannot silently accept
/// fewer dimensions, so a similarity map missing an expected label (a
/// partially failed anchor load) is a hard error by default. Deployments
/// that accept the documented imputation policy — a fixed 0.0 for missing
/// labels — can opt in explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureVectorBuilder {
    impute_missing: bool,
}

impl FeatureVectorBuilder {
    /// Create a builder that rejects missing similarity labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the 0.0 imputation compatibility mode for labels whose
    /// anchor sets failed to load.
    pub fn impute_missing(mut self, enabled: bool) -> Self {
        self.impute_missing = enabled;
        self
    }

    /// Build the fixed-order feature vector.
    ///
    /// # Errors
    ///
    /// `MissingSimilarityLabel` when a label has no similarity score and
    /// imputation is disabled.
    pub fn build(
        &self,
        similarity: &SimilarityScores,
        sentiment: &SentimentTriple,
        sarcasm: f32,
        context: &ContextProbabilities,
    ) -> Result<FeatureVector> {
        let mut features = [0.0_f32; FEATURE_DIM];

        for (i, label) in StanceLabel::ALL.iter().enumerate() {
            features[i] = match similarity.get(*label) {
                Some(score) => score,
                None if self.impute_missing => 0.0,
                None => return Err(VordrError::MissingSimilarityLabel(*label)),
            };
        }

        features[5] = sentiment.negative;
        features[6] = sentiment.neutral;
        features[7] = sentiment.positive;
        features[8] = sarcasm;

        features[9..13].copy_from_slice(&context.0);

        Ok(FeatureVector::from_array(features))
    }
}
