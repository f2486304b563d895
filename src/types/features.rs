//! The fixed-order feature vector consumed by the stance classifier.

use serde::{Deserialize, Serialize};

/// Number of features in the classifier's input contract.
pub const FEATURE_DIM: usize = 13;

/// Canonical feature names, in position order.
///
/// This order is the classifier's training contract. Reordering or renaming
/// requires retraining the classifier artifact; the artifact loader rejects
/// any artifact whose recorded feature names disagree with this schema.
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "sim_pro_india",
    "sim_anti_india",
    "sim_pro_government",
    "sim_anti_government",
    "sim_neutral",
    "sentiment_neg",
    "sentiment_neu",
    "sentiment_pos",
    "sarcasm",
    "context_pol_crit",
    "context_nat_crit",
    "context_pol_praise",
    "context_nat_praise",
];

/// A fixed-order 13-float feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f32; FEATURE_DIM]);

impl FeatureVector {
    /// Wrap a raw feature array. Callers are responsible for field order;
    /// use [`FeatureVectorBuilder`](crate::fusion::FeatureVectorBuilder)
    /// for schema-checked assembly.
    pub fn from_array(values: [f32; FEATURE_DIM]) -> Self {
        Self(values)
    }

    /// The features as a slice, in schema order.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Feature value at a schema position.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }
}

impl From<[f32; FEATURE_DIM]> for FeatureVector {
    fn from(values: [f32; FEATURE_DIM]) -> Self {
        Self(values)
    }
}
