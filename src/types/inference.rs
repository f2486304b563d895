//! Embedding value type.

use serde::{Deserialize, Serialize};

/// A text embedding produced by an embedding collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// The embedding values.
    pub values: Vec<f32>,
    /// Name of the model that produced the embedding.
    pub model: String,
    /// Dimensionality of `values`.
    pub dimensions: usize,
}
