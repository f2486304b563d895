//! Collaborator traits for the model signals the engine consumes.
//!
//! Each upstream model sits behind a small capability trait rather than a
//! single "god trait". This keeps implementations swappable (local ONNX,
//! remote HTTP, test mocks) and lets the engine hold exactly the
//! collaborators it needs.
//!
//! # Failure semantics
//!
//! The engine decides per call-site whether a collaborator failure is fatal:
//! embedding, sentiment, sarcasm and final classification fail the call;
//! language detection, translation and context framing degrade to neutral
//! fallback values. Implementations should simply return their error and
//! leave that policy to the pipeline.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::Result;
use crate::types::{Embedding, FeatureVector, LanguageScore, SentimentTriple};

// ============================================================================
// Embedding
// ============================================================================

/// Collaborator producing fixed-dimension text embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Embed multiple texts.
    ///
    /// Default implementation calls `embed` sequentially; batch-capable
    /// backends should override.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}

// ============================================================================
// Language detection
// ============================================================================

/// Collaborator producing a ranked list of (language, probability) pairs.
///
/// Synchronous: statistical detectors run in-process on short texts and do
/// not block meaningfully. Detection must be deterministic for a given
/// input, since classification results are expected to be reproducible.
pub trait LanguageDetector: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Detect the language of `text`, best candidate first.
    ///
    /// An empty ranking is treated by the caller the same as an error.
    fn detect(&self, text: &str) -> Result<Vec<LanguageScore>>;
}

// ============================================================================
// Translation
// ============================================================================

/// Collaborator translating arbitrary-language text to English.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Translate `text` to English.
    ///
    /// `source` is a language hint (ISO 639-1 code, or `"auto"` when the
    /// source language is unknown).
    async fn translate(&self, text: &str, source: &str) -> Result<String>;
}

// ============================================================================
// Sentiment
// ============================================================================

/// Collaborator scoring sentiment polarity.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Score `text`, returning the `[negative, neutral, positive]` triple.
    async fn score(&self, text: &str) -> Result<SentimentTriple>;
}

// ============================================================================
// Sarcasm
// ============================================================================

/// Collaborator scoring sarcasm probability.
#[async_trait]
pub trait SarcasmProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Probability in [0, 1] that `text` is sarcastic.
    async fn score(&self, text: &str) -> Result<f32>;
}

// ============================================================================
// Context framing
// ============================================================================

/// Collaborator for zero-shot classification over candidate labels.
///
/// Returns label -> score pairs in arbitrary order; the caller re-orders
/// them against its fixed label strings.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Score `text` against each candidate label.
    async fn classify(&self, text: &str, labels: &[&str]) -> Result<HashMap<String, f32>>;
}

// ============================================================================
// Probability model
// ============================================================================

/// The trained classifier's inference contract: feature vector in,
/// probability vector over the fixed label set out.
#[async_trait]
pub trait ProbabilityModel: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Class probabilities in [`StanceLabel::ALL`](crate::types::StanceLabel::ALL) order.
    async fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>>;
}
