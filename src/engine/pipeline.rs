//! The classification pipeline.

use std::sync::Arc;
use std::time::Instant;

use tracing::instrument;

use crate::anchors::AnchorStore;
use crate::cache::EmbeddingCache;
use crate::classifier::StanceClassifier;
use crate::error::{Result, VordrError};
use crate::fusion::FeatureVectorBuilder;
use crate::normalize::LanguageNormalizer;
use crate::providers::traits::EmbeddingProvider;
use crate::signals::SignalCollector;
use crate::telemetry;
use crate::types::{ClassificationResult, Embedding};

/// The stance-classification engine.
///
/// Stateless per call: anchor matrices and classifier parameters are loaded
/// during construction and only read afterwards, so one engine value can be
/// shared across concurrent calls without locking. Construct via
/// [`Vordr::builder()`](crate::Vordr::builder).
pub struct StanceEngine {
    pub(crate) normalizer: LanguageNormalizer,
    pub(crate) embedder: Arc<dyn EmbeddingProvider>,
    pub(crate) cache: Option<EmbeddingCache>,
    pub(crate) anchors: AnchorStore,
    pub(crate) signals: SignalCollector,
    pub(crate) fusion: FeatureVectorBuilder,
    pub(crate) classifier: StanceClassifier,
}

impl StanceEngine {
    /// Classify one text.
    ///
    /// Pipeline: normalize → embed canonical text → anchor similarity →
    /// collect signals → build feature vector → predict. The result carries
    /// the *original* text's language metadata, not the canonical text's.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` — blank input after trimming.
    /// - `AnchorsNotLoaded` — no anchor set loaded at startup.
    /// - `ModelInference` — a non-degradable collaborator (embedding,
    ///   sentiment, sarcasm, classification) failed.
    ///
    /// Degradable signals (translation, context framing, language
    /// detection) never fail the call; they fall back to neutral values.
    #[instrument(skip(self, text), fields(operation = "classify"))]
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let result = self.classify_inner(text).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::CLASSIFY_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::CLASSIFY_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());

        result
    }

    async fn classify_inner(&self, text: &str) -> Result<ClassificationResult> {
        let normalized = self.normalizer.normalize(text).await?;

        let embedding = self.embed_canonical(&normalized.canonical).await?;
        let similarity = self.anchors.similarity(&embedding.values)?;

        let (sentiment, sarcasm, context) = self.signals.collect(&normalized.canonical).await?;

        let features = self.fusion.build(&similarity, &sentiment, sarcasm, &context)?;
        let (label, confidence) = self.classifier.predict(&features).await?;

        Ok(ClassificationResult {
            original_text: normalized.original,
            detected_language: normalized.language,
            language_confidence: normalized.confidence,
            label,
            confidence,
            sarcasm_score: sarcasm,
            sentiment,
        })
    }

    async fn embed_canonical(&self, text: &str) -> Result<Embedding> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(self.embedder.name(), text).await {
                return Ok(hit);
            }
        }

        let embedding = self.embedder.embed(text).await.map_err(|e| {
            VordrError::ModelInference(format!("embedding ({}): {}", self.embedder.name(), e))
        })?;

        if let Some(cache) = &self.cache {
            cache
                .insert(self.embedder.name(), text, embedding.clone())
                .await;
        }

        Ok(embedding)
    }

    /// The anchor store backing similarity queries.
    pub fn anchors(&self) -> &AnchorStore {
        &self.anchors
    }
}
