//! Builder for configuring engine instances.

use std::path::PathBuf;
use std::sync::Arc;

use crate::anchors::AnchorStore;
use crate::cache::{CacheConfig, EmbeddingCache};
use crate::classifier::{LogisticRegressionModel, StanceClassifier};
use crate::error::{Result, VordrError};
use crate::fusion::FeatureVectorBuilder;
use crate::normalize::LanguageNormalizer;
use crate::providers::WhatlangDetector;
use crate::providers::traits::{
    ContextProvider, EmbeddingProvider, LanguageDetector, ProbabilityModel, SarcasmProvider,
    SentimentProvider, Translator,
};
use crate::signals::{ContextFactory, SignalCollector};

use super::StanceEngine;

/// Main entry point for creating engine instances.
pub struct Vordr;

impl Vordr {
    /// Create a new builder for configuring the engine.
    pub fn builder() -> VordrBuilder {
        VordrBuilder::new()
    }
}

enum ContextConfig {
    None,
    Eager(Arc<dyn ContextProvider>),
    Lazy(ContextFactory),
}

/// Builder for configuring engine instances.
///
/// Required collaborators: embedding, sentiment, sarcasm, probability
/// model, and an anchor source (directory or pre-built store). The language
/// detector defaults to the bundled statistical detector; translation and
/// context framing are optional and degrade to neutral fallbacks when
/// absent.
pub struct VordrBuilder {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    detector: Option<Arc<dyn LanguageDetector>>,
    translator: Option<Arc<dyn Translator>>,
    sentiment: Option<Arc<dyn SentimentProvider>>,
    sarcasm: Option<Arc<dyn SarcasmProvider>>,
    context: ContextConfig,
    model: Option<Arc<dyn ProbabilityModel>>,
    artifact_path: Option<PathBuf>,
    anchors_dir: Option<PathBuf>,
    anchor_store: Option<AnchorStore>,
    cache_config: Option<CacheConfig>,
    impute_missing_similarity: bool,
}

impl VordrBuilder {
    pub fn new() -> Self {
        Self {
            embedder: None,
            detector: None,
            translator: None,
            sentiment: None,
            sarcasm: None,
            context: ContextConfig::None,
            model: None,
            artifact_path: None,
            anchors_dir: None,
            anchor_store: None,
            cache_config: None,
            impute_missing_similarity: false,
        }
    }

    /// Set the embedding collaborator (required).
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the language detector (default: bundled statistical detector).
    pub fn language_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Set the translator. Without one, non-English input is classified
    /// untranslated.
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Set the sentiment collaborator (required).
    pub fn sentiment(mut self, sentiment: Arc<dyn SentimentProvider>) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Set the sarcasm collaborator (required).
    pub fn sarcasm(mut self, sarcasm: Arc<dyn SarcasmProvider>) -> Self {
        self.sarcasm = Some(sarcasm);
        self
    }

    /// Set an already-initialized context collaborator.
    pub fn context(mut self, context: Arc<dyn ContextProvider>) -> Self {
        self.context = ContextConfig::Eager(context);
        self
    }

    /// Set a factory that initializes the context collaborator on first
    /// use. The load runs exactly once; if it fails, every call observes
    /// the uniform context fallback.
    pub fn lazy_context<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn ContextProvider>> + Send + Sync + 'static,
    {
        self.context = ContextConfig::Lazy(Box::new(factory));
        self
    }

    /// Set the trained probability model directly.
    pub fn probability_model(mut self, model: Arc<dyn ProbabilityModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Load the bundled multinomial logistic regression from a JSON
    /// artifact at build time.
    pub fn classifier_artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = Some(path.into());
        self
    }

    /// Load anchor sets from a directory of `<label_key>.txt` files at
    /// build time, encoding them with the configured embedder.
    pub fn anchors_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.anchors_dir = Some(dir.into());
        self
    }

    /// Use a pre-built anchor store.
    pub fn anchor_store(mut self, store: AnchorStore) -> Self {
        self.anchor_store = Some(store);
        self
    }

    /// Enable the opt-in embedding cache.
    pub fn embedding_cache(mut self, config: CacheConfig) -> Self {
        self.cache_config = Some(config);
        self
    }

    /// Enable the 0.0 imputation compatibility mode for labels whose
    /// anchor sets failed to load. Off by default: a partial anchor load
    /// then fails feature assembly instead of guessing.
    pub fn impute_missing_similarity(mut self, enabled: bool) -> Self {
        self.impute_missing_similarity = enabled;
        self
    }

    /// Build the engine, loading anchors and classifier parameters.
    ///
    /// This is the one-time blocking initialization phase; complete it
    /// before accepting traffic.
    ///
    /// # Errors
    ///
    /// `Configuration` when a required collaborator is missing or an
    /// artifact fails to load or validate.
    pub async fn build(self) -> Result<StanceEngine> {
        let embedder = self
            .embedder
            .ok_or_else(|| VordrError::Configuration("no embedding provider configured".into()))?;
        let sentiment = self
            .sentiment
            .ok_or_else(|| VordrError::Configuration("no sentiment provider configured".into()))?;
        let sarcasm = self
            .sarcasm
            .ok_or_else(|| VordrError::Configuration("no sarcasm provider configured".into()))?;

        let model: Arc<dyn ProbabilityModel> = match (self.model, self.artifact_path) {
            (Some(model), _) => model,
            (None, Some(path)) => Arc::new(LogisticRegressionModel::load(&path)?),
            (None, None) => {
                return Err(VordrError::Configuration(
                    "no probability model or classifier artifact configured".into(),
                ));
            }
        };

        let anchors = match (self.anchor_store, self.anchors_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => AnchorStore::load(&dir, embedder.as_ref()).await?,
            (None, None) => {
                return Err(VordrError::Configuration(
                    "no anchor store or anchors directory configured".into(),
                ));
            }
        };

        let detector = self
            .detector
            .unwrap_or_else(|| Arc::new(WhatlangDetector::new()));
        let normalizer = LanguageNormalizer::new(detector, self.translator);

        let signals = match self.context {
            ContextConfig::None => SignalCollector::without_context(sentiment, sarcasm),
            ContextConfig::Eager(provider) => SignalCollector::new(sentiment, sarcasm, provider),
            ContextConfig::Lazy(factory) => {
                SignalCollector::with_lazy_context(sentiment, sarcasm, factory)
            }
        };

        Ok(StanceEngine {
            normalizer,
            embedder,
            cache: self.cache_config.as_ref().map(EmbeddingCache::new),
            anchors,
            signals,
            fusion: FeatureVectorBuilder::new().impute_missing(self.impute_missing_similarity),
            classifier: StanceClassifier::new(model),
        })
    }
}

impl Default for VordrBuilder {
    fn default() -> Self {
        Self::new()
    }
}
