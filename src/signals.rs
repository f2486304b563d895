//! Fault-isolated collection of the per-text model signals.
//!
//! Sentiment and sarcasm are foundational: their collaborators are loaded
//! eagerly at startup and a per-call inference failure fails the call.
//! Context framing is auxiliary: its collaborator is expensive and lazily
//! initialized behind a one-time guard, and any failure — at load or per
//! call — degrades to the uniform fallback distribution instead of failing
//! the call. The three signals are gathered concurrently.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::{Result, VordrError};
use crate::providers::traits::{ContextProvider, SarcasmProvider, SentimentProvider};
use crate::telemetry;
use crate::types::{ContextFrame, ContextProbabilities, SentimentTriple};

/// Factory producing the context collaborator on first use.
///
/// Construction may download and load a large model; the first call that
/// needs context framing pays that cost.
pub type ContextFactory =
    Box<dyn Fn() -> Result<Arc<dyn ContextProvider>> + Send + Sync + 'static>;

/// Lazily-initialized context collaborator.
///
/// The `OnceCell` guarantees the expensive load happens exactly once even
/// under concurrent first callers; a failed load is stored as `None` so
/// every subsequent caller consistently observes the fallback path instead
/// of re-attempting a load that already failed.
struct LazyContext {
    cell: OnceCell<Option<Arc<dyn ContextProvider>>>,
    factory: Option<ContextFactory>,
}

impl LazyContext {
    fn eager(provider: Arc<dyn ContextProvider>) -> Self {
        Self {
            cell: OnceCell::new_with(Some(Some(provider))),
            factory: None,
        }
    }

    fn lazy(factory: ContextFactory) -> Self {
        Self {
            cell: OnceCell::new(),
            factory: Some(factory),
        }
    }

    fn disabled() -> Self {
        Self {
            cell: OnceCell::new_with(Some(None)),
            factory: None,
        }
    }

    async fn get(&self) -> Option<Arc<dyn ContextProvider>> {
        self.cell
            .get_or_init(|| async {
                let Some(factory) = &self.factory else {
                    return None;
                };
                match factory() {
                    Ok(provider) => {
                        debug!(provider = provider.name(), "context collaborator initialized");
                        Some(provider)
                    }
                    Err(e) => {
                        warn!(error = %e,
                            "context collaborator failed to initialize, \
                             falling back to uniform context probabilities");
                        None
                    }
                }
            })
            .await
            .clone()
    }
}

/// Collects sentiment, sarcasm, and context-framing signals for one text.
pub struct SignalCollector {
    sentiment: Arc<dyn SentimentProvider>,
    sarcasm: Arc<dyn SarcasmProvider>,
    context: LazyContext,
}

impl SignalCollector {
    /// Create a collector with an already-initialized context collaborator.
    pub fn new(
        sentiment: Arc<dyn SentimentProvider>,
        sarcasm: Arc<dyn SarcasmProvider>,
        context: Arc<dyn ContextProvider>,
    ) -> Self {
        Self {
            sentiment,
            sarcasm,
            context: LazyContext::eager(context),
        }
    }

    /// Create a collector that initializes the context collaborator on
    /// first use via `factory`.
    pub fn with_lazy_context(
        sentiment: Arc<dyn SentimentProvider>,
        sarcasm: Arc<dyn SarcasmProvider>,
        factory: ContextFactory,
    ) -> Self {
        Self {
            sentiment,
            sarcasm,
            context: LazyContext::lazy(factory),
        }
    }

    /// Create a collector with no context collaborator at all; every call
    /// receives the uniform context fallback.
    pub fn without_context(
        sentiment: Arc<dyn SentimentProvider>,
        sarcasm: Arc<dyn SarcasmProvider>,
    ) -> Self {
        Self {
            sentiment,
            sarcasm,
            context: LazyContext::disabled(),
        }
    }

    /// Collect all three signals for the canonical text.
    ///
    /// # Errors
    ///
    /// `ModelInference` when the sentiment or sarcasm collaborator fails.
    /// Context failures never propagate.
    pub async fn collect(
        &self,
        text: &str,
    ) -> Result<(SentimentTriple, f32, ContextProbabilities)> {
        let (sentiment, sarcasm, context) = tokio::join!(
            self.sentiment.score(text),
            self.sarcasm.score(text),
            self.context_probabilities(text),
        );

        let sentiment = sentiment.map_err(|e| {
            VordrError::ModelInference(format!("sentiment ({}): {}", self.sentiment.name(), e))
        })?;
        let sarcasm = sarcasm.map_err(|e| {
            VordrError::ModelInference(format!("sarcasm ({}): {}", self.sarcasm.name(), e))
        })?;

        Ok((sentiment, sarcasm.clamp(0.0, 1.0), context))
    }

    /// Context-framing probabilities, or the uniform fallback when the
    /// collaborator is unavailable or fails.
    async fn context_probabilities(&self, text: &str) -> ContextProbabilities {
        let Some(provider) = self.context.get().await else {
            metrics::counter!(telemetry::DEGRADED_SIGNALS_TOTAL, "signal" => "context")
                .increment(1);
            return ContextProbabilities::UNIFORM;
        };

        let hypotheses = ContextFrame::hypotheses();
        match provider.classify(text, &hypotheses).await {
            Ok(scores) => ContextProbabilities::from_scores(&scores),
            Err(e) => {
                warn!(provider = provider.name(), error = %e,
                    "context inference failed, using uniform fallback");
                metrics::counter!(telemetry::DEGRADED_SIGNALS_TOTAL, "signal" => "context")
                    .increment(1);
                ContextProbabilities::UNIFORM
            }
        }
    }
}
