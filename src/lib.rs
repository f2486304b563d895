//! Vordr - Multi-signal stance classification engine
//!
//! This crate classifies short social-media text into one of five political
//! stance labels with a calibrated margin confidence. Several independent,
//! imperfect model signals — cross-lingual similarity to curated anchor
//! statements, sentiment polarity, sarcasm probability, and zero-shot
//! contextual framing — are fused into one fixed-schema feature vector that
//! a trained multinomial classifier scores.
//!
//! Upstream models sit behind small collaborator traits
//! ([`providers::traits`]), so deployments can mix bundled local inference
//! with remote services or test mocks.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vordr::Vordr;
//! use vordr::providers::{
//!     Device, FastEmbedProvider, LocalEmbeddingModel, LocalNliModel, LocalSarcasmModel,
//!     LocalSentimentModel, OnnxSarcasmProvider, OnnxSentimentProvider, OnnxZeroShotProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> vordr::Result<()> {
//!     let device = Device::cpu();
//!     let engine = Vordr::builder()
//!         .embedder(Arc::new(FastEmbedProvider::new(
//!             LocalEmbeddingModel::ParaphraseMlMpnetBaseV2,
//!         )?))
//!         .sentiment(Arc::new(OnnxSentimentProvider::new(
//!             LocalSentimentModel::TwitterRobertaBase,
//!             device,
//!         )?))
//!         .sarcasm(Arc::new(OnnxSarcasmProvider::new(
//!             LocalSarcasmModel::TwitterRobertaIrony,
//!             device,
//!         )?))
//!         .lazy_context(move || {
//!             let provider =
//!                 OnnxZeroShotProvider::new(LocalNliModel::NliDebertaV3Small, device)?;
//!             Ok(Arc::new(provider) as Arc<dyn vordr::providers::ContextProvider>)
//!         })
//!         .anchors_dir("data/anchors")
//!         .classifier_artifact("models/final_classifier.json")
//!         .build()
//!         .await?;
//!
//!     let result = engine.classify("India has deep flaws").await?;
//!     println!("{} ({:.3})", result.label, result.confidence);
//!     Ok(())
//! }
//! ```

pub mod anchors;
mod cache;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod normalize;
pub mod providers;
pub mod signals;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::CacheConfig;
pub use engine::{StanceEngine, Vordr, VordrBuilder};
pub use error::{Result, VordrError};

// Re-export all types
pub use types::{
    ClassificationResult, ContextFrame, ContextProbabilities, Embedding, FEATURE_DIM,
    FEATURE_NAMES, FeatureVector, LanguageScore, SentimentTriple, SimilarityScores, StanceLabel,
};
