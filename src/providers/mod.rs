//! Collaborator trait definitions and bundled provider implementations.
//!
//! The engine consumes upstream models through the traits in [`traits`].
//! Bundled implementations cover the common deployments:
//! - [`WhatlangDetector`]: in-process statistical language detection (always available)
//! - [`HttpTranslator`]: LibreTranslate-compatible HTTP translation (always available)
//! - [`FastEmbedProvider`]: local multilingual embeddings (`local-inference` feature)
//! - [`OnnxSentimentProvider`] / [`OnnxSarcasmProvider`]: local sequence
//!   classification heads (`local-inference` feature)
//! - [`OnnxZeroShotProvider`]: local zero-shot classification via NLI
//!   entailment (`local-inference` feature)

#[cfg(feature = "local-inference")]
mod fastembed;
#[cfg(feature = "local-inference")]
mod onnx_text;
mod translate;
pub mod traits;
mod whatlang;
#[cfg(feature = "local-inference")]
mod zero_shot;

#[cfg(feature = "local-inference")]
pub use fastembed::{FastEmbedProvider, LocalEmbeddingModel};
#[cfg(feature = "local-inference")]
pub use onnx_text::{
    Device, LocalSarcasmModel, LocalSentimentModel, OnnxSarcasmProvider, OnnxSentimentProvider,
};
pub use translate::HttpTranslator;
pub use traits::{
    ContextProvider, EmbeddingProvider, LanguageDetector, ProbabilityModel, SarcasmProvider,
    SentimentProvider, Translator,
};
pub use whatlang::WhatlangDetector;
#[cfg(feature = "local-inference")]
pub use zero_shot::{LocalNliModel, OnnxZeroShotProvider};
