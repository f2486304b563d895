//! Public types for the Vordr API.

mod features;
mod inference;
mod signals;
mod stance;

pub use features::{FEATURE_DIM, FEATURE_NAMES, FeatureVector};
pub use inference::Embedding;
pub use signals::{
    ContextFrame, ContextProbabilities, LanguageScore, SentimentTriple, SimilarityScores,
};
pub use stance::{ClassificationResult, StanceLabel};
