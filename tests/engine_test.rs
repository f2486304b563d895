//! End-to-end pipeline tests with mock collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use vordr::anchors::{AnchorSet, AnchorStore};
use vordr::providers::traits::{
    ContextProvider, EmbeddingProvider, ProbabilityModel, SarcasmProvider, SentimentProvider,
};
use vordr::types::{Embedding, FeatureVector, SentimentTriple, StanceLabel};
use vordr::{Result, Vordr, VordrBuilder, VordrError};

// ============================================================================
// Mock collaborators
// ============================================================================

/// Deterministic embedder: a 3-dim vector derived from text statistics.
struct MockEmbedder;

fn mock_vector(text: &str) -> Vec<f32> {
    let len = text.len() as f32;
    let vowels = text.chars().filter(|c| "aeiou".contains(*c)).count() as f32;
    let spaces = text.chars().filter(|c| *c == ' ').count() as f32;
    vec![len / 10.0, vowels + 1.0, spaces + 1.0]
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        Ok(Embedding {
            values: mock_vector(text),
            model: "mock-embedder".to_string(),
            dimensions: 3,
        })
    }
}

struct MockSentiment;

#[async_trait]
impl SentimentProvider for MockSentiment {
    fn name(&self) -> &str {
        "mock-sentiment"
    }

    async fn score(&self, _text: &str) -> Result<SentimentTriple> {
        Ok(SentimentTriple::from_array([0.6, 0.3, 0.1]))
    }
}

struct MockSarcasm;

#[async_trait]
impl SarcasmProvider for MockSarcasm {
    fn name(&self) -> &str {
        "mock-sarcasm"
    }

    async fn score(&self, _text: &str) -> Result<f32> {
        Ok(0.42)
    }
}

struct MockContext;

#[async_trait]
impl ContextProvider for MockContext {
    fn name(&self) -> &str {
        "mock-context"
    }

    async fn classify(&self, _text: &str, labels: &[&str]) -> Result<HashMap<String, f32>> {
        Ok(labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.to_string(), (i + 1) as f32 / 10.0))
            .collect())
    }
}

/// Probability model that records every feature vector it scores.
struct CapturingModel {
    seen: Mutex<Vec<FeatureVector>>,
    probs: Vec<f32>,
}

impl CapturingModel {
    fn new(probs: Vec<f32>) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            probs,
        })
    }

    fn last_features(&self) -> FeatureVector {
        self.seen.lock().unwrap().last().copied().unwrap()
    }
}

#[async_trait]
impl ProbabilityModel for CapturingModel {
    fn name(&self) -> &str {
        "capturing"
    }

    async fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        self.seen.lock().unwrap().push(*features);
        Ok(self.probs.clone())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn anchor_store(labels: &[StanceLabel]) -> AnchorStore {
    let sets = labels
        .iter()
        .map(|label| {
            let examples: Vec<String> = (0..3)
                .map(|i| format!("{} anchor statement {}", label.key(), i))
                .collect();
            let embeddings = examples.iter().map(|e| mock_vector(e)).collect();
            AnchorSet {
                label: *label,
                examples,
                embeddings,
            }
        })
        .collect();
    AnchorStore::from_sets(sets).unwrap()
}

fn base_builder(model: Arc<CapturingModel>) -> VordrBuilder {
    Vordr::builder()
        .embedder(Arc::new(MockEmbedder))
        .sentiment(Arc::new(MockSentiment))
        .sarcasm(Arc::new(MockSarcasm))
        .probability_model(model)
        .anchor_store(anchor_store(&StanceLabel::ALL))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn classify_returns_label_and_bounded_confidence() {
    let model = CapturingModel::new(vec![0.05, 0.05, 0.1, 0.1, 0.7]);
    let engine = base_builder(Arc::clone(&model))
        .context(Arc::new(MockContext))
        .build()
        .await
        .unwrap();

    let result = engine.classify("the government did something").await.unwrap();

    assert_eq!(result.label, StanceLabel::Neutral);
    assert!(StanceLabel::ALL.contains(&result.label));
    assert!((0.0..=1.0).contains(&result.confidence));
    assert!(((0.7 - 0.1) / 0.7 - result.confidence).abs() < 1e-6);
    assert_eq!(result.sarcasm_score, 0.42);
    assert_eq!(result.sentiment.as_array(), [0.6, 0.3, 0.1]);
}

#[tokio::test]
async fn blank_input_is_empty_input_error() {
    let model = CapturingModel::new(vec![0.2; 5]);
    let engine = base_builder(model).build().await.unwrap();

    for input in ["", "   ", "\n\t  \n"] {
        let err = engine.classify(input).await.unwrap_err();
        assert!(matches!(err, VordrError::EmptyInput), "input {:?}", input);
    }
}

#[tokio::test]
async fn classify_is_idempotent() {
    let model = CapturingModel::new(vec![0.3, 0.25, 0.2, 0.15, 0.1]);
    let engine = base_builder(Arc::clone(&model)).build().await.unwrap();

    let first = engine.classify("it was a decision of note").await.unwrap();
    let second = engine.classify("it was a decision of note").await.unwrap();

    assert_eq!(first.label, second.label);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first, second);

    // The classifier saw an identical feature vector both times.
    let seen = model.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

#[tokio::test]
async fn english_stopword_input_carries_english_metadata() {
    let model = CapturingModel::new(vec![0.2; 5]);
    let engine = base_builder(model).build().await.unwrap();

    let result = engine.classify("India has deep flaws").await.unwrap();
    assert_eq!(result.detected_language, "en");
    assert_eq!(result.language_confidence, 1.0);
    assert_eq!(result.original_text, "India has deep flaws");
}

#[tokio::test]
async fn missing_context_flows_uniform_fallback_into_positions_nine_to_twelve() {
    // No context collaborator configured at all.
    let model = CapturingModel::new(vec![0.2; 5]);
    let engine = base_builder(Arc::clone(&model)).build().await.unwrap();

    engine.classify("the state of things").await.unwrap();

    let features = model.last_features();
    assert_eq!(&features.as_slice()[9..13], &[0.25, 0.25, 0.25, 0.25]);
}

#[tokio::test]
async fn failed_lazy_context_flows_uniform_fallback() {
    let model = CapturingModel::new(vec![0.2; 5]);
    let engine = base_builder(Arc::clone(&model))
        .lazy_context(|| Err(VordrError::Configuration("no model".into())))
        .build()
        .await
        .unwrap();

    engine.classify("the state of things").await.unwrap();

    let features = model.last_features();
    assert_eq!(&features.as_slice()[9..13], &[0.25, 0.25, 0.25, 0.25]);
}

#[tokio::test]
async fn context_scores_land_in_frame_order() {
    let model = CapturingModel::new(vec![0.2; 5]);
    let engine = base_builder(Arc::clone(&model))
        .context(Arc::new(MockContext))
        .build()
        .await
        .unwrap();

    engine.classify("the state of things").await.unwrap();

    let features = model.last_features();
    // MockContext scores candidates by their position in the fixed
    // hypothesis list.
    assert_eq!(&features.as_slice()[9..13], &[0.1, 0.2, 0.3, 0.4]);
}

#[tokio::test]
async fn partial_anchor_set_fails_feature_build_by_default() {
    let reduced: Vec<StanceLabel> = StanceLabel::ALL
        .into_iter()
        .filter(|l| *l != StanceLabel::AntiGovernment)
        .collect();

    let model = CapturingModel::new(vec![0.2; 5]);
    let engine = Vordr::builder()
        .embedder(Arc::new(MockEmbedder))
        .sentiment(Arc::new(MockSentiment))
        .sarcasm(Arc::new(MockSarcasm))
        .probability_model(model)
        .anchor_store(anchor_store(&reduced))
        .build()
        .await
        .unwrap();

    let err = engine.classify("the state of things").await.unwrap_err();
    assert!(matches!(
        err,
        VordrError::MissingSimilarityLabel(StanceLabel::AntiGovernment)
    ));
}

#[tokio::test]
async fn partial_anchor_set_imputes_zero_when_enabled() {
    let reduced: Vec<StanceLabel> = StanceLabel::ALL
        .into_iter()
        .filter(|l| *l != StanceLabel::AntiGovernment)
        .collect();

    let model = CapturingModel::new(vec![0.2; 5]);
    let engine = Vordr::builder()
        .embedder(Arc::new(MockEmbedder))
        .sentiment(Arc::new(MockSentiment))
        .sarcasm(Arc::new(MockSarcasm))
        .probability_model(Arc::clone(&model) as Arc<dyn ProbabilityModel>)
        .anchor_store(anchor_store(&reduced))
        .impute_missing_similarity(true)
        .build()
        .await
        .unwrap();

    engine.classify("the state of things").await.unwrap();

    // anti_government sits at schema position 3.
    let features = model.last_features();
    assert_eq!(features.get(3), Some(0.0));
}

#[tokio::test]
async fn classifier_failure_propagates_as_model_inference() {
    struct BrokenModel;

    #[async_trait]
    impl ProbabilityModel for BrokenModel {
        fn name(&self) -> &str {
            "broken"
        }

        async fn predict_proba(&self, _features: &FeatureVector) -> Result<Vec<f32>> {
            Err(VordrError::DataError("weights corrupted".into()))
        }
    }

    let engine = Vordr::builder()
        .embedder(Arc::new(MockEmbedder))
        .sentiment(Arc::new(MockSentiment))
        .sarcasm(Arc::new(MockSarcasm))
        .probability_model(Arc::new(BrokenModel))
        .anchor_store(anchor_store(&StanceLabel::ALL))
        .build()
        .await
        .unwrap();

    let err = engine.classify("the state of things").await.unwrap_err();
    assert!(matches!(err, VordrError::ModelInference(_)));
}
