//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use vordr::anchors::{AnchorSet, AnchorStore};
use vordr::providers::traits::{
    EmbeddingProvider, ProbabilityModel, SarcasmProvider, SentimentProvider,
};
use vordr::types::{Embedding, FeatureVector, SentimentTriple, StanceLabel};
use vordr::{Result, StanceEngine, Vordr, telemetry};

// ============================================================================
// Mock collaborators
// ============================================================================

struct MockEmbedder;

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        Ok(Embedding {
            values: vec![text.len() as f32, 1.0],
            model: "mock".to_string(),
            dimensions: 2,
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
        Ok(SentimentTriple::from_array([0.1, 0.8, 0.1]))
    }
}

struct MockSarcasm;

#[async_trait]
impl SarcasmProvider for MockSarcasm {
    fn name(&self) -> &str {
        "mock-sarcasm"
    }

    async fn score(&self, _text: &str) -> Result<f32> {
        Ok(0.3)
    }
}

struct MockModel;

#[async_trait]
impl ProbabilityModel for MockModel {
    fn name(&self) -> &str {
        "mock-model"
    }

    async fn predict_proba(&self, _features: &FeatureVector) -> Result<Vec<f32>> {
        Ok(vec![0.1, 0.1, 0.1, 0.1, 0.6])
    }
}

async fn build_engine() -> StanceEngine {
    let sets = StanceLabel::ALL
        .iter()
        .map(|label| AnchorSet {
            label: *label,
            examples: vec!["example".to_string()],
            embeddings: vec![vec![7.0, 1.0]],
        })
        .collect();

    Vordr::builder()
        .embedder(Arc::new(MockEmbedder))
        .sentiment(Arc::new(MockSentiment))
        .sarcasm(Arc::new(MockSarcasm))
        .probability_model(Arc::new(MockModel))
        .anchor_store(AnchorStore::from_sets(sets).unwrap())
        .build()
        .await
        .unwrap()
}

// ============================================================================
// Snapshot helpers
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn successful_classify_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let engine = build_engine().await;
                engine.classify("the debate continues").await
            })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::CLASSIFY_TOTAL), 1);
    assert!(
        has_histogram(&snapshot, telemetry::CLASSIFY_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
    // No context collaborator configured: the degraded-signal counter fires.
    assert_eq!(
        counter_total(&snapshot, telemetry::DEGRADED_SIGNALS_TOTAL),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn empty_input_records_error_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let engine = build_engine().await;
                engine.classify("   ").await
            })
        })
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CLASSIFY_TOTAL), 1);
}
