//! The trained stance classifier and margin confidence.
//!
//! [`StanceClassifier`] wraps any [`ProbabilityModel`] and turns its class
//! probabilities into a `(label, confidence)` pair. The bundled
//! [`LogisticRegressionModel`] loads a multinomial logistic regression from
//! a JSON artifact produced offline by the training pipeline.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VordrError};
use crate::providers::traits::ProbabilityModel;
use crate::types::{FEATURE_DIM, FEATURE_NAMES, FeatureVector, StanceLabel};

/// Serialized multinomial logistic regression parameters.
///
/// Written by the offline training pipeline. `labels` and `feature_names`
/// are recorded so the loader can reject artifacts trained against a
/// different label set or feature schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    /// Class labels in output order (snake_case keys).
    pub labels: Vec<String>,
    /// Feature names in input order.
    pub feature_names: Vec<String>,
    /// Per-class coefficient rows, `labels.len() x feature_names.len()`.
    pub coefficients: Vec<Vec<f32>>,
    /// Per-class intercepts.
    pub intercepts: Vec<f32>,
}

/// Multinomial logistic regression over the 13-float feature contract.
pub struct LogisticRegressionModel {
    artifact: ClassifierArtifact,
}

impl LogisticRegressionModel {
    /// Load and validate an artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VordrError::Configuration(format!(
                "Failed to read classifier artifact '{}': {}",
                path.display(),
                e
            ))
        })?;
        let artifact: ClassifierArtifact = serde_json::from_str(&contents)?;
        Self::from_artifact(artifact)
    }

    /// Validate an in-memory artifact.
    pub fn from_artifact(artifact: ClassifierArtifact) -> Result<Self> {
        let expected_labels: Vec<&str> = StanceLabel::ALL.iter().map(|l| l.key()).collect();
        if artifact.labels != expected_labels {
            return Err(VordrError::Configuration(format!(
                "Classifier artifact label order {:?} does not match {:?}",
                artifact.labels, expected_labels
            )));
        }

        if artifact.feature_names != FEATURE_NAMES {
            return Err(VordrError::Configuration(
                "Classifier artifact feature names do not match the feature schema; \
                 the artifact was trained against a different contract"
                    .to_string(),
            ));
        }

        if artifact.coefficients.len() != StanceLabel::ALL.len()
            || artifact.intercepts.len() != StanceLabel::ALL.len()
        {
            return Err(VordrError::Configuration(format!(
                "Classifier artifact has {} coefficient rows and {} intercepts, expected {}",
                artifact.coefficients.len(),
                artifact.intercepts.len(),
                StanceLabel::ALL.len()
            )));
        }
        if let Some(row) = artifact
            .coefficients
            .iter()
            .find(|row| row.len() != FEATURE_DIM)
        {
            return Err(VordrError::Configuration(format!(
                "Classifier artifact coefficient row has {} entries, expected {}",
                row.len(),
                FEATURE_DIM
            )));
        }

        Ok(Self { artifact })
    }
}

#[async_trait]
impl ProbabilityModel for LogisticRegressionModel {
    fn name(&self) -> &str {
        "multinomial-logistic"
    }

    async fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        let x = features.as_slice();

        let logits: Vec<f32> = self
            .artifact
            .coefficients
            .iter()
            .zip(&self.artifact.intercepts)
            .map(|(row, intercept)| {
                row.iter().zip(x).map(|(w, xi)| w * xi).sum::<f32>() + intercept
            })
            .collect();

        Ok(softmax(&logits))
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

/// Margin-ratio confidence: `(p_best - p_second) / p_best`.
///
/// Rewards one dominant class and approaches 0 as the top two classes tie,
/// which tells a downstream consumer more than raw top-1 probability.
/// Defined as 0.0 when `p_best` is 0 (guarded; cannot occur with a
/// normalized distribution). The result is clamped to [0, 1] against
/// non-distribution inputs.
pub fn margin_confidence(probs: &[f32]) -> f32 {
    let mut best = 0.0_f32;
    let mut second = 0.0_f32;
    for &p in probs {
        if p > best {
            second = best;
            best = p;
        } else if p > second {
            second = p;
        }
    }

    if best <= 0.0 {
        return 0.0;
    }
    ((best - second) / best).clamp(0.0, 1.0)
}

/// Maps feature vectors to a stance label with margin confidence.
pub struct StanceClassifier {
    model: Arc<dyn ProbabilityModel>,
}

impl StanceClassifier {
    /// Wrap a probability model.
    pub fn new(model: Arc<dyn ProbabilityModel>) -> Self {
        Self { model }
    }

    /// Predict the stance label and margin confidence for a feature vector.
    ///
    /// # Errors
    ///
    /// `ModelInference` when the underlying model fails; `DataError` when
    /// it returns a probability vector of the wrong length.
    pub async fn predict(&self, features: &FeatureVector) -> Result<(StanceLabel, f32)> {
        let probs = self.model.predict_proba(features).await.map_err(|e| {
            VordrError::ModelInference(format!("classifier ({}): {}", self.model.name(), e))
        })?;

        if probs.len() != StanceLabel::ALL.len() {
            return Err(VordrError::DataError(format!(
                "Classifier returned {} probabilities, expected {}",
                probs.len(),
                StanceLabel::ALL.len()
            )));
        }

        let best_index = probs
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);

        let label = StanceLabel::from_index(best_index)
            .expect("best_index bounded by probability vector length");

        Ok((label, margin_confidence(&probs)))
    }
}
