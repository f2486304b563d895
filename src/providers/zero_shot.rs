//! Local zero-shot classification via NLI entailment.
//!
//! Scores a text against arbitrary candidate labels by running an NLI
//! cross-encoder over (text, hypothesis) pairs and softmaxing the
//! entailment logits across candidates — the standard zero-shot
//! construction, with each candidate label used directly as the
//! hypothesis. Used as the bundled context-framing collaborator.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use ort::session::Session;

use crate::error::{Result, VordrError};
use crate::providers::traits::ContextProvider;

use super::onnx_text::{Device, build_session, download_model, softmax};

/// Supported local NLI models for zero-shot classification.
#[derive(Debug, Clone)]
pub enum LocalNliModel {
    /// cross-encoder/nli-deberta-v3-base — good balance of speed/accuracy.
    NliDebertaV3Base,
    /// cross-encoder/nli-deberta-v3-small — faster, slightly less accurate.
    NliDebertaV3Small,
    /// Custom model from local paths. Must emit 3 logits in
    /// `[contradiction, entailment, neutral]` order.
    Custom {
        model_path: PathBuf,
        tokenizer_path: PathBuf,
    },
}

impl LocalNliModel {
    /// Get the HuggingFace repo ID for this model.
    pub fn repo_id(&self) -> Option<&'static str> {
        match self {
            Self::NliDebertaV3Base => Some("cross-encoder/nli-deberta-v3-base"),
            Self::NliDebertaV3Small => Some("cross-encoder/nli-deberta-v3-small"),
            Self::Custom { .. } => None,
        }
    }

    /// Get the model name for display.
    pub fn name(&self) -> &str {
        match self {
            Self::NliDebertaV3Base => "nli-deberta-v3-base",
            Self::NliDebertaV3Small => "nli-deberta-v3-small",
            Self::Custom { model_path, .. } => model_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("custom"),
        }
    }

    fn resolve_paths(&self) -> Result<(PathBuf, PathBuf)> {
        match self {
            Self::Custom {
                model_path,
                tokenizer_path,
            } => Ok((model_path.clone(), tokenizer_path.clone())),
            _ => download_model(self.repo_id().unwrap()),
        }
    }
}

/// Index of the entailment logit in cross-encoder NLI output
/// (`[contradiction, entailment, neutral]`).
const ENTAILMENT_INDEX: usize = 1;

/// Local zero-shot provider using an NLI cross-encoder.
pub struct OnnxZeroShotProvider {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    model_name: String,
}

impl OnnxZeroShotProvider {
    /// Create a new provider with the specified model.
    ///
    /// Downloads the model if not cached locally. This is the expensive
    /// load the engine defers behind its lazy-initialization guard.
    pub fn new(model: LocalNliModel, device: Device) -> Result<Self> {
        let (model_path, tokenizer_path) = model.resolve_paths()?;

        let session = build_session(&model_path, &device)?;
        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| VordrError::Configuration(format!("Failed to load tokenizer: {}", e)))?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            model_name: model.name().to_string(),
        })
    }

    /// Entailment logit for one (premise, hypothesis) pair.
    fn entailment_logit(&self, premise: &str, hypothesis: &str) -> Result<f32> {
        use ort::value::TensorRef;

        let encoding = self
            .tokenizer
            .encode((premise, hypothesis), true)
            .map_err(|e| VordrError::DataError(format!("Tokenization failed: {}", e)))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding
            .get_type_ids()
            .iter()
            .map(|&t| t as i64)
            .collect();

        let seq_len = input_ids.len();
        let shape = [1_usize, seq_len];

        let input_ids_tensor =
            TensorRef::from_array_view((shape, input_ids.as_slice())).map_err(|e| {
                VordrError::DataError(format!("Failed to create input_ids tensor: {}", e))
            })?;
        let attention_mask_tensor = TensorRef::from_array_view((shape, attention_mask.as_slice()))
            .map_err(|e| {
                VordrError::DataError(format!("Failed to create attention_mask tensor: {}", e))
            })?;
        let token_type_ids_tensor = TensorRef::from_array_view((shape, token_type_ids.as_slice()))
            .map_err(|e| {
                VordrError::DataError(format!("Failed to create token_type_ids tensor: {}", e))
            })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| VordrError::Configuration(format!("ONNX session poisoned: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor,
            ])
            .map_err(|e| VordrError::DataError(format!("ONNX inference failed: {}", e)))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| VordrError::DataError("No logits output found".to_string()))?;

        let (_shape, logits_data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| VordrError::DataError(format!("Failed to extract logits: {}", e)))?;

        logits_data
            .get(ENTAILMENT_INDEX)
            .copied()
            .ok_or_else(|| VordrError::DataError("Logit output too short".to_string()))
    }
}

#[async_trait]
impl ContextProvider for OnnxZeroShotProvider {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn classify(&self, text: &str, labels: &[&str]) -> Result<HashMap<String, f32>> {
        if labels.is_empty() {
            return Err(VordrError::InvalidInput(
                "zero-shot classification needs at least one candidate label".to_string(),
            ));
        }

        let mut entailment = Vec::with_capacity(labels.len());
        for label in labels {
            entailment.push(self.entailment_logit(text, label)?);
        }

        // Single-label semantics: candidates compete, scores sum to 1.
        let probs = softmax(&entailment);

        Ok(labels
            .iter()
            .zip(probs)
            .map(|(label, prob)| (label.to_string(), prob))
            .collect())
    }
}
