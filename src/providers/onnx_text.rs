//! Local sequence classification via ONNX Runtime.
//!
//! A single-text classification head shared by the bundled sentiment and
//! sarcasm providers. Tokenizes with the model's own tokenizer, runs the
//! ONNX session, and softmaxes the logits into class probabilities.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;

use crate::error::{Result, VordrError};
use crate::providers::traits::{SarcasmProvider, SentimentProvider};
use crate::types::SentimentTriple;

/// Compute device for local ONNX inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// CPU execution (default).
    #[default]
    Cpu,

    /// CUDA GPU execution.
    #[cfg(feature = "cuda")]
    Cuda {
        /// GPU device ID (0-indexed).
        device_id: u32,
    },
}

impl Device {
    /// Create CPU device.
    pub fn cpu() -> Self {
        Self::Cpu
    }

    /// Create CUDA device with the given device ID.
    #[cfg(feature = "cuda")]
    pub fn cuda(device_id: u32) -> Self {
        Self::Cuda { device_id }
    }

    /// Device name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            #[cfg(feature = "cuda")]
            Self::Cuda { .. } => "CUDA",
        }
    }
}

/// Supported local sentiment models.
#[derive(Debug, Clone)]
pub enum LocalSentimentModel {
    /// cardiffnlp/twitter-roberta-base-sentiment — social-media register,
    /// emits `[negative, neutral, positive]`.
    TwitterRobertaBase,
    /// Custom model from local paths. Must emit 3 logits in
    /// `[negative, neutral, positive]` order.
    Custom {
        model_path: PathBuf,
        tokenizer_path: PathBuf,
    },
}

impl LocalSentimentModel {
    /// Get the HuggingFace repo ID for this model.
    pub fn repo_id(&self) -> Option<&'static str> {
        match self {
            Self::TwitterRobertaBase => Some("cardiffnlp/twitter-roberta-base-sentiment"),
            Self::Custom { .. } => None,
        }
    }

    /// Get the model name for display.
    pub fn name(&self) -> &str {
        match self {
            Self::TwitterRobertaBase => "twitter-roberta-base-sentiment",
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

/// Supported local sarcasm/irony models.
#[derive(Debug, Clone)]
pub enum LocalSarcasmModel {
    /// cardiffnlp/twitter-roberta-base-irony — emits `[not_irony, irony]`.
    TwitterRobertaIrony,
    /// Custom model from local paths. Must emit 2 logits with the sarcastic
    /// class at index 1.
    Custom {
        model_path: PathBuf,
        tokenizer_path: PathBuf,
    },
}

impl LocalSarcasmModel {
    /// Get the HuggingFace repo ID for this model.
    pub fn repo_id(&self) -> Option<&'static str> {
        match self {
            Self::TwitterRobertaIrony => Some("cardiffnlp/twitter-roberta-base-irony"),
            Self::Custom { .. } => None,
        }
    }

    /// Get the model name for display.
    pub fn name(&self) -> &str {
        match self {
            Self::TwitterRobertaIrony => "twitter-roberta-base-irony",
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

/// A single-text ONNX sequence-classification head.
pub(crate) struct OnnxTextClassifier {
    // Session::run takes &mut self in ort v2; the providers expose &self
    // async traits, so inference serializes on this mutex.
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    num_classes: usize,
    name: String,
}

impl OnnxTextClassifier {
    pub(crate) fn new(
        model_path: &std::path::Path,
        tokenizer_path: &std::path::Path,
        num_classes: usize,
        name: impl Into<String>,
        device: Device,
    ) -> Result<Self> {
        let session = build_session(model_path, &device)?;
        let tokenizer = tokenizers::Tokenizer::from_file(tokenizer_path)
            .map_err(|e| VordrError::Configuration(format!("Failed to load tokenizer: {}", e)))?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            num_classes,
            name: name.into(),
        })
    }

    /// Classify one text into `num_classes` softmax probabilities.
    pub(crate) fn classify(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| VordrError::DataError(format!("Tokenization failed: {}", e)))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        let logits = self.run_logits(&input_ids, &attention_mask)?;
        if logits.len() != self.num_classes {
            return Err(VordrError::DataError(format!(
                "Expected {} logits, got {}",
                self.num_classes,
                logits.len()
            )));
        }

        Ok(softmax(&logits))
    }

    fn run_logits(&self, input_ids: &[i64], attention_mask: &[i64]) -> Result<Vec<f32>> {
        use ort::value::TensorRef;

        let seq_len = input_ids.len();
        let shape = [1_usize, seq_len];

        let input_ids_tensor = TensorRef::from_array_view((shape, input_ids)).map_err(|e| {
            VordrError::DataError(format!("Failed to create input_ids tensor: {}", e))
        })?;
        let attention_mask_tensor =
            TensorRef::from_array_view((shape, attention_mask)).map_err(|e| {
                VordrError::DataError(format!("Failed to create attention_mask tensor: {}", e))
            })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| VordrError::Configuration(format!("ONNX session poisoned: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
            ])
            .map_err(|e| VordrError::DataError(format!("ONNX inference failed: {}", e)))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| VordrError::DataError("No logits output found".to_string()))?;

        let (_shape, logits_data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| VordrError::DataError(format!("Failed to extract logits: {}", e)))?;

        Ok(logits_data.to_vec())
    }
}

/// Local sentiment provider using ONNX Runtime.
pub struct OnnxSentimentProvider {
    classifier: OnnxTextClassifier,
}

impl OnnxSentimentProvider {
    /// Create a new provider with the specified model.
    ///
    /// Downloads the model if not cached locally.
    pub fn new(model: LocalSentimentModel, device: Device) -> Result<Self> {
        let (model_path, tokenizer_path) = model.resolve_paths()?;
        let classifier =
            OnnxTextClassifier::new(&model_path, &tokenizer_path, 3, model.name(), device)?;
        Ok(Self { classifier })
    }
}

#[async_trait]
impl SentimentProvider for OnnxSentimentProvider {
    fn name(&self) -> &str {
        &self.classifier.name
    }

    async fn score(&self, text: &str) -> Result<SentimentTriple> {
        let probs = self.classifier.classify(text)?;
        Ok(SentimentTriple::from_array([probs[0], probs[1], probs[2]]))
    }
}

/// Local sarcasm provider using ONNX Runtime.
pub struct OnnxSarcasmProvider {
    classifier: OnnxTextClassifier,
}

impl OnnxSarcasmProvider {
    /// Create a new provider with the specified model.
    ///
    /// Downloads the model if not cached locally.
    pub fn new(model: LocalSarcasmModel, device: Device) -> Result<Self> {
        let (model_path, tokenizer_path) = model.resolve_paths()?;
        let classifier =
            OnnxTextClassifier::new(&model_path, &tokenizer_path, 2, model.name(), device)?;
        Ok(Self { classifier })
    }
}

#[async_trait]
impl SarcasmProvider for OnnxSarcasmProvider {
    fn name(&self) -> &str {
        &self.classifier.name
    }

    async fn score(&self, text: &str) -> Result<f32> {
        // Index 1 is the sarcastic class.
        let probs = self.classifier.classify(text)?;
        Ok(probs[1])
    }
}

/// Softmax function.
pub(crate) fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

/// Build an ONNX session with the appropriate execution provider.
pub(crate) fn build_session(model_path: &std::path::Path, device: &Device) -> Result<Session> {
    let builder = Session::builder()
        .map_err(|e| VordrError::Configuration(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| {
            VordrError::Configuration(format!("Failed to set optimization level: {}", e))
        })?;

    let builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([
                    CUDAExecutionProvider::default()
                        .with_device_id(*device_id as i32)
                        .build(),
                ])
                .map_err(|e| {
                    VordrError::Configuration(format!("Failed to configure CUDA: {}", e))
                })?
        }
    };

    builder
        .commit_from_file(model_path)
        .map_err(|e| VordrError::Configuration(format!("Failed to load ONNX model: {}", e)))
}

/// Get the cache directory for models.
pub(crate) fn model_cache_dir() -> PathBuf {
    std::env::var("VORDR_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("vordr")
                .join("models")
        })
}

/// Download model and tokenizer from HuggingFace Hub.
pub(crate) fn download_model(repo_id: &str) -> Result<(PathBuf, PathBuf)> {
    use hf_hub::api::sync::Api;

    let api = Api::new()
        .map_err(|e| VordrError::Configuration(format!("Failed to initialize HF Hub API: {}", e)))?;

    let repo = api.model(repo_id.to_string());

    let model_path = repo
        .get("onnx/model.onnx")
        .map_err(|e| VordrError::Configuration(format!("Failed to download ONNX model: {}", e)))?;

    let tokenizer_path = repo
        .get("tokenizer.json")
        .map_err(|e| VordrError::Configuration(format!("Failed to download tokenizer: {}", e)))?;

    Ok((model_path, tokenizer_path))
}
