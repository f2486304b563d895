//! Local multilingual embeddings via fastembed-rs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, VordrError};
use crate::providers::traits::EmbeddingProvider;
use crate::types::Embedding;

/// Supported local embedding models.
///
/// All options are multilingual: anchor statements are English but input
/// text arrives in arbitrary languages, and the similarity signal depends
/// on both landing in the same embedding space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalEmbeddingModel {
    /// paraphrase-multilingual-mpnet-base-v2 (768 dims, strongest cross-lingual alignment).
    ParaphraseMlMpnetBaseV2,
    /// paraphrase-multilingual-MiniLM-L12-v2 (384 dims, faster).
    ParaphraseMlMiniLmL12V2,
    /// multilingual-e5-small (384 dims).
    MultilingualE5Small,
    /// multilingual-e5-base (768 dims).
    MultilingualE5Base,
}

impl LocalEmbeddingModel {
    /// Get the model name for display.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParaphraseMlMpnetBaseV2 => "paraphrase-multilingual-mpnet-base-v2",
            Self::ParaphraseMlMiniLmL12V2 => "paraphrase-multilingual-MiniLM-L12-v2",
            Self::MultilingualE5Small => "multilingual-e5-small",
            Self::MultilingualE5Base => "multilingual-e5-base",
        }
    }

    /// Get the embedding dimensions.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::ParaphraseMlMiniLmL12V2 | Self::MultilingualE5Small => 384,
            Self::ParaphraseMlMpnetBaseV2 | Self::MultilingualE5Base => 768,
        }
    }
}

impl From<LocalEmbeddingModel> for fastembed::EmbeddingModel {
    fn from(model: LocalEmbeddingModel) -> Self {
        match model {
            LocalEmbeddingModel::ParaphraseMlMpnetBaseV2 => {
                fastembed::EmbeddingModel::ParaphraseMLMpnetBaseV2
            }
            LocalEmbeddingModel::ParaphraseMlMiniLmL12V2 => {
                fastembed::EmbeddingModel::ParaphraseMLMiniLML12V2
            }
            LocalEmbeddingModel::MultilingualE5Small => {
                fastembed::EmbeddingModel::MultilingualE5Small
            }
            LocalEmbeddingModel::MultilingualE5Base => fastembed::EmbeddingModel::MultilingualE5Base,
        }
    }
}

/// Local embedding provider using fastembed-rs.
pub struct FastEmbedProvider {
    // fastembed's embed() takes &mut self; the trait is &self, so the
    // model sits behind a mutex. Embedding calls serialize on it.
    model: Mutex<fastembed::TextEmbedding>,
    model_name: &'static str,
    dimensions: usize,
}

impl FastEmbedProvider {
    /// Create a new provider with the specified model.
    ///
    /// Downloads the model if not cached locally. The cache location is
    /// `VORDR_CACHE_DIR` when set, the platform cache dir otherwise.
    pub fn new(model: LocalEmbeddingModel) -> Result<Self> {
        let cache_dir = super::onnx_text::model_cache_dir();

        let options = fastembed::InitOptions::new(model.into())
            .with_show_download_progress(true)
            .with_cache_dir(cache_dir);

        let model_instance = fastembed::TextEmbedding::try_new(options).map_err(|e| {
            VordrError::Configuration(format!("Failed to load embedding model: {}", e))
        })?;

        Ok(Self {
            model: Mutex::new(model_instance),
            model_name: model.name(),
            dimensions: model.dimensions(),
        })
    }

    fn embed_owned(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        let mut model = self
            .model
            .lock()
            .map_err(|e| VordrError::Configuration(format!("Embedding model poisoned: {}", e)))?;

        let vectors = model
            .embed(texts, None)
            .map_err(|e| VordrError::DataError(format!("Embedding failed: {}", e)))?;

        Ok(vectors
            .into_iter()
            .map(|values| Embedding {
                dimensions: values.len(),
                values,
                model: self.model_name.to_string(),
            })
            .collect())
    }

    /// Expected embedding dimensions for the configured model.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    fn name(&self) -> &str {
        self.model_name
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.embed_owned(vec![text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| VordrError::DataError("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let owned: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
        self.embed_owned(owned)
    }
}
