//! Input text normalization: cleanup, language detection, translation.
//!
//! Every downstream signal model is English-trained, and the anchor
//! statements are English, so non-English input is translated before
//! signal extraction. The language metadata attached to the result always
//! describes the *original* input, not the canonical text.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Result, VordrError};
use crate::providers::traits::{LanguageDetector, Translator};
use crate::telemetry;

/// Function words that short-circuit detection to English.
///
/// Statistical detectors are unreliable on short texts ("India has deep
/// flaws" scores as Spanish on trigram models); unambiguous English
/// function words override them.
const ENGLISH_STOPWORDS: [&str; 13] = [
    "the", "is", "are", "and", "of", "to", "in", "it", "has", "have", "for", "on", "with",
];

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid URL regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip URLs and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let without_urls = URL_RE.replace_all(text, "");
    WHITESPACE_RE
        .replace_all(&without_urls, " ")
        .trim()
        .to_string()
}

/// Output of [`LanguageNormalizer::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    /// The canonical (cleaned, possibly translated) text all signals run on.
    pub canonical: String,
    /// The cleaned original text, pre-translation.
    pub original: String,
    /// Detected language of the original text.
    pub language: String,
    /// Detection confidence in [0, 1].
    pub confidence: f64,
}

/// Normalizes raw input into the single canonical text used by every
/// downstream signal.
pub struct LanguageNormalizer {
    detector: Arc<dyn LanguageDetector>,
    translator: Option<Arc<dyn Translator>>,
    stopwords: HashSet<&'static str>,
}

impl LanguageNormalizer {
    /// Create a normalizer. Without a translator, non-English input
    /// degrades to signal extraction on the untranslated text.
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        translator: Option<Arc<dyn Translator>>,
    ) -> Self {
        Self {
            detector,
            translator,
            stopwords: ENGLISH_STOPWORDS.into_iter().collect(),
        }
    }

    /// Normalize raw input text.
    ///
    /// # Errors
    ///
    /// `EmptyInput` when the text is empty or whitespace-only after cleanup.
    /// Detector and translator failures never fail the call; they degrade
    /// to `("unknown", 0.0)` metadata and the untranslated text.
    pub async fn normalize(&self, raw: &str) -> Result<NormalizedText> {
        let cleaned = clean_text(raw);
        if cleaned.is_empty() {
            return Err(VordrError::EmptyInput);
        }

        let (language, confidence) = self.detect(&cleaned);

        let canonical = if language == "en" {
            cleaned.clone()
        } else {
            self.translate(&cleaned, &language).await
        };

        Ok(NormalizedText {
            canonical,
            original: cleaned,
            language,
            confidence,
        })
    }

    fn detect(&self, text: &str) -> (String, f64) {
        let lowered = text.to_lowercase();
        let has_stopword = lowered
            .split_whitespace()
            .any(|word| self.stopwords.contains(word));
        if has_stopword {
            return ("en".to_string(), 1.0);
        }

        match self.detector.detect(text) {
            Ok(ranking) => match ranking.into_iter().next() {
                Some(best) => (best.code, best.confidence),
                None => {
                    metrics::counter!(telemetry::DEGRADED_SIGNALS_TOTAL, "signal" => "language_detection")
                        .increment(1);
                    ("unknown".to_string(), 0.0)
                }
            },
            Err(e) => {
                warn!(detector = self.detector.name(), error = %e, "language detection failed");
                metrics::counter!(telemetry::DEGRADED_SIGNALS_TOTAL, "signal" => "language_detection")
                    .increment(1);
                ("unknown".to_string(), 0.0)
            }
        }
    }

    async fn translate(&self, text: &str, language: &str) -> String {
        let Some(translator) = &self.translator else {
            debug!("no translator configured, using untranslated text");
            metrics::counter!(telemetry::DEGRADED_SIGNALS_TOTAL, "signal" => "translation")
                .increment(1);
            return text.to_string();
        };

        let hint = if language == "unknown" { "auto" } else { language };

        match translator.translate(text, hint).await {
            Ok(translated) => translated,
            Err(e) => {
                // Translation errors are non-fatal: work on the original
                // text rather than failing the call.
                warn!(translator = translator.name(), source = hint, error = %e,
                    "translation failed, using untranslated text");
                metrics::counter!(telemetry::DEGRADED_SIGNALS_TOTAL, "signal" => "translation")
                    .increment(1);
                text.to_string()
            }
        }
    }
}
