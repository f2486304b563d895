//! Statistical language detection via whatlang.
//!
//! whatlang is trigram-based and fully deterministic, which keeps
//! classification results reproducible for a given input. It emits ISO
//! 639-3 codes; the common languages of this engine's deployments are
//! mapped down to ISO 639-1, everything else passes through as 639-3.

use whatlang::Lang;

use crate::Result;
use crate::providers::traits::LanguageDetector;
use crate::types::LanguageScore;

/// In-process statistical language detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl WhatlangDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for WhatlangDetector {
    fn name(&self) -> &str {
        "whatlang"
    }

    fn detect(&self, text: &str) -> Result<Vec<LanguageScore>> {
        // whatlang returns None on text it cannot score (numeric, emoji-only,
        // too short). The caller treats an empty ranking as detection failure.
        let Some(info) = whatlang::detect(text) else {
            return Ok(Vec::new());
        };

        Ok(vec![LanguageScore {
            code: iso_639_1(info.lang()).to_string(),
            confidence: info.confidence(),
        }])
    }
}

/// Map whatlang's ISO 639-3 codes to 639-1 for the languages this engine
/// routinely sees. Unmapped languages keep their 639-3 code.
fn iso_639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Hin => "hi",
        Lang::Tam => "ta",
        Lang::Urd => "ur",
        Lang::Ben => "bn",
        Lang::Tel => "te",
        Lang::Mal => "ml",
        Lang::Guj => "gu",
        Lang::Kan => "kn",
        Lang::Mar => "mr",
        Lang::Pan => "pa",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Por => "pt",
        Lang::Rus => "ru",
        Lang::Ara => "ar",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Ita => "it",
        Lang::Nld => "nl",
        Lang::Tur => "tr",
        other => other.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english_prose() {
        let detector = WhatlangDetector::new();
        let ranking = detector
            .detect("The quick brown fox jumps over the lazy dog near the river bank")
            .unwrap();

        assert_eq!(ranking[0].code, "en");
        assert!(ranking[0].confidence > 0.0);
    }

    #[test]
    fn detects_hindi_script() {
        let detector = WhatlangDetector::new();
        let ranking = detector
            .detect("भारत एक विशाल देश है और यहाँ बहुत सारी भाषाएँ बोली जाती हैं")
            .unwrap();

        assert_eq!(ranking[0].code, "hi");
    }

    #[test]
    fn unscorable_text_returns_empty_ranking() {
        let detector = WhatlangDetector::new();
        let ranking = detector.detect("1234 5678").unwrap();
        assert!(ranking.is_empty());
    }

    #[test]
    fn detection_is_deterministic() {
        let detector = WhatlangDetector::new();
        let first = detector.detect("ceci est une phrase en français").unwrap();
        let second = detector.detect("ceci est une phrase en français").unwrap();
        assert_eq!(first, second);
    }
}
