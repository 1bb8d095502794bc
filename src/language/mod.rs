//! Language detection and the English-only gate
//!
//! [`LanguageDetector`] classifies text; [`WhatlangDetector`] is the default
//! trigram-based implementation. [`LanguageGate`] turns a detection into an
//! accept/reject decision for the harvest loop.

use whatlang::Lang;

use crate::config::LanguageConfig;
use crate::models::RejectReason;
use crate::utils::error::LanguageError;

/// Result of classifying one text
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// ISO 639-1 code where one exists, ISO 639-3 otherwise
    pub code: String,

    /// Detector confidence in `[0, 1]`
    pub confidence: f64,

    /// Whether the detector considers the guess reliable
    pub reliable: bool,
}

/// Classifies text into a language code
pub trait LanguageDetector: Send + Sync {
    /// Detect the dominant language of `text`
    fn detect(&self, text: &str) -> Result<Detection, LanguageError>;
}

/// Detector backed by the `whatlang` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl WhatlangDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<Detection, LanguageError> {
        let info = whatlang::detect(text).ok_or(LanguageError::Undetectable)?;

        Ok(Detection {
            code: iso_639_1(info.lang()).to_string(),
            confidence: info.confidence(),
            reliable: info.is_reliable(),
        })
    }
}

/// Map a whatlang language to its two-letter code
///
/// Languages without a mapping keep whatlang's three-letter code.
fn iso_639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Rus => "ru",
        Lang::Nld => "nl",
        Lang::Pol => "pl",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Fin => "fi",
        Lang::Tur => "tr",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Cmn => "zh",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Ukr => "uk",
        Lang::Ces => "cs",
        Lang::Hun => "hu",
        Lang::Ell => "el",
        Lang::Ron => "ro",
        Lang::Bul => "bg",
        Lang::Vie => "vi",
        Lang::Tha => "th",
        Lang::Ind => "id",
        Lang::Epo => "eo",
        other => other.code(),
    }
}

/// Accept/reject decision over a [`LanguageDetector`]
pub struct LanguageGate<D> {
    detector: D,
    accepted: String,
    require_reliable: bool,
}

impl<D: LanguageDetector> LanguageGate<D> {
    /// Gate that accepts only `accepted`
    pub fn new(detector: D, accepted: impl Into<String>) -> Self {
        Self {
            detector,
            accepted: accepted.into(),
            require_reliable: false,
        }
    }

    /// Gate configured from the `[language]` section
    pub fn from_config(detector: D, config: &LanguageConfig) -> Self {
        Self::new(detector, config.accepted.clone()).require_reliable(config.require_reliable)
    }

    /// Also reject detections the detector marks unreliable
    #[must_use]
    pub fn require_reliable(mut self, require: bool) -> Self {
        self.require_reliable = require;
        self
    }

    /// The accepted language code
    pub fn accepted(&self) -> &str {
        &self.accepted
    }

    /// Run detection and decide whether the text may be stored
    ///
    /// Detection failures are folded into a rejection; they never propagate.
    pub fn check(&self, text: &str) -> Result<Detection, RejectReason> {
        let detection = self
            .detect(text)
            .map_err(|e| RejectReason::DetectionFailed {
                message: e.to_string(),
            })?;

        if detection.code == self.accepted {
            Ok(detection)
        } else {
            Err(RejectReason::NonEnglish {
                code: detection.code,
            })
        }
    }

    fn detect(&self, text: &str) -> Result<Detection, LanguageError> {
        let detection = self.detector.detect(text)?;

        if self.require_reliable && !detection.reliable {
            return Err(LanguageError::Unreliable {
                code: detection.code,
                confidence: detection.confidence,
            });
        }

        Ok(detection)
    }
}
