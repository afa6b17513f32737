//! Language manifest: single source of truth for all supported languages.
//!
//! The manifest is an ordered list of language descriptors, exactly one of
//! which is the default. The built-in manifest is initialized once on first
//! access through a `OnceLock` and stays immutable for the process lifetime.

use serde::Deserialize;
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

/// Code returned by [`LanguageManifest::default_language`] when no entry is
/// flagged as the default.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Metadata for a supported language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageDescriptor {
    /// Short language code (e.g., "en", "zh")
    pub code: String,

    /// English name of the language (e.g., "English", "Chinese")
    pub name: String,

    /// Native name of the language (e.g., "English", "中文")
    #[serde(rename = "nativeName")]
    pub native_name: String,

    /// Whether this is the default language (exactly one should be true)
    #[serde(rename = "default", default)]
    pub is_default: bool,
}

impl LanguageDescriptor {
    pub fn new(code: &str, name: &str, native_name: &str, is_default: bool) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            native_name: native_name.to_string(),
            is_default,
        }
    }
}

/// Reasons a manifest can be rejected at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("language manifest is empty")]
    Empty,

    #[error("duplicate language code '{0}' in manifest")]
    DuplicateCode(String),

    #[error("manifest has no default language")]
    NoDefault,

    #[error("manifest has {0} default languages, expected exactly one")]
    MultipleDefaults(usize),

    #[error("invalid manifest JSON: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    languages: Vec<LanguageDescriptor>,
}

/// Ordered registry of supported languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageManifest {
    languages: Vec<LanguageDescriptor>,
}

/// Built-in manifest instance (initialized lazily)
static BUILTIN: OnceLock<LanguageManifest> = OnceLock::new();

impl LanguageManifest {
    /// Build a manifest, checking that it is non-empty, that codes are
    /// unique and that exactly one entry is the default.
    pub fn new(languages: Vec<LanguageDescriptor>) -> Result<Self, ManifestError> {
        if languages.is_empty() {
            return Err(ManifestError::Empty);
        }

        let mut seen = HashSet::new();
        for lang in &languages {
            if !seen.insert(lang.code.as_str()) {
                return Err(ManifestError::DuplicateCode(lang.code.clone()));
            }
        }

        match languages.iter().filter(|lang| lang.is_default).count() {
            0 => Err(ManifestError::NoDefault),
            1 => Ok(Self { languages }),
            n => Err(ManifestError::MultipleDefaults(n)),
        }
    }

    /// Parse a manifest from its JSON form:
    /// `{"languages": [{"code": "en", "name": "English", "nativeName": "English", "default": true}]}`
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let file: ManifestFile =
            serde_json::from_str(json).map_err(|e| ManifestError::Parse(e.to_string()))?;
        Self::new(file.languages)
    }

    /// Get the built-in manifest (English default, Chinese).
    pub fn builtin() -> &'static LanguageManifest {
        BUILTIN.get_or_init(|| LanguageManifest {
            languages: default_languages(),
        })
    }

    /// Code of the default language, or `"en"` if none is flagged.
    pub fn default_language(&self) -> &str {
        self.languages
            .iter()
            .find(|lang| lang.is_default)
            .map(|lang| lang.code.as_str())
            .unwrap_or(FALLBACK_LANGUAGE)
    }

    /// Exact-match lookup by code.
    pub fn get_language(&self, code: &str) -> Option<&LanguageDescriptor> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.get_language(code).is_some()
    }

    /// All languages in manifest order.
    pub fn languages(&self) -> &[LanguageDescriptor] {
        &self.languages
    }

    /// The language that follows `code` in manifest order, wrapping around.
    ///
    /// An unknown code yields the first entry, so a stale preference still
    /// gets a usable toggle target.
    pub fn next_after(&self, code: &str) -> &LanguageDescriptor {
        let next = self
            .languages
            .iter()
            .position(|lang| lang.code == code)
            .map(|idx| (idx + 1) % self.languages.len())
            .unwrap_or(0);
        &self.languages[next]
    }
}

fn default_languages() -> Vec<LanguageDescriptor> {
    vec![
        LanguageDescriptor::new("en", "English", "English", true),
        LanguageDescriptor::new("zh", "Chinese", "中文", false),
    ]
}
