//! Translation table validation.
//!
//! Checks the invariants the localizer relies on: the English table exists
//! and is complete, every manifest language has a table, and translations
//! keep the `{placeholder}` tokens of their English source.

use crate::i18n::strings::FALLBACK_LOCALE;
use crate::i18n::{LanguageManifest, TranslationTable};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Broken invariants (lookups would misbehave)
    pub errors: Vec<String>,

    /// Gaps that are tolerated by the fallback chain
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TranslationValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Validate `table` against `manifest`.
    ///
    /// Errors:
    /// - no English table
    /// - a key present in some locale but missing from English
    /// - an empty value
    ///
    /// Warnings:
    /// - a manifest language without a table, or a table outside the manifest
    /// - a locale missing keys that English has (falls back at runtime)
    /// - placeholder mismatch against the English value
    pub fn validate(table: &TranslationTable, manifest: &LanguageManifest) -> ValidationReport {
        let mut report = ValidationReport::new();

        if !table.has_locale(FALLBACK_LOCALE) {
            report
                .errors
                .push(format!("Fallback locale '{}' has no table", FALLBACK_LOCALE));
            return report;
        }

        for lang in manifest.languages() {
            if !table.has_locale(&lang.code) {
                report.warnings.push(format!(
                    "Language '{}' is in the manifest but has no translations",
                    lang.code
                ));
            }
        }

        let english: BTreeSet<&str> = table.keys(FALLBACK_LOCALE).into_iter().collect();

        for locale in table.locales() {
            if !manifest.is_supported(locale) {
                report.warnings.push(format!(
                    "Locale '{}' has translations but is not in the manifest",
                    locale
                ));
            }

            let keys: BTreeSet<&str> = table.keys(locale).into_iter().collect();

            for key in &keys {
                if table.lookup(locale, key).is_some_and(str::is_empty) {
                    report
                        .errors
                        .push(format!("Empty value for '{}' in '{}'", key, locale));
                }
            }

            if locale == FALLBACK_LOCALE {
                continue;
            }

            let extra: Vec<&str> = keys.difference(&english).copied().collect();
            if !extra.is_empty() {
                report.errors.push(format!(
                    "Locale '{}' has keys missing from '{}': {:?}",
                    locale, FALLBACK_LOCALE, extra
                ));
            }

            let missing: Vec<&str> = english.difference(&keys).copied().collect();
            if !missing.is_empty() {
                report.warnings.push(format!(
                    "Locale '{}' is missing {} keys: {:?}",
                    locale,
                    missing.len(),
                    missing
                ));
            }

            for key in keys.intersection(&english) {
                let source = table.lookup(FALLBACK_LOCALE, key).unwrap_or_default();
                let translated = table.lookup(locale, key).unwrap_or_default();
                let orig = Self::extract_placeholders(source);
                let trans = Self::extract_placeholders(translated);
                if orig != trans {
                    report.warnings.push(format!(
                        "Placeholder mismatch for '{}' in '{}': expected {:?}, found {:?}",
                        key, locale, orig, trans
                    ));
                }
            }
        }

        report
    }

    /// Extract all `{name}` placeholders from text, sorted.
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([a-zA-Z0-9_]+)\}").unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
