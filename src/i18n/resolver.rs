//! Effective locale resolution.
//!
//! Priority: saved preference, then the environment's language tag (exact
//! match, then base-tag match against the manifest), then the manifest
//! default. Without a manifest or a tag the resolver drops to a prefix
//! heuristic that only knows about Chinese and English.

use crate::i18n::{LanguageManifest, PreferenceStore};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Source of the environment-reported language tag (e.g. `"zh-CN"`).
pub trait LanguageSource: Send + Sync {
    fn language_tag(&self) -> Option<String>;
}

/// Reads the process locale from `LC_ALL`, `LC_MESSAGES` and `LANG`, in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLanguage;

impl LanguageSource for SystemLanguage {
    fn language_tag(&self) -> Option<String> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .and_then(|value| normalize_posix_locale(&value))
    }
}

/// A fixed tag, or none at all.
#[derive(Debug, Clone, Default)]
pub struct FixedLanguage(pub Option<String>);

impl FixedLanguage {
    pub fn new(tag: &str) -> Self {
        Self(Some(tag.to_string()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl LanguageSource for FixedLanguage {
    fn language_tag(&self) -> Option<String> {
        self.0.clone()
    }
}

static POSIX_LOCALE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Convert a POSIX locale (`zh_CN.UTF-8`, `en_US@euro`) into a language tag
/// (`zh-CN`, `en-US`). `C` and `POSIX` carry no language and yield `None`.
pub fn normalize_posix_locale(value: &str) -> Option<String> {
    let regex = POSIX_LOCALE_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{2,3})(?:[_-]([A-Za-z0-9]+))?(?:[.@].*)?$").unwrap()
    });

    if value == "C" || value == "POSIX" || value.starts_with("C.") {
        return None;
    }

    let caps = regex.captures(value)?;
    let language = caps.get(1)?.as_str().to_ascii_lowercase();
    match caps.get(2) {
        Some(region) => Some(format!("{}-{}", language, region.as_str())),
        None => Some(language),
    }
}

/// Base tag: the part of a language tag before the first hyphen.
pub fn base_tag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Resolves the effective locale fresh on every call.
#[derive(Clone)]
pub struct LocaleResolver {
    preferences: PreferenceStore,
    source: Arc<dyn LanguageSource>,
    manifest: Option<Arc<LanguageManifest>>,
}

impl LocaleResolver {
    pub fn new(
        preferences: PreferenceStore,
        source: Arc<dyn LanguageSource>,
        manifest: Option<Arc<LanguageManifest>>,
    ) -> Self {
        Self {
            preferences,
            source,
            manifest,
        }
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn manifest(&self) -> Option<&LanguageManifest> {
        self.manifest.as_deref()
    }

    /// Determine the effective locale code.
    ///
    /// A saved preference is returned verbatim, even if the manifest no
    /// longer lists it.
    pub fn resolve(&self) -> String {
        if let Some(saved) = self.preferences.get() {
            debug!("Using saved language preference '{}'", saved);
            return saved;
        }

        let tag = self.source.language_tag();
        let resolved = match (tag.as_deref(), self.manifest()) {
            (Some(tag), Some(manifest)) => resolve_with_manifest(tag, manifest),
            (tag, _) => resolve_degraded(tag.unwrap_or_default()).to_string(),
        };

        debug!("Resolved language '{}' from environment tag {:?}", resolved, tag);
        resolved
    }
}

/// Exact match, then base-tag match, then the manifest default.
pub fn resolve_with_manifest(tag: &str, manifest: &LanguageManifest) -> String {
    if manifest.is_supported(tag) {
        return tag.to_string();
    }

    let base = base_tag(tag);
    if manifest.is_supported(base) {
        return base.to_string();
    }

    manifest.default_language().to_string()
}

/// Prefix heuristic used when no manifest or no tag is available.
pub fn resolve_degraded(tag: &str) -> &'static str {
    if tag.starts_with("zh") {
        "zh"
    } else {
        "en"
    }
}

impl std::fmt::Debug for LocaleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleResolver")
            .field("preferences", &self.preferences)
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LanguageDescriptor;

    fn resolver_with(tag: Option<&str>, manifest: bool) -> LocaleResolver {
        LocaleResolver::new(
            PreferenceStore::in_memory(),
            Arc::new(FixedLanguage(tag.map(str::to_string))),
            manifest.then(|| Arc::new(LanguageManifest::builtin().clone())),
        )
    }

    // ==================== Preference Tests ====================

    #[test]
    fn test_saved_preference_wins_over_environment() {
        let resolver = resolver_with(Some("en-US"), true);
        resolver.preferences().set("zh");
        assert_eq!(resolver.resolve(), "zh");
    }

    #[test]
    fn test_saved_preference_is_not_validated() {
        let resolver = resolver_with(Some("en-US"), true);
        resolver.preferences().set("fr");
        assert_eq!(resolver.resolve(), "fr");
    }

    // ==================== Manifest-aware Tests ====================

    #[test]
    fn test_exact_match() {
        assert_eq!(resolver_with(Some("zh"), true).resolve(), "zh");
        assert_eq!(resolver_with(Some("en"), true).resolve(), "en");
    }

    #[test]
    fn test_base_tag_match() {
        assert_eq!(resolver_with(Some("zh-CN"), true).resolve(), "zh");
        assert_eq!(resolver_with(Some("zh-TW"), true).resolve(), "zh");
        assert_eq!(resolver_with(Some("en-GB"), true).resolve(), "en");
    }

    #[test]
    fn test_unsupported_falls_back_to_default() {
        assert_eq!(resolver_with(Some("fr"), true).resolve(), "en");
        assert_eq!(resolver_with(Some("fr-FR"), true).resolve(), "en");
    }

    #[test]
    fn test_manifest_default_is_respected() {
        let manifest = LanguageManifest::new(vec![
            LanguageDescriptor::new("en", "English", "English", false),
            LanguageDescriptor::new("zh", "Chinese", "中文", true),
        ])
        .unwrap();
        assert_eq!(resolve_with_manifest("fr", &manifest), "zh");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = resolver_with(Some("zh-CN"), true);
        let first = resolver.resolve();
        for _ in 0..5 {
            assert_eq!(resolver.resolve(), first);
        }
    }

    // ==================== Degraded Tests ====================

    #[test]
    fn test_degraded_without_manifest() {
        assert_eq!(resolver_with(Some("zh-HK"), false).resolve(), "zh");
        assert_eq!(resolver_with(Some("fr"), false).resolve(), "en");
    }

    #[test]
    fn test_degraded_without_tag() {
        assert_eq!(resolver_with(None, true).resolve(), "en");
        assert_eq!(resolver_with(None, false).resolve(), "en");
    }

    #[test]
    fn test_degraded_is_prefix_only() {
        // "zhx" is not a real tag but passes the prefix test.
        assert_eq!(resolve_degraded("zhx"), "zh");
        assert_eq!(resolve_degraded("ZH"), "en");
    }

    // ==================== Tag Helper Tests ====================

    #[test]
    fn test_base_tag() {
        assert_eq!(base_tag("zh-CN"), "zh");
        assert_eq!(base_tag("zh-Hant-TW"), "zh");
        assert_eq!(base_tag("en"), "en");
        assert_eq!(base_tag(""), "");
    }

    #[test]
    fn test_normalize_posix_locale() {
        assert_eq!(normalize_posix_locale("zh_CN.UTF-8"), Some("zh-CN".to_string()));
        assert_eq!(normalize_posix_locale("en_US@euro"), Some("en-US".to_string()));
        assert_eq!(normalize_posix_locale("de"), Some("de".to_string()));
        assert_eq!(normalize_posix_locale("zh-TW"), Some("zh-TW".to_string()));
    }

    #[test]
    fn test_normalize_posix_locale_without_language() {
        assert_eq!(normalize_posix_locale("C"), None);
        assert_eq!(normalize_posix_locale("C.UTF-8"), None);
        assert_eq!(normalize_posix_locale("POSIX"), None);
        assert_eq!(normalize_posix_locale("???"), None);
    }
}
