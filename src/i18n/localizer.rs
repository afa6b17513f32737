//! Translation lookup and document localization.
//!
//! The localizer owns the translation table and a [`LocaleResolver`]. The
//! effective locale is carried between operations as a [`LocaleSession`]
//! instead of being re-read from the preference store mid-operation.

use crate::i18n::{
    Document, ElementKind, LanguageManifest, LanguageSource, LanguageToggle, LocaleResolver,
    PreferenceStore, TranslationTable,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Capacity of the locale-changed channel; slow subscribers see `Lagged`.
const EVENT_CAPACITY: usize = 16;

/// The locale in effect for a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSession {
    locale: String,
}

impl LocaleSession {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

/// Notification emitted after a document has been localized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChanged {
    pub language: String,
}

pub struct Localizer {
    table: Arc<TranslationTable>,
    resolver: LocaleResolver,
    events: broadcast::Sender<LocaleChanged>,
}

impl Localizer {
    pub fn new(table: Arc<TranslationTable>, resolver: LocaleResolver) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            table,
            resolver,
            events,
        }
    }

    /// Localizer over the built-in manifest and translation table.
    pub fn builtin(preferences: PreferenceStore, source: Arc<dyn LanguageSource>) -> Self {
        let manifest = Arc::new(LanguageManifest::builtin().clone());
        Self::new(
            Arc::new(TranslationTable::builtin().clone()),
            LocaleResolver::new(preferences, source, Some(manifest)),
        )
    }

    pub fn resolver(&self) -> &LocaleResolver {
        &self.resolver
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Subscribe to locale-changed notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<LocaleChanged> {
        self.events.subscribe()
    }

    /// Resolve the effective locale now.
    pub fn session(&self) -> LocaleSession {
        LocaleSession::new(&self.resolver.resolve())
    }

    /// Translate `key` in the freshly resolved locale.
    pub fn translate(&self, key: &str) -> String {
        self.translate_in(&self.resolver.resolve(), key)
    }

    pub fn translate_for(&self, session: &LocaleSession, key: &str) -> String {
        self.translate_in(session.locale(), key)
    }

    /// Locale value, then English, then the key itself. Never fails.
    pub fn translate_in(&self, locale: &str, key: &str) -> String {
        self.table.translate(locale, key).to_string()
    }

    /// Write translations into every marked element, then notify subscribers.
    ///
    /// Elements take the locale's own value or the raw key; the English
    /// fallback of [`translate`](Self::translate) is not applied here.
    pub fn apply_to_document(&self, session: &LocaleSession, doc: &mut Document) {
        let locale = session.locale();
        let mut applied = 0usize;

        for element in doc.marked_mut() {
            let Some(key) = element.i18n_key.clone().filter(|key| !key.is_empty()) else {
                continue;
            };
            let text = self
                .table
                .lookup(locale, &key)
                .filter(|value| !value.is_empty())
                .unwrap_or(key.as_str())
                .to_string();

            if element.placeholder.is_some() {
                element.placeholder = Some(text);
            } else if element.kind == ElementKind::InputButton {
                element.value = Some(text);
            } else {
                element.text = text;
            }
            applied += 1;
        }

        debug!("Applied '{}' to {} elements", locale, applied);

        // No subscribers is not an error.
        let _ = self.events.send(LocaleChanged {
            language: locale.to_string(),
        });
    }

    /// Point the toggle at the language after `session`'s one.
    pub fn render_toggle(&self, session: &LocaleSession, doc: &mut Document) {
        let current = session.locale();
        let toggle = match self.resolver.manifest() {
            Some(manifest) => {
                let next = manifest.next_after(current);
                LanguageToggle {
                    label: next.native_name.clone(),
                    target: next.code.clone(),
                }
            }
            None if current == "en" => LanguageToggle {
                label: "中文".to_string(),
                target: "zh".to_string(),
            },
            None => LanguageToggle {
                label: "English".to_string(),
                target: "en".to_string(),
            },
        };
        doc.toggle = Some(toggle);
    }

    /// Page-load entry point: resolve, apply, render the toggle.
    pub fn init_language(&self, doc: &mut Document) -> LocaleSession {
        let session = self.session();
        info!("Initializing language '{}'", session.locale());
        self.apply_to_document(&session, doc);
        self.render_toggle(&session, doc);
        session
    }

    /// Persist `code`, re-apply translations and re-render the toggle.
    pub fn switch_language(&self, code: &str, doc: &mut Document) -> LocaleSession {
        info!("Switching language to '{}'", code);
        self.resolver.preferences().set(code);
        let session = LocaleSession::new(code);
        self.apply_to_document(&session, doc);
        self.render_toggle(&session, doc);
        session
    }

    /// Act on a toggle click. Returns `None` if the document has no toggle.
    pub fn click_toggle(&self, doc: &mut Document) -> Option<LocaleSession> {
        let target = doc.toggle.as_ref()?.target.clone();
        Some(self.switch_language(&target, doc))
    }
}
