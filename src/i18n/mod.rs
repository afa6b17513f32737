//! Internationalization (i18n) module for multi-language support.
//!
//! All language-related logic, localized strings, and preference handling
//! is contained here.
//!
//! # Architecture
//!
//! - `manifest`: Single source of truth for supported languages and the default
//! - `strings`: Translation table (locale -> key -> string) with English fallback
//! - `preference`: Persisted language choice over an opaque key-value store
//! - `resolver`: Effective locale from preference, environment tag and manifest
//! - `document`: The marked elements and toggle control the localizer writes to
//! - `localizer`: Lookup, document application and language switching
//! - `validator`: Translation table consistency checks
//!
//! # Example
//!
//! ```rust,ignore
//! use easy_ocr_client::i18n::{Document, Localizer, PreferenceStore, SystemLanguage};
//!
//! let localizer = Localizer::builtin(PreferenceStore::in_memory(), Arc::new(SystemLanguage));
//! let mut page = Document::ocr_page();
//! let session = localizer.init_language(&mut page);
//! let session = localizer.switch_language("zh", &mut page);
//! ```

mod document;
mod localizer;
mod manifest;
mod preference;
mod resolver;
pub mod strings;
mod validator;

pub use document::{Document, Element, ElementKind, LanguageToggle};
pub use localizer::{LocaleChanged, LocaleSession, Localizer};
pub use manifest::{LanguageDescriptor, LanguageManifest, ManifestError};
pub use preference::{
    FileStore, KeyValueStore, MemoryStore, PreferenceStore, StoreError, PREFERENCE_KEY,
};
pub use resolver::{
    base_tag, normalize_posix_locale, FixedLanguage, LanguageSource, LocaleResolver,
    SystemLanguage,
};
pub use strings::TranslationTable;
pub use validator::{TranslationValidator, ValidationReport};
