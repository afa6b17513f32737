//! Centralized localized strings, keyed by locale and lookup key.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Locale code of the universal fallback table.
pub const FALLBACK_LOCALE: &str = "en";

/// Mapping from locale code to (key -> localized string).
///
/// The English table is expected to be complete; other locales may be
/// partial and fall back to English at lookup time.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    locales: HashMap<String, HashMap<String, String>>,
}

static BUILTIN: OnceLock<TranslationTable> = OnceLock::new();

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the built-in table covering the index, OCR and document pages.
    pub fn builtin() -> &'static TranslationTable {
        BUILTIN.get_or_init(|| {
            let mut table = TranslationTable::new();
            table.extend_locale("en", ENGLISH_STRINGS);
            table.extend_locale("zh", CHINESE_STRINGS);
            table
        })
    }

    /// Add or replace a single entry.
    pub fn insert(&mut self, locale: &str, key: &str, value: &str) {
        self.locales
            .entry(locale.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn extend_locale(&mut self, locale: &str, entries: &[(&str, &str)]) {
        for (key, value) in entries {
            self.insert(locale, key, value);
        }
    }

    /// Look up `key` in `locale` only, without any fallback.
    pub fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.locales
            .get(locale)
            .and_then(|strings| strings.get(key))
            .map(String::as_str)
    }

    /// Look up `key` in `locale`, then in English, then return the key itself.
    /// Empty values count as missing.
    pub fn translate<'a>(&'a self, locale: &str, key: &'a str) -> &'a str {
        self.lookup(locale, key)
            .filter(|value| !value.is_empty())
            .or_else(|| {
                self.lookup(FALLBACK_LOCALE, key)
                    .filter(|value| !value.is_empty())
            })
            .unwrap_or(key)
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Locale codes present in the table, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Keys defined for `locale`, sorted. Empty for an unknown locale.
    pub fn keys(&self, locale: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .locales
            .get(locale)
            .map(|strings| strings.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }
}

// ==================== English Strings ====================

/// English strings (canonical, complete)
pub const ENGLISH_STRINGS: &[(&str, &str)] = &[
    // Index page
    ("main_title", "AI Driven Development"),
    ("clock_subtitle", "Check the current time across different timezones"),
    ("timezone_label", "Timezone:"),
    ("features_title", "Available Features"),
    ("ocr_feature", "OCR - Text Extraction from Images"),
    ("footer_copyright", "© 2025 AI Driven Development"),
    // OCR page
    ("ocr_title", "Easy OCR"),
    ("ocr_subtitle", "Upload an image to extract text"),
    ("mode", "Mode:"),
    ("generic_ocr", "Generic OCR"),
    ("doc_processing", "Document Processing"),
    ("go_document", "Go to dedicated Document Processing page"),
    ("drag_drop", "Drag & drop image here"),
    ("or", "or"),
    ("choose_file", "Choose File"),
    ("paste_image", "Paste image (Cmd/Ctrl+V)"),
    ("process_image", "Process Image"),
    ("extracted_text", "Extracted Text"),
    ("copied", "Copied to clipboard!"),
    // Document page
    ("doc_title", "Document Field Extraction"),
    (
        "doc_subtitle",
        "Upload an ID card, driver's license, or other document to extract structured data",
    ),
    ("switch_generic", "Switch to generic OCR mode"),
    ("drag_drop_doc", "Drag & drop document image here"),
    ("process_document", "Process Document"),
    ("extracted_fields", "Extracted Document Fields"),
    // Upload widget messages
    ("error_not_image", "Please select an image file"),
    ("error_processing", "An error occurred during processing"),
    (
        "error_no_image_attached",
        "The API couldn't process the image properly. Please try a different image or format.",
    ),
];

// ==================== Chinese Strings ====================

pub const CHINESE_STRINGS: &[(&str, &str)] = &[
    // Index page
    ("main_title", "AI 驱动开发"),
    ("clock_subtitle", "查看不同时区的当前时间"),
    ("timezone_label", "时区："),
    ("features_title", "可用功能"),
    ("ocr_feature", "OCR - 从图像中提取文本"),
    ("footer_copyright", "© 2025 AI 驱动开发"),
    // OCR page
    ("ocr_title", "简易 OCR"),
    ("ocr_subtitle", "上传图像以提取文本"),
    ("mode", "模式："),
    ("generic_ocr", "通用 OCR"),
    ("doc_processing", "文档处理"),
    ("go_document", "前往专用文档处理页面"),
    ("drag_drop", "将图像拖放至此"),
    ("or", "或"),
    ("choose_file", "选择文件"),
    ("paste_image", "粘贴图像 (Cmd/Ctrl+V)"),
    ("process_image", "处理图像"),
    ("extracted_text", "提取的文本"),
    ("copied", "已复制到剪贴板！"),
    // Document page
    ("doc_title", "文档字段提取"),
    ("doc_subtitle", "上传身份证、驾照或其他文档以提取结构化数据"),
    ("switch_generic", "切换到通用 OCR 模式"),
    ("drag_drop_doc", "将文档图像拖放至此"),
    ("process_document", "处理文档"),
    ("extracted_fields", "提取的文档字段"),
    // Upload widget messages
    ("error_not_image", "请选择图像文件"),
    ("error_processing", "处理过程中发生错误"),
    ("error_no_image_attached", "API 无法正确处理该图像。请尝试其他图像或格式。"),
];
