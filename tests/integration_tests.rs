//! Integration tests for the Easy OCR client
//!
//! These tests exercise the localization core end to end (preference store,
//! resolver, localizer, document) and drive the upload controller against a
//! mocked OCR API.

use easy_ocr_client::config::Config;
use easy_ocr_client::i18n::{
    Document, FileStore, FixedLanguage, KeyValueStore, LanguageManifest, LanguageSource,
    Localizer, PreferenceStore, SystemLanguage, TranslationTable, PREFERENCE_KEY,
};
use easy_ocr_client::ocr::{Encoding, ImagePayload, OcrClient, OcrMode, OcrOutcome};
use easy_ocr_client::upload::{Completion, ResultView, UploadController, UploadState};
use proptest::prelude::*;
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::{
    matchers::{body_json, body_string_contains, header_regex, method, path},
    Mock, MockServer, ResponseTemplate,
};

// ==================== Test Helpers ====================

fn localizer_with(tag: Option<&str>) -> Localizer {
    Localizer::builtin(
        PreferenceStore::in_memory(),
        Arc::new(FixedLanguage(tag.map(str::to_string))),
    )
}

fn test_config(server: &MockServer) -> Config {
    Config {
        ocr_api_url: server.uri(),
        ..Config::default()
    }
}

fn png() -> ImagePayload {
    ImagePayload::new("scan.png", "image/png", b"fake png bytes".to_vec())
}

fn english_keys() -> Vec<String> {
    TranslationTable::builtin()
        .keys("en")
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ==================== Localization Properties ====================

proptest! {
    #[test]
    fn prop_known_keys_translate_to_non_empty(
        idx in 0usize..64,
        locale_idx in 0usize..2,
    ) {
        let keys = english_keys();
        let key = &keys[idx % keys.len()];
        let manifest = LanguageManifest::builtin();
        let locale = &manifest.languages()[locale_idx % manifest.languages().len()].code;

        let localizer = localizer_with(Some("en"));
        let text = localizer.translate_in(locale, key);
        prop_assert!(!text.is_empty());
    }

    #[test]
    fn prop_unknown_keys_translate_to_themselves(
        key in "[a-z_]{1,24}",
        locale in prop::sample::select(vec!["en", "zh", "fr"]),
    ) {
        let table = TranslationTable::builtin();
        prop_assume!(table.lookup("en", &key).is_none());
        prop_assume!(table.lookup("zh", &key).is_none());

        let localizer = localizer_with(Some("en"));
        prop_assert_eq!(localizer.translate_in(locale, &key), key);
    }

    #[test]
    fn prop_resolve_is_idempotent(tag in "[a-z]{2}(-[A-Z]{2})?") {
        let localizer = localizer_with(Some(&tag));
        let first = localizer.resolver().resolve();
        prop_assert_eq!(localizer.resolver().resolve(), first);
    }
}

// ==================== Resolution Tests ====================

#[test]
fn test_stored_preference_beats_browser_language() {
    let localizer = localizer_with(Some("en-US"));
    localizer.resolver().preferences().set("zh");
    assert_eq!(localizer.resolver().resolve(), "zh");
}

#[test]
fn test_browser_base_tag_match() {
    assert_eq!(localizer_with(Some("zh-CN")).resolver().resolve(), "zh");
}

#[test]
fn test_unsupported_browser_language_uses_default() {
    assert_eq!(localizer_with(Some("fr")).resolver().resolve(), "en");
}

#[test]
fn test_manifest_support_checks() {
    let manifest = LanguageManifest::builtin();
    assert!(manifest.is_supported("en"));
    assert!(!manifest.is_supported("xx"));
}

#[test]
fn test_switch_language_then_resolve() {
    let localizer = localizer_with(Some("en"));
    let mut page = Document::ocr_page();
    localizer.init_language(&mut page);

    localizer.switch_language("zh", &mut page);

    assert_eq!(localizer.resolver().resolve(), "zh");
    assert_eq!(page.toggle.as_ref().unwrap().target, "en");
}

// ==================== End-to-End Page Tests ====================

#[test]
fn test_page_load_with_traditional_chinese_browser() {
    let localizer = localizer_with(Some("zh-TW"));
    let mut rx = localizer.subscribe();
    let mut page = Document::ocr_page();

    let session = localizer.init_language(&mut page);

    assert_eq!(session.locale(), "zh");
    for element in &page.elements {
        let Some(key) = element.i18n_key.as_deref() else {
            continue;
        };
        let expected = TranslationTable::builtin().lookup("zh", key).unwrap();
        let shown = element
            .placeholder
            .as_deref()
            .or(element.value.as_deref())
            .unwrap_or(&element.text);
        assert_eq!(shown, expected, "element '{}' not localized", key);
    }
    assert_eq!(page.toggle.as_ref().unwrap().label, "English");
    assert_eq!(rx.try_recv().unwrap().language, "zh");
}

#[test]
fn test_preference_survives_restart_via_file_store() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("prefs.json");

    {
        let localizer = Localizer::builtin(
            PreferenceStore::new(Arc::new(FileStore::new(&path))),
            Arc::new(FixedLanguage::new("en-US")),
        );
        let mut page = Document::ocr_page();
        localizer.init_language(&mut page);
        localizer.switch_language("zh", &mut page);
    }

    let store = FileStore::new(&path);
    assert_eq!(store.get(PREFERENCE_KEY), Some("zh".to_string()));

    let localizer = Localizer::builtin(
        PreferenceStore::new(Arc::new(store)),
        Arc::new(FixedLanguage::new("en-US")),
    );
    let mut page = Document::ocr_page();
    let session = localizer.init_language(&mut page);
    assert_eq!(session.locale(), "zh");
    assert_eq!(page.by_id("title").unwrap().text, "简易 OCR");
}

// ==================== Environment Language Tests ====================

fn clear_locale_env() {
    for var in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_system_language_reads_lang() {
    clear_locale_env();
    std::env::set_var("LANG", "zh_CN.UTF-8");
    let tag = SystemLanguage.language_tag();
    clear_locale_env();
    assert_eq!(tag, Some("zh-CN".to_string()));
}

#[test]
#[serial]
fn test_system_language_lc_all_wins() {
    clear_locale_env();
    std::env::set_var("LANG", "en_US.UTF-8");
    std::env::set_var("LC_ALL", "zh_TW.UTF-8");
    let tag = SystemLanguage.language_tag();
    clear_locale_env();
    assert_eq!(tag, Some("zh-TW".to_string()));
}

#[test]
#[serial]
fn test_system_language_c_locale_degrades_to_english() {
    clear_locale_env();
    std::env::set_var("LANG", "C.UTF-8");
    let localizer = Localizer::builtin(PreferenceStore::in_memory(), Arc::new(SystemLanguage));
    let resolved = localizer.resolver().resolve();
    clear_locale_env();
    assert_eq!(resolved, "en");
}

// ==================== OCR API Tests ====================

#[tokio::test]
async fn test_multipart_generic_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ocr/process"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"image\""))
        .and(body_string_contains("fake png bytes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"extracted_text": "Hello world"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = OcrClient::new(&test_config(&server)).unwrap();
    let outcome = client
        .process(&png(), OcrMode::Generic, Encoding::Multipart)
        .await
        .unwrap();

    assert_eq!(outcome.extracted_text(), Some("Hello world"));
}

#[tokio::test]
async fn test_base64_document_upload() {
    let server = MockServer::start().await;
    let payload = png();
    Mock::given(method("POST"))
        .and(path("/api/ocr/document-base64"))
        .and(body_json(serde_json::json!({"image": payload.to_data_url()})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"name": "Jane Doe", "id_number": "A1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = OcrClient::new(&test_config(&server)).unwrap();
    let outcome = client
        .process(&payload, OcrMode::Document, Encoding::Base64)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        OcrOutcome::Success(serde_json::json!({"name": "Jane Doe", "id_number": "A1"}))
    );
}

#[tokio::test]
async fn test_controller_renders_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ocr/document"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "Jane"})),
        )
        .mount(&server)
        .await;

    let client = OcrClient::new(&test_config(&server)).unwrap();
    let mut upload =
        UploadController::new(Arc::new(localizer_with(Some("en"))), OcrMode::Document);
    upload.select_file(png()).unwrap();

    let completion = upload.submit(&client).await.unwrap();

    assert_eq!(completion, Completion::Applied);
    assert_eq!(upload.state(), &UploadState::Idle);
    assert_eq!(
        upload.view(),
        &ResultView::Json("{\n  \"name\": \"Jane\"\n}".to_string())
    );
}

#[tokio::test]
async fn test_controller_server_error_is_generic_and_localized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ocr/process-base64"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = OcrClient::new(&test_config(&server)).unwrap();
    let mut upload = UploadController::new(Arc::new(localizer_with(Some("zh"))), OcrMode::Generic);
    assert!(upload.paste(&png().to_data_url()));

    upload.submit(&client).await.unwrap();

    match upload.view() {
        ResultView::Error(message) => {
            assert!(message.starts_with("处理过程中发生错误"));
            assert!(message.contains("500"));
        }
        other => panic!("unexpected view {:?}", other),
    }
    assert!(upload.can_process());
}

#[tokio::test]
async fn test_controller_error_field_shown_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ocr/process"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"error": "No text could be extracted from the image"})),
        )
        .mount(&server)
        .await;

    let client = OcrClient::new(&test_config(&server)).unwrap();
    let mut upload = UploadController::new(Arc::new(localizer_with(Some("en"))), OcrMode::Generic);
    upload.select_file(png()).unwrap();
    upload.submit(&client).await.unwrap();

    assert_eq!(
        upload.view(),
        &ResultView::Error("No text could be extracted from the image".to_string())
    );
}

#[tokio::test]
async fn test_controller_no_image_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ocr/process"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "extracted_text": "I'm sorry, but there's no image attached to your message."
        })))
        .mount(&server)
        .await;

    let client = OcrClient::new(&test_config(&server)).unwrap();
    let mut upload = UploadController::new(Arc::new(localizer_with(Some("en"))), OcrMode::Generic);
    upload.select_file(png()).unwrap();
    upload.submit(&client).await.unwrap();

    assert_eq!(
        upload.view(),
        &ResultView::Error(
            "The API couldn't process the image properly. Please try a different image or format."
                .to_string()
        )
    );
}

#[tokio::test]
async fn test_stale_response_does_not_overwrite_reset_widget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ocr/process"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"extracted_text": "old"})),
        )
        .mount(&server)
        .await;

    let client = OcrClient::new(&test_config(&server)).unwrap();
    let mut upload = UploadController::new(Arc::new(localizer_with(Some("en"))), OcrMode::Generic);
    upload.select_file(png()).unwrap();

    let ticket = upload.begin().unwrap();
    let result = client
        .process(&ticket.payload, OcrMode::Generic, ticket.encoding)
        .await;
    upload.clear();

    assert_eq!(upload.complete(ticket, result), Completion::Discarded);
    assert_eq!(upload.view(), &ResultView::Hidden);
}
