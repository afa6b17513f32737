//! Easy OCR command-line client
//!
//! Usage:
//!   easy-ocr ocr <image|data-url> [--document] [--base64]
//!   easy-ocr lang [<code>]
//!   easy-ocr clock [<offset>] [--watch]
//!   easy-ocr strings
//!
//! Optional environment variables:
//! - OCR_API_URL (defaults to http://localhost:8080)
//! - OCR_CONNECT_TIMEOUT_SECS (defaults to 30)
//! - OCR_REQUEST_TIMEOUT_SECS (defaults to 60)
//! - PREFERENCE_FILE (defaults to data/preferences.json)

use anyhow::{bail, Context, Result};
use easy_ocr_client::clock;
use easy_ocr_client::config::Config;
use easy_ocr_client::i18n::{
    Document, FileStore, LanguageManifest, Localizer, PreferenceStore, SystemLanguage,
    TranslationTable, TranslationValidator,
};
use easy_ocr_client::ocr::{Encoding, ImagePayload, OcrClient, OcrMode};
use easy_ocr_client::upload::{ResultView, UploadController};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const USAGE: &str = "Usage:
  easy-ocr ocr <image|data-url> [--document] [--base64]
  easy-ocr lang [<code>]
  easy-ocr clock [<offset>] [--watch]
  easy-ocr strings";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so results can be piped
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("easy_ocr_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let preferences = PreferenceStore::new(Arc::new(FileStore::new(&config.preference_file)));
    let localizer = Arc::new(Localizer::builtin(preferences, Arc::new(SystemLanguage)));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let rest = args.get(1..).unwrap_or_default();

    match args.first().map(String::as_str) {
        Some("ocr") => run_ocr(&config, localizer, rest).await,
        Some("lang") => run_lang(&localizer, rest.first().map(String::as_str)),
        Some("clock") => run_clock(rest).await,
        Some("strings") => run_strings(),
        _ => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

async fn run_ocr(config: &Config, localizer: Arc<Localizer>, args: &[String]) -> Result<()> {
    let target = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .context("missing image path or data URL")?;
    let mode = if args.iter().any(|arg| arg == "--document") {
        OcrMode::Document
    } else {
        OcrMode::Generic
    };
    let force_base64 = args.iter().any(|arg| arg == "--base64");

    let client = OcrClient::new(config)?;
    let mut upload = UploadController::new(Arc::clone(&localizer), mode);

    if target.starts_with("data:") {
        if !upload.paste(target) {
            bail!("{}", localizer.translate("error_not_image"));
        }
    } else {
        let payload = ImagePayload::from_path(target).await?;
        upload.select_file(payload)?;
    }

    if force_base64 {
        let ticket = upload.begin_with(Encoding::Base64)?;
        let result = client.process(&ticket.payload, mode, ticket.encoding).await;
        upload.complete(ticket, result);
    } else {
        upload.submit(&client).await?;
    }

    let heading = match mode {
        OcrMode::Generic => "extracted_text",
        OcrMode::Document => "extracted_fields",
    };

    match upload.view() {
        ResultView::Json(json) => {
            println!("{}", localizer.translate(heading));
            println!("{}", json);
            Ok(())
        }
        ResultView::Error(message) => bail!("{}", message),
        ResultView::Hidden => Ok(()),
    }
}

fn run_lang(localizer: &Localizer, code: Option<&str>) -> Result<()> {
    let mut page = Document::ocr_page();

    let session = match code {
        Some(code) => {
            let manifest = LanguageManifest::builtin();
            if !manifest.is_supported(code) {
                let supported: Vec<&str> =
                    manifest.languages().iter().map(|l| l.code.as_str()).collect();
                bail!("Unsupported language '{}'. Available: {}", code, supported.join(", "));
            }
            localizer.switch_language(code, &mut page)
        }
        None => localizer.init_language(&mut page),
    };

    println!("{} {}", localizer.translate_for(&session, "mode"), session.locale());
    for element in &page.elements {
        if !element.text.is_empty() {
            println!("  {}", element.text);
        }
    }
    if let Some(toggle) = &page.toggle {
        println!("[{}] -> {}", toggle.label, toggle.target);
    }
    Ok(())
}

async fn run_clock(args: &[String]) -> Result<()> {
    let offset = match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(value) => clock::parse_offset(value)?,
        None => 0.0,
    };
    let watch = args.iter().any(|arg| arg == "--watch");

    let reading = clock::render_now(offset)?;
    println!("{}  {}  ({})", reading.time, reading.date, clock::offset_label(offset));

    if !watch {
        return Ok(());
    }

    info!("Watching clock at {}", clock::offset_label(offset));
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let reading = clock::render_now(offset)?;
                println!("{}  {}", reading.time, reading.date);
            }
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

fn run_strings() -> Result<()> {
    let report =
        TranslationValidator::validate(TranslationTable::builtin(), LanguageManifest::builtin());

    for warning in &report.warnings {
        println!("warning: {}", warning);
    }
    for error in &report.errors {
        println!("error: {}", error);
    }

    if report.has_errors() {
        bail!("translation table has {} errors", report.errors.len());
    }
    println!("Translation table OK");
    Ok(())
}
