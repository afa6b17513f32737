//! In-memory model of the page elements the localizer writes to.

/// What an element is, as far as localization cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `<input type="button">` or `<input type="submit">`
    InputButton,
    /// Any other `<input>`
    Input,
    Button,
    /// Headings, paragraphs, labels, spans...
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: Option<String>,
    pub kind: ElementKind,
    /// Value of the `data-i18n` marker; presence opts the element in.
    pub i18n_key: Option<String>,
    pub placeholder: Option<String>,
    pub value: Option<String>,
    pub text: String,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: None,
            kind,
            i18n_key: None,
            placeholder: None,
            value: None,
            text: String::new(),
        }
    }

    /// Generic element marked with `key`.
    pub fn text(key: &str) -> Self {
        Self::new(ElementKind::Generic).with_key(key)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.i18n_key = Some(key.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }
}

/// The language toggle button. Clicking it switches to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageToggle {
    pub label: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub elements: Vec<Element>,
    pub toggle: Option<LanguageToggle>,
}

impl Document {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements,
            toggle: None,
        }
    }

    /// Elements carrying a localization marker.
    pub fn marked_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut().filter(|el| el.i18n_key.is_some())
    }

    pub fn by_id(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id.as_deref() == Some(id))
    }

    /// Elements of the OCR page, marked the same way as the original markup.
    pub fn ocr_page() -> Self {
        Self::new(vec![
            Element::text("ocr_title").with_id("title"),
            Element::text("ocr_subtitle"),
            Element::text("mode"),
            Element::text("generic_ocr"),
            Element::text("doc_processing"),
            Element::text("go_document"),
            Element::text("drag_drop").with_id("drop-area"),
            Element::text("or"),
            Element::new(ElementKind::Button)
                .with_id("choose-file")
                .with_key("choose_file"),
            Element::new(ElementKind::Input)
                .with_id("paste-input")
                .with_key("paste_image")
                .with_placeholder("Paste image (Cmd/Ctrl+V)"),
            Element::new(ElementKind::Button)
                .with_id("process-btn")
                .with_key("process_image"),
            Element::text("extracted_text"),
            Element::text("copied").with_id("copy-notification"),
            Element::new(ElementKind::Generic)
                .with_id("result-json")
                .with_text(""),
        ])
    }
}
