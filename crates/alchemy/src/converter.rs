// ABOUTME: The Converter runs detect -> parse -> extract -> sanitize -> assemble for one input.
// ABOUTME: Internal parse/extract failures are logged and re-raised as ConversionFailed here.

use once_cell::sync::Lazy;

use crate::detect::{detect_page_type, PageType};
use crate::dom::source::SourceDocument;
use crate::error::ConvertError;
use crate::extractors::extract_content;
use crate::formats::document::{assemble_document, Assembly};
use crate::formats::sanitize_html;
use crate::options::{ConverterBuilder, Options};
use crate::profile::PageProfile;
use crate::result::NormalizedDocument;

static DEFAULT_CONVERTER: Lazy<Converter> = Lazy::new(|| Converter::new(Options::default()));

/// Converts raw page HTML into a standalone, sanitized document.
///
/// Immutable after construction; share one instance across threads freely.
/// Conversions do no I/O and keep no state between calls.
#[derive(Debug, Clone)]
pub struct Converter {
    opts: Options,
}

impl Converter {
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Detects the page type, then converts with that type's profile.
    pub fn convert(&self, raw_html: &str) -> Result<NormalizedDocument, ConvertError> {
        let page_type = detect_page_type(raw_html);
        tracing::debug!(%page_type, bytes = raw_html.len(), "detected page type");
        self.convert_as(raw_html, page_type)
    }

    /// Converts with an explicitly chosen page type.
    ///
    /// Any parse or extraction failure comes back as a single
    /// `ConversionFailed` error with a generic message; the cause is kept as
    /// its source.
    pub fn convert_as(
        &self,
        raw_html: &str,
        page_type: PageType,
    ) -> Result<NormalizedDocument, ConvertError> {
        let profile = self.opts.profiles.get(page_type);
        run_pipeline(raw_html, profile, self.opts.max_input_bytes).map_err(|err| {
            tracing::error!(%page_type, error = %err, "conversion failed");
            ConvertError::conversion_failed(profile.operation(), err)
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

fn run_pipeline(
    raw_html: &str,
    profile: &PageProfile,
    max_input_bytes: usize,
) -> Result<NormalizedDocument, ConvertError> {
    let doc = SourceDocument::parse(raw_html, max_input_bytes)?;
    let extracted = extract_content(&doc, profile)?;
    let content = sanitize_html(&extracted.markup);

    let title = doc
        .title()
        .unwrap_or(profile.default_title.as_str())
        .to_string();
    let html = assemble_document(&Assembly {
        content: &content,
        title: Some(&title),
        default_title: &profile.default_title,
        inline_styles: doc.inline_styles(),
    });
    tracing::debug!(
        page_type = %profile.page_type,
        content_bytes = content.len(),
        output_bytes = html.len(),
        "assembled document"
    );

    Ok(NormalizedDocument {
        page_type: profile.page_type,
        title,
        html,
    })
}

/// Detects the page type of raw HTML.
pub fn detect(raw_html: &str) -> PageType {
    detect_page_type(raw_html)
}

/// Converts with the built-in profiles and returns the HTML text.
pub fn convert(raw_html: &str, page_type: PageType) -> Result<String, ConvertError> {
    DEFAULT_CONVERTER
        .convert_as(raw_html, page_type)
        .map(NormalizedDocument::into_html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn converter_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
    }

    #[test]
    fn convert_detects_and_uses_type_default_title() {
        let doc = Converter::default()
            .convert(r#"<div class="elementor-section">Hi</div>"#)
            .unwrap();
        assert_eq!(doc.page_type, PageType::Elementor);
        assert_eq!(doc.title, "Converted Elementor Page");
        assert!(doc.html.contains("<title>Converted Elementor Page</title>"));
    }

    #[test]
    fn source_title_wins_over_default() {
        let doc = Converter::default()
            .convert("<title>Landing</title><p>x</p>")
            .unwrap();
        assert_eq!(doc.title, "Landing");
    }

    #[test]
    fn oversized_input_becomes_conversion_failed() {
        let converter = Converter::builder().max_input_bytes(8).build();
        let err = converter
            .convert_as("<p>more than eight bytes</p>", PageType::Ghl)
            .unwrap_err();
        assert!(err.is_conversion_failed());
        assert_eq!(err.root_code(), ErrorCode::Parse);
        assert_eq!(err.to_string(), "Failed to convert GHL page");
    }

    #[test]
    fn broken_profile_becomes_conversion_failed() {
        let mut profile = PageProfile::generic();
        profile.blocklist.push("a[".to_string());
        let converter = Converter::builder().profile(profile).build();
        let err = converter.convert_as("<p>x</p>", PageType::Generic).unwrap_err();
        assert_eq!(err.root_code(), ErrorCode::Extract);
        assert_eq!(err.to_string(), "Failed to parse HTML content");
    }

    #[test]
    fn free_function_returns_html_text() {
        let html = convert("<p>Hello</p>", PageType::Generic).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p>Hello</p>"));
        assert_eq!(detect("<p>Hello</p>"), PageType::Generic);
    }

    #[test]
    fn deeply_nested_builder_section_converts() {
        const DEPTH: usize = 20_000;
        let raw = format!(
            "<div class=\"section\">{}deep{}</div>",
            "<div>".repeat(DEPTH),
            "</div>".repeat(DEPTH)
        );
        // Main-thread stack size, as in the CLI.
        let handle = std::thread::Builder::new()
            .stack_size(8 * 1024 * 1024)
            .spawn(move || Converter::default().convert_as(&raw, PageType::Ghl))
            .unwrap();
        let doc = handle.join().unwrap().unwrap();
        assert!(doc.html.contains("deep"));
    }
}
