// ABOUTME: Content extraction for builder and generic pages, driven by PageProfile records.
// ABOUTME: Dispatches to the sections strategy or the first-container strategy.

//! Content extraction module.
//!
//! Given a parsed [`SourceDocument`] and the [`PageProfile`] for its page
//! type, pick the markup that represents the page's real content.
//!
//! Submodules:
//! - `sections`: builder pages; every builder section, then every fallback
//!   container, then the body.
//! - `container`: generic pages; blocklist first, then the first candidate
//!   container with visible text, then the body.

pub mod container;
pub mod sections;

use crate::dom::serialize::{inner_html, Filter};
use crate::dom::source::SourceDocument;
use crate::error::ConvertError;
use crate::profile::{ExtractionStrategy, PageProfile};

/// Where the extracted markup came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Builder,
    Fallback,
    Body,
}

/// The markup chosen to represent a page's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub markup: String,
    pub tier: Tier,
}

/// Extracts content from a document according to the profile's strategy.
pub fn extract_content(
    doc: &SourceDocument,
    profile: &PageProfile,
) -> Result<ExtractedContent, ConvertError> {
    let extracted = match profile.strategy {
        ExtractionStrategy::Sections => sections::extract(doc, profile)?,
        ExtractionStrategy::FirstContainer => container::extract(doc, profile)?,
    };
    tracing::debug!(
        page_type = %profile.page_type,
        tier = ?extracted.tier,
        bytes = extracted.markup.len(),
        "extracted content"
    );
    Ok(extracted)
}

/// Body markup, written through the given filter.
pub(crate) fn body_markup(doc: &SourceDocument, filter: &Filter) -> String {
    doc.body()
        .map(|body| inner_html(body, filter))
        .unwrap_or_default()
}
