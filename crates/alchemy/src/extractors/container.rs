// ABOUTME: First-container strategy for pages with no recognized builder.
// ABOUTME: Blocklisted chrome is skipped, then the first candidate container with text wins.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::{ElementRef, Selector};

use super::{body_markup, ExtractedContent, Tier};
use crate::dom::compile_selectors;
use crate::dom::serialize::{has_visible_text, inner_html, Filter};
use crate::dom::source::SourceDocument;
use crate::error::ConvertError;
use crate::formats::document::BASELINE_CSS;
use crate::profile::PageProfile;

/// Extracts generic content.
///
/// A document this crate assembled is recognised by its baseline stylesheet
/// and lone `body > div.container` wrapper. The wrapper's inner markup is
/// taken as is, so a second conversion keeps the first one's content. Otherwise candidates
/// are tried in profile order (most specific first). Within a
/// candidate selector the first element in document order with visible text
/// wins, and only its inner markup is used. Blocklisted elements never
/// contribute text or markup. With no candidate, the filtered body is used,
/// and the raw body if filtering left nothing.
pub fn extract(doc: &SourceDocument, profile: &PageProfile) -> Result<ExtractedContent, ConvertError> {
    let blocklist = compile_selectors(&profile.blocklist)?;
    let candidates = compile_selectors(&profile.fallback_selectors)?;

    if let Some(wrapper) = assembled_wrapper(doc) {
        let keep_all = Filter {
            skip: None,
            strip_attrs: &profile.attributes_to_strip,
        };
        tracing::debug!("selected assembled wrapper");
        return Ok(ExtractedContent {
            markup: inner_html(wrapper, &keep_all),
            tier: Tier::Fallback,
        });
    }

    let skip = blocked_nodes(doc, &blocklist);
    let filter = Filter {
        skip: Some(&skip),
        strip_attrs: &profile.attributes_to_strip,
    };

    for selector in &candidates {
        let found = doc
            .html()
            .select(selector)
            .filter(|el| !is_inside_skipped(el, &skip))
            .find(|el| has_visible_text(**el, &filter));
        if let Some(el) = found {
            tracing::debug!(candidate = ?selector, "selected content container");
            return Ok(ExtractedContent {
                markup: inner_html(el, &filter),
                tier: Tier::Fallback,
            });
        }
    }

    let filtered = body_markup(doc, &filter);
    if !filtered.trim().is_empty() {
        return Ok(ExtractedContent {
            markup: filtered,
            tier: Tier::Body,
        });
    }

    let unfiltered = Filter {
        skip: None,
        strip_attrs: &profile.attributes_to_strip,
    };
    Ok(ExtractedContent {
        markup: body_markup(doc, &unfiltered),
        tier: Tier::Body,
    })
}

/// The `<div class="container">` the document assembler writes, when the
/// baseline stylesheet is present and the wrapper is the body's only
/// element child with no other attributes.
fn assembled_wrapper(doc: &SourceDocument) -> Option<ElementRef<'_>> {
    let baseline = BASELINE_CSS.trim();
    if !doc.inline_styles().iter().any(|css| css.contains(baseline)) {
        return None;
    }
    let body = doc.body()?;
    let mut children = body.children().filter_map(ElementRef::wrap);
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    let el = only.value();
    let is_wrapper = el.name() == "div"
        && el.attr("class") == Some("container")
        && el.attrs().count() == 1;
    is_wrapper.then_some(only)
}

/// Ids of every element matching the blocklist.
fn blocked_nodes(doc: &SourceDocument, blocklist: &[Selector]) -> HashSet<NodeId> {
    doc.select_any(blocklist).iter().map(|el| el.id()).collect()
}

fn is_inside_skipped(el: &scraper::ElementRef, skip: &HashSet<NodeId>) -> bool {
    skip.contains(&el.id()) || el.ancestors().any(|a| skip.contains(&a.id()))
}
