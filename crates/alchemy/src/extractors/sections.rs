// ABOUTME: Sections strategy for page-builder output (Elementor, GoHighLevel).
// ABOUTME: Builder sections, else fallback containers, else the body; builder attributes stripped.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::ElementRef;

use super::{body_markup, ExtractedContent, Tier};
use crate::dom::compile_selectors;
use crate::dom::serialize::{outer_html, Filter};
use crate::dom::source::SourceDocument;
use crate::error::ConvertError;
use crate::profile::PageProfile;

/// Extracts builder content in three tiers.
///
/// 1. Every element matching a builder selector, outer markup concatenated in
///    document order. When builder sections exist this tier is final, falling
///    straight to the body if their markup is blank.
/// 2. Otherwise every fallback container, concatenated the same way.
/// 3. The body markup when the chosen tier produced only whitespace.
///
/// Navigation and headers are kept; only the profile's attributes are
/// stripped, on every tier.
pub fn extract(doc: &SourceDocument, profile: &PageProfile) -> Result<ExtractedContent, ConvertError> {
    let builder = compile_selectors(&profile.builder_selectors)?;
    let fallback = compile_selectors(&profile.fallback_selectors)?;
    let filter = Filter {
        skip: None,
        strip_attrs: &profile.attributes_to_strip,
    };

    let sections = outermost(doc.select_any(&builder));
    let (markup, tier) = if !sections.is_empty() {
        (concat_outer(&sections, &filter), Tier::Builder)
    } else {
        let containers = outermost(doc.select_any(&fallback));
        (concat_outer(&containers, &filter), Tier::Fallback)
    };

    if !markup.trim().is_empty() {
        return Ok(ExtractedContent { markup, tier });
    }

    Ok(ExtractedContent {
        markup: body_markup(doc, &filter),
        tier: Tier::Body,
    })
}

/// Drops matches nested inside an earlier match; their markup is already
/// part of the ancestor's.
fn outermost(matches: Vec<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
    let mut kept: HashSet<NodeId> = HashSet::new();
    let mut result = Vec::with_capacity(matches.len());
    for el in matches {
        if el.ancestors().any(|a| kept.contains(&a.id())) {
            continue;
        }
        kept.insert(el.id());
        result.push(el);
    }
    result
}

fn concat_outer(elements: &[ElementRef<'_>], filter: &Filter) -> String {
    elements
        .iter()
        .map(|el| outer_html(*el, filter))
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LIMIT: usize = 10 * 1024 * 1024;

    fn run(raw: &str, profile: &PageProfile) -> ExtractedContent {
        let doc = SourceDocument::parse(raw, LIMIT).unwrap();
        extract(&doc, profile).unwrap()
    }

    #[test]
    fn elementor_section_loses_builder_attributes() {
        let out = run(
            r#"<div class="elementor-section" data-elementor-id="5">Hi</div>"#,
            &PageProfile::elementor(),
        );
        assert_eq!(out.tier, Tier::Builder);
        assert_eq!(out.markup, r#"<div class="elementor-section">Hi</div>"#);
    }

    #[test]
    fn sections_concatenate_in_document_order() {
        let raw = r#"
            <div class="elementor-section" data-elementor-type="wp-page"><h1>One</h1></div>
            <p>between</p>
            <section class="elementor-section" data-id="abc"><p>Two</p></section>"#;
        let out = run(raw, &PageProfile::elementor());
        assert_eq!(
            out.markup,
            r#"<div class="elementor-section"><h1>One</h1></div><section class="elementor-section"><p>Two</p></section>"#
        );
    }

    #[test]
    fn nested_containers_are_not_duplicated() {
        let raw = r#"<section class="elementor-section"><div class="elementor-container"><p>Once</p></div></section>"#;
        let out = run(raw, &PageProfile::elementor());
        assert_eq!(out.markup.matches("Once").count(), 1);
    }

    #[test]
    fn builder_pages_keep_navigation() {
        let raw = r#"<div class="section"><nav>Menu</nav><p>Body</p></div>"#;
        let out = run(raw, &PageProfile::ghl());
        assert!(out.markup.contains("<nav>Menu</nav>"));
    }

    #[test]
    fn ghl_strips_block_attributes_from_descendants() {
        let raw = r#"<div class="section" data-block-id="s1"><div data-block-id="b2" data-block-type="text">Text</div></div>"#;
        let out = run(raw, &PageProfile::ghl());
        assert_eq!(out.markup, r#"<div class="section"><div>Text</div></div>"#);
    }

    #[test]
    fn falls_back_to_content_containers() {
        let raw = r#"<header>Top</header><main><p>Main</p></main><article><p>Story</p></article>"#;
        let out = run(raw, &PageProfile::elementor());
        assert_eq!(out.tier, Tier::Fallback);
        assert_eq!(
            out.markup,
            "<main><p>Main</p></main><article><p>Story</p></article>"
        );
    }

    #[test]
    fn falls_back_to_body_when_nothing_matches() {
        let out = run("<p>Just text</p>", &PageProfile::ghl());
        assert_eq!(out.tier, Tier::Body);
        assert_eq!(out.markup, "<p>Just text</p>");
    }

    #[test]
    fn blank_sections_fall_back_to_body() {
        let out = run(
            r#"<div class="elementor-section">   </div><p>Elsewhere</p>"#,
            &PageProfile::elementor(),
        );
        assert_eq!(out.tier, Tier::Body);
        assert!(out.markup.contains("Elsewhere"));
    }

    #[test]
    fn empty_input_yields_empty_body() {
        let out = run("", &PageProfile::elementor());
        assert_eq!(out.tier, Tier::Body);
        assert_eq!(out.markup, "");
    }

    #[test]
    fn invalid_profile_selector_is_an_extract_error() {
        let mut profile = PageProfile::ghl();
        profile.builder_selectors = vec!["div[".to_string()];
        let doc = SourceDocument::parse("<p>x</p>", LIMIT).unwrap();
        let err = extract(&doc, &profile).unwrap_err();
        assert!(err.is_extract());
    }
}
