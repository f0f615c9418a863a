// ABOUTME: Per-page-type extraction profiles and the registry that holds them.
// ABOUTME: Built-in Elementor, GHL and generic profiles plus JSON overrides via serde.

//! Extraction profiles.
//!
//! One conversion pipeline serves every page type; what differs between
//! Elementor, GoHighLevel and generic pages is captured in a [`PageProfile`]:
//! which selectors mark builder sections, which containers to fall back to,
//! which attributes to strip, what to drop up front and the default title.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::detect::PageType;
use crate::error::ConvertError;

/// How a profile turns a document into extracted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Concatenate every builder section (then every fallback container) in
    /// document order, outer markup included.
    Sections,
    /// Drop the blocklist, then take the inner markup of the first fallback
    /// container with visible text.
    FirstContainer,
}

/// Extraction configuration for one page type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageProfile {
    pub page_type: PageType,
    pub strategy: ExtractionStrategy,
    /// Selectors for builder sections, tried as one group.
    #[serde(default)]
    pub builder_selectors: Vec<String>,
    /// Content containers used when no builder section matches.
    #[serde(default)]
    pub fallback_selectors: Vec<String>,
    /// Builder-only attributes removed from extracted markup.
    #[serde(default)]
    pub attributes_to_strip: Vec<String>,
    /// Elements dropped before extraction.
    #[serde(default)]
    pub blocklist: Vec<String>,
    pub default_title: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl PageProfile {
    /// Built-in profile for Elementor (WordPress) pages.
    pub fn elementor() -> Self {
        Self {
            page_type: PageType::Elementor,
            strategy: ExtractionStrategy::Sections,
            builder_selectors: strings(&[".elementor-section", ".elementor-container", ".e-con"]),
            fallback_selectors: strings(&["main", "#content", ".content", "article"]),
            attributes_to_strip: strings(&[
                "data-elementor-type",
                "data-elementor-id",
                "data-element_type",
                "data-widget_type",
                "data-id",
                "data-settings",
            ]),
            blocklist: Vec::new(),
            default_title: "Converted Elementor Page".to_string(),
        }
    }

    /// Built-in profile for GoHighLevel funnel/site pages.
    pub fn ghl() -> Self {
        Self {
            page_type: PageType::Ghl,
            strategy: ExtractionStrategy::Sections,
            builder_selectors: strings(&[".section", ".block", ".container", "[data-type='section']"]),
            fallback_selectors: strings(&["main", "#content", ".content", ".page-content"]),
            attributes_to_strip: strings(&["data-block-id", "data-block-type"]),
            blocklist: Vec::new(),
            default_title: "Converted GHL Page".to_string(),
        }
    }

    /// Built-in profile for pages with no recognized builder.
    ///
    /// Unlike the builder profiles this one drops navigation chrome, cookie
    /// notices and trackers before looking for content.
    pub fn generic() -> Self {
        Self {
            page_type: PageType::Generic,
            strategy: ExtractionStrategy::FirstContainer,
            builder_selectors: Vec::new(),
            fallback_selectors: strings(&[
                "main",
                "[role='main']",
                "#main-content",
                "#content",
                ".main-content",
                ".post-content",
                ".entry-content",
                ".page-content",
                ".content",
                "article",
                ".container",
                ".wrapper",
            ]),
            attributes_to_strip: Vec::new(),
            blocklist: strings(&[
                "script",
                "noscript",
                "iframe[src*='google']",
                "iframe[src*='facebook']",
                "img[src*='analytics']",
                "img[width='1'][height='1']",
                "nav",
                "header",
                "footer",
                "[class*='cookie']",
                "[id*='cookie']",
                "[class*='gdpr']",
                "[id*='gdpr']",
                "link[rel='stylesheet']",
                "[data-widget_type]",
                ".elementor-widget-html",
            ]),
            default_title: "Converted Page".to_string(),
        }
    }

    /// The built-in profile for a page type.
    pub fn builtin(page_type: PageType) -> Self {
        match page_type {
            PageType::Elementor => Self::elementor(),
            PageType::Ghl => Self::ghl(),
            PageType::Generic => Self::generic(),
        }
    }

    /// Verb phrase naming this profile's conversion, used in user-facing errors.
    pub fn operation(&self) -> &'static str {
        match self.page_type {
            PageType::Elementor => "Convert Elementor page",
            PageType::Ghl => "Convert GHL page",
            PageType::Generic => "Parse HTML content",
        }
    }
}

/// Registry of profiles keyed by page type; always holds one per type.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    map: HashMap<PageType, PageProfile>,
}

impl ProfileSet {
    /// Creates a set holding the built-in profiles.
    pub fn builtin() -> Self {
        let map = PageType::ALL
            .iter()
            .map(|t| (*t, PageProfile::builtin(*t)))
            .collect();
        Self { map }
    }

    /// Replaces the profile for `profile.page_type`.
    pub fn register(&mut self, profile: PageProfile) {
        self.map.insert(profile.page_type, profile);
    }

    /// Returns the profile for a page type.
    pub fn get(&self, page_type: PageType) -> &PageProfile {
        // Every type is inserted by builtin() and register() only replaces.
        &self.map[&page_type]
    }

    /// Parses a JSON array of profiles and registers each over the built-ins.
    pub fn load_json(&mut self, json: &str) -> Result<(), ConvertError> {
        let profiles: Vec<PageProfile> = serde_json::from_str(json).map_err(|e| {
            ConvertError::parse("Load profiles", Some(anyhow::anyhow!("invalid profile JSON: {}", e)))
        })?;
        for profile in profiles {
            self.register(profile);
        }
        Ok(())
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_set_has_every_type() {
        let set = ProfileSet::builtin();
        for t in PageType::ALL {
            assert_eq!(set.get(t).page_type, t);
        }
    }

    #[test]
    fn default_titles_per_type() {
        assert_eq!(PageProfile::generic().default_title, "Converted Page");
        assert_eq!(PageProfile::elementor().default_title, "Converted Elementor Page");
        assert_eq!(PageProfile::ghl().default_title, "Converted GHL Page");
    }

    #[test]
    fn only_generic_profile_has_blocklist() {
        assert!(PageProfile::elementor().blocklist.is_empty());
        assert!(PageProfile::ghl().blocklist.is_empty());
        assert!(PageProfile::generic().blocklist.iter().any(|s| s == "nav"));
    }

    #[test]
    fn load_json_overrides_one_profile() {
        let mut set = ProfileSet::builtin();
        let json = r#"[{
            "page_type": "ghl",
            "strategy": "sections",
            "builder_selectors": [".hl-section"],
            "attributes_to_strip": ["data-hl-id"],
            "default_title": "Funnel"
        }]"#;
        set.load_json(json).unwrap();

        let ghl = set.get(PageType::Ghl);
        assert_eq!(ghl.builder_selectors, vec![".hl-section".to_string()]);
        assert!(ghl.fallback_selectors.is_empty());
        assert_eq!(ghl.default_title, "Funnel");
        assert_eq!(set.get(PageType::Elementor), &PageProfile::elementor());
    }

    #[test]
    fn load_json_rejects_malformed_input() {
        let mut set = ProfileSet::builtin();
        let err = set.load_json("{not json").unwrap_err();
        assert!(err.is_parse());
    }
}
