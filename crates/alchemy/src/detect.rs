// ABOUTME: Page-type detection from raw HTML text using builder signatures.
// ABOUTME: Defines the PageType enum and detect_page_type(), a single aho-corasick scan.

use std::fmt;
use std::str::FromStr;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The page builder a document was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Elementor,
    Ghl,
    #[default]
    Generic,
}

impl PageType {
    /// All page types, in detection priority order.
    pub const ALL: [PageType; 3] = [PageType::Elementor, PageType::Ghl, PageType::Generic];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Elementor => "elementor",
            PageType::Ghl => "ghl",
            PageType::Generic => "generic",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elementor" => Ok(PageType::Elementor),
            "ghl" | "gohighlevel" => Ok(PageType::Ghl),
            "generic" => Ok(PageType::Generic),
            other => Err(format!("unknown page type: {}", other)),
        }
    }
}

// Pattern ids below ELEMENTOR_PATTERNS belong to Elementor, the rest to GHL.
const ELEMENTOR_PATTERNS: usize = 2;
const SIGNATURES: &[&str] = &["elementor", "wp-content", "gohighlevel", "ghl.page"];

static SIGNATURE_MATCHER: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(SIGNATURES).expect("builder signatures are valid patterns"));

/// Detects the page builder from case-sensitive signatures in the raw text.
///
/// Elementor signatures take priority over GHL ones no matter where they
/// appear, so a page carrying both is classified as Elementor. Any input,
/// including the empty string, maps to exactly one type.
pub fn detect_page_type(raw_html: &str) -> PageType {
    let mut saw_ghl = false;
    for m in SIGNATURE_MATCHER.find_overlapping_iter(raw_html) {
        if m.pattern().as_usize() < ELEMENTOR_PATTERNS {
            return PageType::Elementor;
        }
        saw_ghl = true;
    }
    if saw_ghl {
        PageType::Ghl
    } else {
        PageType::Generic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_elementor_class() {
        let html = r#"<div class="elementor-section">Hi</div>"#;
        assert_eq!(detect_page_type(html), PageType::Elementor);
    }

    #[test]
    fn detects_wordpress_content_path() {
        let html = r#"<img src="/wp-content/uploads/a.png">"#;
        assert_eq!(detect_page_type(html), PageType::Elementor);
    }

    #[test]
    fn detects_ghl_markers() {
        assert_eq!(
            detect_page_type("<!-- built with gohighlevel -->"),
            PageType::Ghl
        );
        assert_eq!(
            detect_page_type(r#"<a href="https://x.ghl.page">x</a>"#),
            PageType::Ghl
        );
    }

    #[test]
    fn elementor_wins_even_when_ghl_comes_first() {
        let html = "gohighlevel ghl.page ... elementor";
        assert_eq!(detect_page_type(html), PageType::Elementor);
    }

    #[test]
    fn overlapping_signatures_still_prefer_elementor() {
        assert_eq!(detect_page_type("ghl.pagelementor"), PageType::Elementor);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(detect_page_type("ELEMENTOR GoHighLevel"), PageType::Generic);
    }

    #[test]
    fn empty_input_is_generic() {
        assert_eq!(detect_page_type(""), PageType::Generic);
    }

    #[test]
    fn page_type_round_trips_through_str() {
        for t in PageType::ALL {
            assert_eq!(t.as_str().parse::<PageType>().unwrap(), t);
        }
        assert!("wix".parse::<PageType>().is_err());
    }
}
