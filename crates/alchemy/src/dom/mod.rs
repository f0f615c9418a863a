// ABOUTME: DOM helpers for the conversion pipeline built on scraper's immutable tree.
// ABOUTME: Holds the parsed SourceDocument, selector compilation and skip-set serialization.

//! DOM utilities for HTML document inspection.
//!
//! The parsed tree is never mutated. Removals are expressed as sets of node
//! ids that the serializer skips, and attribute stripping happens while the
//! new markup string is written.

pub mod serialize;
pub mod source;

use scraper::{ElementRef, Selector};

use crate::error::ConvertError;

/// Compiles a list of CSS selectors, failing on the first invalid one.
pub fn compile_selectors(css: &[String]) -> Result<Vec<Selector>, ConvertError> {
    css.iter()
        .map(|s| {
            Selector::parse(s).map_err(|e| {
                ConvertError::extract(
                    "Compile selector",
                    Some(anyhow::anyhow!("invalid selector {:?}: {}", s, e)),
                )
            })
        })
        .collect()
}

/// Returns true if the element matches any of the selectors.
pub fn matches_any(element: &ElementRef, selectors: &[Selector]) -> bool {
    selectors.iter().any(|sel| sel.matches(element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn compile_selectors_accepts_valid_list() {
        let sels = compile_selectors(&["main".to_string(), "[data-type='section']".to_string()])
            .unwrap();
        assert_eq!(sels.len(), 2);
    }

    #[test]
    fn compile_selectors_reports_invalid_selector() {
        let err = compile_selectors(&["div".to_string(), "[[[invalid".to_string()]).unwrap_err();
        assert!(err.is_extract());
        assert!(err.to_string().contains("[[[invalid"));
    }

    #[test]
    fn matches_any_checks_every_selector() {
        let doc = Html::parse_fragment(r#"<div class="block">x</div>"#);
        let sels = compile_selectors(&[".section".to_string(), ".block".to_string()]).unwrap();
        let div = doc.select(&Selector::parse("div").unwrap()).next().unwrap();
        assert!(matches_any(&div, &sels));
        assert!(!matches_any(&div, &sels[..1]));
    }
}
