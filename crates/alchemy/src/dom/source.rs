// ABOUTME: SourceDocument, the immutable parsed form of one conversion's input HTML.
// ABOUTME: Captures the title and inline style texts once and answers document-order queries.

use scraper::{ElementRef, Html, Selector};

use crate::dom::matches_any;
use crate::error::ConvertError;

/// Parsed input document. Created once per conversion and dropped after extraction.
#[derive(Debug)]
pub struct SourceDocument {
    html: Html,
    title: Option<String>,
    inline_styles: Vec<String>,
}

impl SourceDocument {
    /// Parses raw HTML, rejecting input larger than `max_bytes`.
    pub fn parse(raw_html: &str, max_bytes: usize) -> Result<Self, ConvertError> {
        if raw_html.len() > max_bytes {
            return Err(ConvertError::parse(
                "Parse",
                Some(anyhow::anyhow!(
                    "input is {} bytes, limit is {} bytes",
                    raw_html.len(),
                    max_bytes
                )),
            ));
        }

        let html = Html::parse_document(raw_html);
        let title = read_title(&html);
        let inline_styles = read_inline_styles(&html);

        Ok(Self {
            html,
            title,
            inline_styles,
        })
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The whitespace-normalized `<title>` text, if present and non-blank.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Text of every `<style>` element, in document order.
    pub fn inline_styles(&self) -> &[String] {
        &self.inline_styles
    }

    /// The `<body>` element. html5ever always synthesizes one.
    pub fn body(&self) -> Option<ElementRef<'_>> {
        let selector = Selector::parse("body").ok()?;
        self.html.select(&selector).next()
    }

    /// Elements matching any of the selectors, each once, in document order.
    pub fn select_any(&self, selectors: &[Selector]) -> Vec<ElementRef<'_>> {
        if selectors.is_empty() {
            return Vec::new();
        }
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| matches_any(el, selectors))
            .collect()
    }
}

/// First HTML `<title>`; SVG and MathML titles are element descriptions.
fn read_title(html: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let element = html.select(&selector).find(|el| !in_foreign_content(el))?;
    let text = element.text().collect::<String>();
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn in_foreign_content(el: &ElementRef) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| matches!(a.value().name(), "svg" | "math"))
}

fn read_inline_styles(html: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("style") else {
        return Vec::new();
    };
    html.select(&selector)
        .map(|el| el.text().collect::<String>())
        .filter(|css| !css.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::compile_selectors;

    const LIMIT: usize = 10 * 1024 * 1024;

    #[test]
    fn reads_title_and_styles_in_order() {
        let raw = r#"<html><head><title>  My
            Page </title><style>.a{color:red}</style></head>
            <body><style>.b{color:blue}</style><p>x</p></body></html>"#;
        let doc = SourceDocument::parse(raw, LIMIT).unwrap();
        assert_eq!(doc.title(), Some("My Page"));
        assert_eq!(
            doc.inline_styles(),
            &[".a{color:red}".to_string(), ".b{color:blue}".to_string()]
        );
    }

    #[test]
    fn svg_title_is_not_the_page_title() {
        let raw = r#"<body><svg><title>icon</title><circle r="1"/></svg><p>x</p></body>"#;
        let doc = SourceDocument::parse(raw, LIMIT).unwrap();
        assert_eq!(doc.title(), None);

        let raw = r#"<svg><title>icon</title></svg><title>Real</title>"#;
        let doc = SourceDocument::parse(raw, LIMIT).unwrap();
        assert_eq!(doc.title(), Some("Real"));
    }

    #[test]
    fn blank_title_is_none() {
        let doc = SourceDocument::parse("<title>   </title><p>x</p>", LIMIT).unwrap();
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn empty_input_still_has_body() {
        let doc = SourceDocument::parse("", LIMIT).unwrap();
        assert!(doc.body().is_some());
        assert!(doc.inline_styles().is_empty());
    }

    #[test]
    fn oversized_input_is_a_parse_error() {
        let err = SourceDocument::parse("<p>too big</p>", 4).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn select_any_keeps_document_order() {
        let raw = r#"<div class="b">1</div><div class="a">2</div><div class="b">3</div>"#;
        let doc = SourceDocument::parse(raw, LIMIT).unwrap();
        let sels = compile_selectors(&[".a".to_string(), ".b".to_string()]).unwrap();
        let texts: Vec<String> = doc
            .select_any(&sels)
            .iter()
            .map(|el| el.text().collect())
            .collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }
}
