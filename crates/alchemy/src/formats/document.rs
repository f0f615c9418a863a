// ABOUTME: Assembles sanitized content into a standalone HTML page with baseline CSS.
// ABOUTME: Carries source inline styles forward between the layout and responsive rules.

use crate::dom::serialize::escape_text;

/// Layout rules placed before any carried-forward source CSS.
pub const BASELINE_CSS: &str = r#"    body {
      font-family: 'Arial', sans-serif;
      line-height: 1.6;
      margin: 0;
      padding: 0;
    }
    .container {
      width: 100%;
      max-width: 1200px;
      margin: 0 auto;
      padding: 20px;
    }"#;

/// Responsive and defensive rules placed after the source CSS.
pub const RESPONSIVE_CSS: &str = r#"    /* Responsive styles */
    @media (max-width: 768px) {
      .container {
        padding: 10px;
      }
    }

    /* Image optimization */
    img {
      max-width: 100%;
      height: auto;
    }

    /* Form styles */
    input, textarea, select, button {
      width: 100%;
      padding: 8px;
      margin-bottom: 10px;
      box-sizing: border-box;
    }

    /* Button styles */
    .btn, button, [type="submit"] {
      display: inline-block;
      padding: 10px 20px;
      background-color: #4a6bdf;
      color: white;
      border: none;
      border-radius: 4px;
      cursor: pointer;
      text-decoration: none;
      font-weight: bold;
    }

    .btn:hover, button:hover, [type="submit"]:hover {
      background-color: #3a55b4;
    }"#;

/// Inputs to [`assemble_document`].
#[derive(Debug, Clone, Copy)]
pub struct Assembly<'a> {
    /// Already sanitized body content.
    pub content: &'a str,
    /// Source document title, if it had one.
    pub title: Option<&'a str>,
    /// Used when `title` is absent or blank.
    pub default_title: &'a str,
    /// Source `<style>` texts in document order.
    pub inline_styles: &'a [String],
}

/// Wraps content in a complete HTML document. Never fails.
pub fn assemble_document(parts: &Assembly) -> String {
    let title = parts
        .title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(parts.default_title);

    let carried = parts
        .inline_styles
        .iter()
        .map(|css| escape_css(css))
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = String::with_capacity(
        parts.content.len() + carried.len() + BASELINE_CSS.len() + RESPONSIVE_CSS.len() + 512,
    );
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("  <meta charset=\"UTF-8\">\n");
    out.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    out.push_str("  <title>");
    out.push_str(&escape_text(title));
    out.push_str("</title>\n  <style>\n");
    out.push_str(BASELINE_CSS);
    out.push('\n');
    if !carried.is_empty() {
        out.push_str(&carried);
        out.push('\n');
    }
    out.push_str(RESPONSIVE_CSS);
    out.push_str("\n  </style>\n</head>\n<body>\n  <div class=\"container\">\n");
    if !parts.content.trim().is_empty() {
        out.push_str("    ");
        out.push_str(parts.content.trim());
        out.push('\n');
    }
    out.push_str("  </div>\n</body>\n</html>\n");
    out
}

/// Makes stylesheet text safe to embed in a `<style>` element.
///
/// `<` has no meaning in CSS outside strings and comments, where the escape
/// `\3c ` renders the same character, so rewriting it means the text can never
/// close the element or open a tag.
pub fn escape_css(css: &str) -> String {
    css.replace('<', "\\3c ")
}
