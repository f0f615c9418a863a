// ABOUTME: Output formation for converted pages: allowlist sanitization and document assembly.
// ABOUTME: sanitize_html() is the single security-relevant step of the pipeline.

//! Output format module.
//!
//! Extracted markup goes through [`sanitize_html`] and is then wrapped into a
//! standalone page by [`document::assemble_document`].

pub mod document;

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Structural and styling tags allowed on top of ammonia's defaults.
const EXTRA_TAGS: &[&str] = &[
    "section", "main", "picture", "source", "video", "audio", "track", "form", "fieldset",
    "legend", "label", "input", "textarea", "select", "option", "optgroup", "button",
];

/// Attributes allowed on every element.
const GENERIC_ATTRS: &[&str] = &["class", "id", "style", "title", "lang", "dir", "role"];

/// Attributes allowed per tag, URL-valued ones are scheme-checked by ammonia.
const TAG_ATTRS: &[(&str, &[&str])] = &[
    ("a", &["href", "target", "name"]),
    ("img", &["src", "alt", "width", "height", "srcset", "sizes", "loading"]),
    ("source", &["src", "srcset", "sizes", "type", "media"]),
    ("video", &["src", "poster", "width", "height", "controls", "muted", "loop", "playsinline"]),
    ("audio", &["src", "controls", "loop", "muted"]),
    ("track", &["src", "kind", "srclang", "label"]),
    ("form", &["action", "method", "name"]),
    ("label", &["for"]),
    (
        "input",
        &["type", "name", "value", "placeholder", "required", "checked", "disabled", "min", "max", "step"],
    ),
    ("textarea", &["name", "placeholder", "rows", "cols", "required"]),
    ("select", &["name", "required", "multiple"]),
    ("option", &["value", "selected"]),
    ("button", &["type", "name", "value", "disabled"]),
    ("td", &["colspan", "rowspan"]),
    ("th", &["colspan", "rowspan", "scope"]),
];

const URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

static SANITIZER: Lazy<ammonia::Builder<'static>> = Lazy::new(|| {
    let mut builder = ammonia::Builder::default();
    builder
        .add_tags(EXTRA_TAGS.iter().copied())
        .add_generic_attributes(GENERIC_ATTRS.iter().copied())
        .generic_attribute_prefixes(["data-", "aria-"].into_iter().collect::<HashSet<_>>())
        .url_schemes(URL_SCHEMES.iter().copied().collect());
    for (tag, attrs) in TAG_ATTRS {
        builder.add_tag_attributes(*tag, attrs.iter().copied());
    }
    builder
});

/// Sanitize HTML with an allowlist policy.
///
/// Scripts and styles are dropped with their content, `on*` handlers and any
/// attribute not allowlisted are removed, and URLs outside http, https, mailto
/// and tel (notably `javascript:` and `data:`) are dropped. Sectioning,
/// tables, media, form controls and `class`/`id`/`style`/`data-*`/`aria-*`
/// attributes survive. Running it twice gives the same output as once.
pub fn sanitize_html(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}
