// ABOUTME: Property tests for conversion safety and detector totality.
// ABOUTME: Generates hostile HTML from fragments and checks the output never carries active content.

use page_alchemy::{convert, detect_page_type, sanitize_html, PageType};
use proptest::prelude::*;
use scraper::{Html, Selector};

const FRAGMENTS: &[&str] = &[
    "<script>alert(1)</script>",
    "<SCRIPT src=\"https://evil.example/x.js\"></SCRIPT>",
    "<img src=x onerror=\"alert(1)\">",
    "<a href=\"javascript:alert(1)\" onclick=\"go()\">link</a>",
    "<div onmouseover='steal()' class=\"section\">hover</div>",
    "<iframe src=\"https://example.com\"></iframe>",
    "<object data=\"x.swf\"></object><embed src=\"x.swf\">",
    "<svg onload=alert(1)><circle r=\"1\"/></svg>",
    "<style>body{color:red}</style>",
    "<style></style><script>1</script>",
    "<div class=\"elementor-section\" data-elementor-id=\"1\">",
    "<section class=\"block\" data-block-id=\"9\">",
    "<main>",
    "</main>",
    "</div>",
    "</section>",
    "<p>text</p>",
    "<!-- comment -->",
    "<title>t</title>",
    "<form action=\"/x\" onsubmit=\"x()\"><input onfocus=\"y()\"></form>",
    "gohighlevel",
    "wp-content",
    "<noscript><script>n()</script></noscript>",
    "<template><script>t()</script></template>",
    "<math><mi xlink:href=\"javascript:1\">m</mi></math>",
];

fn hostile_html() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        4 => prop::sample::select(FRAGMENTS).prop_map(|s| s.to_string()),
        1 => "[a-zA-Z0-9<>/=\"' ]{0,24}",
    ];
    prop::collection::vec(piece, 0..12).prop_map(|pieces| pieces.concat())
}

/// Self-contained snippets, so concatenations stay well nested.
const BALANCED: &[&str] = &[
    "<p>text</p>",
    "<p onclick=\"x()\">click</p>",
    "<script>alert(1)</script>",
    "<a href=\"javascript:alert(1)\">bad</a>",
    "<a href=\"https://example.com\" target=\"_blank\">good</a>",
    "<img src=\"https://example.com/a.png\" alt=\"a\" onerror=\"x()\">",
    "<div class=\"section\" data-block-id=\"1\"><h2>Head</h2></div>",
    "<section><ul><li>one</li><li>two</li></ul></section>",
    "<iframe src=\"https://example.com\"></iframe>",
    "<form action=\"/go\"><label for=\"e\">Email</label><input id=\"e\" type=\"email\"></form>",
    "<table><tbody><tr><td>cell</td></tr></tbody></table>",
    "<span style=\"color: red\">red</span>",
    "<!-- note -->",
    "plain &amp; text",
];

fn balanced_html() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(BALANCED), 0..10).prop_map(|pieces| pieces.concat())
}

fn page_type() -> impl Strategy<Value = PageType> {
    prop::sample::select(PageType::ALL.to_vec())
}

fn assert_inert(html: &str) {
    let doc = Html::parse_document(html);
    let scripts = Selector::parse("script").unwrap();
    assert_eq!(doc.select(&scripts).count(), 0, "script element in:\n{}", html);

    for node in doc.tree.nodes() {
        if let Some(element) = node.value().as_element() {
            for (name, value) in element.attrs() {
                assert!(
                    !name.to_ascii_lowercase().starts_with("on"),
                    "event handler {}={:?} in:\n{}",
                    name,
                    value,
                    html
                );
                assert!(
                    !value.trim().to_ascii_lowercase().starts_with("javascript:"),
                    "javascript URL in:\n{}",
                    html
                );
            }
        }
    }
}

proptest! {
    #[test]
    fn converted_output_has_no_active_content(raw in hostile_html(), page_type in page_type()) {
        let html = convert(&raw, page_type).unwrap();
        assert_inert(&html);
    }

    #[test]
    fn auto_detected_conversion_has_no_active_content(raw in hostile_html()) {
        let html = convert(&raw, detect_page_type(&raw)).unwrap();
        assert_inert(&html);
    }

    #[test]
    fn sanitizing_twice_changes_nothing(raw in balanced_html()) {
        let once = sanitize_html(&raw);
        prop_assert_eq!(sanitize_html(&once), once);
    }

    #[test]
    fn detection_is_total_and_deterministic(raw in ".{0,200}") {
        let first = detect_page_type(&raw);
        prop_assert_eq!(first, detect_page_type(&raw));
        prop_assert!(PageType::ALL.contains(&first));
    }

    #[test]
    fn elementor_signatures_always_win(prefix in "[a-z .]{0,40}", suffix in "[a-z .]{0,40}") {
        let raw = format!("{}gohighlevel {}elementor{}", prefix, prefix, suffix);
        prop_assert_eq!(detect_page_type(&raw), PageType::Elementor);
    }

    #[test]
    fn non_empty_body_never_yields_empty_container(words in "[a-z]{1,12}( [a-z]{1,12}){0,5}") {
        let raw = format!("<html><body><span>{}</span></body></html>", words);
        for page_type in PageType::ALL {
            let html = convert(&raw, page_type).unwrap();
            prop_assert!(html.contains(&words), "{:?} lost content:\n{}", page_type, html);
        }
    }
}
