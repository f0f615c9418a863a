// ABOUTME: Markup serializer that writes a scraper subtree while skipping nodes and attributes.
// ABOUTME: Lets extraction "remove" elements and builder attributes without mutating the tree.

use std::collections::HashSet;

use ego_tree::iter::Edge;
use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Node};

/// What to leave out while serializing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Filter<'a> {
    /// Nodes (and their subtrees) to omit.
    pub skip: Option<&'a HashSet<NodeId>>,
    /// Attribute names to omit on every element.
    pub strip_attrs: &'a [String],
}

impl Filter<'_> {
    fn skips(&self, id: NodeId) -> bool {
        self.skip.map_or(false, |s| s.contains(&id))
    }

    fn strips(&self, attr: &str) -> bool {
        self.strip_attrs.iter().any(|a| a.eq_ignore_ascii_case(attr))
    }
}

/// Serializes an element including its own tag.
pub fn outer_html(element: ElementRef, filter: &Filter) -> String {
    let mut out = String::new();
    write_node(*element, filter, &mut out);
    out
}

/// Serializes an element's children only.
pub fn inner_html(element: ElementRef, filter: &Filter) -> String {
    let mut out = String::new();
    for child in element.children() {
        write_node(child, filter, &mut out);
    }
    out
}

/// Returns true if the element holds non-whitespace text outside skipped
/// nodes and outside script/style/template content.
///
/// Walks the subtree iteratively; nesting depth is bounded only by input size.
pub fn has_visible_text(node: NodeRef<Node>, filter: &Filter) -> bool {
    let mut pruned: Option<NodeId> = None;
    for edge in node.traverse() {
        match edge {
            Edge::Open(n) => {
                if pruned.is_some() {
                    continue;
                }
                match n.value() {
                    _ if filter.skips(n.id()) => pruned = Some(n.id()),
                    Node::Element(el) if matches!(el.name(), "script" | "style" | "template") => {
                        pruned = Some(n.id())
                    }
                    Node::Text(t) if !t.trim().is_empty() => return true,
                    _ => {}
                }
            }
            Edge::Close(n) => {
                if pruned == Some(n.id()) {
                    pruned = None;
                }
            }
        }
    }
    false
}

fn write_node(node: NodeRef<Node>, filter: &Filter, out: &mut String) {
    // Subtree currently being left out, closed by its own Close edge.
    let mut pruned: Option<NodeId> = None;
    for edge in node.traverse() {
        match edge {
            Edge::Open(n) => {
                if pruned.is_some() {
                    continue;
                }
                if filter.skips(n.id()) {
                    pruned = Some(n.id());
                    continue;
                }
                open_node(n, filter, out);
            }
            Edge::Close(n) => {
                if let Some(id) = pruned {
                    if id == n.id() {
                        pruned = None;
                    }
                    continue;
                }
                if let Node::Element(el) = n.value() {
                    if !is_void_element(el.name()) {
                        out.push_str("</");
                        out.push_str(el.name());
                        out.push('>');
                    }
                }
            }
        }
    }
}

fn open_node(node: NodeRef<Node>, filter: &Filter, out: &mut String) {
    match node.value() {
        Node::Text(t) => {
            let raw_parent = node
                .parent()
                .and_then(|p| p.value().as_element().map(|el| is_raw_text_element(el.name())))
                .unwrap_or(false);
            if raw_parent {
                out.push_str(t);
            } else {
                out.push_str(&escape_text(t));
            }
        }
        Node::Element(el) => {
            let name = el.name();
            out.push('<');
            out.push_str(name);
            for (k, v) in el.attrs() {
                if filter.strips(k) {
                    continue;
                }
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&escape_attr(v));
                out.push('"');
            }
            if is_void_element(name) {
                out.push_str(" />");
            } else {
                out.push('>');
            }
        }
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        _ => {}
    }
}

/// Escape attribute value
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text content
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn is_raw_text_element(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" | "plaintext"
    )
}

/// Check if tag is void element
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag.to_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
