//! Raw HTML parsing using html5ever
//!
//! This is the lowest layer of the ingestion pipeline: untrusted text goes
//! through the html5ever tree builder into an rcdom tree that the sanitizer
//! and ingest passes walk. Parsing never fails; malformed markup yields
//! whatever best-effort tree the HTML5 recovery rules produce.

use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parse a full HTML document.
///
/// The tree builder always synthesizes `html`/`head`/`body`, so fragment-ish
/// input (bare `<p>…</p>`) lands under the body and can be retrieved with
/// [`body`].
pub fn parse(raw: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut raw.as_bytes())
        .unwrap_or_default()
}

/// The `<body>` element of a parsed document.
pub fn body(dom: &RcDom) -> Option<Handle> {
    find_first(&dom.document, &|name, _| name == "body")
}

/// Raw text of the first `<style>` block, or empty if none.
///
/// Only the first block is honored; additional `<style>` tags are ignored by
/// policy, not merged.
pub fn first_style_text(dom: &RcDom) -> String {
    match find_first(&dom.document, &|name, _| name == "style") {
        Some(style) => child_text(&style),
        None => String::new(),
    }
}

/// The first element whose class list contains `class_name`, in document
/// order.
pub fn find_by_class(dom: &RcDom, class_name: &str) -> Option<Handle> {
    find_first(&dom.document, &|_, handle| {
        element_classes(handle).iter().any(|c| c == class_name)
    })
}

/// Lowercase tag name, if `handle` is an element.
pub fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_ascii_lowercase().to_string()),
        _ => None,
    }
}

/// An element attribute value by (case-insensitive) local name.
pub fn element_attr(handle: &Handle, attr_name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| (*a.name.local).eq_ignore_ascii_case(attr_name))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Class list of an element (empty for non-elements).
pub fn element_classes(handle: &Handle) -> Vec<String> {
    element_attr(handle, "class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Markup of `handle`'s children, serialized by html5ever.
pub fn inner_html(handle: &Handle) -> String {
    let mut buf = Vec::new();
    let serializable = SerializableHandle::from(handle.clone());
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    if serialize(&mut buf, &serializable, opts).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

/// Concatenated direct text children of `handle`.
fn child_text(handle: &Handle) -> String {
    let mut out = String::new();
    for child in handle.children.borrow().iter() {
        if let NodeData::Text { contents } = &child.data {
            out.push_str(&contents.borrow());
        }
    }
    out
}

/// Depth-first search for the first element matching `pred`.
fn find_first(handle: &Handle, pred: &dyn Fn(&str, &Handle) -> bool) -> Option<Handle> {
    if let Some(name) = element_name(handle) {
        if pred(&name, handle) {
            return Some(handle.clone());
        }
    }
    let children: Vec<Handle> = handle.children.borrow().iter().cloned().collect();
    children.iter().find_map(|child| find_first(child, pred))
}
