//! Allow-list HTML sanitizer
//!
//! `sanitize` is a pure function from untrusted body markup to safe markup.
//! Script-executing constructs (`<script>`, inline event handlers,
//! `javascript:` URLs) are removed, tags outside the allow-list are either
//! dropped with their content (script-like containers) or unwrapped so their
//! children survive, and attributes are filtered down to a known-safe set.
//! The function never fails and is idempotent.

use crate::html;
use markup5ever::Attribute;
use markup5ever_rcdom::{Handle, NodeData};
use std::cell::RefCell;
use url::Url;

/// Tags that survive sanitization. Includes the emphasis tag (`strong`) used
/// by the editor's default content so round-tripping our own output never
/// loses data.
const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "article", "aside", "b", "blockquote", "br", "caption", "code", "div", "em",
    "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "i",
    "img", "li", "main", "mark", "nav", "ol", "p", "pre", "s", "section", "small", "span",
    "strong", "sub", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "u", "ul",
];

/// Tags removed together with their entire subtree. Everything else that is
/// not allow-listed is unwrapped instead (children kept in place).
const DROP_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "frame", "frameset", "object", "embed", "applet", "form",
    "input", "button", "select", "option", "textarea", "link", "meta", "base", "title", "head",
    "noscript", "template", "svg", "math", "audio", "video", "canvas", "dialog", "slot",
];

/// Attributes allowed on any element.
const GLOBAL_ATTRS: &[&str] = &["class", "style", "id", "title", "lang", "dir"];

/// Attributes whose values are URLs and need scheme vetting.
const URL_ATTRS: &[&str] = &["src", "href"];

/// Strip dangerous markup from body HTML, returning safe markup.
///
/// Malformed input degrades to the closest safe subtree; the worst case is an
/// empty string, never an error.
pub fn sanitize(raw_body: &str) -> String {
    let dom = html::parse(raw_body);
    let Some(body) = html::body(&dom) else {
        return String::new();
    };
    prune_children(&body);
    html::inner_html(&body)
}

/// Rewrite `handle`'s child list, applying the allow-list recursively.
fn prune_children(handle: &Handle) {
    let original: Vec<Handle> = handle.children.borrow().iter().cloned().collect();
    let mut kept: Vec<Handle> = Vec::new();

    for child in original {
        match &child.data {
            NodeData::Text { .. } => kept.push(child.clone()),
            NodeData::Element { name, attrs, .. } => {
                let tag = name.local.to_ascii_lowercase().to_string();
                if DROP_WITH_CONTENT.contains(&tag.as_str()) {
                    continue;
                }
                if ALLOWED_TAGS.contains(&tag.as_str()) {
                    filter_attrs(&tag, attrs);
                    prune_children(&child);
                    kept.push(child.clone());
                } else {
                    // Unknown tag: unwrap, keeping its (sanitized) children.
                    prune_children(&child);
                    kept.extend(child.children.borrow().iter().cloned());
                }
            }
            // Comments, doctypes, and processing instructions are dropped.
            _ => {}
        }
    }

    *handle.children.borrow_mut() = kept;
}

fn filter_attrs(tag: &str, attrs: &RefCell<Vec<Attribute>>) {
    attrs.borrow_mut().retain(|attr| {
        let name = attr.name.local.to_ascii_lowercase().to_string();
        if name.starts_with("on") {
            return false;
        }
        if !GLOBAL_ATTRS.contains(&name.as_str()) && !tag_attr_allowed(tag, &name) {
            return false;
        }
        if URL_ATTRS.contains(&name.as_str()) {
            return url_allowed(tag, &name, &attr.value);
        }
        true
    });
}

fn tag_attr_allowed(tag: &str, attr: &str) -> bool {
    match tag {
        "img" => matches!(attr, "src" | "alt" | "width" | "height"),
        "a" => matches!(attr, "href" | "target" | "rel"),
        "td" | "th" => matches!(attr, "colspan" | "rowspan"),
        _ => false,
    }
}

/// Scheme vetting for URL-valued attributes.
///
/// The url crate strips ASCII tab/newline per the URL spec, so obfuscated
/// schemes like `java\nscript:` still parse to `javascript` and get caught.
/// Unparseable values are relative URLs; those carry no scheme.
fn url_allowed(tag: &str, attr: &str, value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => match url.scheme() {
            "javascript" | "vbscript" => false,
            "data" => tag == "img" && attr == "src" && url.path().starts_with("image/"),
            _ => true,
        },
        Err(_) => true,
    }
}
