//! Document ingestion: raw HTML in, working document out
//!
//! The pipeline is parse → locate → sanitize → rebuild:
//!
//! 1. parse the full input as HTML5 (never fails, recovery rules apply),
//! 2. capture the raw text of the first `<style>` block (first one wins, by
//!    policy) and locate the poster container - the first element carrying
//!    the reserved `poster` class - falling back to the whole document body,
//! 3. run the candidate markup through the sanitizer,
//! 4. parse the sanitized markup into a fresh [`WorkingDocument`] arena,
//!    splitting each element's inline `style` attribute into its `StyleMap`.
//!
//! Errors are absorbed at every stage; the worst outcome is an empty canvas.

use crate::canvas::POSTER_CLASS;
use crate::css;
use crate::dom::{ElementData, NodeId, WorkingDocument};
use crate::html;
use crate::sanitize::sanitize;
use markup5ever_rcdom::{Handle, NodeData};

/// Parse arbitrary HTML into a sanitized [`WorkingDocument`].
///
/// The returned document always has a valid (possibly childless) root.
pub fn parse(raw_html: &str) -> WorkingDocument {
    let dom = html::parse(raw_html);
    let style_text = html::first_style_text(&dom);

    let container = html::find_by_class(&dom, POSTER_CLASS).or_else(|| html::body(&dom));
    let candidate = match &container {
        Some(handle) => html::inner_html(handle),
        None => String::new(),
    };

    let safe_markup = sanitize(&candidate);

    let mut doc = WorkingDocument::new();
    doc.set_style_text(style_text);
    let safe_dom = html::parse(&safe_markup);
    if let Some(body) = html::body(&safe_dom) {
        let root = doc.root();
        convert_children(&body, &mut doc, root);
    }

    log::debug!(
        "imported document: {} nodes, {} bytes of stylesheet text",
        doc.live_count(),
        doc.style_text().len()
    );
    doc
}

/// Copy an rcdom subtree into the arena under `parent`.
fn convert_children(handle: &Handle, doc: &mut WorkingDocument, parent: NodeId) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                // Whitespace-only runs are formatting noise, not content.
                if !text.trim().is_empty() {
                    let id = doc.create_text(text);
                    doc.append_child(parent, id);
                }
            }
            NodeData::Element { name, attrs, .. } => {
                let mut data = ElementData::new(name.local.as_ref());
                for attr in attrs.borrow().iter() {
                    let attr_name = attr.name.local.to_ascii_lowercase().to_string();
                    if attr_name == "style" {
                        *data.style_mut() = css::parse_inline_style(&attr.value);
                    } else {
                        data.set_attribute(attr_name, attr.value.to_string());
                    }
                }
                let id = doc.create_element(data);
                doc.append_child(parent, id);
                convert_children(child, doc, id);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    #[test]
    fn test_poster_container_with_no_style_block() {
        let doc = parse(r#"<div class="poster"><p style="color:red">Hi</p></div>"#);
        assert_eq!(doc.style_text(), "");
        let children = doc.children(doc.root());
        assert_eq!(children.len(), 1);
        let p = doc.element(children[0]).unwrap();
        assert_eq!(p.tag(), "p");
        assert_eq!(p.style().get("color"), Some("red"));
        assert_eq!(doc.text_content(children[0]), "Hi");
    }

    #[test]
    fn test_style_text_captured_from_first_block() {
        let doc = parse(
            "<html><head><style>.a { color: blue; }</style><style>.b {}</style></head>\
             <body><div class=\"poster\"><p>x</p></div></body></html>",
        );
        assert_eq!(doc.style_text(), ".a { color: blue; }");
    }

    #[test]
    fn test_body_fallback_without_poster_container() {
        let doc = parse("<p>loose</p><span>content</span>");
        let tags: Vec<_> = doc
            .children(doc.root())
            .iter()
            .map(|&id| doc.element(id).unwrap().tag().to_string())
            .collect();
        assert_eq!(tags, ["p", "span"]);
    }

    #[test]
    fn test_siblings_outside_poster_ignored() {
        let doc = parse(r#"<p>outside</p><div class="poster"><p>inside</p></div><p>after</p>"#);
        assert_eq!(doc.children(doc.root()).len(), 1);
        assert_eq!(doc.text_content(doc.root()), "inside");
    }

    #[test]
    fn test_script_stripped_on_import() {
        let doc = parse(r#"<div class="poster"><p onclick="x">Hi</p><script>evil()</script></div>"#);
        assert_eq!(doc.children(doc.root()).len(), 1);
        let p = doc.element(doc.children(doc.root())[0]).unwrap();
        assert_eq!(p.get_attribute("onclick"), None);
    }

    #[test]
    fn test_malformed_input_degrades_to_best_effort() {
        let doc = parse("<div class=\"poster\"><p>Unclosed<span>nested");
        assert!(doc.contains(doc.root()));
        assert_eq!(doc.text_content(doc.root()), "Unclosednested");
    }

    #[test]
    fn test_empty_input_yields_empty_canvas() {
        let doc = parse("");
        assert!(doc.children(doc.root()).is_empty());
        assert_eq!(doc.style_text(), "");
    }

    #[test]
    fn test_whitespace_only_text_dropped() {
        let doc = parse("<div class=\"poster\">\n  <p>Hi</p>\n  </div>");
        for &id in doc.children(doc.root()) {
            assert!(matches!(doc.node(id), Some(Node::Element(_))));
        }
    }
}
