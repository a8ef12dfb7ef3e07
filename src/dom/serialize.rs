//! HTML serialization of working-document subtrees
//!
//! Implements html5ever's `Serialize` for an arena subtree so the standard
//! `HtmlSerializer` handles escaping and void elements. The `style` attribute
//! is synthesized from the node's [`StyleMap`](crate::css::StyleMap) at write
//! time; it is never stored alongside the other attributes.

use super::{Node, NodeId, WorkingDocument};
use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use markup5ever::{LocalName, QualName, ns};
use std::io;

struct SerializableSubtree<'a> {
    doc: &'a WorkingDocument,
    id: NodeId,
}

impl Serialize for SerializableSubtree<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match traversal_scope {
            TraversalScope::IncludeNode => serialize_node(self.doc, self.id, serializer),
            TraversalScope::ChildrenOnly(_) => {
                for &child in self.doc.children(self.id) {
                    serialize_node(self.doc, child, serializer)?;
                }
                Ok(())
            }
        }
    }
}

fn serialize_node<S>(doc: &WorkingDocument, id: NodeId, serializer: &mut S) -> io::Result<()>
where
    S: Serializer,
{
    match doc.node(id) {
        Some(Node::Text(text)) => serializer.write_text(text),
        Some(Node::Element(el)) => {
            let name = QualName::new(None, ns!(html), LocalName::from(el.tag()));
            let mut attrs: Vec<(QualName, String)> = el
                .attributes()
                .iter()
                .map(|(k, v)| {
                    (
                        QualName::new(None, ns!(), LocalName::from(k.as_str())),
                        v.clone(),
                    )
                })
                .collect();
            if !el.style().is_empty() {
                attrs.push((
                    QualName::new(None, ns!(), LocalName::from("style")),
                    el.style().to_attr_value(),
                ));
            }
            serializer.start_elem(
                name.clone(),
                attrs.iter().map(|(n, v)| (n, v.as_str())),
            )?;
            for &child in doc.children(id) {
                serialize_node(doc, child, serializer)?;
            }
            serializer.end_elem(name)
        }
        None => Ok(()),
    }
}

fn write_subtree(doc: &WorkingDocument, id: NodeId, scope: TraversalScope) -> String {
    let mut buf = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    if serialize(&mut buf, &SerializableSubtree { doc, id }, opts).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

/// Markup of `id`'s children, excluding `id` itself.
pub fn inner_html(doc: &WorkingDocument, id: NodeId) -> String {
    write_subtree(doc, id, TraversalScope::ChildrenOnly(None))
}

/// Markup of the whole subtree rooted at `id`.
pub fn outer_html(doc: &WorkingDocument, id: NodeId) -> String {
    write_subtree(doc, id, TraversalScope::IncludeNode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementData;

    #[test]
    fn test_serialize_element_with_style() {
        let mut doc = WorkingDocument::new();
        let mut data = ElementData::new("p");
        data.style_mut().set("color", "red");
        let p = doc.create_element(data);
        let text = doc.create_text("Hi");
        doc.append_child(doc.root(), p);
        doc.append_child(p, text);

        assert_eq!(inner_html(&doc, doc.root()), r#"<p style="color: red;">Hi</p>"#);
        assert_eq!(outer_html(&doc, p), r#"<p style="color: red;">Hi</p>"#);
    }

    #[test]
    fn test_serialize_void_element() {
        let mut doc = WorkingDocument::new();
        let mut data = ElementData::new("img");
        data.set_attribute("alt", "Placeholder Image");
        data.set_attribute("src", "https://example.com/a.png");
        let img = doc.create_element(data);
        doc.append_child(doc.root(), img);

        let html = inner_html(&doc, doc.root());
        assert!(html.starts_with("<img"));
        assert!(!html.contains("</img>"));
        assert!(html.contains(r#"alt="Placeholder Image""#));
    }

    #[test]
    fn test_serialize_escapes_text() {
        let mut doc = WorkingDocument::new();
        let p = doc.create_element(ElementData::new("p"));
        let text = doc.create_text("a < b & c");
        doc.append_child(doc.root(), p);
        doc.append_child(p, text);

        assert_eq!(inner_html(&doc, p), "a &lt; b &amp; c");
    }
}
