//! Working document tree
//!
//! The editable poster is held as an arena of nodes addressed by stable
//! [`NodeId`] handles. Selection and every mutation API speak `NodeId`, never
//! references into render state, so removing a node can synchronously
//! invalidate anything still pointing at it.

mod serialize;

pub use serialize::{inner_html, outer_html};

use crate::css::StyleMap;
use std::collections::BTreeMap;

/// Stable handle to a node in a [`WorkingDocument`] arena.
///
/// Ids are never reused within one document; a removed node's id simply stops
/// resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Data for element nodes
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Canonical (lowercase) tag name
    tag: String,
    /// Element attributes, excluding `style`
    attributes: BTreeMap<String, String>,
    /// Inline style declarations
    style: StyleMap,
}

impl ElementData {
    /// Create a new element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            style: StyleMap::new(),
        }
    }

    /// Canonical tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// All attributes except `style`.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute. No-op if absent.
    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    /// Get class names
    pub fn classes(&self) -> Vec<&str> {
        self.attributes
            .get("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// True if the class list contains `class_name`.
    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes().contains(&class_name)
    }

    /// Append a class if not already present.
    pub fn add_class(&mut self, class_name: &str) {
        if self.has_class(class_name) {
            return;
        }
        let entry = self.attributes.entry("class".to_string()).or_default();
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(class_name);
    }

    /// Remove a class; drops the attribute entirely when it empties out.
    pub fn remove_class(&mut self, class_name: &str) {
        let Some(current) = self.attributes.get("class") else {
            return;
        };
        let remaining: Vec<&str> = current
            .split_whitespace()
            .filter(|c| *c != class_name)
            .collect();
        if remaining.is_empty() {
            self.attributes.remove("class");
        } else {
            self.attributes.insert("class".to_string(), remaining.join(" "));
        }
    }

    /// Inline style declarations.
    pub fn style(&self) -> &StyleMap {
        &self.style
    }

    /// Mutable inline style declarations.
    pub fn style_mut(&mut self) -> &mut StyleMap {
        &mut self.style
    }
}

/// A node in the working tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Element node (e.g., `<p>`)
    Element(ElementData),
    /// Raw character content
    Text(String),
}

impl Node {
    /// Get element data if this is an element
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            Node::Element(data) => Some(data),
            Node::Text(_) => None,
        }
    }

    /// Get text content if this is a text run
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    alive: bool,
}

/// The canonical in-memory poster document: raw stylesheet text plus an
/// arena-backed element tree rooted at the canvas body.
///
/// The root always exists after construction; it may have no children.
#[derive(Debug, Clone)]
pub struct WorkingDocument {
    style_text: String,
    slots: Vec<Slot>,
    root: NodeId,
}

impl WorkingDocument {
    /// Create an empty document (canvas root with no children).
    pub fn new() -> Self {
        let root_slot = Slot {
            node: Node::Element(ElementData::new("body")),
            parent: None,
            children: Vec::new(),
            alive: true,
        };
        Self {
            style_text: String::new(),
            slots: vec![root_slot],
            root: NodeId(0),
        }
    }

    /// Raw `<style>` block text carried through from import.
    pub fn style_text(&self) -> &str {
        &self.style_text
    }

    /// Replace the carried stylesheet text.
    pub fn set_style_text(&mut self, style_text: impl Into<String>) {
        self.style_text = style_text.into();
    }

    /// The canvas root. Always valid.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// True if `id` resolves to a live node in this document.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.get(id.0).is_some_and(|s| s.alive)
    }

    /// Allocate a detached element node.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.alloc(Node::Element(data))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::Text(text.into()))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// No-op if either id is dead or `child` is already attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        if self.slots[child.0].parent.is_some() || child == self.root {
            return;
        }
        self.slots[child.0].parent = Some(parent);
        self.slots[parent.0].children.push(child);
    }

    /// Access a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).filter(|s| s.alive).map(|s| &s.node)
    }

    /// Mutable access to a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.0)
            .filter(|s| s.alive)
            .map(|s| &mut s.node)
    }

    /// Element data of `id`, if it is a live element node.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(Node::as_element)
    }

    /// Mutable element data of `id`, if it is a live element node.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.node_mut(id) {
            Some(Node::Element(data)) => Some(data),
            _ => None,
        }
    }

    /// Ordered children of `id` (empty for text or dead nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots
            .get(id.0)
            .filter(|s| s.alive)
            .map(|s| s.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent of `id`, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.0).filter(|s| s.alive)?.parent
    }

    /// True if `id` is `ancestor` or lies inside its subtree.
    pub fn is_in_subtree(&self, id: NodeId, ancestor: NodeId) -> bool {
        if !self.contains(id) || !self.contains(ancestor) {
            return false;
        }
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Depth-first descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Number of live nodes, root included.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.alive).count()
    }

    /// Concatenated text of `id`'s subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(Node::Text(text)) = self.node(id) {
            out.push_str(text);
        }
        for child in self.descendants(id) {
            if let Some(Node::Text(text)) = self.node(child) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace the subtree under `id` with a single text run (or nothing when
    /// `text` is empty). Mutates in place; `id` keeps its identity.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if self.element(id).is_none() {
            return;
        }
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
        if !text.is_empty() {
            let run = self.create_text(text);
            self.append_child(id, run);
        }
    }

    /// Detach and destroy the subtree rooted at `id`.
    ///
    /// The root cannot be removed. Returns true if anything was removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        if let Some(parent) = self.slots[id.0].parent {
            self.slots[parent.0].children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            let slot = &mut self.slots[node.0];
            slot.alive = false;
            slot.parent = None;
            stack.append(&mut slot.children);
        }
        true
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            node,
            parent: None,
            children: Vec::new(),
            alive: true,
        });
        id
    }
}

impl Default for WorkingDocument {
    fn default() -> Self {
        Self::new()
    }
}
