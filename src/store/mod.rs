//! Working document store: single source of truth for tree and selection
//!
//! `EditorStore` owns the [`WorkingDocument`] and the selection, and exposes
//! the whole mutation API used by the toolbar and property panels. Selection
//! is a [`NodeId`], re-checked for liveness on every use; any removal path
//! clears a selection pointing into the removed subtree in the same mutation.
//!
//! Edits with no selection are silent no-ops, not errors.

use crate::css;
use crate::dom::{ElementData, NodeId, WorkingDocument};
use crate::ingest;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Marker class carried by the selected element so the renderer can draw the
/// highlight. Stripped from exports.
pub const SELECTED_MARKER_CLASS: &str = "selected-element-outline";

/// Tags whose text content may be edited inline.
const TEXT_EDITABLE_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "div", "span", "strong",
];

/// Canvas body shown before the user imports anything.
const PLACEHOLDER_BODY: &str = concat!(
    r#"<h1 style="position: absolute; top: 120px; left: 40px; font-size: 42px; font-weight: bold; color: #1f2937; margin: 0; line-height: 1.2;">Welcome to<br/>HTML Poster<br/>Editor</h1>"#,
    r#"<p style="position: absolute; top: 290px; left: 40px; font-size: 16px; color: #6b7280; margin: 0; max-width: 450px;">📤 Import a file or paste HTML code to get started with editing your poster</p>"#,
    r#"<div style="position: absolute; top: 370px; left: 40px; font-size: 14px; color: #9ca3af; line-height: 1.8;">"#,
    r#"<p style="margin: 0; font-weight: 600; color: #6b7280;">✨ Key Features:</p>"#,
    r#"<p style="margin: 8px 0 0 0;">• Import &amp; edit HTML files</p>"#,
    r#"<p style="margin: 4px 0 0 0;">• Drag &amp; drop elements freely</p>"#,
    r#"<p style="margin: 4px 0 0 0;">• Edit text, colors &amp; font sizes</p>"#,
    r#"<p style="margin: 4px 0 0 0;">• Add images &amp; text blocks</p>"#,
    r#"<p style="margin: 4px 0 0 0;">• Export your designs</p>"#,
    "</div>",
);

/// Kind of element the toolbar can add to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Image,
}

/// Owns the working document and the single optional selection.
#[derive(Debug, Clone)]
pub struct EditorStore {
    doc: WorkingDocument,
    selected: Option<NodeId>,
}

impl EditorStore {
    /// Create a store seeded with the built-in placeholder poster.
    pub fn new() -> Self {
        Self::with_document(ingest::parse(PLACEHOLDER_BODY))
    }

    /// Create a store around an existing document. Selection starts empty.
    pub fn with_document(doc: WorkingDocument) -> Self {
        Self {
            doc,
            selected: None,
        }
    }

    /// Read-only view of the working document.
    pub fn document(&self) -> &WorkingDocument {
        &self.doc
    }

    /// Mutable access for the renderer's drag-preview path.
    ///
    /// Every committed edit must go through the store API instead; previews
    /// written here are transient and get overwritten or reverted when the
    /// gesture ends.
    pub fn document_mut(&mut self) -> &mut WorkingDocument {
        &mut self.doc
    }

    /// Currently selected node, if any. Guaranteed live.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected.filter(|&id| self.doc.contains(id))
    }

    /// Element data of the current selection (for property panels).
    pub fn selected_element(&self) -> Option<&ElementData> {
        self.doc.element(self.selected()?)
    }

    /// Discard the current document wholesale and install `doc`.
    pub fn replace(&mut self, doc: WorkingDocument) {
        self.doc = doc;
        self.selected = None;
        log::debug!("document replaced, selection cleared");
    }

    /// Parse and install raw HTML. Convenience wrapper over [`ingest::parse`].
    pub fn import(&mut self, raw_html: &str) {
        self.replace(ingest::parse(raw_html));
    }

    /// Set or clear the selection, maintaining the marker class invariant:
    /// at most one node carries the marker at any time.
    pub fn select(&mut self, target: Option<NodeId>) {
        if let Some(previous) = self.selected() {
            if let Some(el) = self.doc.element_mut(previous) {
                el.remove_class(SELECTED_MARKER_CLASS);
            }
        }
        let target = target.filter(|&id| self.doc.contains(id) && id != self.doc.root());
        if let Some(id) = target {
            if let Some(el) = self.doc.element_mut(id) {
                el.add_class(SELECTED_MARKER_CLASS);
            }
        }
        self.selected = target;
    }

    /// Apply a style edit to the selected node.
    ///
    /// Property names are accepted in camel or hyphenated form; bare numeric
    /// values for `width`/`height`/`font-size` gain a `px` suffix. The
    /// declaration is stored `!important` so it wins over anything the
    /// imported stylesheet carries. No-op without a selection.
    pub fn update_style(&mut self, property: &str, value: &str) {
        let Some(id) = self.selected() else {
            log::trace!("update_style ignored: no selection");
            return;
        };
        let property = css::normalize_property(property);
        let value = css::coerce_px(&property, value);
        if let Some(el) = self.doc.element_mut(id) {
            el.style_mut().set_important(&property, value);
        }
    }

    /// Apply an attribute edit to the selected node.
    ///
    /// An image `src` that is not a data URI gets a cache-busting timestamp
    /// query appended so the rendered image refreshes even when the URL text
    /// is unchanged. No-op without a selection.
    pub fn update_attribute(&mut self, name: &str, value: &str) {
        let Some(id) = self.selected() else {
            log::trace!("update_attribute ignored: no selection");
            return;
        };
        let Some(el) = self.doc.element_mut(id) else {
            return;
        };
        if name == "src" && el.tag() == "img" && !value.starts_with("data:") {
            el.set_attribute(name, format!("{value}?{}", timestamp_millis()));
        } else {
            el.set_attribute(name, value);
        }
    }

    /// Replace the selected node's text content in place.
    pub fn set_text_content(&mut self, text: &str) {
        let Some(id) = self.selected() else {
            return;
        };
        self.doc.set_text_content(id, text);
    }

    /// Text content of the selected node (inline-edit seed value).
    pub fn text_content(&self) -> Option<String> {
        Some(self.doc.text_content(self.selected()?))
    }

    /// True if the selected node accepts inline text editing.
    pub fn selection_is_text_editable(&self) -> bool {
        self.selected_element()
            .is_some_and(|el| TEXT_EDITABLE_TAGS.contains(&el.tag()))
    }

    /// Remove the selected node from the tree and clear the selection.
    /// No-op if nothing is selected.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected() else {
            log::trace!("delete_selected ignored: no selection");
            return;
        };
        self.doc.remove(id);
        self.selected = None;
    }

    /// Remove any node by id (programmatic cleanup path).
    ///
    /// A selection pointing at the removed node - or anywhere inside its
    /// subtree - is cleared in the same mutation, never left dangling.
    pub fn remove_node(&mut self, id: NodeId) {
        if let Some(selected) = self.selected() {
            if self.doc.is_in_subtree(selected, id) {
                self.selected = None;
            }
        }
        self.doc.remove(id);
    }

    /// Create a default element of `kind`, append it to the canvas root, and
    /// select it. Returns the new node's id.
    ///
    /// Placement is jittered inside a fixed on-canvas rectangle so repeated
    /// adds don't stack exactly on top of each other.
    pub fn add_element(&mut self, kind: ElementKind) -> NodeId {
        let mut rng = rand::thread_rng();
        let top: u32 = rng.gen_range(150..450);
        let left: u32 = rng.gen_range(150..450);

        let id = match kind {
            ElementKind::Text => {
                let mut data = ElementData::new("p");
                let style = data.style_mut();
                style.set("position", "absolute");
                style.set("top", format!("{top}px"));
                style.set("left", format!("{left}px"));
                style.set("font-size", "18px");
                style.set("color", "#000000");
                style.set("font-weight", "500");
                style.set("padding", "8px");
                style.set("border-radius", "4px");
                style.set("cursor", "move");
                style.set("white-space", "nowrap");
                let id = self.doc.create_element(data);
                let text = self.doc.create_text("New Text Block");
                let root = self.doc.root();
                self.doc.append_child(root, id);
                self.doc.append_child(id, text);
                id
            }
            ElementKind::Image => {
                let mut data = ElementData::new("img");
                data.set_attribute("src", "https://via.placeholder.com/200");
                data.set_attribute("alt", "Placeholder Image");
                let style = data.style_mut();
                style.set("position", "absolute");
                style.set("top", format!("{top}px"));
                style.set("left", format!("{left}px"));
                style.set("width", "200px");
                style.set("height", "200px");
                style.set("object-fit", "cover");
                style.set("border-radius", "8px");
                style.set("cursor", "move");
                let id = self.doc.create_element(data);
                let root = self.doc.root();
                self.doc.append_child(root, id);
                id
            }
        };

        log::debug!("added {kind:?} element at ({left}, {top})");
        self.select(Some(id));
        id
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    fn store_with(html: &str) -> EditorStore {
        EditorStore::with_document(ingest::parse(html))
    }

    fn marker_count(store: &EditorStore) -> usize {
        let doc = store.document();
        doc.descendants(doc.root())
            .into_iter()
            .filter(|&id| {
                doc.element(id)
                    .is_some_and(|el| el.has_class(SELECTED_MARKER_CLASS))
            })
            .count()
    }

    #[test]
    fn test_placeholder_document_seeded() {
        let store = EditorStore::new();
        assert!(!store.document().children(store.document().root()).is_empty());
        let text = store.document().text_content(store.document().root());
        assert!(text.contains("HTML Poster"));
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_at_most_one_selected_marker() {
        let mut store = store_with("<p>a</p><p>b</p>");
        let children: Vec<_> = store.document().children(store.document().root()).to_vec();
        store.select(Some(children[0]));
        assert_eq!(marker_count(&store), 1);
        store.select(Some(children[1]));
        assert_eq!(marker_count(&store), 1);
        assert!(
            store
                .document()
                .element(children[1])
                .unwrap()
                .has_class(SELECTED_MARKER_CLASS)
        );
        store.select(None);
        assert_eq!(marker_count(&store), 0);
    }

    #[test]
    fn test_reselecting_same_node_is_stable() {
        let mut store = store_with("<p>a</p>");
        let p = store.document().children(store.document().root())[0];
        store.select(Some(p));
        store.select(Some(p));
        assert_eq!(store.selected(), Some(p));
        assert_eq!(marker_count(&store), 1);
    }

    #[test]
    fn test_delete_selected_clears_selection_and_tree() {
        let mut store = store_with("<p>a</p><p>b</p>");
        let p = store.document().children(store.document().root())[0];
        store.select(Some(p));
        store.delete_selected();
        assert!(store.selected().is_none());
        assert!(!store.document().contains(p));
        assert_eq!(store.document().children(store.document().root()).len(), 1);
        // Deleting with no selection is a no-op.
        store.delete_selected();
        assert_eq!(store.document().children(store.document().root()).len(), 1);
    }

    #[test]
    fn test_programmatic_removal_clears_descendant_selection() {
        let mut store = store_with("<div><p>inner</p></div>");
        let div = store.document().children(store.document().root())[0];
        let p = store.document().children(div)[0];
        store.select(Some(p));
        store.remove_node(div);
        assert!(store.selected().is_none());
        assert!(!store.document().contains(p));
    }

    #[test]
    fn test_update_style_normalizes_and_coerces() {
        let mut store = store_with("<p>a</p>");
        let p = store.document().children(store.document().root())[0];
        store.select(Some(p));
        store.update_style("fontSize", "24");
        let el = store.document().element(p).unwrap();
        assert_eq!(el.style().get("font-size"), Some("24px"));
        assert!(el.style().declaration("font-size").unwrap().important);

        store.update_style("font-size", "2rem");
        let el = store.document().element(p).unwrap();
        assert_eq!(el.style().get("font-size"), Some("2rem"));
        assert_eq!(el.style().len(), 1);
    }

    #[test]
    fn test_update_style_without_selection_is_noop() {
        let mut store = store_with("<p>a</p>");
        store.update_style("color", "red");
        let p = store.document().children(store.document().root())[0];
        assert!(store.document().element(p).unwrap().style().is_empty());
    }

    #[test]
    fn test_image_src_gets_cache_buster() {
        let mut store = store_with(r#"<img src="https://example.com/a.png">"#);
        let img = store.document().children(store.document().root())[0];
        store.select(Some(img));
        store.update_attribute("src", "https://example.com/a.png");
        let src = store
            .document()
            .element(img)
            .unwrap()
            .get_attribute("src")
            .unwrap();
        assert!(src.starts_with("https://example.com/a.png?"));
        assert!(src.len() > "https://example.com/a.png?".len());
    }

    #[test]
    fn test_data_uri_src_not_cache_busted() {
        let mut store = store_with(r#"<img src="x.png">"#);
        let img = store.document().children(store.document().root())[0];
        store.select(Some(img));
        store.update_attribute("src", "data:image/png;base64,AAAA");
        let el = store.document().element(img).unwrap();
        assert_eq!(el.get_attribute("src"), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_alt_attribute_passes_through() {
        let mut store = store_with(r#"<img src="x.png">"#);
        let img = store.document().children(store.document().root())[0];
        store.select(Some(img));
        store.update_attribute("alt", "A caption");
        let el = store.document().element(img).unwrap();
        assert_eq!(el.get_attribute("alt"), Some("A caption"));
    }

    #[test]
    fn test_set_text_content_in_place() {
        let mut store = store_with("<p>old</p>");
        let p = store.document().children(store.document().root())[0];
        store.select(Some(p));
        store.set_text_content("new text");
        assert_eq!(store.text_content().as_deref(), Some("new text"));
        assert_eq!(store.selected(), Some(p));
    }

    #[test]
    fn test_add_text_element_defaults() {
        let mut store = EditorStore::with_document(WorkingDocument::new());
        let id = store.add_element(ElementKind::Text);
        assert_eq!(store.selected(), Some(id));
        let el = store.document().element(id).unwrap();
        assert_eq!(el.tag(), "p");
        assert_eq!(el.style().get("font-size"), Some("18px"));
        assert_eq!(el.style().get("color"), Some("#000000"));
        assert_eq!(el.style().get("font-weight"), Some("500"));
        assert_eq!(el.style().get("position"), Some("absolute"));
        assert_eq!(store.document().text_content(id), "New Text Block");
    }

    #[test]
    fn test_add_image_element_defaults() {
        let mut store = EditorStore::with_document(WorkingDocument::new());
        let id = store.add_element(ElementKind::Image);
        let doc = store.document();
        assert_eq!(doc.children(doc.root()), [id]);
        let el = doc.element(id).unwrap();
        assert_eq!(el.tag(), "img");
        assert_eq!(el.get_attribute("src"), Some("https://via.placeholder.com/200"));
        assert_eq!(el.get_attribute("alt"), Some("Placeholder Image"));
        assert_eq!(el.style().get("width"), Some("200px"));
        assert_eq!(el.style().get("height"), Some("200px"));
        assert_eq!(el.style().get("object-fit"), Some("cover"));
    }

    #[test]
    fn test_add_element_position_within_bounds() {
        let mut store = EditorStore::with_document(WorkingDocument::new());
        for _ in 0..20 {
            let id = store.add_element(ElementKind::Text);
            let el = store.document().element(id).unwrap();
            let top = css::parse_px(el.style().get("top").unwrap()).unwrap();
            let left = css::parse_px(el.style().get("left").unwrap()).unwrap();
            assert!((150.0..450.0).contains(&top));
            assert!((150.0..450.0).contains(&left));
        }
    }

    #[test]
    fn test_replace_clears_selection() {
        let mut store = store_with("<p>a</p>");
        let p = store.document().children(store.document().root())[0];
        store.select(Some(p));
        store.import("<div class=\"poster\"><p>fresh</p></div>");
        assert!(store.selected().is_none());
        assert_eq!(store.document().text_content(store.document().root()), "fresh");
    }

    #[test]
    fn test_text_editable_gate() {
        let mut store = store_with(r#"<p>a</p><img src="x.png">"#);
        let children: Vec<_> = store.document().children(store.document().root()).to_vec();
        store.select(Some(children[0]));
        assert!(store.selection_is_text_editable());
        store.select(Some(children[1]));
        assert!(!store.selection_is_text_editable());
    }

    #[test]
    fn test_selection_survives_unrelated_removal() {
        let mut store = store_with("<p>a</p><p>b</p>");
        let children: Vec<_> = store.document().children(store.document().root()).to_vec();
        store.select(Some(children[0]));
        store.remove_node(children[1]);
        assert_eq!(store.selected(), Some(children[0]));
    }

    #[test]
    fn test_placeholder_text_node_kind() {
        let store = store_with("<p>just text</p>");
        let p = store.document().children(store.document().root())[0];
        let child = store.document().children(p)[0];
        assert!(matches!(store.document().node(child), Some(Node::Text(_))));
    }
}
