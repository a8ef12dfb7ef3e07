//! Drag gesture: pointer movement to committed absolute position
//!
//! A [`DragSession`] is the only writer allowed to bypass the store's
//! `update_style` entry point, and only for its live preview frames. The
//! final position always funnels through `update_style` on commit so it
//! participates in the same normalization and precedence rules as a manual
//! edit. A cancelled gesture restores the exact pre-drag declarations,
//! including their absence.

use crate::canvas;
use crate::css::{self, Declaration};
use crate::dom::NodeId;
use crate::store::EditorStore;

/// Rendered box of a node relative to the canvas origin, in CSS pixels.
///
/// Derived on demand by the renderer; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Pre-drag state of one positioning property, captured for cancellation.
#[derive(Debug, Clone)]
struct Saved {
    property: &'static str,
    declaration: Option<Declaration>,
}

/// An in-flight drag gesture on the selected node.
#[derive(Debug)]
pub struct DragSession {
    node: NodeId,
    size: (f64, f64),
    x: f64,
    y: f64,
    saved: [Saved; 3],
}

impl DragSession {
    /// Start a drag on the currently selected node.
    ///
    /// `rendered` is the node's current box relative to the canvas origin.
    /// If the node already carries explicit pixel `top`/`left` declarations,
    /// the working position is seeded from those; otherwise from the rendered
    /// box, so the first drag of a non-positioned element doesn't jump.
    ///
    /// Returns `None` when nothing is selected.
    pub fn begin(store: &EditorStore, rendered: Rect) -> Option<Self> {
        let node = store.selected()?;
        let style = store.document().element(node)?.style();

        let y = style.get("top").and_then(css::parse_px).unwrap_or(rendered.top);
        let x = style
            .get("left")
            .and_then(css::parse_px)
            .unwrap_or(rendered.left);

        let saved = ["position", "top", "left"]
            .map(|property| Saved {
                property,
                declaration: style.declaration(property).cloned(),
            });

        log::trace!("drag begin on {node:?} at ({x}, {y})");
        Some(Self {
            node,
            size: (rendered.width, rendered.height),
            x,
            y,
            saved,
        })
    }

    /// Node being dragged.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Current working position `(x, y)`.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Live-preview frame: move the node to absolute `(x, y)`.
    ///
    /// Writes the node's style directly - no normalization, no `!important` -
    /// because this runs every pointer frame. The values are transient until
    /// [`commit`](Self::commit) or undone by [`cancel`](Self::cancel).
    pub fn preview(&mut self, store: &mut EditorStore, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        if let Some(el) = store.document_mut().element_mut(self.node) {
            let style = el.style_mut();
            style.set("position", "absolute");
            style.set("top", css::format_px(y));
            style.set("left", css::format_px(x));
        }
    }

    /// Commit the final position, clamped to the canvas bounds.
    ///
    /// Funnels through `update_style` so the stored declarations follow the
    /// same precedence rules as manual edits. Committing the same position
    /// twice yields identical stored values.
    pub fn commit(self, store: &mut EditorStore) {
        if store.selected() != Some(self.node) {
            log::trace!("drag commit dropped: selection changed mid-gesture");
            return;
        }
        let max_x = (canvas::WIDTH_PX - self.size.0).max(0.0);
        let max_y = (canvas::HEIGHT_PX - self.size.1).max(0.0);
        let x = self.x.clamp(0.0, max_x);
        let y = self.y.clamp(0.0, max_y);

        store.update_style("position", "absolute");
        store.update_style("top", &css::format_px(y));
        store.update_style("left", &css::format_px(x));
        log::trace!("drag commit at ({x}, {y})");
    }

    /// Abort the gesture, restoring the pre-drag declarations exactly.
    pub fn cancel(self, store: &mut EditorStore) {
        let Some(el) = store.document_mut().element_mut(self.node) else {
            return;
        };
        let style = el.style_mut();
        for saved in self.saved {
            match saved.declaration {
                Some(declaration) => style.set_declaration(declaration),
                None => style.remove(saved.property),
            }
        }
        log::trace!("drag cancelled, position restored");
    }
}
