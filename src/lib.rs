//! # Posterkit - HTML Poster Editor Core
//!
//! The direct-manipulation document model behind an HTML poster editor:
//! untrusted HTML goes in, becomes a sanitized editable working document on a
//! fixed 720x720 canvas, and comes back out as a self-contained HTML artifact.
//!
//! ## Architecture
//!
//! - **html**: raw HTML parsing (html5ever/rcdom) and document queries
//! - **sanitize**: allow-list sanitizer for imported markup
//! - **ingest**: full import pipeline producing a `WorkingDocument`
//! - **dom**: arena-backed working tree with stable node ids
//! - **css**: inline style declarations and property normalization
//! - **store**: selection + mutation API, the single source of truth
//! - **drag**: preview/commit coordinate transform for drag gestures
//! - **export**: artifact serialization and delivery collaborators
//! - **io**: async import-file reads and image-to-data-URI encoding
//! - **utils**: shared error types
//!
//! Data flows one way: raw HTML → sanitize → ingest → store. User actions
//! mutate the store; export reads it and never mutates it.

pub mod css;
pub mod dom;
pub mod drag;
pub mod export;
pub mod html;
pub mod ingest;
pub mod io;
pub mod sanitize;
pub mod store;
pub mod utils;

// Re-export main types for convenience
pub use dom::{ElementData, Node, NodeId, WorkingDocument};
pub use drag::{DragSession, Rect};
pub use export::{Deliver, FsDeliver, export_and_deliver, export_document};
pub use ingest::parse;
pub use sanitize::sanitize;
pub use store::{EditorStore, ElementKind};
pub use utils::error::{EditorError, Result};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "posterkit";

/// Fixed canvas geometry and export conventions
pub mod canvas {
    /// Canvas width in CSS pixels
    pub const WIDTH_PX: f64 = 720.0;
    /// Canvas height in CSS pixels
    pub const HEIGHT_PX: f64 = 720.0;
    /// Canvas background color
    pub const BACKGROUND: &str = "#f3f4f6";
    /// Reserved class marking the poster container
    pub const POSTER_CLASS: &str = "poster";
    /// Fixed filename for exported artifacts
    pub const EXPORT_FILENAME: &str = "poster.html";
}
