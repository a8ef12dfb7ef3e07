//! Export: working document to self-contained HTML artifact
//!
//! Serialization works on a clone of the tree with the transient selection
//! marker stripped, so exporting never mutates the live document and a failed
//! delivery is always safe to retry. Delivery itself (file download, disk
//! write) is a collaborator behind the [`Deliver`] trait.

use crate::canvas;
use crate::dom::{self, NodeId, WorkingDocument};
use crate::store::SELECTED_MARKER_CLASS;
use crate::utils::{EditorError, Result};
use std::fs;
use std::path::PathBuf;

/// Delivery collaborator for exported artifacts.
#[cfg_attr(test, mockall::automock)]
pub trait Deliver {
    /// Hand the finished artifact to the outside world under `filename`.
    fn deliver(&self, artifact: &[u8], filename: &str) -> Result<()>;
}

/// Writes artifacts into a directory on the local filesystem.
pub struct FsDeliver {
    dir: PathBuf,
}

impl FsDeliver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Deliver for FsDeliver {
    fn deliver(&self, artifact: &[u8], filename: &str) -> Result<()> {
        let path = self.dir.join(filename);
        fs::write(&path, artifact)
            .map_err(|e| EditorError::Export(format!("writing {}: {e}", path.display())))?;
        log::info!("exported poster to {}", path.display());
        Ok(())
    }
}

/// Serialize the working document into a complete, self-contained HTML page.
///
/// The body is wrapped in the fixed 720x720 non-scrolling poster container
/// with the same inline layout rules the editor renders with, and the carried
/// stylesheet text is embedded verbatim after a minimal body reset.
pub fn export_document(doc: &WorkingDocument) -> String {
    let mut clone = doc.clone();
    let root = clone.root();
    strip_marker(&mut clone, root);
    let body = dom::inner_html(&clone, clone.root());

    let poster = format!(
        "<div class=\"{poster_class}\" style=\"width: {w}px; height: {h}px; \
         position: relative; overflow: hidden; background: {bg}; \
         font-family: sans-serif;\">\n{body}\n</div>",
        poster_class = canvas::POSTER_CLASS,
        w = canvas::WIDTH_PX,
        h = canvas::HEIGHT_PX,
        bg = canvas::BACKGROUND,
    );

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n\
         <meta data-generated-by=\"{generator}\" />\n\
         <title>Exported Poster</title>\n\
         <style>\n\
         body {{ margin: 0; padding: 0; }}\n\
         {style_text}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         {poster}\n\
         </body>\n\
         </html>\n",
        generator = crate::NAME,
        style_text = doc.style_text(),
    )
}

/// Serialize and hand the artifact to `deliver` under the fixed poster
/// filename.
pub fn export_and_deliver(doc: &WorkingDocument, deliver: &dyn Deliver) -> Result<()> {
    let artifact = export_document(doc);
    deliver.deliver(artifact.as_bytes(), canvas::EXPORT_FILENAME)
}

fn strip_marker(doc: &mut WorkingDocument, root: NodeId) {
    for id in doc.descendants(root) {
        if let Some(el) = doc.element_mut(id) {
            el.remove_class(SELECTED_MARKER_CLASS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest;
    use crate::store::EditorStore;

    fn sample_doc() -> WorkingDocument {
        ingest::parse(
            "<html><head><style>.big { font-size: 40px; }</style></head>\
             <body><div class=\"poster\"><p style=\"color: red;\">Hi</p></div></body></html>",
        )
    }

    #[test]
    fn test_artifact_structure() {
        let artifact = export_document(&sample_doc());
        assert!(artifact.starts_with("<!DOCTYPE html>"));
        assert!(artifact.contains("width: 720px; height: 720px"));
        assert!(artifact.contains("overflow: hidden"));
        assert!(artifact.contains("body { margin: 0; padding: 0; }"));
        assert!(artifact.contains(".big { font-size: 40px; }"));
        assert!(artifact.contains("<title>Exported Poster</title>"));
        assert!(artifact.contains("data-generated-by"));
        assert!(artifact.contains(r#"<p style="color: red;">Hi</p>"#));
    }

    #[test]
    fn test_selection_marker_stripped_without_mutating() {
        let mut store = EditorStore::with_document(sample_doc());
        let p = store.document().children(store.document().root())[0];
        store.select(Some(p));

        let artifact = export_document(store.document());
        assert!(!artifact.contains(SELECTED_MARKER_CLASS));
        // The live document still carries the marker.
        assert!(
            store
                .document()
                .element(p)
                .unwrap()
                .has_class(SELECTED_MARKER_CLASS)
        );
    }

    #[test]
    fn test_empty_document_exports() {
        let artifact = export_document(&WorkingDocument::new());
        assert!(artifact.contains("class=\"poster\""));
        assert!(artifact.contains("</html>"));
    }

    #[test]
    fn test_deliver_receives_artifact() {
        let doc = sample_doc();
        let mut mock = MockDeliver::new();
        mock.expect_deliver()
            .withf(|artifact, filename| {
                filename == canvas::EXPORT_FILENAME
                    && std::str::from_utf8(artifact).unwrap().contains("Hi")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        export_and_deliver(&doc, &mock).unwrap();
    }

    #[test]
    fn test_failed_delivery_surfaces_error() {
        let doc = sample_doc();
        let mut mock = MockDeliver::new();
        mock.expect_deliver()
            .returning(|_, _| Err(EditorError::Export("disk full".into())));
        let err = export_and_deliver(&doc, &mock).unwrap_err();
        assert!(matches!(err, EditorError::Export(_)));
    }

    #[test]
    fn test_fs_deliver_writes_file() {
        let dir = std::env::temp_dir().join("posterkit-export-test");
        fs::create_dir_all(&dir).unwrap();
        let deliver = FsDeliver::new(&dir);
        export_and_deliver(&sample_doc(), &deliver).unwrap();
        let written = fs::read_to_string(dir.join(canvas::EXPORT_FILENAME)).unwrap();
        assert!(written.contains("Hi"));
        fs::remove_dir_all(&dir).ok();
    }
}
