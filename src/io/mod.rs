//! Import-surface I/O: file reads and image encoding
//!
//! The only asynchronous operations in the system: a one-shot read of an
//! imported HTML file and a one-shot read-and-encode of an uploaded image.
//! Both eventually deliver a string into the store (`replace` /
//! `update_attribute`) or fail without touching it.

use crate::utils::{EditorError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

/// Read an HTML file selected or dropped for import.
///
/// The caller feeds the returned string into the store's `import`; on failure
/// the store is left unchanged.
pub async fn read_import_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| EditorError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Read an uploaded image file and encode it as a data URI.
pub async fn read_image_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| EditorError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    encode_data_uri(&bytes)
}

/// Encode image bytes as a `data:<mime>;base64,…` URI.
///
/// The MIME type is sniffed from the magic bytes; unrecognizable data is an
/// error rather than a mislabeled URI.
pub fn encode_data_uri(bytes: &[u8]) -> Result<String> {
    let format = image::guess_format(bytes)
        .map_err(|e| EditorError::ImageFormat(e.to_string()))?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}
