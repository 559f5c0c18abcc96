//! Image materialization
//!
//! Camera captures and gallery picks arrive as transient references that
//! may stop being readable after the current session. Before a record is
//! durably stored, each transient reference is copied byte-for-byte into
//! the app-owned images directory and replaced with a stable path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ImageRef;

/// Copies transient image references into app-owned storage
pub struct ImageStore {
    images_dir: PathBuf,
}

impl ImageStore {
    /// Create an image store over the app images directory
    pub fn new(images_dir: PathBuf) -> Self {
        Self { images_dir }
    }

    /// Materialize a transient reference into a stable app-owned file.
    ///
    /// Stable references pass through untouched. On copy failure the
    /// original transient reference is returned unchanged: the record may
    /// end up pointing at a reference that later becomes unreadable, an
    /// accepted degradation rather than a hard failure.
    pub fn materialize(&self, image: ImageRef, file_name: &str) -> ImageRef {
        let uri = match &image {
            ImageRef::Stable { .. } => return image,
            ImageRef::Transient { uri } => uri.clone(),
        };

        match self.copy_into_store(&uri, file_name) {
            Ok(path) => ImageRef::stable(path),
            Err(_) => image,
        }
    }

    fn copy_into_store(&self, uri: &str, file_name: &str) -> std::io::Result<PathBuf> {
        let source = source_path(uri);
        fs::create_dir_all(&self.images_dir)?;
        let destination = self.images_dir.join(file_name);
        fs::copy(source, &destination)?;
        Ok(destination)
    }
}

/// Resolve a transient URI to a readable local path, stripping a file scheme
fn source_path(uri: &str) -> &Path {
    Path::new(uri.strip_prefix("file://").unwrap_or(uri))
}
