//! Image reference model
//!
//! An expense carries up to two images: a receipt photo and a bank-transfer
//! screenshot. References to those images come in two flavors, and mixing
//! them up is the classic bug this type exists to prevent: a transient
//! reference (a camera temp file, a content-picker URI) may become
//! unreadable after the current session, while a stable path is owned by
//! the app for the lifetime of the record.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A reference to an expense image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ImageRef {
    /// A reference that may become invalid after the current session
    Transient {
        /// Original reference as handed over by the image picker
        uri: String,
    },
    /// An app-owned file path, valid for the lifetime of the record
    Stable {
        /// Absolute path under the app's images directory
        path: PathBuf,
    },
}

impl ImageRef {
    /// Wrap a transient picker/camera reference
    pub fn transient(uri: impl Into<String>) -> Self {
        Self::Transient { uri: uri.into() }
    }

    /// Wrap a stable app-owned path
    pub fn stable(path: impl Into<PathBuf>) -> Self {
        Self::Stable { path: path.into() }
    }

    /// Classify a legacy string field from the un-versioned store formats.
    ///
    /// Legacy records held a single string that was sometimes a picker URI
    /// and sometimes a file path; anything carrying a URI scheme is treated
    /// as transient.
    pub fn from_legacy(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        if raw.contains("://") {
            Some(Self::transient(raw))
        } else {
            Some(Self::stable(raw))
        }
    }

    /// Whether this reference has been materialized into an app-owned file
    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Stable { .. })
    }

    /// The stable path, if materialized
    pub fn as_stable_path(&self) -> Option<&Path> {
        match self {
            Self::Stable { path } => Some(path),
            Self::Transient { .. } => None,
        }
    }

    /// Human-readable form of the underlying reference
    pub fn display_ref(&self) -> String {
        match self {
            Self::Transient { uri } => uri.clone(),
            Self::Stable { path } => path.display().to_string(),
        }
    }
}
