// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the annotation store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by an [`AnnotationStore`](super::store::AnnotationStore).
///
/// None of these are fatal to an editing session; they surface as warnings
/// and the in-memory annotations stay untouched.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The image directory could not be listed
    #[error("Failed to read data directory {path:?}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The save request is malformed
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The save request body exceeds the accepted size
    #[error("Payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    /// The image named by a save request is not in the data directory
    #[error("Image does not exist: {filename}")]
    ImageNotFound { filename: String },

    /// Writing the result document failed
    #[error("Failed to save annotations to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
