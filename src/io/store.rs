// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Folder-backed annotation store.
//!
//! Images are read from a data directory and one JSON result per image is
//! written to a results directory, named after the image's base name.

use super::error::StoreError;
use super::serialization::{write_document, AnnotationDocument, SaveRequest};
use std::path::{Path, PathBuf};

/// Extensions recognized as images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Largest save request body accepted by [`FolderStore::save_json`].
pub const MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Explicit acknowledgment of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAck {
    /// Where the result document was written
    pub path: PathBuf,
}

/// Source of images and sink for annotation results.
pub trait AnnotationStore {
    /// Sorted image file names available for annotation.
    fn list_images(&self) -> Result<Vec<String>, StoreError>;

    /// Location of the bytes for a listed image.
    fn image_path(&self, filename: &str) -> PathBuf;

    /// Validate and persist a save request, replacing any earlier result.
    fn save(&self, request: &SaveRequest) -> Result<SaveAck, StoreError>;
}

/// Whether a file name carries a recognized image extension.
pub fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Store reading images from `data_dir` and writing results to `result_dir`.
#[derive(Debug, Clone)]
pub struct FolderStore {
    data_dir: PathBuf,
    result_dir: PathBuf,
}

impl FolderStore {
    /// Open a store, creating the results directory when missing.
    pub fn new(data_dir: impl Into<PathBuf>, result_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            data_dir: data_dir.into(),
            result_dir: result_dir.into(),
        };
        std::fs::create_dir_all(&store.result_dir).map_err(|source| StoreError::Write {
            path: store.result_dir.clone(),
            source,
        })?;
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }

    /// Result document path for an image file name.
    pub fn result_path(&self, filename: &str) -> PathBuf {
        let stem = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string());
        self.result_dir.join(format!("{}.json", stem))
    }

    /// Accept a raw JSON request body.
    pub fn save_json(&self, body: &[u8]) -> Result<SaveAck, StoreError> {
        if body.len() > MAX_PAYLOAD_BYTES {
            return Err(StoreError::PayloadTooLarge {
                size: body.len(),
                limit: MAX_PAYLOAD_BYTES,
            });
        }
        let value = serde_json::from_slice(body)
            .map_err(|e| StoreError::InvalidPayload(e.to_string()))?;
        let request = SaveRequest::from_json_value(value)?;
        self.save(&request)
    }

    /// Resolve a request file name to an existing image in the data directory.
    ///
    /// Only plain file names are accepted, so a request cannot point outside
    /// the data directory.
    fn existing_image(&self, filename: &str) -> Result<PathBuf, StoreError> {
        let plain = Path::new(filename)
            .file_name()
            .is_some_and(|name| name == filename);
        if !plain {
            return Err(StoreError::ImageNotFound {
                filename: filename.to_string(),
            });
        }
        let path = self.data_dir.join(filename);
        if !path.is_file() {
            return Err(StoreError::ImageNotFound {
                filename: filename.to_string(),
            });
        }
        Ok(path)
    }
}

impl AnnotationStore for FolderStore {
    fn list_images(&self) -> Result<Vec<String>, StoreError> {
        let unreadable = |source| StoreError::DirectoryUnreadable {
            path: self.data_dir.clone(),
            source,
        };

        let mut images = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_image_file(&name) {
                images.push(name);
            }
        }
        images.sort();

        log::info!("Found {} images in {}", images.len(), self.data_dir.display());
        Ok(images)
    }

    fn image_path(&self, filename: &str) -> PathBuf {
        self.data_dir.join(filename)
    }

    fn save(&self, request: &SaveRequest) -> Result<SaveAck, StoreError> {
        if request.filename.is_empty() {
            return Err(StoreError::InvalidPayload("missing filename".to_string()));
        }
        self.existing_image(&request.filename)?;

        let path = self.result_path(&request.filename);
        write_document(&AnnotationDocument::from(request), &path)?;

        log::info!(
            "Saved {} annotations for {} to {}",
            request.boxes.len(),
            request.filename,
            path.display()
        );
        Ok(SaveAck { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::serialization::{read_document, BoxRecord};

    fn store_with(files: &[&str]) -> (tempfile::TempDir, FolderStore) {
        let temp = tempfile::tempdir().expect("create temp dir");
        let data = temp.path().join("data");
        std::fs::create_dir_all(&data).unwrap();
        for file in files {
            std::fs::write(data.join(file), b"not really an image").unwrap();
        }
        let store = FolderStore::new(&data, temp.path().join("result")).unwrap();
        (temp, store)
    }

    fn request(filename: &str, label: &str) -> SaveRequest {
        SaveRequest {
            filename: filename.to_string(),
            boxes: vec![BoxRecord {
                id: 1,
                x: 10.0,
                y: 10.0,
                w: 100.0,
                h: 50.0,
                cx: 60.0,
                cy: 35.0,
                label: Some(label.to_string()),
                description: String::new(),
            }],
            image_label: None,
            image_description: String::new(),
        }
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        assert!(is_image_file("a.PNG"));
        assert!(is_image_file("b.JpEg"));
        assert!(is_image_file("c.gif"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("png"));
        assert!(!is_image_file("archive.png.zip"));
    }

    #[test]
    fn test_list_images_filters_and_sorts() {
        let (_temp, store) = store_with(&["b.png", "a.JPG", "readme.md", "c.bmp"]);
        assert_eq!(store.list_images().unwrap(), vec!["a.JPG", "b.png", "c.bmp"]);
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let (_temp, store) = store_with(&[]);
        assert!(store.list_images().unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_unreadable() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let store = FolderStore::new(temp.path().join("nope"), temp.path().join("result")).unwrap();
        assert!(matches!(
            store.list_images(),
            Err(StoreError::DirectoryUnreadable { .. })
        ));
    }

    #[test]
    fn test_new_creates_result_dir() {
        let (_temp, store) = store_with(&[]);
        assert!(store.result_dir().is_dir());
    }

    #[test]
    fn test_save_writes_document_named_after_stem() {
        let (_temp, store) = store_with(&["a.png"]);
        let ack = store.save(&request("a.png", "cat")).unwrap();

        assert_eq!(ack.path, store.result_dir().join("a.json"));
        let document = read_document(&ack.path);
        assert_eq!(document.image, "a.png");
        assert_eq!(document.annotations.len(), 1);
        assert_eq!(document.annotations[0].label, "cat");
        assert_eq!(document.annotations[0].center.x, 60.0);
        assert_eq!(document.annotations[0].size.height, 50.0);
    }

    #[test]
    fn test_save_rejects_unknown_image() {
        let (_temp, store) = store_with(&["a.png"]);
        assert!(matches!(
            store.save(&request("missing.png", "cat")),
            Err(StoreError::ImageNotFound { .. })
        ));
        assert!(!store.result_dir().join("missing.json").exists());
    }

    #[test]
    fn test_save_rejects_paths_outside_data_dir() {
        let (temp, store) = store_with(&["a.png"]);
        std::fs::write(temp.path().join("outside.png"), b"x").unwrap();
        assert!(matches!(
            store.save(&request("../outside.png", "cat")),
            Err(StoreError::ImageNotFound { .. })
        ));
    }

    #[test]
    fn test_back_to_back_saves_last_write_wins() {
        let (_temp, store) = store_with(&["a.png"]);
        store.save(&request("a.png", "cat")).unwrap();
        let ack = store.save(&request("a.png", "dog")).unwrap();

        let document = read_document(&ack.path);
        assert_eq!(document.annotations.len(), 1);
        assert_eq!(document.annotations[0].label, "dog");
    }

    #[test]
    fn test_save_json_validates_body() {
        let (_temp, store) = store_with(&["a.png"]);
        assert!(matches!(
            store.save_json(br#"{"boxes": []}"#),
            Err(StoreError::InvalidPayload(_))
        ));
        assert!(matches!(
            store.save_json(br#"{"filename": "a.png", "boxes": 3}"#),
            Err(StoreError::InvalidPayload(_))
        ));
        assert!(matches!(
            store.save_json(b"not json"),
            Err(StoreError::InvalidPayload(_))
        ));
        assert!(store
            .save_json(br#"{"filename": "a.png", "boxes": [], "imageLabel": "", "imageDescription": ""}"#)
            .is_ok());
    }

    #[test]
    fn test_save_json_accepts_large_sessions() {
        let (_temp, store) = store_with(&["a.png"]);
        let mut big = request("a.png", "cat");
        let template = big.boxes[0].clone();
        big.boxes = (0..200)
            .map(|i| BoxRecord {
                id: i,
                description: "d".repeat(10_000),
                ..template.clone()
            })
            .collect();
        let body = serde_json::to_vec(&big).unwrap();
        assert!(body.len() > 1024 * 1024);
        store.save_json(&body).unwrap();
    }

    #[test]
    fn test_save_json_rejects_oversized_body() {
        let (_temp, store) = store_with(&["a.png"]);
        let body = vec![b' '; MAX_PAYLOAD_BYTES + 1];
        assert!(matches!(
            store.save_json(&body),
            Err(StoreError::PayloadTooLarge { .. })
        ));
    }
}
