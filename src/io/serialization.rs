// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Save request and result document formats.
//!
//! A [`SaveRequest`] carries the full editing state of one image. The store
//! turns it into an [`AnnotationDocument`], the JSON file written to the
//! results directory.

use super::error::StoreError;
use crate::models::annotation::{BoundingBox, ImageAnnotationSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// Treat `""` the same as a missing value.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// One box as sent in a save request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub cx: f64,
    pub cy: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl From<&BoundingBox> for BoxRecord {
    fn from(b: &BoundingBox) -> Self {
        Self {
            id: b.id().0,
            x: b.x(),
            y: b.y(),
            w: b.w(),
            h: b.h(),
            cx: b.cx(),
            cy: b.cy(),
            label: b.label.clone(),
            description: b.description.clone(),
        }
    }
}

/// Everything needed to persist the annotations of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub filename: String,
    pub boxes: Vec<BoxRecord>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_label: Option<String>,
    #[serde(default)]
    pub image_description: String,
}

impl SaveRequest {
    /// Snapshot the annotation set of `filename`.
    pub fn from_annotations(filename: &str, set: &ImageAnnotationSet) -> Self {
        Self {
            filename: filename.to_string(),
            boxes: set.boxes.iter().map(BoxRecord::from).collect(),
            image_label: set.image_label.clone(),
            image_description: set.image_description.clone(),
        }
    }

    /// Parse an untyped request body.
    ///
    /// Rejects bodies without a non-empty `filename` string or whose `boxes`
    /// is not an array before attempting a typed decode.
    pub fn from_json_value(value: Value) -> Result<Self, StoreError> {
        let has_filename = value
            .get("filename")
            .and_then(Value::as_str)
            .is_some_and(|f| !f.is_empty());
        let has_boxes = value.get("boxes").is_some_and(Value::is_array);
        if !has_filename || !has_boxes {
            return Err(StoreError::InvalidPayload(
                "expected a filename and a boxes array".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| StoreError::InvalidPayload(e.to_string()))
    }
}

/// Box center in natural pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub x: f64,
    pub y: f64,
}

/// Box size in natural pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

/// Persisted form of one box. Unassigned boxes carry an empty label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    pub label: String,
    pub center: Center,
    pub size: Extent,
}

impl From<&BoxRecord> for AnnotationEntry {
    fn from(b: &BoxRecord) -> Self {
        Self {
            label: b.label.clone().unwrap_or_default(),
            center: Center { x: b.cx, y: b.cy },
            size: Extent {
                width: b.w,
                height: b.h,
            },
        }
    }
}

/// The JSON document written for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDocument {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_label: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_description: String,
    pub annotations: Vec<AnnotationEntry>,
}

impl From<&SaveRequest> for AnnotationDocument {
    fn from(request: &SaveRequest) -> Self {
        Self {
            image: request.filename.clone(),
            image_label: request.image_label.clone(),
            image_description: request.image_description.clone(),
            annotations: request.boxes.iter().map(AnnotationEntry::from).collect(),
        }
    }
}

/// Write a document as pretty JSON, replacing `path` in one step.
///
/// The content goes to a sibling temporary file first and is then renamed
/// over the target, so readers see either the old or the new document.
pub fn write_document(document: &AnnotationDocument, path: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(document)?;
    let tmp = path.with_extension("json.tmp");
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&tmp, json).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn read_document(path: &Path) -> AnnotationDocument {
    let json = std::fs::read_to_string(path).expect("result document is readable");
    serde_json::from_str(&json).expect("result document is valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cat_box() -> BoxRecord {
        BoxRecord {
            id: 1,
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
            cx: 60.0,
            cy: 35.0,
            label: Some("cat".to_string()),
            description: "fluffy".to_string(),
        }
    }

    #[test]
    fn test_entry_shape() {
        let entry = AnnotationEntry::from(&cat_box());
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"label": "cat", "center": {"x": 60.0, "y": 35.0}, "size": {"width": 100.0, "height": 50.0}})
        );
    }

    #[test]
    fn test_document_omits_empty_image_fields() {
        let request = SaveRequest {
            filename: "a.png".to_string(),
            boxes: vec![cat_box()],
            image_label: None,
            image_description: String::new(),
        };
        let value = serde_json::to_value(AnnotationDocument::from(&request)).unwrap();
        assert_eq!(value["image"], "a.png");
        assert!(value.get("imageLabel").is_none());
        assert!(value.get("imageDescription").is_none());
        assert_eq!(value["annotations"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_document_keeps_image_fields() {
        let request = SaveRequest {
            filename: "a.png".to_string(),
            boxes: vec![],
            image_label: Some("indoor".to_string()),
            image_description: "kitchen".to_string(),
        };
        let value = serde_json::to_value(AnnotationDocument::from(&request)).unwrap();
        assert_eq!(value["imageLabel"], "indoor");
        assert_eq!(value["imageDescription"], "kitchen");
    }

    #[test]
    fn test_unassigned_label_persists_as_empty() {
        let mut record = cat_box();
        record.label = None;
        assert_eq!(AnnotationEntry::from(&record).label, "");
    }

    #[test]
    fn test_request_from_wire_json() {
        let body = json!({
            "filename": "a.png",
            "boxes": [{"id": 5, "x": 1, "y": 2, "w": 3, "h": 4, "cx": 2.5, "cy": 4, "label": "", "description": "d"}],
            "imageLabel": "",
            "imageDescription": "x"
        });
        let request = SaveRequest::from_json_value(body).unwrap();
        assert_eq!(request.filename, "a.png");
        assert_eq!(request.boxes[0].label, None);
        assert_eq!(request.boxes[0].cx, 2.5);
        assert_eq!(request.image_label, None);
        assert_eq!(request.image_description, "x");
    }

    #[test]
    fn test_request_requires_filename_and_boxes() {
        for body in [
            json!({"boxes": []}),
            json!({"filename": "", "boxes": []}),
            json!({"filename": "a.png"}),
            json!({"filename": "a.png", "boxes": {}}),
            json!(null),
        ] {
            assert!(matches!(
                SaveRequest::from_json_value(body),
                Err(StoreError::InvalidPayload(_))
            ));
        }
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("a.json");
        let request = SaveRequest {
            filename: "a.png".to_string(),
            boxes: vec![cat_box()],
            image_label: None,
            image_description: String::new(),
        };
        let document = AnnotationDocument::from(&request);
        write_document(&document, &path).unwrap();

        assert_eq!(read_document(&path), document);
        assert!(!dir.path().join("a.json.tmp").exists());
    }
}
