// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines bounding boxes and the per-image annotation set.
//! All geometry is stored in natural image pixels.

use crate::util::geometry::Rect;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier of a box, derived from its creation time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxId(pub u64);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out timestamp ids that never repeat within a session.
#[derive(Debug, Default)]
pub struct BoxIdGenerator {
    last: u64,
}

impl BoxIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id based on the wall clock.
    pub fn next_id(&mut self) -> BoxId {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.next_id_at(millis)
    }

    /// Next id for the given timestamp, bumped past the last one issued.
    pub fn next_id_at(&mut self, millis: u64) -> BoxId {
        let id = millis.max(self.last + 1);
        self.last = id;
        BoxId(id)
    }
}

/// A labeled rectangle within one image.
///
/// Geometry is only reachable through accessors so the center always agrees
/// with the top-left corner and size, and the size is never degenerate.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    id: BoxId,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    pub label: Option<String>,
    pub description: String,
}

impl BoundingBox {
    /// Build a box from a natural-space rectangle.
    ///
    /// Returns `None` when the width or height is not strictly positive or
    /// any coordinate is negative or not finite.
    pub fn from_natural_rect(id: BoxId, rect: Rect, label: Option<String>) -> Option<Self> {
        let finite = [rect.x, rect.y, rect.w, rect.h].iter().all(|v| v.is_finite());
        if !finite || rect.w <= 0.0 || rect.h <= 0.0 || rect.x < 0.0 || rect.y < 0.0 {
            return None;
        }
        Some(Self {
            id,
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
            label,
            description: String::new(),
        })
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn cx(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn cy(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Top-left rectangle in natural space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Boxes and whole-image metadata for a single image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageAnnotationSet {
    pub image_label: Option<String>,
    pub image_description: String,
    pub boxes: Vec<BoundingBox>,
}

impl ImageAnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: BoxId) -> Option<&BoundingBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut BoundingBox> {
        self.boxes.iter_mut().find(|b| b.id == id)
    }

    /// Remove a box by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: BoxId) -> bool {
        let before = self.boxes.len();
        self.boxes.retain(|b| b.id != id);
        self.boxes.len() != before
    }
}
