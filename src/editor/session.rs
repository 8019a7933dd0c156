// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing session controller.
//!
//! A [`Session`] owns everything the editor knows about the current run:
//! the image list, the position in it, the label registry and the
//! annotations of the image on screen. It is the only writer of that state.
//! Navigation always saves the outgoing image first and only moves on after
//! the store acknowledges the save.

use super::drag::{DragEffect, DragState, PointerEvent};
use crate::io::error::StoreError;
use crate::io::serialization::SaveRequest;
use crate::io::store::{AnnotationStore, SaveAck};
use crate::models::annotation::{BoundingBox, BoxId, BoxIdGenerator, ImageAnnotationSet};
use crate::models::label::LabelSet;
use crate::util::geometry::{CoordinateTransform, Point, Rect, Size};
use thiserror::Error;

/// Visual weight of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Success,
    Warning,
}

/// Single-line status shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub tone: Tone,
}

impl Status {
    fn new(message: impl Into<String>, tone: Tone) -> Self {
        Self {
            message: message.into(),
            tone,
        }
    }
}

/// Why a save did not happen.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("No image is being annotated")]
    NotStarted,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// State of one annotation run.
#[derive(Debug)]
pub struct Session {
    images: Vec<String>,
    current_index: Option<usize>,
    labels: LabelSet,
    annotations: ImageAnnotationSet,
    transform: CoordinateTransform,
    drag: DragState,
    preview: Option<Rect>,
    /// Box shown in the stats view; presentation only.
    active: Option<BoxId>,
    ids: BoxIdGenerator,
    status: Status,
}

impl Session {
    /// Create a session with an initial label set and no images yet.
    pub fn new(labels: LabelSet) -> Self {
        Self {
            images: Vec::new(),
            current_index: None,
            labels,
            annotations: ImageAnnotationSet::new(),
            transform: CoordinateTransform::new(),
            drag: DragState::Idle,
            preview: None,
            active: None,
            ids: BoxIdGenerator::new(),
            status: Status::new("Add labels to begin.", Tone::Muted),
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current_filename(&self) -> Option<&str> {
        self.current_index
            .and_then(|i| self.images.get(i))
            .map(String::as_str)
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn annotations(&self) -> &ImageAnnotationSet {
        &self.annotations
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Dashed rectangle of the drag in progress, in display space.
    pub fn preview(&self) -> Option<Rect> {
        self.preview
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Show a warning in the status line and log it.
    pub fn warn(&mut self, message: impl Into<String>) {
        let status = Status::new(message, Tone::Warning);
        log::warn!("{}", status.message);
        self.status = status;
    }

    /// Fetch the image list. Called once per session; the list is fixed
    /// afterwards.
    pub fn load_image_list<S: AnnotationStore + ?Sized>(&mut self, store: &S) {
        match store.list_images() {
            Ok(images) => {
                self.images = images;
                if self.images.is_empty() {
                    self.warn("No images found in data folder.");
                }
            }
            Err(e) => {
                self.images.clear();
                self.warn(format!("Failed to load images: {}", e));
            }
        }
    }

    /// Register a label. Blank and duplicate labels are silently ignored.
    pub fn add_label(&mut self, label: &str) -> bool {
        let added = self.labels.add(label);
        if added {
            log::info!("Added label '{}', total: {}", label.trim(), self.labels.len());
        }
        added
    }

    /// Begin annotating at the first image.
    ///
    /// Returns the file name to load, or `None` (with a warning) when there
    /// are no labels or no images. Restarting a running session saves the
    /// current image first, and a failed save keeps the session in place.
    pub fn start<S: AnnotationStore + ?Sized>(&mut self, store: &S) -> Option<String> {
        if self.labels.is_empty() {
            self.warn("Please add at least one label before starting.");
            return None;
        }
        if self.images.is_empty() {
            self.warn("No images to annotate.");
            return None;
        }
        if self.current_index.is_some() {
            self.save(store).ok()?;
        }
        log::info!("Starting annotation of {} images", self.images.len());
        self.go_to(0)
    }

    /// Jump to an image. Out-of-range indices are ignored.
    fn go_to(&mut self, index: usize) -> Option<String> {
        if index >= self.images.len() {
            return None;
        }
        self.current_index = Some(index);
        self.load_current()
    }

    /// Reset the annotation state for the current image and return its file
    /// name so the caller can fetch the pixels.
    ///
    /// Everything is cleared before the image arrives so nothing from the
    /// previous image is ever drawn over the new one.
    fn load_current(&mut self) -> Option<String> {
        let filename = self.current_filename()?.to_string();

        self.annotations = ImageAnnotationSet::new();
        self.transform.clear_image();
        self.drag = DragState::Idle;
        self.preview = None;
        self.active = None;
        self.status = Status::new("Loading image...", Tone::Muted);

        log::info!("Loading image {}", filename);
        Some(filename)
    }

    /// The pixels of `filename` arrived. Loads for an image that is no
    /// longer current are ignored.
    pub fn image_loaded(&mut self, filename: &str, natural: Size) {
        if self.current_filename() != Some(filename) {
            log::debug!("Ignoring stale load of {}", filename);
            return;
        }
        self.transform.set_image(natural);
        self.status = Status::new("Click and drag on the image to draw a box.", Tone::Muted);
        log::info!(
            "Image {} loaded ({}x{})",
            filename,
            natural.width,
            natural.height
        );
    }

    /// The pixels of `filename` could not be loaded. The session carries on.
    pub fn image_failed(&mut self, filename: &str, reason: &str) {
        if self.current_filename() != Some(filename) {
            return;
        }
        self.warn(format!("Failed to load {}: {}", filename, reason));
    }

    /// The drawing surface changed size.
    pub fn resize_display(&mut self, display: Size) {
        if self.transform.display() != display {
            log::debug!("Display resized to {}x{}", display.width, display.height);
            self.transform.resize_display(display);
        }
    }

    /// Feed a pointer event through the drag state machine.
    ///
    /// Presses outside the image are ignored. The returned effect is
    /// `Commit` only when a box was actually appended.
    pub fn pointer(&mut self, event: PointerEvent) -> DragEffect {
        if let PointerEvent::Down(p) = event {
            if !self.on_image(p) {
                log::trace!("Ignoring press outside the image at ({}, {})", p.x, p.y);
                return DragEffect::None;
            }
        }

        let (next, effect) = self.drag.handle(event, self.transform.is_ready());
        self.drag = next;
        match effect {
            DragEffect::None => {}
            DragEffect::Preview(rect) => self.preview = Some(rect),
            DragEffect::Redraw => {
                log::trace!("Discarded drag");
                self.preview = None;
            }
            DragEffect::Commit(rect) => {
                self.preview = None;
                if self.commit_box(rect).is_none() {
                    return DragEffect::Redraw;
                }
            }
        }
        effect
    }

    /// Whether a display point lies on a pixel of the image.
    fn on_image(&self, p: Point) -> bool {
        let display = self.transform.display();
        p.x >= 0.0 && p.y >= 0.0 && p.x < display.width && p.y < display.height
    }

    fn commit_box(&mut self, display_rect: Rect) -> Option<BoxId> {
        let clamped = display_rect.clamp_to(self.transform.display());
        let natural = self.transform.rect_to_natural(clamped);
        let label = self.labels.first().map(str::to_string);

        let Some(new_box) = BoundingBox::from_natural_rect(self.ids.next_id(), natural, label) else {
            log::debug!("Dropped degenerate box {:?}", natural);
            return None;
        };
        let id = new_box.id();
        self.annotations.boxes.push(new_box);
        self.active = Some(id);
        log::info!("Added box {}, total: {}", id, self.annotations.boxes.len());
        Some(id)
    }

    /// Change the label of a box. Only known labels are accepted.
    pub fn relabel(&mut self, id: BoxId, label: &str) -> bool {
        if !self.labels.contains(label) {
            return false;
        }
        let Some(b) = self.annotations.get_mut(id) else {
            return false;
        };
        b.label = Some(label.to_string());
        self.active = Some(id);
        true
    }

    /// Replace the description of a box.
    pub fn describe(&mut self, id: BoxId, description: impl Into<String>) -> bool {
        let Some(b) = self.annotations.get_mut(id) else {
            return false;
        };
        b.description = description.into();
        self.active = Some(id);
        true
    }

    /// Remove a box. Unknown ids are a no-op.
    pub fn delete_box(&mut self, id: BoxId) -> bool {
        let removed = self.annotations.remove(id);
        if removed {
            if self.active == Some(id) {
                self.active = None;
            }
            log::info!("Deleted box {}, total: {}", id, self.annotations.boxes.len());
        }
        removed
    }

    /// Mark a box as the one shown in the stats view.
    pub fn touch(&mut self, id: BoxId) {
        if self.annotations.get(id).is_some() {
            self.active = Some(id);
        }
    }

    /// Box for the stats view: the last one interacted with, else the
    /// newest.
    pub fn active_box(&self) -> Option<&BoundingBox> {
        self.active
            .and_then(|id| self.annotations.get(id))
            .or_else(|| self.annotations.boxes.last())
    }

    /// Classify the whole image. `None` clears it; unknown labels are
    /// rejected.
    pub fn set_image_label(&mut self, label: Option<&str>) -> bool {
        match label {
            Some(l) if !self.labels.contains(l) => false,
            _ => {
                self.annotations.image_label = label.map(str::to_string);
                true
            }
        }
    }

    pub fn set_image_description(&mut self, description: impl Into<String>) {
        self.annotations.image_description = description.into();
    }

    /// Snapshot of the current image's annotations.
    pub fn save_request(&self) -> Option<SaveRequest> {
        let filename = self.current_filename()?;
        Some(SaveRequest::from_annotations(filename, &self.annotations))
    }

    /// Persist the current image's annotations without navigating.
    ///
    /// In-memory state is left untouched whatever the outcome.
    pub fn save<S: AnnotationStore + ?Sized>(&mut self, store: &S) -> Result<SaveAck, SaveError> {
        let request = self.save_request().ok_or(SaveError::NotStarted)?;
        match store.save(&request) {
            Ok(ack) => {
                self.status = Status::new(
                    format!("Saved annotations for {}.", request.filename),
                    Tone::Success,
                );
                Ok(ack)
            }
            Err(e) => {
                self.warn(format!("Failed to save annotations for {}: {}", request.filename, e));
                Err(e.into())
            }
        }
    }

    /// Save, then move to the next image. Returns the file name to load.
    ///
    /// A failed save leaves the session exactly where it was.
    pub fn next<S: AnnotationStore + ?Sized>(&mut self, store: &S) -> Option<String> {
        self.save(store).ok()?;
        let index = self.current_index?;
        self.go_to(index + 1)
    }

    /// Save, then move to the previous image. Returns the file name to load.
    pub fn previous<S: AnnotationStore + ?Sized>(&mut self, store: &S) -> Option<String> {
        self.save(store).ok()?;
        let index = self.current_index?.checked_sub(1)?;
        self.go_to(index)
    }
}
