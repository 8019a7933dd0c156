// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drag-to-box state machine.
//!
//! Pointer events in display space drive a two-state machine. The
//! transition function is pure: it returns the next state together with the
//! effect the caller has to apply (redraw, draw a preview, commit a box).

use crate::util::geometry::{Point, Rect};

/// Drags smaller than this many display pixels in either direction are
/// treated as clicks and produce no box.
pub const MIN_DRAG_PIXELS: f64 = 2.0;

/// Drawing state of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Drawing {
        start: Point,
    },
}

/// Pointer input in display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    /// Pointer left the canvas; handled exactly like `Up`.
    Leave(Point),
}

/// What the caller must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    None,
    /// Redraw committed boxes only (a drag was discarded).
    Redraw,
    /// Redraw committed boxes plus a dashed preview rectangle.
    Preview(Rect),
    /// Append a box covering this display-space rectangle.
    Commit(Rect),
}

impl DragState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, DragState::Drawing { .. })
    }

    /// Apply one pointer event.
    ///
    /// `image_ready` gates the start of a drag: nothing can be drawn before
    /// the image has loaded.
    pub fn handle(self, event: PointerEvent, image_ready: bool) -> (DragState, DragEffect) {
        match (self, event) {
            (DragState::Idle, PointerEvent::Down(start)) if image_ready => {
                (DragState::Drawing { start }, DragEffect::None)
            }
            (DragState::Idle, _) => (DragState::Idle, DragEffect::None),
            (DragState::Drawing { .. }, PointerEvent::Down(start)) => {
                // A release we never saw; restart from the new press.
                (DragState::Drawing { start }, DragEffect::Redraw)
            }
            (DragState::Drawing { start }, PointerEvent::Move(current)) => (
                self,
                DragEffect::Preview(Rect::from_corners(start, current)),
            ),
            (DragState::Drawing { start }, PointerEvent::Up(end) | PointerEvent::Leave(end)) => {
                let rect = Rect::from_corners(start, end);
                if rect.w < MIN_DRAG_PIXELS || rect.h < MIN_DRAG_PIXELS {
                    (DragState::Idle, DragEffect::Redraw)
                } else {
                    (DragState::Idle, DragEffect::Commit(rect))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(from: (f64, f64), to: (f64, f64)) -> DragEffect {
        let (state, _) = DragState::Idle.handle(PointerEvent::Down(Point::new(from.0, from.1)), true);
        let (state, effect) = state.handle(PointerEvent::Up(Point::new(to.0, to.1)), true);
        assert_eq!(state, DragState::Idle);
        effect
    }

    #[test]
    fn test_down_requires_loaded_image() {
        let (state, effect) = DragState::Idle.handle(PointerEvent::Down(Point::new(1.0, 1.0)), false);
        assert_eq!(state, DragState::Idle);
        assert_eq!(effect, DragEffect::None);
    }

    #[test]
    fn test_move_previews_from_start() {
        let (state, _) = DragState::Idle.handle(PointerEvent::Down(Point::new(50.0, 40.0)), true);
        let (state, effect) = state.handle(PointerEvent::Move(Point::new(20.0, 60.0)), true);
        assert!(state.is_drawing());
        assert_eq!(effect, DragEffect::Preview(Rect::new(20.0, 40.0, 30.0, 20.0)));
    }

    #[test]
    fn test_move_while_idle_does_nothing() {
        let (state, effect) = DragState::Idle.handle(PointerEvent::Move(Point::new(5.0, 5.0)), true);
        assert_eq!(state, DragState::Idle);
        assert_eq!(effect, DragEffect::None);
    }

    #[test]
    fn test_small_drags_are_discarded() {
        assert_eq!(drag((10.0, 10.0), (11.9, 50.0)), DragEffect::Redraw);
        assert_eq!(drag((10.0, 10.0), (50.0, 11.0)), DragEffect::Redraw);
        assert_eq!(drag((10.0, 10.0), (10.0, 10.0)), DragEffect::Redraw);
    }

    #[test]
    fn test_threshold_drags_commit() {
        assert_eq!(
            drag((10.0, 10.0), (12.0, 12.0)),
            DragEffect::Commit(Rect::new(10.0, 10.0, 2.0, 2.0))
        );
        assert_eq!(
            drag((110.0, 60.0), (10.0, 10.0)),
            DragEffect::Commit(Rect::new(10.0, 10.0, 100.0, 50.0))
        );
    }

    #[test]
    fn test_leave_behaves_like_up() {
        let (state, _) = DragState::Idle.handle(PointerEvent::Down(Point::new(0.0, 0.0)), true);
        let (state, effect) = state.handle(PointerEvent::Leave(Point::new(30.0, 30.0)), true);
        assert_eq!(state, DragState::Idle);
        assert_eq!(effect, DragEffect::Commit(Rect::new(0.0, 0.0, 30.0, 30.0)));
    }

    #[test]
    fn test_second_down_restarts_drag() {
        let (state, _) = DragState::Idle.handle(PointerEvent::Down(Point::new(0.0, 0.0)), true);
        let (state, effect) = state.handle(PointerEvent::Down(Point::new(9.0, 9.0)), true);
        assert_eq!(state, DragState::Drawing { start: Point::new(9.0, 9.0) });
        assert_eq!(effect, DragEffect::Redraw);
    }
}
