// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transformation between display space
//! (pixels on the drawing surface) and natural space (pixels of the source
//! image, used for everything that gets persisted).

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (or negative).
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle spanned by two opposite corners given in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (b.x - a.x).abs(),
            h: (b.y - a.y).abs(),
        }
    }

    /// Intersection with the area `[0, bounds.width] x [0, bounds.height]`.
    /// Rectangles entirely outside collapse to zero size.
    pub fn clamp_to(&self, bounds: Size) -> Self {
        let x0 = self.x.clamp(0.0, bounds.width);
        let y0 = self.y.clamp(0.0, bounds.height);
        let x1 = (self.x + self.w).clamp(0.0, bounds.width);
        let y1 = (self.y + self.h).clamp(0.0, bounds.height);
        Self {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
        }
    }
}

/// Maps values between display space and natural image space.
///
/// The natural size is unknown until the image has finished loading. Until
/// then, and whenever the display surface has zero size, every conversion
/// yields `0.0` instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    natural: Option<Size>,
    display: Size,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateTransform {
    /// Create a transform with no image loaded.
    pub fn new() -> Self {
        Self {
            natural: None,
            display: Size::ZERO,
        }
    }

    /// Record a freshly loaded image. The display surface is resized to the
    /// natural dimensions exactly.
    pub fn set_image(&mut self, natural: Size) {
        self.natural = Some(natural);
        self.display = natural;
    }

    /// Forget the current image (a new one is loading).
    pub fn clear_image(&mut self) {
        self.natural = None;
    }

    /// Resize the display surface without touching the natural size.
    pub fn resize_display(&mut self, display: Size) {
        self.display = display;
    }

    pub fn natural(&self) -> Option<Size> {
        self.natural
    }

    pub fn display(&self) -> Size {
        self.display
    }

    /// Whether conversions produce meaningful values.
    pub fn is_ready(&self) -> bool {
        self.sizes().is_some()
    }

    fn sizes(&self) -> Option<(Size, Size)> {
        match self.natural {
            Some(natural) if !natural.is_empty() && !self.display.is_empty() => {
                Some((natural, self.display))
            }
            _ => None,
        }
    }

    pub fn to_natural_x(&self, value: f64) -> f64 {
        self.sizes()
            .map_or(0.0, |(natural, display)| value * natural.width / display.width)
    }

    pub fn to_natural_y(&self, value: f64) -> f64 {
        self.sizes()
            .map_or(0.0, |(natural, display)| value * natural.height / display.height)
    }

    pub fn to_display_x(&self, value: f64) -> f64 {
        self.sizes()
            .map_or(0.0, |(natural, display)| value * display.width / natural.width)
    }

    pub fn to_display_y(&self, value: f64) -> f64 {
        self.sizes()
            .map_or(0.0, |(natural, display)| value * display.height / natural.height)
    }

    /// Current display-per-natural scale factors, computed on every call.
    pub fn scale(&self) -> Option<(f64, f64)> {
        self.sizes().map(|(natural, display)| {
            (
                display.width / natural.width,
                display.height / natural.height,
            )
        })
    }

    /// Convert a display-space rectangle into natural space.
    pub fn rect_to_natural(&self, rect: Rect) -> Rect {
        Rect {
            x: self.to_natural_x(rect.x),
            y: self.to_natural_y(rect.y),
            w: self.to_natural_x(rect.w),
            h: self.to_natural_y(rect.h),
        }
    }

    /// Convert a natural-space rectangle into display space for drawing.
    pub fn rect_to_display(&self, rect: Rect) -> Rect {
        let (scale_x, scale_y) = self.scale().unwrap_or((0.0, 0.0));
        Rect {
            x: rect.x * scale_x,
            y: rect.y * scale_y,
            w: rect.w * scale_x,
            h: rect.h * scale_y,
        }
    }
}
