// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tiny_skia_path::{Path, Point};

use crate::shape::to_kurbo;

/// Segments shorter than this are dropped as degenerate.
const MIN_SEGMENT_LENGTH: f64 = 1e-6;

/// A straight piece of a flattened path.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LineSegment {
    /// Segment start.
    pub start: Point,
    /// Segment end.
    pub end: Point,
}

impl LineSegment {
    /// The segment length.
    pub fn length(&self) -> f32 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// The segment direction, in radians.
    pub fn angle(&self) -> f32 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    /// The point at parameter `t` in `0..=1`.
    pub fn point_at(&self, t: f32) -> Point {
        Point::from_xy(
            self.start.x + (self.end.x - self.start.x) * t,
            self.start.y + (self.end.y - self.start.y) * t,
        )
    }
}

/// A path flattened into straight segments, ready for glyph placement.
///
/// Subpath gaps are not represented explicitly: segment distances simply
/// concatenate, so a cursor jumps across a move-to without consuming
/// advance.
#[derive(Clone, Debug, Default)]
pub struct PathTraversal {
    segments: Vec<LineSegment>,
    length: f32,
}

impl PathTraversal {
    /// Flattens `path` with the given tolerance.
    ///
    /// The tolerance is tied to text metrics by the caller; for glyph
    /// placement a tenth of the x-height is a good enough approximation.
    pub fn flatten(path: &Path, tolerance: f32) -> PathTraversal {
        debug_assert!(tolerance > 0.0, "flattening tolerance must be positive");

        let mut segments = Vec::new();
        let mut subpath_start = kurbo::Point::ZERO;
        let mut current = kurbo::Point::ZERO;
        kurbo::flatten(to_kurbo(path), tolerance as f64, |element| match element {
            kurbo::PathEl::MoveTo(p) => {
                subpath_start = p;
                current = p;
            }
            kurbo::PathEl::LineTo(p) => {
                push_segment(&mut segments, current, p);
                current = p;
            }
            kurbo::PathEl::ClosePath => {
                push_segment(&mut segments, current, subpath_start);
                current = subpath_start;
            }
            // The flattener only emits the three elements above.
            _ => unreachable!("flattened path contains curves"),
        });

        let length = segments.iter().map(LineSegment::length).sum();
        PathTraversal { segments, length }
    }

    /// Reverses the traversal end-to-start.
    ///
    /// The first segment of the result covers the last segment of the
    /// original with its endpoints swapped.
    pub fn reversed(mut self) -> PathTraversal {
        self.segments.reverse();
        for segment in &mut self.segments {
            std::mem::swap(&mut segment.start, &mut segment.end);
        }
        self
    }

    /// The flattened segments, in traversal order.
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    /// The summed segment length.
    pub fn length(&self) -> f32 {
        self.length
    }
}

fn push_segment(segments: &mut Vec<LineSegment>, from: kurbo::Point, to: kurbo::Point) {
    if from.distance(to) < MIN_SEGMENT_LENGTH {
        return;
    }
    segments.push(LineSegment {
        start: Point::from_xy(from.x as f32, from.y as f32),
        end: Point::from_xy(to.x as f32, to.y as f32),
    });
}
