// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tiny_skia_path::{Point, Transform};

use super::flatten::PathTraversal;

/// Where and how a glyph lands on the path.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GlyphPlacement {
    /// The anchor point on the path (the glyph midpoint).
    pub point: Point,
    /// The tangent direction at the anchor, in radians.
    pub rotation: f32,
    /// The full placement transform mapping a baseline-origin glyph outline
    /// onto the path.
    pub transform: Transform,
}

/// A stateful walker placing glyphs along a flattened path.
///
/// Each glyph is anchored at the midpoint of its advance, rotated to the
/// tangent of the segment the midpoint falls on. Glyphs whose midpoint lies
/// before the traversal start or past its end are skipped while their
/// advance is still consumed, so later glyphs can re-enter the visible
/// range; start offsets are never clamped.
///
/// For a nested sub-scope, [`for_subscope`](PathGlyphCursor::for_subscope)
/// creates a local cursor that inherits the consumed run advance, and
/// [`update_from`](PathGlyphCursor::update_from) folds the local cursor's
/// final state back into the parent, so sequential runs on the same path
/// neither duplicate nor skip advance.
#[derive(Clone, Debug)]
pub struct PathGlyphCursor {
    traversal: PathTraversal,
    start_offset: f32,
    run_advance: f32,
    segment_index: usize,
    segment_start: f32,
    position: Point,
    rotation: f32,
}

impl PathGlyphCursor {
    /// Creates a cursor at `start_offset` along the traversal.
    pub fn new(traversal: PathTraversal, start_offset: f32) -> PathGlyphCursor {
        let (position, rotation) = match traversal.segments().first() {
            Some(segment) => (segment.start, segment.angle()),
            None => (Point::zero(), 0.0),
        };
        let mut cursor = PathGlyphCursor {
            traversal,
            start_offset,
            run_advance: 0.0,
            segment_index: 0,
            segment_start: 0.0,
            position,
            rotation,
        };
        if let Some((point, rotation)) = cursor.point_at(start_offset) {
            cursor.position = point;
            cursor.rotation = rotation;
        }
        cursor
    }

    /// Creates a local cursor for a sub-scope.
    ///
    /// The local cursor walks its own traversal from `start_offset` but
    /// inherits the advance consumed so far, continuing where this cursor
    /// left off.
    pub fn for_subscope(&self, traversal: PathTraversal, start_offset: f32) -> PathGlyphCursor {
        let mut local = PathGlyphCursor::new(traversal, start_offset);
        local.run_advance = self.run_advance;
        local
    }

    /// Folds a local cursor's final state back into this cursor.
    pub fn update_from(&mut self, local: &PathGlyphCursor) {
        self.run_advance = local.run_advance;
        self.position = local.position;
        self.rotation = local.rotation;
    }

    /// Consumes one glyph advance and returns its placement.
    ///
    /// `None` when the glyph midpoint falls outside the traversal; the
    /// advance is consumed either way.
    pub fn advance(&mut self, glyph_advance: f32) -> Option<GlyphPlacement> {
        let half = glyph_advance * 0.5;
        let midpoint = self.start_offset + self.run_advance + half;
        self.run_advance += glyph_advance;

        let (point, rotation) = self.point_at(midpoint)?;
        self.position = point;
        self.rotation = rotation;

        let transform = Transform::from_translate(point.x, point.y)
            .pre_concat(Transform::from_rotate(rotation.to_degrees()))
            .pre_concat(Transform::from_translate(-half, 0.0));

        Some(GlyphPlacement {
            point,
            rotation,
            transform,
        })
    }

    /// Consumes advance without placing a glyph (inter-glyph spacing).
    pub fn skip(&mut self, distance: f32) {
        self.run_advance += distance;
    }

    /// The advance consumed since the cursor was created, start offset
    /// excluded.
    pub fn run_advance(&self) -> f32 {
        self.run_advance
    }

    /// The last computed position on the path.
    pub fn position(&self) -> Point {
        self.position
    }

    /// The last computed tangent direction, in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    fn point_at(&mut self, distance: f32) -> Option<(Point, f32)> {
        if distance < 0.0 {
            return None;
        }
        // Queries are monotone within one cursor; restart only if a caller
        // ever seeks backwards.
        if distance < self.segment_start {
            self.segment_index = 0;
            self.segment_start = 0.0;
        }
        loop {
            let segment = self.traversal.segments().get(self.segment_index)?;
            let length = segment.length();
            if distance <= self.segment_start + length {
                let t = if length > 0.0 {
                    (distance - self.segment_start) / length
                } else {
                    0.0
                };
                return Some((segment.point_at(t), segment.angle()));
            }
            self.segment_start += length;
            self.segment_index += 1;
        }
    }
}
