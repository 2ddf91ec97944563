// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::{Arc, OnceLock};

use kurbo::ParamCurveArclen;
use tiny_skia_path::{Path, PathSegment};

use crate::context::RenderContext;

/// Accuracy for kurbo arc-length computations, in user units.
const ARCLEN_ACCURACY: f64 = 0.01;

/// A geometric path queryable for length, closedness and a renderable
/// outline.
///
/// Queries take the current [`RenderContext`] because measurements are
/// defined relative to a coordinate system; this implementation is defined
/// in user space, so the context is not consulted and the arc length is
/// computed once and cached.
#[derive(Clone, Debug)]
pub struct PathShape {
    path: Arc<Path>,
    length: OnceLock<f32>,
}

impl PathShape {
    /// Wraps an already-shared path.
    pub fn new(path: Arc<Path>) -> PathShape {
        PathShape {
            path,
            length: OnceLock::new(),
        }
    }

    /// Wraps an owned path.
    pub fn from_path(path: Path) -> PathShape {
        PathShape::new(Arc::new(path))
    }

    /// The renderable outline.
    pub fn outline(&self, _context: &RenderContext) -> &Arc<Path> {
        &self.path
    }

    /// Whether the outline ends in a closing segment.
    pub fn is_closed(&self, _context: &RenderContext) -> bool {
        matches!(self.path.segments().last(), Some(PathSegment::Close))
    }

    /// The total arc length of the outline.
    pub fn path_length(&self, _context: &RenderContext) -> f32 {
        *self.length.get_or_init(|| compute_length(&self.path))
    }
}

/// Converts a path into kurbo path elements.
pub(crate) fn to_kurbo(path: &Path) -> Vec<kurbo::PathEl> {
    let point = |p: tiny_skia_path::Point| kurbo::Point::new(p.x as f64, p.y as f64);
    path.segments()
        .map(|segment| match segment {
            PathSegment::MoveTo(p) => kurbo::PathEl::MoveTo(point(p)),
            PathSegment::LineTo(p) => kurbo::PathEl::LineTo(point(p)),
            PathSegment::QuadTo(p1, p) => kurbo::PathEl::QuadTo(point(p1), point(p)),
            PathSegment::CubicTo(p1, p2, p) => {
                kurbo::PathEl::CurveTo(point(p1), point(p2), point(p))
            }
            PathSegment::Close => kurbo::PathEl::ClosePath,
        })
        .collect()
}

fn compute_length(path: &Path) -> f32 {
    let bez = kurbo::BezPath::from_vec(to_kurbo(path));
    bez.segments()
        .map(|segment| segment.arclen(ARCLEN_ACCURACY))
        .sum::<f64>() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Platform, RenderContext};
    use crate::measure::MeasureContext;
    use tiny_skia_path::PathBuilder;

    fn context() -> RenderContext {
        RenderContext::create_initial(
            Arc::new(Platform::default()),
            MeasureContext::new(100.0, 100.0, 16.0, 8.0),
        )
    }

    fn triangle(closed: bool) -> PathShape {
        let mut builder = PathBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.line_to(3.0, 0.0);
        builder.line_to(3.0, 4.0);
        if closed {
            builder.close();
        }
        PathShape::from_path(builder.finish().unwrap())
    }

    #[test]
    fn closedness() {
        let context = context();
        assert!(triangle(true).is_closed(&context));
        assert!(!triangle(false).is_closed(&context));
    }

    #[test]
    fn arc_length() {
        let context = context();
        // 3-4-5 triangle.
        assert!((triangle(true).path_length(&context) - 12.0).abs() < 1e-3);
        assert!((triangle(false).path_length(&context) - 7.0).abs() < 1e-3);
    }

    #[test]
    fn curve_length() {
        let mut builder = PathBuilder::new();
        builder.move_to(0.0, 0.0);
        // A degenerate "curve" along the x axis has an exact length.
        builder.quad_to(5.0, 0.0, 10.0, 0.0);
        let shape = PathShape::from_path(builder.finish().unwrap());
        assert!((shape.path_length(&context()) - 10.0).abs() < 1e-3);
    }
}
