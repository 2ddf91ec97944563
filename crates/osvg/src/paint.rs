// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use strict_num::NormalizedF32;

pub use svgtypes::Color;

/// An alpha value in the `0..=1` range.
///
/// Produced already-normalized by the attribute layer; this crate only
/// multiplies opacities together and never clamps beyond what the type
/// guarantees.
pub type Opacity = NormalizedF32;

/// A fill or stroke paint value.
///
/// The sentinel variants form a closed set so that resolution can match on
/// tags instead of comparing shared singleton objects.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Paint {
    /// The inherited/default paint, resolved through the cascaded `color`
    /// property.
    Default,
    /// No paint; the corresponding fill or stroke is skipped.
    None,
    /// The cascaded `color` property.
    CurrentColor,
    /// The fill paint of the element that established context paint.
    ContextFill,
    /// The stroke paint of the element that established context paint.
    ContextStroke,
    /// A concrete color.
    Color(Color),
}

impl Paint {
    /// Whether this paint draws nothing.
    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }
}

/// A filling rule.
///
/// Unrecognized values fall back to `NonZero`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FillRule {
    #[default]
    /// Fill everything with a non-zero winding number.
    NonZero,
    /// Fill regions crossed an odd number of times.
    EvenOdd,
}

/// The order in which fill and stroke are painted.
///
/// Unrecognized values fall back to `FillAndStroke`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PaintOrder {
    #[default]
    /// Fill first, stroke on top.
    FillAndStroke,
    /// Stroke first, fill on top.
    StrokeAndFill,
}

/// A fully resolved fill ready for the output surface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Fill {
    /// The resolved paint.
    pub paint: Paint,
    /// The effective fill opacity, ambient opacity included.
    pub opacity: Opacity,
    /// The filling rule.
    pub rule: FillRule,
}
