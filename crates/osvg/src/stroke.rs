// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use svgtypes::Length;

use crate::measure::{MeasureContext, PercentageBase};
use crate::paint::{Opacity, Paint};

/// A stroke line cap.
///
/// Unrecognized values fall back to `Butt`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LineCap {
    #[default]
    /// Flat edge at the endpoint.
    Butt,
    /// Rounded endpoint.
    Round,
    /// Squared-off endpoint.
    Square,
}

/// A stroke line join.
///
/// Unrecognized values fall back to `Miter`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LineJoin {
    #[default]
    /// Sharp corner, subject to the miter limit.
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

/// Inheritable stroke attributes.
///
/// `None` means "inherit unchanged from the parent scope".
#[derive(Clone, PartialEq, Debug, Default)]
pub struct StrokeContext {
    /// Stroke width.
    pub width: Option<Length>,
    /// Line cap.
    pub line_cap: Option<LineCap>,
    /// Line join.
    pub line_join: Option<LineJoin>,
    /// Miter limit.
    pub miter_limit: Option<f32>,
    /// Dash pattern.
    pub dash_array: Option<Vec<Length>>,
    /// Offset into the dash pattern.
    pub dash_offset: Option<Length>,
}

impl StrokeContext {
    /// Fills unset attributes from `parent`, keeping set ones.
    pub fn derive(&self, parent: &StrokeContext) -> StrokeContext {
        StrokeContext {
            width: self.width.or(parent.width),
            line_cap: self.line_cap.or(parent.line_cap),
            line_join: self.line_join.or(parent.line_join),
            miter_limit: self.miter_limit.or(parent.miter_limit),
            dash_array: self.dash_array.clone().or_else(|| parent.dash_array.clone()),
            dash_offset: self.dash_offset.or(parent.dash_offset),
        }
    }
}

/// A fully resolved stroke ready for the output surface.
#[derive(Clone, PartialEq, Debug)]
pub struct Stroke {
    /// The resolved paint.
    pub paint: Paint,
    /// The effective stroke opacity, ambient opacity included.
    pub opacity: Opacity,
    /// Stroke width in user units.
    pub width: f32,
    /// Miter limit.
    pub miter_limit: f32,
    /// Line cap.
    pub line_cap: LineCap,
    /// Line join.
    pub line_join: LineJoin,
    /// Dash pattern in user units, already scaled by the path-length factor.
    /// `None` when the pattern is absent or degenerate.
    pub dash_array: Option<Vec<f32>>,
    /// Offset into the dash pattern.
    pub dash_offset: f32,
}

impl Default for Stroke {
    fn default() -> Stroke {
        Stroke {
            paint: Paint::Default,
            opacity: Opacity::ONE,
            width: 1.0,
            miter_limit: 4.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            dash_array: None,
            dash_offset: 0.0,
        }
    }
}

/// Resolves inheritable stroke attributes into a concrete stroke.
///
/// `path_length_factor` rescales the dash pattern and offset when the author
/// declared a `pathLength` different from the real arc length.
pub fn resolve(
    path_length_factor: f32,
    measure: &MeasureContext,
    context: &StrokeContext,
    paint: Paint,
    opacity: Opacity,
) -> Stroke {
    let width = context
        .width
        .map(|w| measure.resolve(w, PercentageBase::Diagonal))
        .unwrap_or(1.0);

    let dash_array = context.dash_array.as_deref().and_then(|dashes| {
        let resolved: Vec<f32> = dashes
            .iter()
            .map(|d| measure.resolve(*d, PercentageBase::Diagonal) * path_length_factor)
            .collect();
        // A pattern with a negative dash, or one that never paints, is ignored.
        if resolved.iter().any(|d| *d < 0.0) || resolved.iter().all(|d| *d == 0.0) {
            return None;
        }
        Some(resolved)
    });

    let dash_offset = context
        .dash_offset
        .map(|o| measure.resolve(o, PercentageBase::Diagonal) * path_length_factor)
        .unwrap_or(0.0);

    Stroke {
        paint,
        opacity,
        width,
        miter_limit: context.miter_limit.unwrap_or(4.0),
        line_cap: context.line_cap.unwrap_or_default(),
        line_join: context.line_join.unwrap_or_default(),
        dash_array,
        dash_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgtypes::LengthUnit;

    fn measure() -> MeasureContext {
        MeasureContext::new(100.0, 100.0, 16.0, 8.0)
    }

    #[test]
    fn derive_prefers_own_attributes() {
        let parent = StrokeContext {
            width: Some(Length::new(2.0, LengthUnit::Px)),
            line_cap: Some(LineCap::Round),
            ..StrokeContext::default()
        };
        let child = StrokeContext {
            width: Some(Length::new(3.0, LengthUnit::Px)),
            ..StrokeContext::default()
        };
        let merged = child.derive(&parent);
        assert_eq!(merged.width, Some(Length::new(3.0, LengthUnit::Px)));
        assert_eq!(merged.line_cap, Some(LineCap::Round));
    }

    #[test]
    fn resolve_scales_dashes_by_path_length_factor() {
        let context = StrokeContext {
            dash_array: Some(vec![
                Length::new(4.0, LengthUnit::Px),
                Length::new(2.0, LengthUnit::Px),
            ]),
            dash_offset: Some(Length::new(1.0, LengthUnit::Px)),
            ..StrokeContext::default()
        };
        let stroke = resolve(2.0, &measure(), &context, Paint::Default, Opacity::ONE);
        assert_eq!(stroke.dash_array, Some(vec![8.0, 4.0]));
        assert_eq!(stroke.dash_offset, 2.0);
    }

    #[test]
    fn degenerate_dash_patterns_are_dropped() {
        let zeros = StrokeContext {
            dash_array: Some(vec![Length::new(0.0, LengthUnit::Px)]),
            ..StrokeContext::default()
        };
        assert_eq!(
            resolve(1.0, &measure(), &zeros, Paint::Default, Opacity::ONE).dash_array,
            None
        );

        let negative = StrokeContext {
            dash_array: Some(vec![Length::new(-1.0, LengthUnit::Px)]),
            ..StrokeContext::default()
        };
        assert_eq!(
            resolve(1.0, &measure(), &negative, Paint::Default, Opacity::ONE).dash_array,
            None
        );
    }

    #[test]
    fn resolve_defaults() {
        let stroke = resolve(
            1.0,
            &measure(),
            &StrokeContext::default(),
            Paint::Default,
            Opacity::ONE,
        );
        assert_eq!(stroke.width, 1.0);
        assert_eq!(stroke.miter_limit, 4.0);
        assert_eq!(stroke.line_cap, LineCap::Butt);
        assert_eq!(stroke.line_join, LineJoin::Miter);
    }
}
