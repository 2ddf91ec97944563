// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use svgtypes::{Length, LengthUnit};
use tiny_skia_path::Size;

const CSS_PIXELS_PER_INCH: f32 = 96.0;
const POINTS_PER_INCH: f32 = 72.0;
const CM_PER_INCH: f32 = 2.54;
const MM_PER_INCH: f32 = 25.4;
const PIXELS_PER_PICA: f32 = 16.0;

/// What a percentage length is measured against.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PercentageBase {
    /// The viewport width.
    Width,
    /// The viewport height.
    Height,
    /// The normalized viewport diagonal, `sqrt(w^2 + h^2) / sqrt(2)`.
    Diagonal,
    /// No viewport base; percentages resolve to a raw fraction.
    Custom,
}

/// The numeric baseline lengths and percentages resolve against.
///
/// Carries the current viewport size and the font-relative units of the
/// current scope. `em`/`ex` are finite and positive whenever specified;
/// NaN encodes "unspecified" and keeps the inherited value on derivation.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MeasureContext {
    viewport_width: f32,
    viewport_height: f32,
    em: f32,
    ex: f32,
    root_em: f32,
}

impl MeasureContext {
    /// Creates the baseline for a document root.
    ///
    /// The root em also becomes the initial root-em baseline.
    pub fn new(viewport_width: f32, viewport_height: f32, em: f32, ex: f32) -> MeasureContext {
        debug_assert!(em.is_nan() || em > 0.0, "em must be positive when specified");
        debug_assert!(ex.is_nan() || ex > 0.0, "ex must be positive when specified");
        MeasureContext {
            viewport_width,
            viewport_height,
            em,
            ex,
            root_em: em,
        }
    }

    /// Derives a context for a child scope.
    ///
    /// `viewport` replaces the viewport size when a new view box is
    /// established. NaN `em`/`ex` keep the inherited values.
    pub fn derive(&self, viewport: Option<Size>, em: f32, ex: f32) -> MeasureContext {
        debug_assert!(em.is_nan() || em > 0.0, "em must be positive when specified");
        debug_assert!(ex.is_nan() || ex > 0.0, "ex must be positive when specified");
        MeasureContext {
            viewport_width: viewport.map(|s| s.width()).unwrap_or(self.viewport_width),
            viewport_height: viewport.map(|s| s.height()).unwrap_or(self.viewport_height),
            em: if em.is_nan() { self.em } else { em },
            ex: if ex.is_nan() { self.ex } else { ex },
            root_em: self.root_em,
        }
    }

    /// Resets the root-em baseline.
    ///
    /// Used once per independently-scaled subtree, e.g. a nested viewport.
    pub fn derive_root(&self, root_em: f32) -> MeasureContext {
        MeasureContext {
            root_em,
            ..*self
        }
    }

    /// The viewport width.
    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// The viewport height.
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// The current font size.
    pub fn em(&self) -> f32 {
        self.em
    }

    /// The current x-height.
    pub fn ex(&self) -> f32 {
        self.ex
    }

    /// The font size of the nearest root-measure scope.
    pub fn root_em(&self) -> f32 {
        self.root_em
    }

    /// Resolves a length to user units.
    ///
    /// Physical units use the fixed CSS ratio of 96 px/in.
    pub fn resolve(&self, length: Length, base: PercentageBase) -> f32 {
        let n = length.number as f32;
        match length.unit {
            LengthUnit::None | LengthUnit::Px => n,
            LengthUnit::Em => n * self.em,
            LengthUnit::Ex => n * self.ex,
            LengthUnit::In => n * CSS_PIXELS_PER_INCH,
            LengthUnit::Cm => n * CSS_PIXELS_PER_INCH / CM_PER_INCH,
            LengthUnit::Mm => n * CSS_PIXELS_PER_INCH / MM_PER_INCH,
            LengthUnit::Pt => n * CSS_PIXELS_PER_INCH / POINTS_PER_INCH,
            LengthUnit::Pc => n * PIXELS_PER_PICA,
            LengthUnit::Percent => {
                let fraction = n / 100.0;
                match base {
                    PercentageBase::Width => fraction * self.viewport_width,
                    PercentageBase::Height => fraction * self.viewport_height,
                    PercentageBase::Diagonal => fraction * self.normalized_diagonal(),
                    PercentageBase::Custom => fraction,
                }
            }
        }
    }

    fn normalized_diagonal(&self) -> f32 {
        (self.viewport_width * self.viewport_width + self.viewport_height * self.viewport_height)
            .sqrt()
            / std::f32::consts::SQRT_2
    }
}
