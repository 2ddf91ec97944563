// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::hash::{Hash, Hasher};

use svgtypes::AngleUnit;

const DEGREES_PER_GRADIAN: f32 = 0.9;

/// An angle in radians.
///
/// NaN encodes an unspecified angle. Equality and hashing compare the raw
/// bit pattern, so the shared [`Angle::UNSPECIFIED`] constant is equal to
/// itself, while NaN values with a different payload are not. Callers that
/// want semantic "both unspecified" equality must check
/// [`Angle::is_specified`] explicitly.
#[derive(Clone, Copy, Debug)]
pub struct Angle(f32);

impl Angle {
    /// The unspecified sentinel.
    pub const UNSPECIFIED: Angle = Angle(f32::NAN);
    /// A zero angle.
    pub const ZERO: Angle = Angle(0.0);

    /// Creates an angle from a value in the given unit.
    pub fn new(unit: AngleUnit, value: f32) -> Angle {
        let radians = match unit {
            AngleUnit::Degrees => value.to_radians(),
            AngleUnit::Gradians => (value * DEGREES_PER_GRADIAN).to_radians(),
            AngleUnit::Radians => value,
            AngleUnit::Turns => value * std::f32::consts::TAU,
        };
        Angle(radians)
    }

    /// Creates an angle from radians.
    pub fn from_radians(radians: f32) -> Angle {
        Angle(radians)
    }

    /// The angle in radians. NaN when unspecified.
    pub fn radians(&self) -> f32 {
        self.0
    }

    /// Whether `value` encodes an unspecified angle.
    pub fn is_unspecified_value(value: f32) -> bool {
        value.is_nan()
    }

    /// Whether this angle is unspecified.
    pub fn is_unspecified(&self) -> bool {
        self.0.is_nan()
    }

    /// Whether this angle carries an actual value.
    pub fn is_specified(&self) -> bool {
        !self.is_unspecified()
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Angle) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Angle {}

impl Hash for Angle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.0.to_bits());
    }
}
