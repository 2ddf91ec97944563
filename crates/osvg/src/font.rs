// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use svgtypes::{Length, LengthUnit};

use crate::geom::Angle;
use crate::measure::{MeasureContext, PercentageBase};

/// The default font size in user units.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Derives the x-height from an em size.
///
/// A good enough approximation when no exact font metric is available.
pub fn ex_from_em(em: f32) -> f32 {
    em * 0.5
}

/// A font style.
///
/// Unrecognized values fall back to `Normal`.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum FontStyle {
    #[default]
    /// Upright glyphs.
    Normal,
    /// Italic glyphs.
    Italic,
    /// Slanted glyphs, with an optional slant angle.
    Oblique(Angle),
}

/// A font specification that can be measured against a [`MeasureContext`].
///
/// The size may use font-relative units, which resolve against the
/// *inherited* font size of the current scope.
#[derive(Clone, PartialEq, Debug)]
pub struct FontSpec {
    /// Requested font families, in preference order.
    pub families: Vec<String>,
    /// Font style.
    pub style: FontStyle,
    /// CSS font weight, 400 is normal.
    pub weight: u16,
    /// Font size.
    pub size: Length,
}

impl Default for FontSpec {
    fn default() -> FontSpec {
        FontSpec {
            families: vec!["sans-serif".to_string()],
            style: FontStyle::Normal,
            weight: 400,
            size: Length::new(DEFAULT_FONT_SIZE as f64, LengthUnit::Px),
        }
    }
}

impl FontSpec {
    /// The effective font size in user units.
    ///
    /// Percentages and `em` units are relative to the inherited font size,
    /// i.e. the em of `measure`.
    pub fn effective_size(&self, measure: &MeasureContext) -> f32 {
        if self.size.unit == LengthUnit::Percent {
            return (self.size.number / 100.0) as f32 * measure.em();
        }
        measure.resolve(self.size, PercentageBase::Custom)
    }
}

/// A functional update for a [`FontSpec`].
///
/// Unset fields inherit from the base spec.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct FontModifier {
    /// New font families.
    pub families: Option<Vec<String>>,
    /// New font style.
    pub style: Option<FontStyle>,
    /// New font weight.
    pub weight: Option<u16>,
    /// New font size.
    pub size: Option<Length>,
}

impl FontModifier {
    /// Applies the update, producing a new spec.
    pub fn apply(&self, base: &FontSpec) -> FontSpec {
        FontSpec {
            families: self.families.clone().unwrap_or_else(|| base.families.clone()),
            style: self.style.unwrap_or(base.style),
            weight: self.weight.unwrap_or(base.weight),
            size: self.size.unwrap_or(base.size),
        }
    }
}

/// Text-rendering attributes carried alongside the font spec.
///
/// `None` means "inherit unchanged from the parent scope".
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct FontRenderContext {
    /// Additional advance between glyphs.
    pub letter_spacing: Option<Length>,
    /// Additional advance between words.
    pub word_spacing: Option<Length>,
}

impl FontRenderContext {
    /// Merges `other` on top of this context; `other`'s set fields win.
    pub fn derive(&self, other: Option<&FontRenderContext>) -> FontRenderContext {
        match other {
            Some(other) => FontRenderContext {
                letter_spacing: other.letter_spacing.or(self.letter_spacing),
                word_spacing: other.word_spacing.or(self.word_spacing),
            },
            None => *self,
        }
    }
}

/// A font-selection function.
#[cfg(feature = "text")]
pub type FontSelectionFn =
    Box<dyn Fn(&FontSpec, &fontdb::Database) -> Option<fontdb::ID> + Send + Sync>;

/// The font resolution service.
///
/// Given a font spec and a database, selects the face used for glyph shape
/// queries. Shaping itself happens outside this crate.
#[cfg(feature = "text")]
pub struct FontResolver {
    /// Selects a font face for a spec.
    pub select_font: FontSelectionFn,
}

#[cfg(feature = "text")]
impl Default for FontResolver {
    fn default() -> FontResolver {
        FontResolver {
            select_font: FontResolver::default_font_selector(),
        }
    }
}

#[cfg(feature = "text")]
impl std::fmt::Debug for FontResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FontResolver { .. }")
    }
}

#[cfg(feature = "text")]
impl FontResolver {
    /// The default font selector: a CSS-like query against the database.
    pub fn default_font_selector() -> FontSelectionFn {
        Box::new(|spec, db| {
            let families: Vec<fontdb::Family<'_>> = spec
                .families
                .iter()
                .map(|family| match family.as_str() {
                    "serif" => fontdb::Family::Serif,
                    "sans-serif" => fontdb::Family::SansSerif,
                    "cursive" => fontdb::Family::Cursive,
                    "fantasy" => fontdb::Family::Fantasy,
                    "monospace" => fontdb::Family::Monospace,
                    name => fontdb::Family::Name(name),
                })
                .collect();

            let style = match spec.style {
                FontStyle::Normal => fontdb::Style::Normal,
                FontStyle::Italic => fontdb::Style::Italic,
                FontStyle::Oblique(_) => fontdb::Style::Oblique,
            };

            db.query(&fontdb::Query {
                families: &families,
                weight: fontdb::Weight(spec.weight),
                stretch: fontdb::Stretch::Normal,
                style,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_size_units() {
        let measure = MeasureContext::new(100.0, 100.0, 10.0, 5.0);
        let spec = |size| FontSpec {
            size,
            ..FontSpec::default()
        };
        assert_eq!(
            spec(Length::new(12.0, LengthUnit::Px)).effective_size(&measure),
            12.0
        );
        assert_eq!(
            spec(Length::new(2.0, LengthUnit::Em)).effective_size(&measure),
            20.0
        );
        assert_eq!(
            spec(Length::new(150.0, LengthUnit::Percent)).effective_size(&measure),
            15.0
        );
    }

    #[test]
    fn modifier_keeps_unset_fields() {
        let base = FontSpec::default();
        let modifier = FontModifier {
            weight: Some(700),
            ..FontModifier::default()
        };
        let derived = modifier.apply(&base);
        assert_eq!(derived.weight, 700);
        assert_eq!(derived.families, base.families);
        assert_eq!(derived.size, base.size);
    }

    #[test]
    fn render_context_merge() {
        let parent = FontRenderContext {
            letter_spacing: Some(Length::new(1.0, LengthUnit::Px)),
            word_spacing: None,
        };
        let child = FontRenderContext {
            word_spacing: Some(Length::new(2.0, LengthUnit::Px)),
            letter_spacing: None,
        };
        let merged = parent.derive(Some(&child));
        assert_eq!(merged.letter_spacing, Some(Length::new(1.0, LengthUnit::Px)));
        assert_eq!(merged.word_spacing, Some(Length::new(2.0, LengthUnit::Px)));
        assert_eq!(parent.derive(None), parent);
    }
}
