// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/*!
[osvg](https://github.com/osvg/osvg) is an SVG rendering-state and
text-on-path layout library.

It implements the two hard parts of a vector-graphics document renderer:

- A cascading, inheritable rendering context ([`RenderContext`]) tracking
  paint, opacity, font metrics and coordinate transforms while a scene tree
  is walked, including indirect "context paint" reuse.
- Glyph layout along an arbitrary path ([`text::TextPath`],
  [`text::PathGlyphCursor`]): traversal, direction reversal, closed-path
  wraparound arithmetic, and curve flattening tied to text metrics.

Parsing, font shaping and rasterization are external collaborators: trees
are built programmatically, glyphs arrive pre-shaped, and drawing goes
through the abstract [`Output`] surface.

## Main entry points

- [`RenderContext::create_initial`] / [`RenderContext::derive`] - the cascade
- [`render`] - depth-first tree walk onto an [`Output`]
- [`text::TextPath`] - text-on-path layout
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::uninlined_format_args)]

pub use strict_num;
pub use svgtypes;
pub use tiny_skia_path;

#[cfg(feature = "text")]
pub use fontdb;

mod context;
mod font;
mod geom;
mod measure;
mod output;
mod paint;
mod render;
mod shape;
mod stroke;
pub mod text;
pub mod tree;

pub use context::{
    ContextElementAttributes, Derivation, EstablishRootMeasure, PaintContext, PaintModifier,
    Platform, RenderContext,
};
#[cfg(feature = "text")]
pub use font::{FontResolver, FontSelectionFn};
pub use font::{ex_from_em, FontModifier, FontRenderContext, FontSpec, FontStyle, DEFAULT_FONT_SIZE};
pub use geom::Angle;
pub use measure::{MeasureContext, PercentageBase};
pub use output::Output;
pub use paint::{Color, Fill, FillRule, Opacity, Paint, PaintOrder};
pub use render::{render, render_node, render_nodes};
pub use shape::PathShape;
pub use stroke::{resolve as resolve_stroke, LineCap, LineJoin, Stroke, StrokeContext};

pub(crate) trait OptionLog {
    fn log_none<F: FnOnce()>(self, f: F) -> Self;
}

impl<T> OptionLog for Option<T> {
    #[inline]
    fn log_none<F: FnOnce()>(self, f: F) -> Self {
        self.or_else(|| {
            f();
            None
        })
    }
}
