// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text-on-path layout: path flattening, glyph cursors and the
//! [`TextPath`] element.

mod cursor;
mod flatten;

pub use cursor::{GlyphPlacement, PathGlyphCursor};
pub use flatten::{LineSegment, PathTraversal};

use svgtypes::{Length, LengthUnit};
use tiny_skia_path::PathBuilder;

use crate::context::{Derivation, PaintModifier, RenderContext};
use crate::measure::PercentageBase;
use crate::output::Output;
use crate::paint::{Color, Fill, FillRule, Opacity, Paint, PaintOrder};
use crate::shape::PathShape;
use crate::stroke::Stroke;
use crate::tree::{add_child_impl, Container, Node, ReferenceResolver, ShapeNode, TypedNode};
use crate::OptionLog;

/// Which side of the path the text runs along.
///
/// Unrecognized values fall back to `Left`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Side {
    #[default]
    /// Along the path's parametric direction.
    Left,
    /// Along the opposite parametric direction.
    Right,
}

/// Glyph spacing behavior. Parsed but not implemented; has no effect.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Spacing {
    #[default]
    /// Spacing chosen by the layout engine.
    Auto,
    /// Exact spacing as specified.
    Exact,
}

/// How glyphs are fitted to the path. Parsed but not implemented; has no
/// effect.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum GlyphRenderMethod {
    #[default]
    /// Rotate whole glyphs onto the path.
    Align,
    /// Warp glyph outlines along the path.
    Stretch,
}

/// A pre-shaped glyph.
///
/// Shaping and outline extraction happen outside this crate; the outline is
/// in user units with the baseline origin at `(0, 0)`.
#[derive(Clone, Debug)]
pub struct Glyph {
    /// The glyph outline. `None` for blank glyphs, which still consume
    /// their advance.
    pub outline: Option<tiny_skia_path::Path>,
    /// The horizontal advance in user units.
    pub advance: f32,
}

/// A run of pre-shaped glyphs with optional cascade overrides.
#[derive(Clone, Debug, Default)]
pub struct TextSpan {
    /// Element id.
    pub id: String,
    /// The glyphs of this run, in visual order.
    pub glyphs: Vec<Glyph>,
    /// Paint cascade updates of this run.
    pub paint: Option<PaintModifier>,
}

impl TextSpan {
    /// Creates a span from a glyph run.
    pub fn new(glyphs: Vec<Glyph>) -> TextSpan {
        TextSpan {
            glyphs,
            ..TextSpan::default()
        }
    }
}

/// Text laid out along a path.
///
/// The path geometry comes from literal path data when present, else from
/// an href reference to a geometry-bearing element. Without either, the
/// element is invisible (not an error) and never draws.
#[derive(Clone, Debug)]
pub struct TextPath {
    /// Element id.
    pub id: String,
    /// Whether the element paints at all.
    pub visible: bool,
    /// Which side of the path the text runs along.
    pub side: Side,
    /// Glyph spacing behavior. Stored but inert.
    pub spacing: Spacing,
    /// Glyph fitting method. Stored but inert.
    pub render_method: GlyphRenderMethod,
    /// Distance along the path where the text starts.
    pub start_offset: Length,
    /// Traces the flattened traversal through the output's debug hook.
    pub debug_overlay: bool,
    href: Option<String>,
    shape: Option<PathShape>,
    children: Vec<Node>,
}

impl Default for TextPath {
    fn default() -> TextPath {
        TextPath {
            id: String::new(),
            visible: true,
            side: Side::default(),
            spacing: Spacing::default(),
            render_method: GlyphRenderMethod::default(),
            start_offset: Length::new(0.0, LengthUnit::None),
            debug_overlay: false,
            href: None,
            shape: None,
            children: Vec::new(),
        }
    }
}

impl TextPath {
    /// Creates an empty element.
    pub fn new() -> TextPath {
        TextPath::default()
    }

    /// Sets literal path data. Takes precedence over any href reference.
    pub fn set_path(&mut self, shape: PathShape) {
        self.shape = Some(shape);
    }

    /// Sets an href reference to a geometry-bearing element.
    pub fn set_href(&mut self, href: impl Into<String>) {
        self.href = Some(href.into());
    }

    /// Resolves the path geometry.
    ///
    /// Literal path data wins; otherwise the href is looked up and must
    /// point at a geometry-bearing element. A failed lookup leaves the
    /// element invisible.
    pub fn resolve(&mut self, resolver: &dyn ReferenceResolver) {
        if self.shape.is_some() {
            return;
        }
        let Some(href) = self.href.as_deref() else {
            return;
        };
        let node = resolver
            .resolve_reference(href)
            .log_none(|| log::warn!("failed to resolve text path reference '{}'", href));
        if let Some(node) = node {
            match ShapeNode::from_node(node) {
                Some(shaped) => self.shape = Some(shaped.shape().clone()),
                None => log::warn!("text path reference '{}' has no geometry", href),
            }
        }
    }

    /// Whether the path geometry resolved.
    pub fn is_valid(&self) -> bool {
        self.shape.is_some()
    }

    /// Whether the element paints.
    pub fn is_visible(&self, _context: &RenderContext) -> bool {
        self.visible && self.is_valid()
    }

    /// Creates the cursor this element places glyphs with.
    ///
    /// `None` when the path geometry did not resolve.
    pub fn create_cursor(&self, context: &RenderContext) -> Option<PathGlyphCursor> {
        let traversal = self.traversal(context)?;
        Some(PathGlyphCursor::new(
            traversal,
            self.compute_start_offset(context),
        ))
    }

    /// Creates a local cursor for a sub-scope of `current`.
    pub fn create_local_cursor(
        &self,
        context: &RenderContext,
        current: &PathGlyphCursor,
    ) -> Option<PathGlyphCursor> {
        let traversal = self.traversal(context)?;
        Some(current.for_subscope(traversal, self.compute_start_offset(context)))
    }

    /// Renders the element's glyph runs onto the output.
    pub fn render(&self, context: &RenderContext, output: &mut dyn Output) {
        if !self.is_visible(context) {
            return;
        }
        let Some(mut cursor) = self.create_cursor(context) else {
            return;
        };

        for span in self.children_of_type::<TextSpan>() {
            let Some(mut local) = self.create_local_cursor(context, &cursor) else {
                return;
            };
            let span_context = context.derive(&Derivation {
                paint: span.paint.as_ref(),
                ..Derivation::default()
            });
            render_span(span, &mut local, &span_context, output);
            cursor.update_from(&local);
        }

        if self.debug_overlay {
            if let Some(traversal) = self.traversal(context) {
                output.debug_paint(&mut |output| paint_traversal(&traversal, output));
            }
        }
    }

    /// The combined outline of every placed glyph.
    ///
    /// `None` when the path did not resolve or no glyph produced geometry.
    pub fn glyph_outline(&self, context: &RenderContext) -> Option<tiny_skia_path::Path> {
        let mut cursor = self.create_cursor(context)?;
        let mut builder = PathBuilder::new();

        for span in self.children_of_type::<TextSpan>() {
            let mut local = self.create_local_cursor(context, &cursor)?;
            let letter_spacing = letter_spacing(context);
            for glyph in &span.glyphs {
                let placement = local.advance(glyph.advance);
                if let (Some(placement), Some(outline)) = (placement, glyph.outline.as_ref()) {
                    if let Some(path) = outline.clone().transform(placement.transform) {
                        builder.push_path(&path);
                    }
                }
                if letter_spacing != 0.0 {
                    local.skip(letter_spacing);
                }
            }
            cursor.update_from(&local);
        }

        builder.finish()
    }

    fn compute_start_offset(&self, context: &RenderContext) -> f32 {
        let Some(shape) = &self.shape else {
            return 0.0;
        };
        if self.start_offset.unit == LengthUnit::Percent {
            let mut fraction = context
                .measure_context()
                .resolve(self.start_offset, PercentageBase::Custom);
            if shape.is_closed(context) {
                // Wrap into [0, 1) so any real offset lands on the path.
                fraction = (fraction % 1.0 + 1.0) % 1.0;
            }
            return fraction * shape.path_length(context);
        }
        context
            .measure_context()
            .resolve(self.start_offset, PercentageBase::Custom)
    }

    fn traversal(&self, context: &RenderContext) -> Option<PathTraversal> {
        let shape = self.shape.as_ref()?;
        // For fonts this is a good enough approximation.
        let tolerance = 0.1 * context.measure_context().ex();
        let traversal = PathTraversal::flatten(shape.outline(context), tolerance);
        Some(match self.side {
            Side::Left => traversal,
            Side::Right => traversal.reversed(),
        })
    }
}

impl Container for TextPath {
    fn add_child(&mut self, id: Option<&str>, node: Node) {
        add_child_impl(&mut self.children, id, node);
    }

    fn children(&self) -> &[Node] {
        &self.children
    }
}

fn letter_spacing(context: &RenderContext) -> f32 {
    context
        .font_render_context()
        .letter_spacing
        .map(|spacing| {
            context
                .measure_context()
                .resolve(spacing, PercentageBase::Width)
        })
        .unwrap_or(0.0)
}

fn render_span(
    span: &TextSpan,
    cursor: &mut PathGlyphCursor,
    context: &RenderContext,
    output: &mut dyn Output,
) {
    let fill = context.fill();
    let stroke = context.stroke(1.0);
    let letter_spacing = letter_spacing(context);

    for glyph in &span.glyphs {
        // Every glyph consumes its advance, even off-path or blank ones.
        let placement = cursor.advance(glyph.advance);
        if let (Some(placement), Some(outline)) = (placement, glyph.outline.as_ref()) {
            if let Some(path) = outline.clone().transform(placement.transform) {
                match context.paint_order() {
                    PaintOrder::FillAndStroke => {
                        if let Some(fill) = &fill {
                            output.fill_path(&path, fill);
                        }
                        if let Some(stroke) = &stroke {
                            output.stroke_path(&path, stroke);
                        }
                    }
                    PaintOrder::StrokeAndFill => {
                        if let Some(stroke) = &stroke {
                            output.stroke_path(&path, stroke);
                        }
                        if let Some(fill) = &fill {
                            output.fill_path(&path, fill);
                        }
                    }
                }
            }
        }
        if letter_spacing != 0.0 {
            cursor.skip(letter_spacing);
        }
    }
}

/// Traces the flattened traversal: segment lines plus endpoint markers.
fn paint_traversal(traversal: &PathTraversal, output: &mut dyn Output) {
    let mut lines = PathBuilder::new();
    let mut markers = PathBuilder::new();
    for segment in traversal.segments() {
        lines.move_to(segment.start.x, segment.start.y);
        lines.line_to(segment.end.x, segment.end.y);
        for point in [segment.start, segment.end] {
            if let Some(rect) =
                tiny_skia_path::Rect::from_xywh(point.x - 2.0, point.y - 2.0, 4.0, 4.0)
            {
                markers.push_rect(rect);
            }
        }
    }

    if let Some(path) = lines.finish() {
        output.stroke_path(
            &path,
            &Stroke {
                paint: Paint::Color(Color::new_rgb(255, 0, 255)),
                width: 0.5,
                ..Stroke::default()
            },
        );
    }
    if let Some(path) = markers.finish() {
        output.fill_path(
            &path,
            &Fill {
                paint: Paint::Color(Color::new_rgb(255, 0, 0)),
                opacity: Opacity::ONE,
                rule: FillRule::NonZero,
            },
        );
    }
}
