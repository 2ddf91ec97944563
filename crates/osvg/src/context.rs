// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tiny_skia_path::{Size, Transform};

use crate::font::{ex_from_em, FontModifier, FontRenderContext, FontSpec};
#[cfg(feature = "text")]
use crate::font::FontResolver;
use crate::measure::MeasureContext;
use crate::output::Output;
use crate::paint::{Color, Fill, FillRule, Opacity, Paint, PaintOrder};
use crate::stroke::{self, Stroke, StrokeContext};

/// The environment a render pass runs against.
///
/// Shared read-only by every context derived during a pass.
pub struct Platform {
    /// Target resolution, for consumers that scale device output.
    pub dpi: f32,
    /// The font database queried by the font resolution service.
    #[cfg(feature = "text")]
    pub fontdb: Arc<fontdb::Database>,
    /// The font resolution service.
    #[cfg(feature = "text")]
    pub font_resolver: FontResolver,
}

impl Default for Platform {
    fn default() -> Platform {
        Platform {
            dpi: 96.0,
            #[cfg(feature = "text")]
            fontdb: Arc::new(fontdb::Database::new()),
            #[cfg(feature = "text")]
            font_resolver: FontResolver::default(),
        }
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform").field("dpi", &self.dpi).finish_non_exhaustive()
    }
}

/// The resolved fill and stroke of the element that established context
/// paint.
///
/// At most one is live per context chain; it is set by the establishing
/// node and read by any descendant using [`Paint::ContextFill`] or
/// [`Paint::ContextStroke`].
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ContextElementAttributes {
    /// The establishing element's resolved fill paint.
    pub fill_paint: Paint,
    /// The establishing element's resolved stroke paint.
    pub stroke_paint: Paint,
}

impl ContextElementAttributes {
    /// Snapshots the resolved paints of the current context.
    pub fn snapshot(context: &RenderContext) -> ContextElementAttributes {
        ContextElementAttributes {
            fill_paint: context.fill_paint(),
            stroke_paint: context.stroke_paint(),
        }
    }
}

/// Inheritable paint and opacity attributes.
///
/// `None` means "not specified anywhere in the chain yet"; getters on
/// [`RenderContext`] supply the documented defaults. The ambient `opacity`
/// is the accumulated product of all ancestor scopes.
#[derive(Clone, PartialEq, Debug)]
pub struct PaintContext {
    /// The cascaded `color` property.
    pub color: Option<Color>,
    /// Fill paint.
    pub fill_paint: Option<Paint>,
    /// Stroke paint.
    pub stroke_paint: Option<Paint>,
    /// Filling rule.
    pub fill_rule: Option<FillRule>,
    /// Fill/stroke paint order.
    pub paint_order: Option<PaintOrder>,
    /// Accumulated group opacity.
    pub opacity: Opacity,
    /// Fill opacity.
    pub fill_opacity: Option<Opacity>,
    /// Stroke opacity.
    pub stroke_opacity: Option<Opacity>,
    /// Stroke attributes. Never absent on a constructed [`RenderContext`].
    pub stroke: Option<Arc<StrokeContext>>,
}

impl PaintContext {
    /// The root paint state: black fill, no stroke, full opacity.
    pub fn create_default() -> PaintContext {
        PaintContext {
            color: Some(Color::new_rgb(0, 0, 0)),
            fill_paint: Some(Paint::Default),
            stroke_paint: Some(Paint::None),
            fill_rule: None,
            paint_order: None,
            opacity: Opacity::ONE,
            fill_opacity: Some(Opacity::ONE),
            stroke_opacity: Some(Opacity::ONE),
            stroke: Some(Arc::new(StrokeContext::default())),
        }
    }
}

/// A functional update for a [`PaintContext`].
///
/// Unset fields are shared with the parent; `opacity` multiplies into the
/// accumulated ambient opacity instead of replacing it.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PaintModifier {
    /// New `color` property.
    pub color: Option<Color>,
    /// New fill paint.
    pub fill_paint: Option<Paint>,
    /// New stroke paint.
    pub stroke_paint: Option<Paint>,
    /// New filling rule.
    pub fill_rule: Option<FillRule>,
    /// New paint order.
    pub paint_order: Option<PaintOrder>,
    /// Group opacity of this scope.
    pub opacity: Option<Opacity>,
    /// New fill opacity.
    pub fill_opacity: Option<Opacity>,
    /// New stroke opacity.
    pub stroke_opacity: Option<Opacity>,
    /// Stroke attribute overrides, merged onto the inherited stroke.
    pub stroke: Option<StrokeContext>,
}

impl PaintModifier {
    /// Applies the update, producing the child scope's paint state.
    pub fn apply(&self, base: &PaintContext) -> PaintContext {
        PaintContext {
            color: self.color.or(base.color),
            fill_paint: self.fill_paint.or(base.fill_paint),
            stroke_paint: self.stroke_paint.or(base.stroke_paint),
            fill_rule: self.fill_rule.or(base.fill_rule),
            paint_order: self.paint_order.or(base.paint_order),
            opacity: match self.opacity {
                Some(opacity) => Opacity::new_clamped(base.opacity.get() * opacity.get()),
                None => base.opacity,
            },
            fill_opacity: self.fill_opacity.or(base.fill_opacity),
            stroke_opacity: self.stroke_opacity.or(base.stroke_opacity),
            stroke: match (&self.stroke, &base.stroke) {
                (Some(overrides), Some(parent)) => Some(Arc::new(overrides.derive(parent))),
                (Some(overrides), None) => Some(Arc::new(overrides.clone())),
                (None, parent) => parent.clone(),
            },
        }
    }
}

/// Whether a derivation establishes an independent root-measure baseline.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EstablishRootMeasure {
    /// Reset the root em to the derived em.
    Yes,
    #[default]
    /// Keep the inherited root em.
    No,
}

/// The inputs of one [`RenderContext::derive`] step.
#[derive(Debug, Default)]
pub struct Derivation<'a> {
    /// Paint state update.
    pub paint: Option<&'a PaintModifier>,
    /// Font spec update.
    pub font: Option<&'a FontModifier>,
    /// New viewport size established by a view box.
    pub viewport: Option<Size>,
    /// New font render context, merged over the inherited one.
    pub font_render_context: Option<FontRenderContext>,
    /// New context-element attributes.
    pub context_attributes: Option<ContextElementAttributes>,
    /// Root-measure establishment.
    pub establish_root_measure: EstablishRootMeasure,
}

impl Derivation<'_> {
    fn is_trivial(&self) -> bool {
        self.paint.is_none()
            && self.viewport.is_none()
            && self.font.is_none()
            && self.font_render_context.is_none()
    }
}

/// The cascading rendering state of one traversal frame.
///
/// Everything except the two transforms is immutable once constructed and
/// shared structurally with parent contexts. The transforms are owned
/// values: derivation copies them, so edits on a derived context can never
/// be observed through the parent.
#[derive(Clone, Debug)]
pub struct RenderContext {
    platform: Arc<Platform>,
    measure: MeasureContext,
    paint: Arc<PaintContext>,
    font_render_context: FontRenderContext,
    font_spec: Arc<FontSpec>,
    context_attributes: Option<Arc<ContextElementAttributes>>,
    root_transform: Transform,
    user_space_transform: Transform,
}

impl RenderContext {
    /// The initial context of a render pass: identity transforms, default
    /// paint state, default font spec.
    pub fn create_initial(platform: Arc<Platform>, measure: MeasureContext) -> RenderContext {
        let paint = PaintContext::create_default();
        debug_assert!(paint.stroke.is_some(), "initial paint state must carry a stroke context");
        RenderContext {
            platform,
            measure,
            paint: Arc::new(paint),
            font_render_context: FontRenderContext::default(),
            font_spec: Arc::new(FontSpec::default()),
            context_attributes: None,
            root_transform: Transform::identity(),
            user_space_transform: Transform::identity(),
        }
    }

    /// Derives the context for a child scope.
    ///
    /// Returns `Cow::Borrowed(self)` when the derivation carries no paint
    /// update, no font update, no viewport and no font render context;
    /// identity is preserved and nothing is allocated. Otherwise the new
    /// context shares untouched state with `self` and owns fresh transform
    /// copies. The effective em is recomputed from the (possibly updated)
    /// font spec against the *current* measure context, and ex is derived
    /// from it.
    pub fn derive<'a>(&'a self, derivation: &Derivation<'_>) -> Cow<'a, RenderContext> {
        self.derive_impl(derivation, None)
    }

    fn derive_impl<'a>(
        &'a self,
        derivation: &Derivation<'_>,
        root_transform: Option<Transform>,
    ) -> Cow<'a, RenderContext> {
        if derivation.is_trivial() {
            return Cow::Borrowed(self);
        }

        let paint = match derivation.paint {
            Some(modifier) => Arc::new(modifier.apply(&self.paint)),
            None => Arc::clone(&self.paint),
        };
        let font_spec = match derivation.font {
            Some(modifier) => Arc::new(modifier.apply(&self.font_spec)),
            None => Arc::clone(&self.font_spec),
        };
        let context_attributes = match derivation.context_attributes {
            Some(attributes) => Some(Arc::new(attributes)),
            None => self.context_attributes.clone(),
        };

        let em = font_spec.effective_size(&self.measure);
        let ex = ex_from_em(em);
        let mut measure = self.measure.derive(derivation.viewport, em, ex);
        if derivation.establish_root_measure == EstablishRootMeasure::Yes {
            measure = measure.derive_root(em);
        }

        let font_render_context = self
            .font_render_context
            .derive(derivation.font_render_context.as_ref());

        debug_assert!(paint.stroke.is_some(), "derived context lost its stroke context");

        Cow::Owned(RenderContext {
            platform: Arc::clone(&self.platform),
            measure,
            paint,
            font_render_context,
            font_spec,
            context_attributes,
            root_transform: root_transform.unwrap_or(self.root_transform),
            user_space_transform: self.user_space_transform,
        })
    }

    /// Derives an owned context for entering a child scene scope.
    ///
    /// Measure, paint and font state are untouched; the point is that the
    /// child owns transform copies, so its later transform edits stay local.
    pub fn derive_for_child_graphics(&self) -> RenderContext {
        // An empty modifier forces the non-trivial path.
        let identity = PaintModifier::default();
        self.derive(&Derivation {
            paint: Some(&identity),
            ..Derivation::default()
        })
        .into_owned()
    }

    /// Derives an owned context for an isolated rendering surface.
    ///
    /// Like [`derive_for_child_graphics`](Self::derive_for_child_graphics),
    /// and additionally snapshots the root transform, so resetting it on the
    /// surface context cannot leak back to the caller.
    pub fn derive_for_surface(&self) -> RenderContext {
        let identity = PaintModifier::default();
        self.derive_impl(
            &Derivation {
                paint: Some(&identity),
                ..Derivation::default()
            },
            Some(self.root_transform),
        )
        .into_owned()
    }

    /// The platform handle.
    pub fn platform(&self) -> &Arc<Platform> {
        &self.platform
    }

    /// The current measure context.
    pub fn measure_context(&self) -> &MeasureContext {
        &self.measure
    }

    /// The current font render context.
    pub fn font_render_context(&self) -> &FontRenderContext {
        &self.font_render_context
    }

    /// The current font spec.
    pub fn font_spec(&self) -> &Arc<FontSpec> {
        &self.font_spec
    }

    /// The current paint state.
    pub fn paint_context(&self) -> &Arc<PaintContext> {
        &self.paint
    }

    /// The context-element attributes, if any scope established them.
    pub fn context_element_attributes(&self) -> Option<&ContextElementAttributes> {
        self.context_attributes.as_deref()
    }

    /// The current stroke attributes.
    ///
    /// The deriving mechanism together with the non-empty initial state
    /// guarantees presence; absence is a construction bug.
    pub fn stroke_context(&self) -> &StrokeContext {
        self.paint
            .stroke
            .as_deref()
            .expect("a constructed RenderContext always carries a stroke context")
    }

    /// The accumulated transform from the document root.
    pub fn root_transform(&self) -> Transform {
        self.root_transform
    }

    /// The accumulated transform from the nearest establishing scope.
    pub fn user_space_transform(&self) -> Transform {
        self.user_space_transform
    }

    /// Resets the root transform and clears the user-space transform.
    pub fn set_root_transform(&mut self, root_transform: Transform) {
        self.root_transform = root_transform;
        self.user_space_transform = Transform::identity();
    }

    /// Resets both transforms.
    pub fn set_transforms(&mut self, root_transform: Transform, user_space_transform: Transform) {
        self.root_transform = root_transform;
        self.user_space_transform = user_space_transform;
    }

    /// Translates the output and the user-space transform together.
    pub fn translate(&mut self, output: &mut dyn Output, dx: f32, dy: f32) {
        output.translate(dx, dy);
        self.user_space_transform = self
            .user_space_transform
            .pre_concat(Transform::from_translate(dx, dy));
    }

    /// Scales the output and the user-space transform together.
    pub fn scale(&mut self, output: &mut dyn Output, sx: f32, sy: f32) {
        output.scale(sx, sy);
        self.user_space_transform = self
            .user_space_transform
            .pre_concat(Transform::from_scale(sx, sy));
    }

    /// Rotates the output and the user-space transform together.
    pub fn rotate(&mut self, output: &mut dyn Output, radians: f32) {
        output.rotate(radians);
        self.user_space_transform = self
            .user_space_transform
            .pre_concat(Transform::from_rotate(radians.to_degrees()));
    }

    /// Concatenates a matrix onto the output and the user-space transform.
    pub fn transform(&mut self, output: &mut dyn Output, transform: Transform) {
        output.concat_transform(transform);
        self.user_space_transform = self.user_space_transform.pre_concat(transform);
    }

    /// The effective filling rule.
    pub fn fill_rule(&self) -> FillRule {
        self.paint.fill_rule.unwrap_or_default()
    }

    /// The effective paint order.
    pub fn paint_order(&self) -> PaintOrder {
        self.paint.paint_order.unwrap_or_default()
    }

    /// The resolved fill paint.
    pub fn fill_paint(&self) -> Paint {
        self.resolve_paint(self.paint.fill_paint)
    }

    /// The resolved stroke paint.
    pub fn stroke_paint(&self) -> Paint {
        self.resolve_paint(self.paint.stroke_paint)
    }

    fn resolve_paint(&self, paint: Option<Paint>) -> Paint {
        match paint {
            Some(Paint::Default) | Some(Paint::CurrentColor) => {
                // `color` only ever holds resolved literal values.
                match self.paint.color {
                    Some(color) => Paint::Color(color),
                    None => Paint::Default,
                }
            }
            // Context paints are already absolute; absence of the context
            // element is expected and resolves to no paint.
            Some(Paint::ContextFill) => match &self.context_attributes {
                Some(attributes) => attributes.fill_paint,
                None => Paint::None,
            },
            Some(Paint::ContextStroke) => match &self.context_attributes {
                Some(attributes) => attributes.stroke_paint,
                None => Paint::None,
            },
            Some(paint) => paint,
            None => Paint::Default,
        }
    }

    /// The ambient opacity alone.
    pub fn raw_opacity(&self) -> Opacity {
        self.paint.opacity
    }

    /// Fill opacity times ambient opacity.
    pub fn fill_opacity(&self) -> Opacity {
        let own = self.paint.fill_opacity.unwrap_or(Opacity::ONE);
        Opacity::new_clamped(own.get() * self.paint.opacity.get())
    }

    /// Stroke opacity times ambient opacity.
    pub fn stroke_opacity(&self) -> Opacity {
        let own = self.paint.stroke_opacity.unwrap_or(Opacity::ONE);
        Opacity::new_clamped(own.get() * self.paint.opacity.get())
    }

    /// The resolved fill, or `None` when the fill paint resolves to no
    /// paint.
    pub fn fill(&self) -> Option<Fill> {
        let paint = self.fill_paint();
        if paint.is_none() {
            return None;
        }
        Some(Fill {
            paint,
            opacity: self.fill_opacity(),
            rule: self.fill_rule(),
        })
    }

    /// The resolved stroke, or `None` when the stroke paint resolves to no
    /// paint.
    ///
    /// `path_length_factor` rescales dash patterns for author-declared path
    /// lengths.
    pub fn stroke(&self, path_length_factor: f32) -> Option<Stroke> {
        let paint = self.stroke_paint();
        if paint.is_none() {
            return None;
        }
        Some(stroke::resolve(
            path_length_factor,
            &self.measure,
            self.stroke_context(),
            paint,
            self.stroke_opacity(),
        ))
    }

    /// Selects a font face for the current font spec.
    #[cfg(feature = "text")]
    pub fn resolve_font(&self) -> Option<fontdb::ID> {
        (self.platform.font_resolver.select_font)(&self.font_spec, &self.platform.fontdb)
    }
}
