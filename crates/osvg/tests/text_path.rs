// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use once_cell::sync::Lazy;
use osvg::text::{Glyph, Side, TextPath, TextSpan};
use osvg::tree::{Container, Node, ShapeNode, Tree};
use osvg::{
    Color, Fill, MeasureContext, Output, Paint, PaintModifier, PaintOrder, PathShape, Platform,
    RenderContext, Stroke,
};
use tiny_skia_path::{Path, PathBuilder, Rect, Transform};

static PLATFORM: Lazy<Arc<Platform>> = Lazy::new(|| Arc::new(Platform::default()));

fn context() -> RenderContext {
    RenderContext::create_initial(
        Arc::clone(&PLATFORM),
        MeasureContext::new(100.0, 100.0, 16.0, 8.0),
    )
}

#[derive(Debug, PartialEq)]
enum Call {
    Save,
    Restore,
    /// A fill with the left edge of the painted bounds.
    Fill(f32),
    Stroke(f32),
    DebugFill,
    DebugStroke,
}

#[derive(Default)]
struct RecordingOutput {
    calls: Vec<Call>,
    in_debug: bool,
}

impl RecordingOutput {
    fn draw_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Fill(_) | Call::Stroke(_)))
            .count()
    }

    fn fill_positions(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Fill(x) => Some(*x),
                _ => None,
            })
            .collect()
    }
}

impl Output for RecordingOutput {
    fn save(&mut self) {
        self.calls.push(Call::Save);
    }

    fn restore(&mut self) {
        self.calls.push(Call::Restore);
    }

    fn translate(&mut self, _dx: f32, _dy: f32) {}
    fn scale(&mut self, _sx: f32, _sy: f32) {}
    fn rotate(&mut self, _radians: f32) {}
    fn concat_transform(&mut self, _transform: Transform) {}

    fn fill_path(&mut self, path: &Path, _fill: &Fill) {
        self.calls.push(if self.in_debug {
            Call::DebugFill
        } else {
            Call::Fill(path.bounds().x())
        });
    }

    fn stroke_path(&mut self, path: &Path, _stroke: &Stroke) {
        self.calls.push(if self.in_debug {
            Call::DebugStroke
        } else {
            Call::Stroke(path.bounds().x())
        });
    }

    fn debug_paint(&mut self, painter: &mut dyn FnMut(&mut dyn Output)) {
        self.in_debug = true;
        let mut nested = RecordingOutput {
            in_debug: true,
            ..RecordingOutput::default()
        };
        painter(&mut nested);
        self.calls.append(&mut nested.calls);
        self.in_debug = false;
    }
}

fn line_shape(length: f32) -> PathShape {
    let mut builder = PathBuilder::new();
    builder.move_to(0.0, 0.0);
    builder.line_to(length, 0.0);
    PathShape::from_path(builder.finish().unwrap())
}

/// A glyph whose outline is a unit-tall box as wide as its advance.
fn box_glyph(advance: f32) -> Glyph {
    let rect = Rect::from_xywh(0.0, -1.0, advance, 1.0).unwrap();
    Glyph {
        outline: Some(PathBuilder::from_rect(rect)),
        advance,
    }
}

fn blank_glyph(advance: f32) -> Glyph {
    Glyph {
        outline: None,
        advance,
    }
}

#[test]
fn invalid_text_path_draws_nothing() {
    let context = context();
    let mut output = RecordingOutput::default();

    // Neither literal path data nor a resolvable reference.
    let mut text_path = TextPath::new();
    text_path.set_href("#nowhere");
    text_path.resolve(&Tree::new());
    text_path.add_child(None, Node::TextSpan(Box::new(TextSpan::new(vec![
        box_glyph(4.0),
    ]))));

    assert!(!text_path.is_valid());
    text_path.render(&context, &mut output);
    assert_eq!(output.draw_calls(), 0);
}

#[test]
fn glyphs_advance_along_the_path() {
    let context = context();
    let mut output = RecordingOutput::default();

    let mut text_path = TextPath::new();
    text_path.set_path(line_shape(30.0));
    text_path.add_child(None, Node::TextSpan(Box::new(TextSpan::new(vec![
        box_glyph(4.0),
        box_glyph(4.0),
        box_glyph(4.0),
    ]))));

    text_path.render(&context, &mut output);
    // Each glyph box starts where the previous one ended.
    assert_eq!(output.fill_positions(), vec![0.0, 4.0, 8.0]);
}

#[test]
fn sibling_spans_continue_where_the_previous_run_ended() {
    let context = context();
    let mut output = RecordingOutput::default();

    let mut text_path = TextPath::new();
    text_path.set_path(line_shape(40.0));
    text_path.add_child(None, Node::TextSpan(Box::new(TextSpan::new(vec![
        box_glyph(4.0),
        box_glyph(4.0),
    ]))));
    text_path.add_child(None, Node::TextSpan(Box::new(TextSpan::new(vec![
        box_glyph(4.0),
    ]))));

    text_path.render(&context, &mut output);
    assert_eq!(output.fill_positions(), vec![0.0, 4.0, 8.0]);
}

#[test]
fn blank_glyphs_consume_advance_without_drawing() {
    let context = context();
    let mut output = RecordingOutput::default();

    let mut text_path = TextPath::new();
    text_path.set_path(line_shape(30.0));
    text_path.add_child(None, Node::TextSpan(Box::new(TextSpan::new(vec![
        box_glyph(4.0),
        blank_glyph(6.0),
        box_glyph(4.0),
    ]))));

    text_path.render(&context, &mut output);
    assert_eq!(output.fill_positions(), vec![0.0, 10.0]);
}

#[test]
fn glyphs_falling_off_the_path_are_dropped() {
    let context = context();
    let mut output = RecordingOutput::default();

    let mut text_path = TextPath::new();
    text_path.set_path(line_shape(8.0));
    text_path.add_child(None, Node::TextSpan(Box::new(TextSpan::new(vec![
        box_glyph(6.0),
        box_glyph(6.0),
    ]))));

    text_path.render(&context, &mut output);
    // The second glyph's midpoint lies past the end of the 8-unit line.
    assert_eq!(output.fill_positions(), vec![0.0]);
}

#[test]
fn right_side_text_runs_end_to_start() {
    let context = context();
    let mut output = RecordingOutput::default();

    let mut text_path = TextPath::new();
    text_path.set_path(line_shape(30.0));
    text_path.side = Side::Right;
    text_path.add_child(None, Node::TextSpan(Box::new(TextSpan::new(vec![
        box_glyph(4.0),
    ]))));

    text_path.render(&context, &mut output);
    // The glyph midpoint sits two units from the path *end*; the reversed
    // direction flips the box around it.
    let positions = output.fill_positions();
    assert_eq!(positions.len(), 1);
    assert!((positions[0] - 26.0).abs() < 1e-4);
}

#[test]
fn span_paint_overrides_apply_per_run() {
    let context = context();
    let mut output = RecordingOutput::default();

    let mut stroked = TextSpan::new(vec![box_glyph(4.0)]);
    stroked.paint = Some(PaintModifier {
        stroke_paint: Some(Paint::Color(Color::new_rgb(255, 0, 0))),
        paint_order: Some(PaintOrder::StrokeAndFill),
        ..PaintModifier::default()
    });

    let mut text_path = TextPath::new();
    text_path.set_path(line_shape(30.0));
    text_path.add_child(None, Node::TextSpan(Box::new(stroked)));

    text_path.render(&context, &mut output);
    assert_eq!(output.calls, vec![Call::Stroke(0.0), Call::Fill(0.0)]);
}

#[test]
fn debug_overlay_is_off_by_default() {
    let context = context();

    let mut text_path = TextPath::new();
    text_path.set_path(line_shape(30.0));
    text_path.add_child(None, Node::TextSpan(Box::new(TextSpan::new(vec![
        box_glyph(4.0),
    ]))));

    let mut output = RecordingOutput::default();
    text_path.render(&context, &mut output);
    assert!(!output.calls.iter().any(|c| matches!(c, Call::DebugFill | Call::DebugStroke)));

    text_path.debug_overlay = true;
    let mut output = RecordingOutput::default();
    text_path.render(&context, &mut output);
    assert!(output.calls.contains(&Call::DebugStroke));
    assert!(output.calls.contains(&Call::DebugFill));
}

#[test]
fn href_references_borrow_geometry_from_the_tree() {
    let context = context();
    let mut output = RecordingOutput::default();

    let mut tree = Tree::new();
    let mut curve = ShapeNode::new(line_shape(30.0));
    curve.visible = false;
    tree.root_mut().add_child(Some("curve"), Node::Shape(Box::new(curve)));

    let mut text_path = TextPath::new();
    text_path.set_href("#curve");
    text_path.resolve(&tree);
    assert!(text_path.is_valid());

    text_path.add_child(None, Node::TextSpan(Box::new(TextSpan::new(vec![
        box_glyph(4.0),
        box_glyph(4.0),
    ]))));
    text_path.render(&context, &mut output);
    assert_eq!(output.fill_positions(), vec![0.0, 4.0]);
}

#[test]
fn tree_walk_paints_in_document_order() {
    let context = context();
    let mut output = RecordingOutput::default();

    let shape_at = |x: f32| {
        let rect = Rect::from_xywh(x, 0.0, 5.0, 5.0).unwrap();
        ShapeNode::new(PathShape::from_path(PathBuilder::from_rect(rect)))
    };

    let mut inner = osvg::tree::Group::new();
    inner.add_child(None, Node::Shape(Box::new(shape_at(20.0))));

    let mut tree = Tree::new();
    tree.root_mut().add_child(None, Node::Shape(Box::new(shape_at(0.0))));
    tree.root_mut().add_child(None, Node::Group(Box::new(inner)));
    tree.root_mut().add_child(None, Node::Shape(Box::new(shape_at(40.0))));

    osvg::render(&tree, &context, &mut output);

    assert_eq!(output.fill_positions(), vec![0.0, 20.0, 40.0]);
    // The group's surface state is saved and restored around its children.
    let saves = output.calls.iter().filter(|c| **c == Call::Save).count();
    let restores = output.calls.iter().filter(|c| **c == Call::Restore).count();
    assert_eq!(saves, 1);
    assert_eq!(saves, restores);
}
