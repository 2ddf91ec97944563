// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::context::{Derivation, RenderContext};
use crate::output::Output;
use crate::paint::PaintOrder;
use crate::tree::{Container, Group, Node, ShapeNode, Tree};

/// Renders a tree onto the output.
///
/// `context` is the initial rendering state, typically from
/// [`RenderContext::create_initial`].
pub fn render(tree: &Tree, context: &RenderContext, output: &mut dyn Output) {
    render_nodes(tree.root().children(), context, output);
}

/// Renders nodes in insertion order.
///
/// Later siblings paint over earlier ones where geometry overlaps.
pub fn render_nodes(nodes: &[Node], context: &RenderContext, output: &mut dyn Output) {
    for node in nodes {
        render_node(node, context, output);
    }
}

/// Renders a single node.
pub fn render_node(node: &Node, context: &RenderContext, output: &mut dyn Output) {
    match node {
        Node::Group(group) => render_group(group, context, output),
        Node::Shape(shape) => render_shape(shape, context, output),
        Node::TextPath(text_path) => text_path.render(context, output),
        // Spans render through their text element; style carries no visuals.
        Node::TextSpan(_) | Node::Style(_) => {}
    }
}

fn render_group(group: &Group, context: &RenderContext, output: &mut dyn Output) {
    let mut child_context = if group.paint.is_none() && group.font.is_none() {
        context.derive_for_child_graphics()
    } else {
        context
            .derive(&Derivation {
                paint: group.paint.as_ref(),
                font: group.font.as_ref(),
                ..Derivation::default()
            })
            .into_owned()
    };

    output.save();
    if let Some(transform) = group.transform {
        child_context.transform(output, transform);
    }
    render_nodes(group.children(), &child_context, output);
    output.restore();
}

fn render_shape(shape_node: &ShapeNode, context: &RenderContext, output: &mut dyn Output) {
    if !shape_node.visible {
        return;
    }
    let derived = context.derive(&Derivation {
        paint: shape_node.paint.as_ref(),
        ..Derivation::default()
    });
    let context = &*derived;

    let path = shape_node.shape().outline(context);
    let fill = context.fill();
    let stroke = context.stroke(shape_node.path_length_factor(context));

    match context.paint_order() {
        PaintOrder::FillAndStroke => {
            if let Some(fill) = &fill {
                output.fill_path(path, fill);
            }
            if let Some(stroke) = &stroke {
                output.stroke_path(path, stroke);
            }
        }
        PaintOrder::StrokeAndFill => {
            if let Some(stroke) = &stroke {
                output.stroke_path(path, stroke);
            }
            if let Some(fill) = &fill {
                output.fill_path(path, fill);
            }
        }
    }
}
