// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tiny_skia_path::{Path, Transform};

use crate::paint::Fill;
use crate::stroke::Stroke;

/// An abstract drawing surface.
///
/// The core never produces pixels itself; it composes transforms and issues
/// paint calls against this trait. Transform calls compose with the current
/// surface state the same way [`crate::RenderContext`] composes its
/// user-space transform, so the two stay in sync.
pub trait Output {
    /// Saves the current surface state (transform, clip).
    fn save(&mut self);

    /// Restores the most recently saved surface state.
    fn restore(&mut self);

    /// Composes a translation onto the current transform.
    fn translate(&mut self, dx: f32, dy: f32);

    /// Composes a scale onto the current transform.
    fn scale(&mut self, sx: f32, sy: f32);

    /// Composes a rotation, in radians, onto the current transform.
    fn rotate(&mut self, radians: f32);

    /// Composes an arbitrary matrix onto the current transform.
    fn concat_transform(&mut self, transform: Transform);

    /// Fills a path.
    fn fill_path(&mut self, path: &Path, fill: &Fill);

    /// Strokes a path.
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke);

    /// Runs a diagnostic painter against this surface.
    ///
    /// Surfaces that do not support diagnostics ignore the callback; the
    /// default implementation does exactly that.
    fn debug_paint(&mut self, painter: &mut dyn FnMut(&mut dyn Output)) {
        let _ = painter;
    }
}
