// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rgb::RGBA8;
use tiny_skia::{Point, Transform};

/// A raster drawing surface.
///
/// All coordinates are in device pixels and all colors are straight (non-premultiplied) RGBA.
/// The renderer never touches pixel memory directly, only these primitives.
pub trait Canvas {
    /// Returns the surface width in pixels.
    fn width(&self) -> u32;

    /// Returns the surface height in pixels.
    fn height(&self) -> u32;

    /// Creates a new, fully transparent surface of the same size.
    fn create_layer(&self) -> Option<Self>
    where
        Self: Sized;

    /// Fills a polygon using the nonzero rule.
    ///
    /// The polygon is always treated as closed.
    fn fill_polygon(&mut self, points: &[Point], color: RGBA8);

    /// Strokes a polyline, optionally connecting the last point back to the first.
    fn stroke_polygon(&mut self, points: &[Point], closed: bool, width: f32, color: RGBA8);

    /// Draws `src` over this surface using the source-over operator.
    fn composite_over(&mut self, src: &Self);
}

/// A [`Canvas`] backed by a `tiny_skia::Pixmap`.
#[derive(Clone, Debug)]
pub struct PixmapCanvas {
    pixmap: tiny_skia::Pixmap,
    anti_alias: bool,
}

impl PixmapCanvas {
    /// Allocates a new transparent canvas.
    ///
    /// Returns `None` when the size is zero or too big.
    pub fn new(width: u32, height: u32, anti_alias: bool) -> Option<Self> {
        let pixmap = tiny_skia::Pixmap::new(width, height)?;
        Some(PixmapCanvas { pixmap, anti_alias })
    }

    /// Fills the whole canvas with a color.
    pub fn fill(&mut self, color: svgtypes::Color) {
        self.pixmap.fill(tiny_skia::Color::from_rgba8(
            color.red,
            color.green,
            color.blue,
            color.alpha,
        ));
    }

    /// Returns the underlying pixmap. Its data is premultiplied.
    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    /// Consumes the canvas and returns the underlying pixmap.
    pub fn into_pixmap(self) -> tiny_skia::Pixmap {
        self.pixmap
    }

    fn paint(&self, color: RGBA8) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = self.anti_alias;
        paint
    }
}

impl Canvas for PixmapCanvas {
    #[inline]
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn create_layer(&self) -> Option<Self> {
        let layer = PixmapCanvas::new(self.width(), self.height(), self.anti_alias);
        if layer.is_none() {
            log::warn!(
                "Failed to create a {}x{} layer.",
                self.width(),
                self.height()
            );
        }

        layer
    }

    fn fill_polygon(&mut self, points: &[Point], color: RGBA8) {
        if points.len() < 3 || color.a == 0 {
            return;
        }

        if let Some(path) = build_path(points, true) {
            let paint = self.paint(color);
            self.pixmap.fill_path(
                &path,
                &paint,
                tiny_skia::FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn stroke_polygon(&mut self, points: &[Point], closed: bool, width: f32, color: RGBA8) {
        if points.len() < 2 || color.a == 0 || !(width > 0.0) {
            return;
        }

        if let Some(path) = build_path(points, closed) {
            let paint = self.paint(color);
            let stroke = tiny_skia::Stroke {
                width,
                ..tiny_skia::Stroke::default()
            };

            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn composite_over(&mut self, src: &Self) {
        self.pixmap.draw_pixmap(
            0,
            0,
            src.pixmap.as_ref(),
            &tiny_skia::PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

fn build_path(points: &[Point], closed: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;

    let mut builder = tiny_skia::PathBuilder::with_capacity(points.len() + 1, points.len() + 1);
    builder.move_to(first.x, first.y);
    for p in rest {
        builder.line_to(p.x, p.y);
    }

    if closed {
        builder.close();
    }

    builder.finish()
}
