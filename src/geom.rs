// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use svgnodes::Node;
use svgtypes::{Length, LengthUnit as Unit, ViewBox};
use tiny_skia::Transform;

const DPI: f64 = 96.0;
const FONT_SIZE: f64 = 16.0;

/// A direction used to resolve percentage lengths.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) enum Axis {
    X,
    Y,
    Diagonal,
}

/// The user space rectangle percentages are relative to.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    fn length(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
            Axis::Diagonal => {
                (self.width * self.width + self.height * self.height).sqrt() / 2.0_f64.sqrt()
            }
        }
    }
}

pub(crate) fn convert_length(length: Length, axis: Axis, viewport: Viewport) -> f64 {
    let n = length.number;
    match length.unit {
        Unit::None | Unit::Px => n,
        Unit::Em => n * FONT_SIZE,
        Unit::Ex => n * FONT_SIZE / 2.0,
        Unit::In => n * DPI,
        Unit::Cm => n * DPI / 2.54,
        Unit::Mm => n * DPI / 25.4,
        Unit::Pt => n * DPI / 72.0,
        Unit::Pc => n * DPI / 6.0,
        Unit::Percent => viewport.length(axis) * n / 100.0,
    }
}

/// Parses a length attribute.
///
/// Returns `None` when the attribute is missing or malformed.
pub(crate) fn parse_length(node: &Node, name: &str) -> Option<Length> {
    let value = node.attribute(name)?;
    match Length::from_str(value.trim()) {
        Ok(length) => Some(length),
        Err(_) => {
            log::warn!("Failed to parse {} value: '{}'.", name, value);
            None
        }
    }
}

/// Resolves a geometry attribute to user units.
///
/// A missing or malformed value resolves to zero.
pub(crate) fn convert_user_length(node: &Node, name: &str, axis: Axis, viewport: Viewport) -> f64 {
    match parse_length(node, name) {
        Some(length) => convert_length(length, axis, viewport),
        None => 0.0,
    }
}

/// Resolves `width` and `height` of the root `svg` element.
///
/// Percentages are relative to the `viewBox` when one is set
/// and to `fallback` otherwise. A missing value means `100%`.
pub(crate) fn document_size(
    root: &Node,
    view_box: Option<ViewBox>,
    fallback: (f64, f64),
) -> (f64, f64) {
    let (w, h) = match view_box {
        Some(vb) => (vb.w, vb.h),
        None => fallback,
    };

    let viewport = Viewport::new(w, h);
    let width = parse_length(root, "width").map_or(w, |l| convert_length(l, Axis::X, viewport));
    let height = parse_length(root, "height").map_or(h, |l| convert_length(l, Axis::Y, viewport));
    (width, height)
}

/// Builds the transform that maps document coordinates onto the target canvas.
///
/// Axes are scaled independently, `preserveAspectRatio` is not applied.
/// When a `viewBox` is set, its origin is moved to the canvas origin first.
///
/// Returns `None` when the document or the target has a non-positive size.
pub fn root_transform(
    doc_width: f64,
    doc_height: f64,
    view_box: Option<ViewBox>,
    target_width: u32,
    target_height: u32,
) -> Option<Transform> {
    if target_width == 0 || target_height == 0 {
        return None;
    }

    if !(doc_width > 0.0 && doc_height > 0.0) {
        return None;
    }

    let tw = target_width as f64;
    let th = target_height as f64;
    let ts = match view_box {
        Some(vb) => {
            if !(vb.w > 0.0 && vb.h > 0.0) {
                return None;
            }

            let sx = tw / vb.w;
            let sy = th / vb.h;
            Transform::from_row(
                sx as f32,
                0.0,
                0.0,
                sy as f32,
                (-vb.x * sx) as f32,
                (-vb.y * sy) as f32,
            )
        }
        None => Transform::from_scale((tw / doc_width) as f32, (th / doc_height) as f32),
    };

    if ts.is_finite() {
        Some(ts)
    } else {
        None
    }
}

/// Parses a `transform` attribute value.
///
/// A malformed value resolves to identity.
pub(crate) fn parse_transform(value: &str) -> Transform {
    match svgtypes::Transform::from_str(value) {
        Ok(ts) => Transform::from_row(
            ts.a as f32,
            ts.b as f32,
            ts.c as f32,
            ts.d as f32,
            ts.e as f32,
            ts.f as f32,
        ),
        Err(_) => {
            log::warn!("Failed to parse transform value: '{}'.", value);
            Transform::identity()
        }
    }
}

/// Converts a user space stroke width into device pixels.
pub(crate) fn device_stroke_width(width: f64, ts: Transform) -> f32 {
    let det = ts.sx as f64 * ts.sy as f64 - ts.kx as f64 * ts.ky as f64;
    (width * det.abs().sqrt()) as f32
}
