// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgnodes::{Node, NodeKind};
use tiny_skia::Point;

use crate::geom::{convert_user_length, Axis, Viewport};

/// Number of segments used to approximate circles and ellipses.
pub(crate) const ELLIPSE_SEGMENTS: usize = 128;

/// A shape converted to a list of user space points.
#[derive(Clone, PartialEq, Debug)]
pub(crate) struct Outline {
    pub points: Vec<Point>,
    /// Stroke connects the last point to the first one.
    pub closed: bool,
    /// `line` is never filled.
    pub fillable: bool,
}

/// Converts a shape node into an outline.
///
/// Returns `None` for non-shape nodes and degenerate shapes.
pub(crate) fn outline(node: &Node, viewport: Viewport) -> Option<Outline> {
    let outline = match node.kind() {
        NodeKind::Rect => convert_rect(node, viewport),
        NodeKind::Circle => convert_circle(node, viewport),
        NodeKind::Ellipse => convert_ellipse(node, viewport),
        NodeKind::Line => convert_line(node, viewport),
        NodeKind::Polygon => convert_points(node, true),
        NodeKind::Polyline => convert_points(node, false),
        _ => return None,
    };

    if outline.is_none() {
        log::debug!("'{}' has an invalid geometry. Skipped.", node.tag_name());
    }

    outline
}

fn convert_rect(node: &Node, vp: Viewport) -> Option<Outline> {
    let width = convert_user_length(node, "width", Axis::X, vp);
    let height = convert_user_length(node, "height", Axis::Y, vp);
    if !(width > 0.0 && height > 0.0) {
        return None;
    }

    let x = convert_user_length(node, "x", Axis::X, vp);
    let y = convert_user_length(node, "y", Axis::Y, vp);

    if node.attribute("rx").is_some() || node.attribute("ry").is_some() {
        log::warn!("Rounded rect corners are not supported.");
    }

    Some(Outline {
        points: vec![
            point(x, y),
            point(x + width, y),
            point(x + width, y + height),
            point(x, y + height),
        ],
        closed: true,
        fillable: true,
    })
}

fn convert_circle(node: &Node, vp: Viewport) -> Option<Outline> {
    let cx = convert_user_length(node, "cx", Axis::X, vp);
    let cy = convert_user_length(node, "cy", Axis::Y, vp);
    let r = convert_user_length(node, "r", Axis::Diagonal, vp);
    ellipse_to_outline(cx, cy, r, r)
}

fn convert_ellipse(node: &Node, vp: Viewport) -> Option<Outline> {
    let cx = convert_user_length(node, "cx", Axis::X, vp);
    let cy = convert_user_length(node, "cy", Axis::Y, vp);
    let rx = convert_user_length(node, "rx", Axis::X, vp);
    let ry = convert_user_length(node, "ry", Axis::Y, vp);
    ellipse_to_outline(cx, cy, rx, ry)
}

fn convert_line(node: &Node, vp: Viewport) -> Option<Outline> {
    let x1 = convert_user_length(node, "x1", Axis::X, vp);
    let y1 = convert_user_length(node, "y1", Axis::Y, vp);
    let x2 = convert_user_length(node, "x2", Axis::X, vp);
    let y2 = convert_user_length(node, "y2", Axis::Y, vp);

    Some(Outline {
        points: vec![point(x1, y1), point(x2, y2)],
        closed: false,
        fillable: false,
    })
}

fn convert_points(node: &Node, closed: bool) -> Option<Outline> {
    let points: Vec<_> = node.points().into_iter().map(|(x, y)| point(x, y)).collect();

    // 'polyline' and 'polygon' elements must contain at least 2 points.
    if points.len() < 2 {
        return None;
    }

    Some(Outline {
        points,
        closed,
        fillable: true,
    })
}

fn ellipse_to_outline(cx: f64, cy: f64, rx: f64, ry: f64) -> Option<Outline> {
    if !(rx > 0.0 && ry > 0.0) {
        return None;
    }

    let step = std::f64::consts::PI * 2.0 / ELLIPSE_SEGMENTS as f64;
    let points = (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let (sin, cos) = (i as f64 * step).sin_cos();
            point(cx + rx * cos, cy + ry * sin)
        })
        .collect();

    Some(Outline {
        points,
        closed: true,
        fillable: true,
    })
}

#[inline]
fn point(x: f64, y: f64) -> Point {
    Point::from_xy(x as f32, y as f32)
}
