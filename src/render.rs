// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgnodes::{Node, NodeKind};

use crate::canvas::Canvas;
use crate::geom::{self, Axis, Viewport};
use crate::shapes;
use crate::style::ResolvedStyle;

struct Context {
    viewport: Viewport,
}

/// Renders a document onto a canvas.
///
/// The document is scaled to fill the whole canvas. All shapes are drawn onto
/// a transparent layer first, which is then composited over the canvas content.
///
/// Nodes are drawn in document order, so later siblings and descendants
/// cover earlier ones.
pub fn render<C: Canvas>(root: &Node, canvas: &mut C) {
    let target = (canvas.width() as f64, canvas.height() as f64);
    let view_box = root.view_box();
    let (width, height) = geom::document_size(root, view_box, target);

    let ts = match geom::root_transform(width, height, view_box, canvas.width(), canvas.height()) {
        Some(ts) => ts,
        None => {
            log::warn!("Document has an invalid size {}x{}. Skipped.", width, height);
            return;
        }
    };

    let viewport = match view_box {
        Some(vb) => Viewport::new(vb.w, vb.h),
        None => Viewport::new(width, height),
    };

    let mut layer = match canvas.create_layer() {
        Some(layer) => layer,
        None => return,
    };

    let ctx = Context { viewport };
    render_node(root, &ResolvedStyle::root(ts), &ctx, &mut layer);

    canvas.composite_over(&layer);
}

fn render_node<C: Canvas>(node: &Node, parent: &ResolvedStyle, ctx: &Context, canvas: &mut C) {
    let style = ResolvedStyle::resolve(node, parent);
    if !style.transform.is_finite() {
        log::warn!("'{}' has an invalid transform. Skipped.", node.tag_name());
        return;
    }

    match node.kind() {
        NodeKind::Svg | NodeKind::Group => {}
        NodeKind::Set => {
            log::debug!("Animation is not supported. Skipped.");
        }
        NodeKind::Unknown(ref name) => {
            log::debug!("Unsupported element '{}'. Skipped.", name);
        }
        _ => {
            render_shape(node, &style, ctx, canvas);
            return;
        }
    }

    render_group(node, &style, ctx, canvas);
}

fn render_group<C: Canvas>(parent: &Node, style: &ResolvedStyle, ctx: &Context, canvas: &mut C) {
    for node in parent.children() {
        render_node(node, style, ctx, canvas);
    }
}

fn render_shape<C: Canvas>(node: &Node, style: &ResolvedStyle, ctx: &Context, canvas: &mut C) {
    let mut outline = match shapes::outline(node, ctx.viewport) {
        Some(v) => v,
        None => return,
    };

    style.transform.map_points(&mut outline.points);

    if outline.fillable {
        if let Some(color) = style.fill_color() {
            canvas.fill_polygon(&outline.points, color);
        }
    }

    if let Some(color) = style.stroke_color() {
        let width = geom::convert_length(style.stroke_width, Axis::Diagonal, ctx.viewport);
        let width = geom::device_stroke_width(width, style.transform);
        if width > 0.0 {
            canvas.stroke_polygon(&outline.points, outline.closed, width, color);
        }
    }
}
