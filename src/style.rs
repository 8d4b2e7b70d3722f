// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use rgb::RGBA8;
use svgnodes::Node;
use svgtypes::{Color, Length, PaintFallback};
use tiny_skia::Transform;

use crate::geom;

/// A resolved `fill` or `stroke` value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Paint {
    /// Nothing is painted.
    None,
    /// A plain color.
    Color(Color),
    /// The `color` property of the painted element.
    CurrentColor,
}

/// Presentation properties of a node after inheritance.
///
/// Computed on every render pass, never stored in the tree.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ResolvedStyle {
    /// `fill`
    pub fill: Paint,
    /// `fill-opacity`
    pub fill_opacity: f64,
    /// `stroke`
    pub stroke: Paint,
    /// `stroke-width`
    ///
    /// Kept as a length, since percentages depend on the viewport.
    pub stroke_width: Length,
    /// `stroke-opacity`
    pub stroke_opacity: f64,
    /// `opacity`
    pub opacity: f64,
    /// `color`, used by `currentColor`.
    pub color: Color,
    /// The cumulative transform from the node's user space to device space.
    pub transform: Transform,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        ResolvedStyle {
            fill: Paint::Color(Color::black()),
            fill_opacity: 1.0,
            stroke: Paint::None,
            stroke_width: Length::new_number(1.0),
            stroke_opacity: 1.0,
            opacity: 1.0,
            color: Color::black(),
            transform: Transform::identity(),
        }
    }
}

impl ResolvedStyle {
    /// Creates a style with default properties and the provided root transform.
    pub fn root(transform: Transform) -> Self {
        ResolvedStyle {
            transform,
            ..ResolvedStyle::default()
        }
    }

    /// Resolves node properties on top of the parent ones.
    ///
    /// Missing properties are inherited. Malformed values fall back to the property default.
    /// The node's own `transform` is applied after the parent one.
    pub fn resolve(node: &Node, parent: &ResolvedStyle) -> Self {
        let def = ResolvedStyle::default();

        let transform = match node.attribute("transform") {
            Some(value) => parent.transform.pre_concat(geom::parse_transform(value)),
            None => parent.transform,
        };

        ResolvedStyle {
            fill: resolve_paint(node, "fill", parent.fill, def.fill),
            fill_opacity: resolve_opacity(node, "fill-opacity", parent.fill_opacity),
            stroke: resolve_paint(node, "stroke", parent.stroke, def.stroke),
            stroke_width: resolve_stroke_width(node, parent.stroke_width),
            stroke_opacity: resolve_opacity(node, "stroke-opacity", parent.stroke_opacity),
            opacity: resolve_opacity(node, "opacity", parent.opacity),
            color: resolve_color(node, parent.color),
            transform,
        }
    }

    /// Returns the fill color with all opacities applied.
    ///
    /// Returns `None` when nothing should be filled.
    pub fn fill_color(&self) -> Option<RGBA8> {
        self.paint_color(self.fill, self.fill_opacity)
    }

    /// Returns the stroke color with all opacities applied.
    ///
    /// Returns `None` when nothing should be stroked.
    pub fn stroke_color(&self) -> Option<RGBA8> {
        self.paint_color(self.stroke, self.stroke_opacity)
    }

    fn paint_color(&self, paint: Paint, opacity: f64) -> Option<RGBA8> {
        let c = match paint {
            Paint::None => return None,
            Paint::Color(c) => c,
            Paint::CurrentColor => self.color,
        };

        let a = c.alpha as f64 * opacity * self.opacity;
        let a = a.round().max(0.0).min(255.0) as u8;
        if a == 0 {
            return None;
        }

        Some(RGBA8::new(c.red, c.green, c.blue, a))
    }
}

/// Returns a property value with the `inherit` keyword already resolved.
fn property<'a>(node: &'a Node, name: &str) -> Option<&'a str> {
    match node.presentation(name).map(str::trim) {
        Some("inherit") | None => None,
        v => v,
    }
}

fn resolve_paint(node: &Node, name: &str, inherited: Paint, def: Paint) -> Paint {
    let value = match property(node, name) {
        Some(v) => v,
        None => return inherited,
    };

    match svgtypes::Paint::from_str(value) {
        Ok(svgtypes::Paint::None) => Paint::None,
        Ok(svgtypes::Paint::Inherit) => inherited,
        Ok(svgtypes::Paint::CurrentColor) => Paint::CurrentColor,
        Ok(svgtypes::Paint::Color(c)) => Paint::Color(c),
        Ok(svgtypes::Paint::FuncIRI(_, Some(fallback))) => match fallback {
            PaintFallback::None => Paint::None,
            PaintFallback::CurrentColor => Paint::CurrentColor,
            PaintFallback::Color(c) => Paint::Color(c),
        },
        Ok(_) => {
            log::warn!("Paint servers are not supported: '{}'. Fallback to default.", value);
            def
        }
        Err(_) => {
            log::warn!("Failed to parse {} value: '{}'.", name, value);
            def
        }
    }
}

fn resolve_opacity(node: &Node, name: &str, inherited: f64) -> f64 {
    let value = match property(node, name) {
        Some(v) => v,
        None => return inherited,
    };

    match svgtypes::Number::from_str(value) {
        Ok(n) if n.0.is_finite() => n.0.max(0.0).min(1.0),
        _ => {
            log::warn!("Failed to parse {} value: '{}'.", name, value);
            1.0
        }
    }
}

fn resolve_stroke_width(node: &Node, inherited: Length) -> Length {
    let value = match property(node, "stroke-width") {
        Some(v) => v,
        None => return inherited,
    };

    match Length::from_str(value) {
        Ok(length) if length.number >= 0.0 => length,
        _ => {
            log::warn!("Failed to parse stroke-width value: '{}'.", value);
            Length::new_number(1.0)
        }
    }
}

fn resolve_color(node: &Node, inherited: Color) -> Color {
    let value = match property(node, "color") {
        Some("currentColor") | None => return inherited,
        Some(v) => v,
    };

    match Color::from_str(value) {
        Ok(c) => c,
        Err(_) => {
            log::warn!("Failed to parse color value: '{}'.", value);
            Color::black()
        }
    }
}
