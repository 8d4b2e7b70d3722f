// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgnodes` represents an [SVG](https://www.w3.org/TR/SVG11/) document as a mutable
tree of typed nodes.

Unlike a render tree, nothing is resolved here: attribute values are stored exactly
as they were written, so a document can be read, edited and written back
without losing its formatting. Numbers, colors and transforms are parsed
only by the consumer that needs them.

```
use svgnodes::Node;

let mut doc = Node::document(100, 100);
doc.append(Node::rect(10, 10, 80, 80).with_attribute("fill", "red"));
assert_eq!(doc.children().len(), 1);
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::fmt::Display;

mod attributes;
mod parse;
mod writer;

pub use attributes::Attributes;
pub use parse::decompress_svgz;
pub use writer::WriteOptions;

pub use roxmltree;
pub use svgtypes;
pub use xmlwriter::Indent;

pub(crate) const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub(crate) const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub(crate) const XML_NAMESPACE_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// We do not allow SVG with more than 1024 nested elements.
    ElementsLimitReached,

    /// The root element is not `svg`.
    NotAnSvg,

    /// Failed to parse an SVG data.
    ParsingFailed(roxmltree::Error),
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ElementsLimitReached => {
                write!(f, "the maximum elements nesting depth has been reached")
            }
            Error::NotAnSvg => {
                write!(f, "the root element is not 'svg'")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
        }
    }
}

impl std::error::Error for Error {}

/// A node kind.
///
/// Every known SVG element has its own variant. Everything else is preserved
/// as `Unknown`, so it survives a read/write cycle, but is never drawn.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NodeKind {
    /// The `svg` element. The document root.
    Svg,
    /// The `g` element.
    Group,
    /// The `rect` element.
    Rect,
    /// The `circle` element.
    Circle,
    /// The `ellipse` element.
    Ellipse,
    /// The `line` element.
    Line,
    /// The `polygon` element.
    Polygon,
    /// The `polyline` element.
    Polyline,
    /// The `set` animation element.
    Set,
    /// Any other element. Contains the tag name.
    Unknown(String),
}

impl NodeKind {
    /// Returns a node kind for a tag name.
    pub fn from_tag_name(name: &str) -> Self {
        match name {
            "svg" => NodeKind::Svg,
            "g" => NodeKind::Group,
            "rect" => NodeKind::Rect,
            "circle" => NodeKind::Circle,
            "ellipse" => NodeKind::Ellipse,
            "line" => NodeKind::Line,
            "polygon" => NodeKind::Polygon,
            "polyline" => NodeKind::Polyline,
            "set" => NodeKind::Set,
            _ => NodeKind::Unknown(name.to_string()),
        }
    }

    /// Returns the element tag name.
    pub fn tag_name(&self) -> &str {
        match self {
            NodeKind::Svg => "svg",
            NodeKind::Group => "g",
            NodeKind::Rect => "rect",
            NodeKind::Circle => "circle",
            NodeKind::Ellipse => "ellipse",
            NodeKind::Line => "line",
            NodeKind::Polygon => "polygon",
            NodeKind::Polyline => "polyline",
            NodeKind::Set => "set",
            NodeKind::Unknown(ref name) => name,
        }
    }

    /// Checks if this is a basic shape.
    ///
    /// Shapes are leaf nodes and cannot have children.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            NodeKind::Rect
                | NodeKind::Circle
                | NodeKind::Ellipse
                | NodeKind::Line
                | NodeKind::Polygon
                | NodeKind::Polyline
        )
    }
}

/// An SVG node.
///
/// Owns its children exclusively. There are no parent links,
/// so a tree cannot contain cycles.
#[derive(Clone, PartialEq, Debug)]
pub struct Node {
    kind: NodeKind,
    attributes: Attributes,
    styles: Attributes,
    text: String,
    children: Vec<Node>,
}

impl Node {
    /// Creates a new node without attributes and children.
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            attributes: Attributes::new(),
            styles: Attributes::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Creates a node from its parsed parts.
    ///
    /// The `style` attribute is split into style declarations.
    /// Children of a shape are dropped.
    pub fn from_parts(tag_name: &str, attributes: Attributes, children: Vec<Node>) -> Self {
        let mut node = Node::new(NodeKind::from_tag_name(tag_name));
        for (name, value) in attributes.iter() {
            node.set_attribute(name, value);
        }

        for child in children {
            node.append(child);
        }

        node
    }

    /// Creates a new `svg` document root.
    pub fn document(width: impl Display, height: impl Display) -> Self {
        Node::new(NodeKind::Svg)
            .with_attribute("width", width)
            .with_attribute("height", height)
    }

    /// Creates a new `g` element.
    pub fn group() -> Self {
        Node::new(NodeKind::Group)
    }

    /// Creates a new `rect` element.
    pub fn rect(x: impl Display, y: impl Display, width: impl Display, height: impl Display) -> Self {
        Node::new(NodeKind::Rect)
            .with_attribute("x", x)
            .with_attribute("y", y)
            .with_attribute("width", width)
            .with_attribute("height", height)
    }

    /// Creates a new `circle` element.
    pub fn circle(cx: impl Display, cy: impl Display, r: impl Display) -> Self {
        Node::new(NodeKind::Circle)
            .with_attribute("cx", cx)
            .with_attribute("cy", cy)
            .with_attribute("r", r)
    }

    /// Creates a new `ellipse` element.
    pub fn ellipse(cx: impl Display, cy: impl Display, rx: impl Display, ry: impl Display) -> Self {
        Node::new(NodeKind::Ellipse)
            .with_attribute("cx", cx)
            .with_attribute("cy", cy)
            .with_attribute("rx", rx)
            .with_attribute("ry", ry)
    }

    /// Creates a new `line` element.
    pub fn line(x1: impl Display, y1: impl Display, x2: impl Display, y2: impl Display) -> Self {
        Node::new(NodeKind::Line)
            .with_attribute("x1", x1)
            .with_attribute("y1", y1)
            .with_attribute("x2", x2)
            .with_attribute("y2", y2)
    }

    /// Creates a new `polygon` element without points.
    pub fn polygon() -> Self {
        Node::new(NodeKind::Polygon)
    }

    /// Creates a new `polyline` element without points.
    pub fn polyline() -> Self {
        Node::new(NodeKind::Polyline)
    }

    /// Creates a new `set` element.
    pub fn set() -> Self {
        Node::new(NodeKind::Set)
    }

    /// Returns node's kind.
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns element's tag name.
    #[inline]
    pub fn tag_name(&self) -> &str {
        self.kind.tag_name()
    }

    /// Checks that the node cannot have children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.kind.is_shape()
    }

    /// Returns element's `id` attribute value.
    ///
    /// Returns an empty string otherwise.
    #[inline]
    pub fn id(&self) -> &str {
        self.attribute("id").unwrap_or("")
    }

    /// Returns an attribute value.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Sets an attribute.
    ///
    /// Setting `style` replaces all style declarations instead.
    pub fn set_attribute(&mut self, name: &str, value: impl Display) {
        if name == "style" {
            self.styles = Attributes::from_declarations(&value.to_string());
        } else {
            self.attributes.insert(name, value.to_string());
        }
    }

    /// Sets an attribute and returns the node.
    pub fn with_attribute(mut self, name: &str, value: impl Display) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Removes an attribute and returns its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Returns all attributes, except `style`.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns a style declaration value.
    #[inline]
    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name)
    }

    /// Sets a style declaration.
    pub fn set_style(&mut self, name: &str, value: impl Display) {
        self.styles.insert(name, value.to_string());
    }

    /// Sets a style declaration and returns the node.
    pub fn with_style(mut self, name: &str, value: impl Display) -> Self {
        self.set_style(name, value);
        self
    }

    /// Removes a style declaration and returns its value.
    pub fn remove_style(&mut self, name: &str) -> Option<String> {
        self.styles.remove(name)
    }

    /// Returns all style declarations.
    #[inline]
    pub fn styles(&self) -> &Attributes {
        &self.styles
    }

    /// Returns a presentation property value.
    ///
    /// A style declaration takes precedence over an attribute with the same name.
    #[inline]
    pub fn presentation(&self, name: &str) -> Option<&str> {
        self.style(name).or_else(|| self.attribute(name))
    }

    /// Returns element's text content.
    ///
    /// Text is stored as a single string, even when it was split
    /// between child elements in the source.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    /// Sets element's text content.
    ///
    /// An empty string removes it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Sets element's text content and returns the node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Returns a list of children.
    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns a mutable list of children.
    ///
    /// Always empty for shapes.
    #[inline]
    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Returns a child by index.
    #[inline]
    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// Appends a child.
    ///
    /// Shapes cannot have children, so in this case the child is dropped.
    pub fn append(&mut self, child: Node) {
        if self.is_leaf() {
            log::warn!(
                "'{}' cannot contain '{}'. Skipped.",
                self.tag_name(),
                child.tag_name()
            );
            return;
        }

        self.children.push(child);
    }

    /// Appends a child and returns the node.
    pub fn with_child(mut self, child: Node) -> Self {
        self.append(child);
        self
    }

    /// Inserts a child at the specified position.
    ///
    /// `index` is clamped to the number of children.
    pub fn insert_child(&mut self, index: usize, child: Node) {
        if self.is_leaf() {
            log::warn!(
                "'{}' cannot contain '{}'. Skipped.",
                self.tag_name(),
                child.tag_name()
            );
            return;
        }

        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Removes a child by index and returns it.
    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    /// Returns an iterator over this node and its descendants in document order.
    #[inline]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            first: Some(self),
            stack: Vec::new(),
        }
    }

    /// Returns the first element with the specified `id`.
    pub fn element_by_id(&self, id: &str) -> Option<&Node> {
        self.descendants().find(|n| n.id() == id)
    }

    /// Returns a `viewBox` of an `svg` element.
    ///
    /// A malformed value is treated as missing.
    pub fn view_box(&self) -> Option<svgtypes::ViewBox> {
        let value = self.attribute("viewBox")?;
        match value.parse() {
            Ok(vb) => Some(vb),
            Err(_) => {
                log::warn!("Failed to parse viewBox value: '{}'.", value);
                None
            }
        }
    }

    /// Sets a `viewBox`.
    pub fn set_view_box(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.set_attribute("viewBox", format_args!("{} {} {} {}", x, y, width, height));
    }

    /// Returns a list of `points` of a `polygon` or a `polyline`.
    ///
    /// Parsing stops at the first invalid coordinate.
    /// A trailing odd coordinate is ignored.
    pub fn points(&self) -> Vec<(f64, f64)> {
        match self.attribute("points") {
            Some(value) => svgtypes::PointsParser::from(value).collect(),
            None => Vec::new(),
        }
    }

    /// Appends a point to the `points` attribute.
    pub fn add_point(&mut self, x: impl Display, y: impl Display) {
        let value = match self.attribute("points") {
            Some(points) if !points.trim().is_empty() => format!("{} {},{}", points, x, y),
            _ => format!("{},{}", x, y),
        };
        self.attributes.insert("points", value);
    }

    /// Appends a point and returns the node.
    pub fn with_point(mut self, x: impl Display, y: impl Display) -> Self {
        self.add_point(x, y);
        self
    }
}

/// An iterator over a node and its descendants in document order.
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    first: Option<&'a Node>,
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(node) = self.first.take() {
            self.stack.push(node.children.iter());
            return Some(node);
        }

        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(node) => {
                    self.stack.push(node.children.iter());
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
