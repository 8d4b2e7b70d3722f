// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::borrow::Cow;

use xmlwriter::{Indent, XmlWriter};

use crate::{Node, NodeKind, SVG_NS, XLINK_NS};

impl Node {
    /// Writes the node and its descendants as SVG.
    ///
    /// Attribute values and text are written verbatim, only reserved characters are escaped.
    pub fn to_xml_string(&self, opt: &WriteOptions) -> String {
        convert(self, opt)
    }
}

/// XML writing options.
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Write the leading `<?xml ...?>` declaration.
    ///
    /// Default: enabled
    pub standalone: bool,

    /// Use single quote marks instead of double quote.
    ///
    /// # Examples
    ///
    /// Before:
    ///
    /// ```text
    /// <rect fill="red"/>
    /// ```
    ///
    /// After:
    ///
    /// ```text
    /// <rect fill='red'/>
    /// ```
    ///
    /// Default: disabled
    pub use_single_quote: bool,

    /// Set XML nodes indention.
    ///
    /// Default: 4 spaces
    pub indent: Indent,

    /// Set XML attributes indention.
    ///
    /// Default: `None`
    pub attributes_indent: Indent,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            standalone: true,
            use_single_quote: false,
            indent: Indent::Spaces(4),
            attributes_indent: Indent::None,
        }
    }
}

fn convert(root: &Node, opt: &WriteOptions) -> String {
    let mut xml = XmlWriter::new(xmlwriter::Options {
        use_single_quote: opt.use_single_quote,
        indent: opt.indent,
        attributes_indent: opt.attributes_indent,
    });

    if opt.standalone {
        xml.write_declaration();
    }

    xml.start_element(root.tag_name());
    if *root.kind() == NodeKind::Svg {
        if !root.attributes().contains("xmlns") {
            xml.write_attribute("xmlns", SVG_NS);
        }

        if !root.attributes().contains("xmlns:xlink") && has_xlink(root) {
            xml.write_attribute("xmlns:xlink", XLINK_NS);
        }
    }
    write_content(root, false, &mut xml);

    xml.end_document()
}

fn write_element(node: &Node, preserve: bool, xml: &mut XmlWriter) {
    xml.start_element(node.tag_name());
    write_content(node, preserve, xml);
}

/// Writes attributes, text and children, then closes the element.
///
/// Indention is disabled inside an element with text,
/// otherwise it would become a part of that text.
fn write_content(node: &Node, preserve: bool, xml: &mut XmlWriter) {
    write_attributes(node, xml);

    let enter_text = node.text().is_some() && !preserve;
    if enter_text {
        xml.set_preserve_whitespaces(true);
    }

    if let Some(text) = node.text() {
        xml.write_text(&escape(text));
    }

    for child in node.children() {
        write_element(child, preserve || enter_text, xml);
    }

    xml.end_element();

    if enter_text {
        xml.set_preserve_whitespaces(false);
    }
}

fn write_attributes(node: &Node, xml: &mut XmlWriter) {
    for (name, value) in node.attributes().iter() {
        xml.write_attribute(name, &escape(value));
    }

    if !node.styles().is_empty() {
        xml.write_attribute("style", &escape(&node.styles().to_declarations()));
    }
}

fn has_xlink(root: &Node) -> bool {
    root.descendants()
        .any(|n| n.attributes().iter().any(|(name, _)| name.starts_with("xlink:")))
}

/// Escapes markup characters.
///
/// Quotes in attributes and `<` in text are escaped by `xmlwriter` itself.
fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>']) {
        return Cow::Borrowed(value);
    }

    let mut s = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            _ => s.push(c),
        }
    }

    Cow::Owned(s)
}
