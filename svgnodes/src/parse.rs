// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Attributes, Error, Node, SVG_NS, XLINK_NS, XML_NAMESPACE_NS};

/// Maximum element nesting depth.
///
/// `roxmltree` parses recursively as well, so a document this deep needs
/// a stack large enough for it before this limit is checked.
const MAX_DEPTH: u32 = 1024;

impl Node {
    /// Parses a document from an SVG data.
    ///
    /// Can contain an SVG string or a gzip compressed data.
    pub fn parse_data(data: &[u8]) -> Result<Node, Error> {
        if data.starts_with(&[0x1f, 0x8b]) {
            let data = decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::parse_str(text)
        } else {
            let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::parse_str(text)
        }
    }

    /// Parses a document from an SVG string.
    pub fn parse_str(text: &str) -> Result<Node, Error> {
        let xml_opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        let xml = roxmltree::Document::parse_with_options(text, xml_opt)?;
        Self::parse_tree(&xml)
    }

    /// Parses a document from a [`roxmltree::Document`].
    pub fn parse_tree(xml: &roxmltree::Document) -> Result<Node, Error> {
        let root = xml.root_element();
        if !is_svg_element(root) || root.tag_name().name() != "svg" {
            return Err(Error::NotAnSvg);
        }

        parse_xml_node(root, 0)
    }
}

/// Decompresses an SVGZ file.
pub fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut decoded)
        .map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}

fn is_svg_element(node: roxmltree::Node) -> bool {
    node.is_element() && matches!(node.tag_name().namespace(), None | Some(SVG_NS))
}

fn parse_xml_node(node: roxmltree::Node, depth: u32) -> Result<Node, Error> {
    if depth > MAX_DEPTH {
        return Err(Error::ElementsLimitReached);
    }

    let mut attributes = Attributes::new();
    append_namespaces(node, &mut attributes);

    for attr in node.attributes() {
        let name = match attr.namespace() {
            None | Some(SVG_NS) => attr.name().to_string(),
            Some(XLINK_NS) => format!("xlink:{}", attr.name()),
            Some(XML_NAMESPACE_NS) => format!("xml:{}", attr.name()),
            Some(ns) => match find_prefix(node, ns) {
                Some(prefix) => format!("{}:{}", prefix, attr.name()),
                None => {
                    log::warn!("Attribute '{}' has an unbound namespace. Skipped.", attr.name());
                    continue;
                }
            },
        };

        attributes.insert(name, attr.value());
    }

    let mut text = String::new();
    let mut children = Vec::new();
    for child in node.children() {
        if child.is_text() {
            text.push_str(child.text().unwrap_or_default());
        } else if child.is_element() {
            children.push(parse_xml_node(child, depth + 1)?);
        }
    }

    let mut element = Node::from_parts(&tag_name(node), attributes, children);
    if !text.trim().is_empty() {
        element.set_text(text);
    }

    Ok(element)
}

/// Returns an element name with a prefix for non-SVG namespaces.
fn tag_name(node: roxmltree::Node) -> String {
    let name = node.tag_name().name();
    match node.tag_name().namespace() {
        None | Some(SVG_NS) => name.to_string(),
        Some(ns) if node.lookup_namespace_uri(None) == Some(ns) => name.to_string(),
        Some(ns) => match find_prefix(node, ns) {
            Some(prefix) => format!("{}:{}", prefix, name),
            None => name.to_string(),
        },
    }
}

fn find_prefix<'input>(node: roxmltree::Node<'_, 'input>, uri: &str) -> Option<&'input str> {
    node.namespaces()
        .filter(|ns| ns.uri() == uri)
        .find_map(|ns| ns.name())
}

/// Stores namespace declarations introduced by this element as `xmlns` attributes.
///
/// SVG and XLink namespaces are skipped, since the writer adds them itself.
fn append_namespaces(node: roxmltree::Node, attributes: &mut Attributes) {
    let parent = node.parent_element();
    for ns in node.namespaces() {
        if matches!(ns.uri(), SVG_NS | XLINK_NS) {
            continue;
        }

        let inherited = parent.map_or(false, |p| {
            p.namespaces().any(|v| v.name() == ns.name() && v.uri() == ns.uri())
        });
        if inherited {
            continue;
        }

        match ns.name() {
            Some(prefix) => attributes.insert(format!("xmlns:{}", prefix), ns.uri()),
            None => attributes.insert("xmlns", ns.uri()),
        }
    }
}
