// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgimage` rasterizes and writes [`svgnodes`] documents.

```
use svgimage::{Color, Image, Node};

let mut image = Image::new(20, 20);
image.document_mut().append(Node::rect(0, 0, 10, 20).with_attribute("fill", "red"));

let buf = image.rasterize(20, 20, Some(Color::white())).unwrap();
assert_eq!(buf.pixel(5, 5), Some(svgimage::RGBA8::new(255, 0, 0, 255)));
assert_eq!(buf.pixel(15, 5), Some(svgimage::RGBA8::new(255, 255, 255, 255)));
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::path::Path;

mod canvas;
mod geom;
mod options;
mod render;
mod shapes;
mod style;

pub use canvas::{Canvas, PixmapCanvas};
pub use geom::root_transform;
pub use options::RenderOptions;
pub use render::render;
pub use style::{Paint, ResolvedStyle};

pub use rgb::RGBA8;
pub use svgnodes::{self, Node, NodeKind, WriteOptions};
pub use svgtypes::{self, Color};
pub use tiny_skia;

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Failed to read an SVG document.
    Read(svgnodes::Error),

    /// Failed to read a file.
    Io(std::io::Error),
}

impl From<svgnodes::Error> for Error {
    fn from(e: svgnodes::Error) -> Self {
        Error::Read(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Read(ref e) => write!(f, "{}", e),
            Error::Io(ref e) => write!(f, "failed to read a file cause {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Read(ref e) => Some(e),
            Error::Io(ref e) => Some(e),
        }
    }
}

/// An SVG image.
///
/// Owns a document tree that can be freely edited between renders.
#[derive(Clone, PartialEq, Debug)]
pub struct Image {
    root: Node,
}

impl Image {
    /// Creates an empty image with the specified document size.
    pub fn new(width: impl std::fmt::Display, height: impl std::fmt::Display) -> Self {
        Image {
            root: Node::document(width, height),
        }
    }

    /// Creates an image from an existing `svg` node.
    pub fn from_document(root: Node) -> Self {
        Image { root }
    }

    /// Parses an image from an SVG or SVGZ data.
    pub fn from_data(data: &[u8]) -> Result<Self, Error> {
        Ok(Image {
            root: Node::parse_data(data)?,
        })
    }

    /// Reads an image from an SVG or SVGZ file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let data = std::fs::read(path)?;
        Self::from_data(&data)
    }

    /// Returns the document root.
    #[inline]
    pub fn document(&self) -> &Node {
        &self.root
    }

    /// Returns the mutable document root.
    #[inline]
    pub fn document_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Returns the document size in pixels.
    ///
    /// Percentages are relative to the `viewBox`, or to 100 when it is not set.
    pub fn size(&self) -> (f64, f64) {
        geom::document_size(&self.root, self.root.view_box(), (100.0, 100.0))
    }

    /// Rasterizes the image into a new buffer.
    ///
    /// The document is scaled to fill the whole buffer.
    /// `None` background equals to transparent.
    ///
    /// Returns `None` when a buffer cannot be allocated.
    pub fn rasterize(&self, width: u32, height: u32, background: Option<Color>) -> Option<PixelBuffer> {
        self.rasterize_with(width, height, background, &RenderOptions::default())
    }

    /// Rasterizes the image into a new buffer using the specified options.
    pub fn rasterize_with(
        &self,
        width: u32,
        height: u32,
        background: Option<Color>,
        opt: &RenderOptions,
    ) -> Option<PixelBuffer> {
        let mut canvas = match PixmapCanvas::new(width, height, opt.anti_alias) {
            Some(canvas) => canvas,
            None => {
                log::warn!("Failed to allocate a {}x{} image.", width, height);
                return None;
            }
        };

        if let Some(c) = background {
            canvas.fill(c);
        }

        render(&self.root, &mut canvas);
        Some(PixelBuffer::from_pixmap(canvas.into_pixmap()))
    }

    /// Writes the image as an SVG string.
    ///
    /// `standalone` adds a leading XML declaration.
    pub fn to_xml_string(&self, standalone: bool) -> String {
        let opt = WriteOptions {
            standalone,
            ..WriteOptions::default()
        };

        self.root.to_xml_string(&opt)
    }
}

impl std::str::FromStr for Image {
    type Err = Error;

    /// Parses an image from an SVG string.
    fn from_str(text: &str) -> Result<Self, Error> {
        Ok(Image {
            root: Node::parse_str(text)?,
        })
    }
}

impl std::fmt::Display for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_xml_string(true))
    }
}

/// A raster image that contains rendering results.
///
/// Unpremultiplied RGBA color type is used.
#[derive(Clone, PartialEq, Debug)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    fn from_pixmap(pixmap: tiny_skia::Pixmap) -> Self {
        use rgb::FromSlice;

        let width = pixmap.width();
        let height = pixmap.height();

        let mut data = pixmap.take();
        demultiply_alpha(data.as_rgba_mut());

        PixelBuffer {
            data,
            width,
            height,
        }
    }

    /// Returns the image width.
    ///
    /// Never zero.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height.
    ///
    /// Never zero.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image content as a `u8` slice.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a pixel at the specified position.
    pub fn pixel(&self, x: u32, y: u32) -> Option<RGBA8> {
        use rgb::FromSlice;

        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = y as usize * self.width as usize + x as usize;
        self.data.as_rgba().get(idx).cloned()
    }

    /// Returns the underlying data.
    pub fn take(self) -> Vec<u8> {
        self.data
    }

    /// Saves the image as PNG at a provided path.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), png::EncodingError> {
        let file = std::fs::File::create(path)?;
        let w = std::io::BufWriter::new(file);

        let mut encoder = png::Encoder::new(w, self.width(), self.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.data())
    }
}

fn demultiply_alpha(data: &mut [RGBA8]) {
    for p in data {
        if p.a == 0 || p.a == 255 {
            continue;
        }

        let a = p.a as f64 / 255.0;
        p.b = (p.b as f64 / a + 0.5) as u8;
        p.g = (p.g as f64 / a + 0.5) as u8;
        p.r = (p.r as f64 / a + 0.5) as u8;
    }
}
