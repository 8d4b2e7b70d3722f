use rgb::RGBA8;
use svgimage::tiny_skia::Point;
use svgimage::{Canvas, Color, Image, Node, RenderOptions};

mod render;

const RED: RGBA8 = RGBA8 { r: 255, g: 0, b: 0, a: 255 };
const GREEN: RGBA8 = RGBA8 { r: 0, g: 128, b: 0, a: 255 };
const BLUE: RGBA8 = RGBA8 { r: 0, g: 0, b: 255, a: 255 };
const BLACK: RGBA8 = RGBA8 { r: 0, g: 0, b: 0, a: 255 };
const WHITE: RGBA8 = RGBA8 { r: 255, g: 255, b: 255, a: 255 };
const TRANSPARENT: RGBA8 = RGBA8 { r: 0, g: 0, b: 0, a: 0 };

/// A draw call captured by [`Recorder`].
#[derive(Clone, PartialEq, Debug)]
pub enum Call {
    Fill(Vec<Point>, RGBA8),
    Stroke(Vec<Point>, bool, f32, RGBA8),
}

/// A canvas that records draw calls instead of drawing.
#[derive(Clone, Debug)]
pub struct Recorder {
    width: u32,
    height: u32,
    calls: Vec<Call>,
}

impl Recorder {
    pub fn new(width: u32, height: u32) -> Self {
        Recorder {
            width,
            height,
            calls: Vec::new(),
        }
    }
}

impl Canvas for Recorder {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn create_layer(&self) -> Option<Self> {
        Some(Recorder::new(self.width, self.height))
    }

    fn fill_polygon(&mut self, points: &[Point], color: RGBA8) {
        self.calls.push(Call::Fill(points.to_vec(), color));
    }

    fn stroke_polygon(&mut self, points: &[Point], closed: bool, width: f32, color: RGBA8) {
        self.calls.push(Call::Stroke(points.to_vec(), closed, width, color));
    }

    fn composite_over(&mut self, src: &Self) {
        self.calls.extend(src.calls.iter().cloned());
    }
}

pub fn record(doc: &Node, width: u32, height: u32) -> Vec<Call> {
    let mut recorder = Recorder::new(width, height);
    svgimage::render(doc, &mut recorder);
    recorder.calls
}

fn parse(text: &str) -> Image {
    text.parse().unwrap()
}

#[test]
fn view_box_scenario() {
    let image = parse(
        "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='100' viewBox='0 0 50 50'>
            <rect x='0' y='0' width='50' height='50' fill='red'/>
        </svg>",
    );

    let buf = image.rasterize(200, 200, None).unwrap();
    assert_eq!(buf.width(), 200);
    assert_eq!(buf.height(), 200);

    use rgb::FromSlice;
    assert!(buf.data().as_rgba().iter().all(|p| *p == RED));
}

#[test]
fn painters_order() {
    let mut image = Image::new(100, 100);
    image
        .document_mut()
        .append(Node::rect(0, 0, 60, 60).with_attribute("fill", "red"));
    image
        .document_mut()
        .append(Node::rect(40, 40, 60, 60).with_attribute("fill", "blue"));

    let buf = image.rasterize(100, 100, None).unwrap();
    assert_eq!(buf.pixel(50, 50), Some(BLUE));
    assert_eq!(buf.pixel(10, 10), Some(RED));
    assert_eq!(buf.pixel(90, 90), Some(BLUE));
    assert_eq!(buf.pixel(90, 10), Some(TRANSPARENT));
}

#[test]
fn children_paint_over_parents_siblings() {
    let doc = Node::document(10, 10)
        .with_child(Node::group().with_child(Node::rect(0, 0, 10, 10).with_attribute("fill", "red")))
        .with_child(Node::rect(0, 0, 10, 10).with_attribute("fill", "blue"));

    let buf = Image::from_document(doc).rasterize(10, 10, None).unwrap();
    assert_eq!(buf.pixel(5, 5), Some(BLUE));
}

#[test]
fn degenerate_shapes() {
    let baseline = Image::new(50, 50);
    let baseline = baseline.rasterize(50, 50, Some(Color::white())).unwrap();

    let mut image = Image::new(50, 50);
    let doc = image.document_mut();
    doc.append(Node::circle(25, 25, 0).with_attribute("fill", "red"));
    doc.append(Node::rect(0, 0, 0, 50).with_attribute("fill", "red"));
    doc.append(Node::rect(0, 0, 50, -5).with_attribute("fill", "red"));
    doc.append(Node::ellipse(25, 25, 10, 0).with_attribute("fill", "red"));
    doc.append(Node::polygon().with_point(10, 10).with_attribute("fill", "red"));

    let buf = image.rasterize(50, 50, Some(Color::white())).unwrap();
    assert_eq!(buf, baseline);
    assert_eq!(buf.pixel(25, 25), Some(WHITE));
}

#[test]
fn inheritance() {
    let doc = Node::document(30, 10)
        .with_child(
            Node::group()
                .with_attribute("fill", "green")
                .with_child(Node::rect(0, 0, 10, 10))
                .with_child(Node::group().with_child(Node::rect(10, 0, 10, 10))),
        )
        .with_child(Node::rect(20, 0, 10, 10));

    let buf = Image::from_document(doc).rasterize(30, 10, None).unwrap();
    assert_eq!(buf.pixel(5, 5), Some(GREEN));
    assert_eq!(buf.pixel(15, 5), Some(GREEN));
    assert_eq!(buf.pixel(25, 5), Some(BLACK));
}

#[test]
fn style_precedence() {
    let image = parse(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>
            <rect width='10' height='10' fill='green' style='fill:red'/>
        </svg>",
    );

    let buf = image.rasterize(10, 10, None).unwrap();
    assert_eq!(buf.pixel(5, 5), Some(RED));
}

#[test]
fn malformed_fill() {
    let image = parse(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>
            <g fill='blue'><rect width='10' height='10' fill='qwe'/></g>
        </svg>",
    );

    let buf = image.rasterize(10, 10, None).unwrap();
    assert_eq!(buf.pixel(5, 5), Some(BLACK));
}

#[test]
fn stroke_only_line() {
    let doc = Node::document(100, 100).with_child(
        Node::line(0, 50, 100, 50)
            .with_attribute("fill", "red")
            .with_attribute("stroke", "black")
            .with_attribute("stroke-width", 10),
    );

    let buf = Image::from_document(doc).rasterize(100, 100, None).unwrap();
    assert_eq!(buf.pixel(50, 50), Some(BLACK));
    assert_eq!(buf.pixel(50, 30), Some(TRANSPARENT));
    assert_eq!(buf.pixel(50, 70), Some(TRANSPARENT));
}

#[test]
fn filled_polyline() {
    let doc = Node::document(100, 100).with_child(
        Node::polyline()
            .with_point(0, 0)
            .with_point(100, 0)
            .with_point(100, 100)
            .with_attribute("fill", "red"),
    );

    let buf = Image::from_document(doc).rasterize(100, 100, None).unwrap();
    assert_eq!(buf.pixel(90, 10), Some(RED));
    assert_eq!(buf.pixel(10, 90), Some(TRANSPARENT));
}

#[test]
fn group_opacity() {
    let doc = Node::document(10, 10).with_child(
        Node::group()
            .with_attribute("opacity", "0.5")
            .with_child(Node::rect(0, 0, 10, 10).with_attribute("fill", "red")),
    );

    let buf = Image::from_document(doc)
        .rasterize(10, 10, Some(Color::white()))
        .unwrap();
    let p = buf.pixel(5, 5).unwrap();
    assert_eq!((p.r, p.a), (255, 255));
    assert!((126..=128).contains(&p.g), "{:?}", p);
    assert!((126..=128).contains(&p.b), "{:?}", p);
}

#[test]
fn stroke_opacity() {
    let doc = Node::document(10, 10).with_child(
        Node::line(0, 5, 10, 5)
            .with_attribute("stroke", "red")
            .with_attribute("stroke-width", 4)
            .with_attribute("stroke-opacity", "0.5"),
    );

    let buf = Image::from_document(doc)
        .rasterize(10, 10, Some(Color::white()))
        .unwrap();
    let p = buf.pixel(5, 5).unwrap();
    assert_eq!((p.r, p.a), (255, 255));
    assert!((126..=128).contains(&p.g), "{:?}", p);
    assert!((126..=128).contains(&p.b), "{:?}", p);
    assert_eq!(buf.pixel(5, 0), Some(WHITE));
}

#[test]
fn no_anti_alias() {
    let doc = Node::document(10, 10)
        .with_child(Node::circle(5, 5, 4).with_attribute("fill", "red"));

    let opt = RenderOptions { anti_alias: false };
    let buf = Image::from_document(doc)
        .rasterize_with(10, 10, None, &opt)
        .unwrap();

    use rgb::FromSlice;
    assert!(buf.data().as_rgba().iter().all(|p| *p == RED || *p == TRANSPARENT));
}

#[test]
fn zero_size() {
    assert!(Image::new(10, 10).rasterize(0, 10, None).is_none());
}

#[test]
fn zero_document_size() {
    let doc = Node::document(0, 10).with_child(Node::rect(0, 0, 10, 10));
    let buf = Image::from_document(doc).rasterize(10, 10, None).unwrap();

    use rgb::FromSlice;
    assert!(buf.data().as_rgba().iter().all(|p| *p == TRANSPARENT));
}

#[test]
fn edits_between_renders() {
    let mut image = Image::new(10, 10);
    image.document_mut().append(Node::rect(0, 0, 10, 10).with_attribute("fill", "red"));
    assert_eq!(image.rasterize(10, 10, None).unwrap().pixel(1, 1), Some(RED));

    image.document_mut().children_mut()[0].set_attribute("fill", "blue");
    assert_eq!(image.rasterize(10, 10, None).unwrap().pixel(1, 1), Some(BLUE));
}

#[test]
fn document_size() {
    assert_eq!(Image::new("2in", 50).size(), (192.0, 50.0));
    assert_eq!(Image::new("50%", "100%").size(), (50.0, 100.0));

    let image = parse("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 40 30'/>");
    assert_eq!(image.size(), (40.0, 30.0));
}

#[test]
fn not_an_svg() {
    let res = "<html/>".parse::<Image>();
    assert!(matches!(
        res,
        Err(svgimage::Error::Read(svgimage::svgnodes::Error::NotAnSvg))
    ));
}

#[test]
fn missing_file() {
    let res = Image::from_file("this-file-does-not-exist.svg");
    assert!(matches!(res, Err(svgimage::Error::Io(_))));
}

#[test]
fn svgz() {
    use std::io::Write;

    let text = "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>\
                <rect width='10' height='10' fill='red'/></svg>";

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    let data = encoder.finish().unwrap();

    let image = Image::from_data(&data).unwrap();
    assert_eq!(image, parse(text));
}

#[test]
fn serialize() {
    let image = Image::new(10, 10);
    assert_eq!(
        image.to_xml_string(false),
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\"/>\n"
    );

    let text = image.to_string();
    assert!(text.starts_with("<?xml"));
    assert_eq!(parse(&text), image);
}

#[test]
fn save_png() {
    let mut image = Image::new(4, 4);
    image.document_mut().append(Node::rect(0, 0, 2, 4).with_attribute("fill", "red"));
    let buf = image.rasterize(4, 4, None).unwrap();

    let path = std::env::temp_dir().join("svgimage-save-png-test.png");
    buf.save_png(&path).unwrap();

    let data = std::fs::read(&path).unwrap();
    assert!(data.starts_with(&[0x89, b'P', b'N', b'G']));
    std::fs::remove_file(&path).unwrap();
}
