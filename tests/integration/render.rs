use svgimage::tiny_skia::Point;
use svgimage::Node;

use crate::{record, Call, BLACK, RED};

fn square(x: f32, y: f32, w: f32, h: f32) -> Vec<Point> {
    vec![
        Point::from_xy(x, y),
        Point::from_xy(x + w, y),
        Point::from_xy(x + w, y + h),
        Point::from_xy(x, y + h),
    ]
}

#[test]
fn transform_composition() {
    let doc = Node::document(10, 10).with_child(
        Node::group().with_attribute("transform", "translate(3 4)").with_child(
            Node::rect(0, 0, 1, 1)
                .with_attribute("transform", "scale(2)")
                .with_attribute("fill", "red"),
        ),
    );

    // Root is a 2x scale.
    let calls = record(&doc, 20, 20);
    assert_eq!(calls, vec![Call::Fill(square(6.0, 8.0, 4.0, 4.0), RED)]);
}

#[test]
fn view_box_offset() {
    let doc = Node::document(100, 100)
        .with_attribute("viewBox", "10 10 50 100")
        .with_child(Node::rect(10, 10, 50, 100));

    let calls = record(&doc, 100, 100);
    assert_eq!(calls, vec![Call::Fill(square(0.0, 0.0, 100.0, 100.0), BLACK)]);
}

#[test]
fn independent_axes() {
    let doc = Node::document(10, 10).with_child(Node::rect(0, 0, 10, 10));
    let calls = record(&doc, 40, 20);
    assert_eq!(calls, vec![Call::Fill(square(0.0, 0.0, 40.0, 20.0), BLACK)]);
}

#[test]
fn fill_before_stroke() {
    let doc = Node::document(10, 10).with_child(
        Node::rect(1, 1, 8, 8)
            .with_attribute("fill", "red")
            .with_attribute("stroke", "black")
            .with_attribute("stroke-width", 2),
    );

    let calls = record(&doc, 10, 10);
    assert_eq!(
        calls,
        vec![
            Call::Fill(square(1.0, 1.0, 8.0, 8.0), RED),
            Call::Stroke(square(1.0, 1.0, 8.0, 8.0), true, 2.0, BLACK),
        ]
    );
}

#[test]
fn stroke_width_is_scaled() {
    let doc = Node::document(10, 10).with_child(
        Node::line(0, 5, 10, 5)
            .with_attribute("stroke", "black")
            .with_attribute("stroke-width", "0.5"),
    );

    let calls = record(&doc, 40, 40);
    assert_eq!(
        calls,
        vec![Call::Stroke(
            vec![Point::from_xy(0.0, 20.0), Point::from_xy(40.0, 20.0)],
            false,
            2.0,
            BLACK
        )]
    );
}

#[test]
fn zero_stroke_width() {
    let doc = Node::document(10, 10).with_child(
        Node::line(0, 5, 10, 5)
            .with_attribute("stroke", "black")
            .with_attribute("stroke-width", 0),
    );

    assert!(record(&doc, 10, 10).is_empty());
}

#[test]
fn non_drawing_elements() {
    let doc = Node::document(10, 10)
        .with_child(Node::set().with_attribute("attributeName", "fill"))
        .with_child(Node::from_parts("title", Default::default(), Vec::new()));

    assert!(record(&doc, 10, 10).is_empty());
}

#[test]
fn set_children_are_walked() {
    let doc = Node::document(10, 10).with_child(
        Node::set()
            .with_attribute("attributeName", "fill")
            .with_attribute("fill", "red")
            .with_child(Node::rect(0, 0, 5, 5)),
    );

    let calls = record(&doc, 10, 10);
    assert_eq!(calls, vec![Call::Fill(square(0.0, 0.0, 5.0, 5.0), RED)]);
}

#[test]
fn foreign_elements_are_walked() {
    let doc = Node::parse_str(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:ed='http://example.com/editor'
              width='10' height='10'>
            <ed:layer ed:name='top'><rect width='10' height='10' fill='red'/></ed:layer>
            <title>Squares</title>
        </svg>",
    )
    .unwrap();

    let calls = record(&doc, 10, 10);
    assert_eq!(calls, vec![Call::Fill(square(0.0, 0.0, 10.0, 10.0), RED)]);
}

#[test]
fn unknown_containers_are_walked() {
    let doc = Node::parse_str(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>
            <a fill='red'><rect width='10' height='10'/></a>
        </svg>",
    )
    .unwrap();

    let calls = record(&doc, 10, 10);
    assert_eq!(calls, vec![Call::Fill(square(0.0, 0.0, 10.0, 10.0), RED)]);
}

#[test]
fn invalid_transform_skips_subtree() {
    let doc = Node::document(10, 10)
        .with_child(
            Node::group()
                .with_attribute("transform", "scale(1e39)")
                .with_child(Node::rect(0, 0, 1, 1)),
        )
        .with_child(Node::rect(0, 0, 10, 10).with_attribute("fill", "red"));

    let calls = record(&doc, 10, 10);
    assert_eq!(calls, vec![Call::Fill(square(0.0, 0.0, 10.0, 10.0), RED)]);
}

#[test]
fn circle_segments() {
    let doc = Node::document(10, 10).with_child(Node::circle(5, 5, 4));

    let calls = record(&doc, 10, 10);
    match calls.as_slice() {
        [Call::Fill(points, _)] => assert_eq!(points.len(), 128),
        _ => panic!("unexpected calls: {:?}", calls),
    }
}
