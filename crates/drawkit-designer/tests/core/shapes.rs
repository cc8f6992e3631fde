use std::rc::Rc;

use drawkit_designer::model::{
    clone_if_shared, Corner, Point, Rect, Shape, ShapeType, StyleParam, StyleParams,
};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn created(kind: ShapeType, from: Point, to: Point) -> Shape {
    let mut shape = Shape::create(kind, from, StyleParams::default());
    shape.layout_new(to, false);
    shape
}

#[test]
fn test_clone_if_shared_leaves_unique_shape_alone() {
    let mut shape = Rc::new(created(ShapeType::Line, p(0.0, 0.0), p(10.0, 0.0)));
    let before = Rc::as_ptr(&shape);
    clone_if_shared(&mut shape).translate(p(1.0, 1.0));
    assert_eq!(Rc::as_ptr(&shape), before);
    assert_eq!(shape.reference(), p(1.0, 1.0));
}

#[test]
fn test_clone_if_shared_detaches_shared_shape() {
    let original = Rc::new(created(ShapeType::Oval, p(0.0, 0.0), p(10.0, 10.0)));
    let mut working = Rc::clone(&original);
    clone_if_shared(&mut working).set_param(StyleParam::Thickness(9.0));

    assert!(!Rc::ptr_eq(&original, &working));
    assert_eq!(Rc::strong_count(&original), 1);
    assert_eq!(original.params().thickness, 2.0);
    assert_eq!(working.params().thickness, 9.0);
}

#[test]
fn test_constrained_rectangle_is_square() {
    let mut rect = Shape::create(ShapeType::Rectangle, p(0.0, 0.0), StyleParams::default());
    rect.layout_new(p(30.0, -10.0), true);
    let bounds = rect.bounds();
    assert_eq!(bounds.width(), bounds.height());
    assert_eq!(bounds.width(), 30.0);
    assert_eq!(bounds.min, p(0.0, -30.0));
}

#[test]
fn test_constrained_line_snaps_to_diagonal() {
    let mut line = Shape::create(ShapeType::Line, p(0.0, 0.0), StyleParams::default());
    line.layout_new(p(10.0, 9.0), true);
    let end = line.end();
    assert!((end.x - end.y).abs() < 1e-9);
    assert!((end.length() - p(10.0, 9.0).length()).abs() < 1e-9);
}

#[test]
fn test_line_start_handle_keeps_end() {
    let prior = created(ShapeType::Line, p(0.0, 0.0), p(100.0, 0.0));
    let mut line = prior.clone();
    line.layout(&prior, p(10.0, 20.0), Corner::Start, false);
    assert_eq!(line.reference(), p(10.0, 20.0));
    assert_eq!(line.reference() + line.end(), p(100.0, 0.0));
}

#[test]
fn test_layout_uses_total_delta() {
    let prior = created(ShapeType::Oval, p(0.0, 0.0), p(40.0, 20.0));
    let mut stepped = prior.clone();
    for i in 1..=100 {
        let d = i as f64 * 0.1;
        stepped.layout(&prior, p(d, d), Corner::BottomRight, false);
    }
    let mut direct = prior.clone();
    direct.layout(&prior, p(10.0, 10.0), Corner::BottomRight, false);
    assert_eq!(stepped, direct);
    assert_eq!(direct.bounds(), Rect::from_points(p(0.0, 0.0), p(50.0, 30.0)));
}

#[test]
fn test_freeform_resize_keeps_opposite_corner() {
    let mut prior = Shape::create(ShapeType::Freeform, p(0.0, 0.0), StyleParams::default());
    prior.layout_new(p(10.0, 0.0), false);
    prior.layout_new(p(10.0, 10.0), false);
    let mut path = prior.clone();
    path.layout(&prior, p(10.0, 10.0), Corner::BottomRight, false);
    assert_eq!(path.bounds(), Rect::from_points(p(0.0, 0.0), p(20.0, 20.0)));
    assert_eq!(path.end(), p(20.0, 20.0));
}

#[test]
fn test_triangle_apex_handle() {
    let prior = created(ShapeType::Triangle, p(0.0, 0.0), p(0.0, -20.0));
    let mut tri = prior.clone();
    tri.layout(&prior, p(5.0, 0.0), Corner::End, false);
    assert_eq!(tri.reference(), p(0.0, 0.0));
    assert_eq!(tri.end(), p(5.0, -20.0));
}

#[test]
fn test_move_from_prior() {
    let prior = created(ShapeType::Arrow, p(5.0, 5.0), p(25.0, 5.0));
    let mut arrow = prior.clone();
    arrow.move_from(&prior, p(1.0, 2.0));
    arrow.move_from(&prior, p(3.0, 4.0));
    assert_eq!(arrow.reference(), p(8.0, 9.0));
    assert_eq!(arrow.end(), prior.end());
}

#[test]
fn test_scale_rounds_font_size() {
    let mut text = Shape::create(ShapeType::Text, p(10.0, 10.0), StyleParams::default());
    text.set_param(StyleParam::FontName("Serif 11".to_string()));
    text.set_param(StyleParam::Text("x".to_string()));
    text.scale(1.5);
    assert_eq!(text.reference(), p(15.0, 15.0));
    assert_eq!(text.params().font().size, 17.0);
    assert_eq!(text.params().font_name.as_deref(), Some("Serif 17"));
}

#[test]
fn test_text_has_no_handles_or_stroke_geometry() {
    let text = Shape::create(ShapeType::Text, p(0.0, 0.0), StyleParams::default());
    assert!(text.corners().is_empty());
    assert!(!text.is_filled());
}

#[test]
fn test_rectangle_handles_follow_rotation() {
    let params = StyleParams {
        angle: 90.0,
        ..StyleParams::default()
    };
    let mut rect = Shape::create(ShapeType::Rectangle, p(0.0, 0.0), params);
    rect.layout_new(p(40.0, 20.0), false);
    let corners = rect.corners();
    assert_eq!(corners.len(), 4);
    let bounds = rect.bounds();
    assert!((bounds.width() - 20.0).abs() < 1e-9);
    assert!((bounds.height() - 40.0).abs() < 1e-9);
}

#[test]
#[should_panic(expected = "cannot lay out")]
fn test_layout_from_other_kind_panics() {
    let prior = created(ShapeType::Line, p(0.0, 0.0), p(10.0, 0.0));
    let mut rect = created(ShapeType::Rectangle, p(0.0, 0.0), p(10.0, 10.0));
    rect.layout(&prior, p(1.0, 1.0), Corner::TopLeft, false);
}
