use drawkit_core::Color;
use drawkit_designer::model::{Point, Rect, ShapeType, StyleParam, StyleParams};
use drawkit_designer::{Document, Hit, HitMode};
use drawkit_settings::Config;

fn canvas_100() -> Document {
    let mut config = Config::default();
    config.canvas.width = 100;
    config.canvas.height = 100;
    config.canvas.background = Color::WHITE;
    Document::new(&config)
}

fn draw_rect(doc: &mut Document, from: Point, to: Point) -> usize {
    let index = doc.add_shape(ShapeType::Rectangle, from, None, false);
    doc.drag_to(to, false);
    doc.end_drag();
    index
}

const EXTEND: HitMode = HitMode {
    extend: true,
    marquee: false,
};

#[test]
fn test_create_drag_and_undo_rectangle() {
    let mut doc = canvas_100();
    let style = StyleParams {
        stroke_color: Color::BLACK,
        thickness: 2.0,
        ..StyleParams::default()
    };
    doc.add_shape(ShapeType::Rectangle, Point::new(10.0, 10.0), Some(style), false);
    for step in 1..=8 {
        let t = 10.0 + step as f64 * 5.0;
        doc.drag_to(Point::new(t, t), false);
    }
    doc.end_drag();
    assert_eq!(doc.history().len(), 2);
    let expected = Rect::from_points(Point::new(10.0, 10.0), Point::new(50.0, 50.0));
    assert_eq!(doc.snapshot().shapes()[0].bounds(), expected);

    assert_eq!(
        doc.hit_test(Point::new(10.0, 30.0), 1.0, HitMode::default()),
        Hit::Shape(0)
    );
    doc.drag_to(Point::new(12.0, 32.0), false);
    doc.drag_to(Point::new(15.0, 35.0), false);
    doc.end_drag();
    assert_eq!(doc.history().len(), 3);
    assert_eq!(
        doc.snapshot().shapes()[0].bounds(),
        Rect::from_points(Point::new(15.0, 15.0), Point::new(55.0, 55.0))
    );

    assert!(doc.undo());
    assert_eq!(doc.snapshot().shapes()[0].bounds(), expected);
    assert!(doc.undo());
    assert!(doc.snapshot().shapes().is_empty());
    assert!(!doc.is_modified());
    assert!(!doc.undo());
}

#[test]
fn test_recolor_then_delete_selection() {
    let mut doc = canvas_100();
    draw_rect(&mut doc, Point::new(10.0, 10.0), Point::new(40.0, 40.0));
    draw_rect(&mut doc, Point::new(60.0, 10.0), Point::new(90.0, 40.0));

    assert_eq!(
        doc.hit_test(Point::new(10.0, 25.0), 1.0, HitMode::default()),
        Hit::Shape(0)
    );
    doc.end_drag();
    assert_eq!(doc.hit_test(Point::new(90.0, 25.0), 1.0, EXTEND), Hit::Shape(1));
    doc.end_drag();
    assert_eq!(doc.selection().len(), 2);

    let len = doc.history().len();
    assert!(doc.set_style(StyleParam::StrokeColor(Color::RED)));
    assert_eq!(doc.delete_selection(), 2);
    assert_eq!(doc.history().len(), len + 2);
    assert!(doc.snapshot().shapes().is_empty());

    assert!(doc.undo());
    let shapes = doc.snapshot().shapes();
    assert_eq!(shapes.len(), 2);
    assert!(shapes.iter().all(|s| s.params().stroke_color == Color::RED));
}

#[test]
fn test_marquee_selects_touched_shapes() {
    let mut doc = canvas_100();
    draw_rect(&mut doc, Point::new(10.0, 10.0), Point::new(40.0, 40.0));
    draw_rect(&mut doc, Point::new(60.0, 10.0), Point::new(90.0, 40.0));
    draw_rect(&mut doc, Point::new(10.0, 60.0), Point::new(40.0, 90.0));
    let len = doc.history().len();

    let marquee = HitMode {
        extend: false,
        marquee: true,
    };
    assert_eq!(doc.hit_test(Point::new(0.0, 0.0), 1.0, marquee), Hit::Marquee);
    doc.drag_to(Point::new(45.0, 45.0), false);
    assert_eq!(doc.selection().iter().collect::<Vec<_>>(), vec![0]);
    doc.drag_to(Point::new(95.0, 45.0), false);
    assert_eq!(doc.selection().iter().collect::<Vec<_>>(), vec![0, 1]);
    doc.end_drag();

    let extend_marquee = HitMode {
        extend: true,
        marquee: true,
    };
    doc.hit_test(Point::new(0.0, 55.0), 1.0, extend_marquee);
    doc.drag_to(Point::new(20.0, 70.0), false);
    doc.end_drag();
    assert_eq!(doc.selection().iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(doc.history().len(), len);
}

#[test]
fn test_click_inside_stroked_rectangle_misses() {
    let mut doc = canvas_100();
    draw_rect(&mut doc, Point::new(10.0, 10.0), Point::new(40.0, 40.0));
    assert_eq!(
        doc.hit_test(Point::new(25.0, 25.0), 1.0, HitMode::default()),
        Hit::Nothing
    );
    assert!(doc.selection().is_empty());
}

#[test]
fn test_handle_drag_resizes() {
    let mut doc = canvas_100();
    draw_rect(&mut doc, Point::new(10.0, 10.0), Point::new(40.0, 40.0));
    let hit = doc.hit_test(Point::new(40.0, 40.0), 1.0, HitMode::default());
    assert!(matches!(hit, Hit::Handle(0, _)));
    doc.drag_to(Point::new(60.0, 50.0), false);
    doc.drag_to(Point::new(70.0, 80.0), false);
    doc.end_drag();
    assert_eq!(doc.history().len(), 3);
    assert_eq!(
        doc.snapshot().shapes()[0].bounds(),
        Rect::from_points(Point::new(10.0, 10.0), Point::new(70.0, 80.0))
    );
}

#[test]
fn test_extend_click_toggles_off() {
    let mut doc = canvas_100();
    draw_rect(&mut doc, Point::new(10.0, 10.0), Point::new(40.0, 40.0));
    doc.clear_selection();
    assert_eq!(doc.hit_test(Point::new(10.0, 25.0), 1.0, EXTEND), Hit::Shape(0));
    assert!(doc.selection().contains(0));
    doc.end_drag();
    assert_eq!(doc.hit_test(Point::new(10.0, 25.0), 1.0, EXTEND), Hit::Shape(0));
    assert!(doc.selection().is_empty());
    assert!(!doc.drag_to(Point::new(30.0, 30.0), false));
}

#[test]
fn test_raise_sink_through_document() {
    let mut doc = canvas_100();
    draw_rect(&mut doc, Point::new(10.0, 10.0), Point::new(40.0, 40.0));
    draw_rect(&mut doc, Point::new(20.0, 20.0), Point::new(50.0, 50.0));
    assert!(doc.sink_current());
    assert_eq!(
        doc.snapshot().shapes()[0].bounds().min,
        Point::new(20.0, 20.0)
    );
    assert!(!doc.sink_current());
    assert!(doc.raise_current());
    assert_eq!(
        doc.snapshot().shapes()[1].bounds().min,
        Point::new(20.0, 20.0)
    );
}

#[test]
fn test_scale_and_resize_canvas() {
    let mut doc = canvas_100();
    draw_rect(&mut doc, Point::new(10.0, 10.0), Point::new(40.0, 40.0));
    assert!(doc.scale(0.5));
    assert_eq!(doc.snapshot().width(), 50);
    assert!(doc.resize_canvas(70, 50, 1.0, 0.0));
    assert_eq!(
        doc.snapshot().shapes()[0].bounds(),
        Rect::from_points(Point::new(25.0, 5.0), Point::new(40.0, 20.0))
    );
    assert_eq!(doc.history().len(), 4);
}

#[test]
fn test_style_edit_ends_creation_drag() {
    let mut doc = canvas_100();
    doc.add_shape(ShapeType::Rectangle, Point::new(10.0, 10.0), None, false);
    assert!(doc.drag_to(Point::new(20.0, 20.0), false));
    assert!(doc.set_style(StyleParam::StrokeColor(Color::RED)));
    assert!(!doc.drag_to(Point::new(30.0, 30.0), false));

    let shape = &doc.snapshot().shapes()[0];
    assert_eq!(
        shape.bounds(),
        Rect::from_points(Point::new(10.0, 10.0), Point::new(20.0, 20.0))
    );
    assert_eq!(shape.params().stroke_color, Color::RED);
    assert_eq!(doc.history().len(), 3);
}

#[test]
fn test_document_edits_end_creation_drag() {
    let edits: [fn(&mut Document); 4] = [
        |doc| {
            doc.set_background(Color::BLACK);
        },
        |doc| {
            doc.raise_current();
        },
        |doc| {
            doc.sink_current();
        },
        |doc| doc.clear_selection(),
    ];
    for edit in edits {
        let mut doc = canvas_100();
        draw_rect(&mut doc, Point::new(50.0, 50.0), Point::new(60.0, 60.0));
        doc.add_shape(ShapeType::Oval, Point::new(10.0, 10.0), None, false);
        assert!(doc.drag_to(Point::new(20.0, 20.0), false));
        edit(&mut doc);
        assert!(!doc.drag_to(Point::new(40.0, 40.0), false));
        let oval = doc
            .snapshot()
            .shapes()
            .iter()
            .find(|shape| shape.shape_type() == ShapeType::Oval)
            .expect("oval");
        assert_eq!(oval.bounds().max, Point::new(20.0, 20.0));
    }
}

#[test]
fn test_scale_resizes_default_font() {
    let mut doc = canvas_100();
    let style = StyleParams {
        text: Some("note".to_string()),
        font_name: None,
        ..StyleParams::default()
    };
    doc.add_shape(ShapeType::Text, Point::new(10.0, 10.0), Some(style), false);
    doc.end_drag();
    assert_eq!(doc.snapshot().shapes()[0].params().font().size, 12.0);
    assert!(doc.scale(2.0));
    assert_eq!(doc.snapshot().shapes()[0].params().font().size, 24.0);
    assert!(doc.undo());
    assert_eq!(doc.snapshot().shapes()[0].params().font().size, 12.0);
}

#[test]
fn test_set_background_only_when_changed() {
    let mut doc = canvas_100();
    assert!(!doc.set_background(Color::WHITE));
    assert!(doc.set_background(Color::BLACK));
    assert_eq!(doc.background(), Color::BLACK);
    assert!(doc.is_modified());
}

#[test]
fn test_render_image_matches_zoom() {
    let mut doc = canvas_100();
    draw_rect(&mut doc, Point::new(10.0, 10.0), Point::new(40.0, 40.0));
    let image = doc.render_image(0.5);
    assert_eq!((image.width(), image.height()), (50, 50));
    // background pixel, white and opaque
    assert_eq!(image.pixel(40, 40), [255, 255, 255, 255]);
}
