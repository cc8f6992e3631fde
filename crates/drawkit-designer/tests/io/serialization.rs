use drawkit_core::{Color, FormatError};
use drawkit_designer::history::Snapshot;
use drawkit_designer::model::{Geometry, Point, Shape, ShapeType, StyleParams};
use drawkit_designer::raster::{ImageCodec, RasterImage};
use drawkit_designer::serialization::{decode, encode, load_from_file, save_to_file};
use drawkit_designer::{Document, HitMode};
use drawkit_settings::Config;
use tempfile::TempDir;

fn styled(seed: u16) -> StyleParams {
    StyleParams {
        stroke_color: Color::from_u16(seed, 2 * seed, 3 * seed, 65535),
        fill_color: Color::from_u16(65535 - seed, 0, seed, 40000),
        text_color: Color::from_u16(1, 2, 3, 4),
        text_background: Color::TRANSPARENT,
        thickness: 2.5,
        corner_round: 3.0,
        angle: 30.0,
        orientation: seed % 2 == 0,
        text: None,
        font_name: None,
    }
}

fn every_shape_snapshot() -> Snapshot {
    let mut pixels = image::RgbaImage::new(3, 2);
    for (x, y, px) in pixels.enumerate_pixels_mut() {
        *px = image::Rgba([x as u8 * 80, y as u8 * 120, 7, 255]);
    }
    let mut snapshot = Snapshot::with_image(0, RasterImage::from_rgba(&pixels), Color::WHITE);
    snapshot.set_size(320, 240);
    snapshot.set_reference(Point::new(-4.5, 12.25));

    for (i, kind) in ShapeType::ALL.into_iter().enumerate() {
        let reference = Point::new(10.0 * i as f64, 5.5);
        let mut shape = Shape::create(kind, reference, styled(i as u16 * 1000));
        shape.layout_new(reference + Point::new(20.0, -7.75), false);
        if kind == ShapeType::Freeform {
            shape.layout_new(reference + Point::new(25.0, 3.0), false);
            shape.layout_new(reference + Point::new(-1.5, 8.0), false);
        }
        snapshot.push_shape(shape);
    }

    let mut text = StyleParams {
        text: Some("Hello, drawing\nsecond line".to_string()),
        font_name: Some("DejaVu Serif Bold 18".to_string()),
        ..StyleParams::default()
    };
    text.text_background = Color::from_rgba8(255, 255, 0, 128);
    snapshot.push_shape(Shape::from_parts(
        Point::new(40.0, 40.0),
        Geometry::from_end(ShapeType::Text, Point::new(2.0, 3.0)),
        text,
    ));
    snapshot
}

#[test]
fn test_round_trip_every_shape_type() {
    let snapshot = every_shape_snapshot();
    let decoded = decode(&encode(&snapshot).expect("encode")).expect("decode");
    assert!(decoded.same_content(&snapshot));
    assert_eq!(decoded.shapes().len(), ShapeType::ALL.len() + 1);

    let path = match decoded.shapes()[0].geometry() {
        Geometry::Freeform(path) => path.points().len(),
        other => panic!("expected freeform, got {other:?}"),
    };
    assert_eq!(path, 4);
    let text = decoded.shapes().last().expect("text shape").params();
    assert_eq!(text.font().size, 18.0);
    assert_eq!(text.text.as_deref(), Some("Hello, drawing\nsecond line"));
}

#[test]
fn test_empty_document_round_trip() {
    let snapshot = Snapshot::new(0, 1, 1, Color::TRANSPARENT);
    let decoded = decode(&encode(&snapshot).expect("encode")).expect("decode");
    assert!(decoded.same_content(&snapshot));
    assert!(decoded.image().is_none());
}

#[test]
fn test_truncated_file_is_rejected() {
    let bytes = encode(&every_shape_snapshot()).expect("encode");
    for cut in [0, 3, 7, 9, bytes.len() / 2] {
        assert!(decode(&bytes[..cut]).is_err(), "cut at {cut}");
    }
}

#[test]
fn test_wrong_magic_is_rejected() {
    let mut bytes = encode(&every_shape_snapshot()).expect("encode");
    bytes[..4].copy_from_slice(b"PK\x03\x04");
    assert_eq!(decode(&bytes).unwrap_err(), FormatError::BadMagic);
}

#[test]
fn test_file_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("drawing.drw");
    let snapshot = every_shape_snapshot();
    save_to_file(&snapshot, &path).expect("save");
    let loaded = load_from_file(&path).expect("load");
    assert!(loaded.same_content(&snapshot));
}

#[test]
fn test_save_replaces_existing_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("drawing.drw");
    std::fs::write(&path, b"old contents").expect("write");
    save_to_file(&Snapshot::new(0, 10, 10, Color::BLACK), &path).expect("save");
    let loaded = load_from_file(&path).expect("load");
    assert_eq!(loaded.background(), Color::BLACK);
    // no temporary files left behind
    assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 1);
}

#[test]
fn test_load_missing_file_is_not_found() {
    let dir = TempDir::new().expect("tempdir");
    let err = load_from_file(dir.path().join("nope.drw")).expect_err("missing");
    assert!(err.is_not_found());
    assert!(!err.is_format_error());
}

#[test]
fn test_load_garbage_is_format_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("garbage.drw");
    std::fs::write(&path, b"DRWK\0\0\0\x01not gzip at all").expect("write");
    let err = load_from_file(&path).expect_err("garbage");
    assert!(err.is_format_error());
}

#[test]
fn test_document_save_and_open() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("scene.drw");
    let config = Config::default();

    let mut doc = Document::new(&config);
    doc.add_shape(ShapeType::Oval, Point::new(10.0, 10.0), None, false);
    doc.drag_to(Point::new(60.0, 40.0), false);
    doc.end_drag();
    assert!(doc.is_modified());
    doc.save(&path).expect("save");
    assert!(!doc.is_modified());
    assert_eq!(doc.display_name(), "scene.drw");

    let mut reopened = Document::open(&path, &config).expect("open");
    assert!(!reopened.is_modified());
    assert!(!reopened.can_undo());
    assert!(reopened.snapshot().same_content(doc.snapshot()));
    assert_eq!(reopened.path(), Some(path.as_path()));
    reopened.hit_test(Point::new(60.0, 25.0), 1.0, HitMode::default());
    reopened.drag_to(Point::new(65.0, 25.0), false);
    reopened.end_drag();
    assert!(reopened.is_modified());
}

#[test]
fn test_failed_save_keeps_document_modified() {
    let dir = TempDir::new().expect("tempdir");
    let mut doc = Document::new(&Config::default());
    doc.set_background(Color::RED);
    let result = doc.save(dir.path().join("missing").join("scene.drw"));
    assert!(result.is_err());
    assert!(doc.is_modified());
    assert_eq!(doc.path(), None);
}

#[test]
fn test_import_image_sizes_canvas() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("photo.png");
    image::RgbaImage::from_pixel(7, 5, image::Rgba([10, 20, 30, 255]))
        .save(&path)
        .expect("write png");

    let doc = Document::import_image(&path, &ImageCodec, &Config::default()).expect("import");
    assert_eq!((doc.snapshot().width(), doc.snapshot().height()), (7, 5));
    let image = doc.snapshot().image().expect("base image");
    assert_eq!(image.pixel(3, 2), [30, 20, 10, 255]);
    assert_eq!(doc.path(), None);
    assert!(!doc.is_modified());
}

#[test]
fn test_import_missing_image_is_not_found() {
    let dir = TempDir::new().expect("tempdir");
    let err = Document::import_image(dir.path().join("none.png"), &ImageCodec, &Config::default())
        .expect_err("missing");
    assert!(err.is_not_found());
}
