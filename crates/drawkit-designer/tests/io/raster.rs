use drawkit_core::{CodecError, Color};
use drawkit_designer::model::{Point, ShapeType, StyleParams};
use drawkit_designer::raster::{ImageCodec, RasterCodec, RasterFormat, RasterImage};
use drawkit_designer::Document;
use drawkit_settings::Config;
use tempfile::TempDir;

fn gradient(width: u32, height: u32) -> image::RgbaImage {
    image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 30) as u8, (y * 40) as u8, 200, 255])
    })
}

#[test]
fn test_png_round_trip_is_lossless() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("out.png");
    let raster = RasterImage::from_rgba(&gradient(6, 4));

    ImageCodec
        .encode(&raster, &path, RasterFormat::Png)
        .expect("encode");
    let decoded = ImageCodec.decode(&path).expect("decode");
    assert_eq!(decoded, raster);
}

#[test]
fn test_translucent_pixels_survive_premultiplication() {
    let source = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 128]));
    let raster = RasterImage::from_rgba(&source);
    assert_eq!(raster.pixel(0, 0), [0, 0, 128, 128]);
    assert_eq!(raster.to_rgba().get_pixel(1, 1).0, [255, 0, 0, 128]);
}

#[test]
fn test_decode_missing_file() {
    let dir = TempDir::new().expect("tempdir");
    let err = ImageCodec
        .decode(&dir.path().join("missing.png"))
        .expect_err("missing");
    assert!(matches!(err, CodecError::NotFound { .. }));
}

#[test]
fn test_decode_non_image_is_unsupported() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("notes.png");
    std::fs::write(&path, b"definitely not a png").expect("write");
    let err = ImageCodec.decode(&path).expect_err("not an image");
    assert!(!err.is_not_found());
}

#[test]
fn test_format_from_extension() {
    use std::path::Path;
    assert_eq!(
        RasterFormat::from_path(Path::new("a/b.PNG")),
        Some(RasterFormat::Png)
    );
    assert_eq!(
        RasterFormat::from_path(Path::new("photo.jpeg")),
        Some(RasterFormat::Jpeg)
    );
    assert_eq!(RasterFormat::from_path(Path::new("scene.drw")), None);
    assert_eq!(RasterFormat::from_path(Path::new("noext")), None);
}

#[test]
fn test_export_renders_shapes_over_base_image() {
    let dir = TempDir::new().expect("tempdir");
    let source = dir.path().join("base.png");
    image::RgbaImage::from_pixel(40, 30, image::Rgba([0, 0, 255, 255]))
        .save(&source)
        .expect("write png");

    let mut doc = Document::import_image(&source, &ImageCodec, &Config::default()).expect("import");
    let fill = StyleParams {
        fill_color: Color::RED,
        stroke_color: Color::RED,
        thickness: 1.0,
        ..StyleParams::default()
    };
    doc.add_shape(ShapeType::Rectangle, Point::new(0.0, 0.0), Some(fill), false);
    doc.drag_to(Point::new(10.0, 10.0), false);
    doc.end_drag();

    let out = dir.path().join("export.png");
    doc.export_image(&out, &ImageCodec, RasterFormat::Png, 1.0)
        .expect("export");
    let exported = image::open(&out).expect("reopen").to_rgba8();
    assert_eq!(exported.dimensions(), (40, 30));
    assert_eq!(exported.get_pixel(5, 5).0, [255, 0, 0, 255]);
    assert_eq!(exported.get_pixel(30, 20).0, [0, 0, 255, 255]);
}

#[test]
fn test_export_at_zoom_scales_output() {
    let dir = TempDir::new().expect("tempdir");
    let mut config = Config::default();
    config.canvas.width = 64;
    config.canvas.height = 32;
    let doc = Document::new(&config);
    let out = dir.path().join("half.bmp");
    doc.export_image(&out, &ImageCodec, RasterFormat::Bmp, 0.5)
        .expect("export");
    let exported = image::open(&out).expect("reopen");
    assert_eq!((exported.width(), exported.height()), (32, 16));
}
