//! Binary document files.
//!
//! A document file is the 4-byte magic `DRWK`, a big-endian `u32` format
//! version, and a gzip stream holding the canvas, the optional base raster
//! and every shape in stacking order. All integers are big-endian and all
//! coordinates are signed fixed-point with 8 fractional bits.
//!
//! Decoding is all-or-nothing: any malformed field yields a
//! [`FormatError`] and no snapshot.

use std::io::{Read, Write};
use std::path::Path;

use drawkit_core::{from_fixed, to_fixed, Color, Error, FormatError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;

use crate::history::Snapshot;
use crate::model::{Freeform, Geometry, Point, Shape, ShapeType, StyleParams};
use crate::raster::RasterImage;

/// Magic bytes at the start of every document file.
pub const MAGIC: [u8; 4] = *b"DRWK";

/// Current format version.
pub const FORMAT_VERSION: u32 = 1;

/// Largest accepted canvas or base image side.
pub const MAX_DIMENSION: u32 = 32_768;

/// Canvas size, reference point and background, ahead of the image flag.
const CANVAS_HEADER: usize = 4 + 4 + 8 + 8;

/// Image flag followed by width, height and row stride.
const IMAGE_HEADER: usize = 1 + 4 + 4 + 4;

/// Upper bound on the shape count plus every shape record.
const MAX_SHAPE_BYTES: usize = 1 << 28;

const INFLATE_CHUNK: usize = 64 * 1024;

/// Smallest possible encoded shape record.
const MIN_SHAPE_RECORD: usize = 1 + 16 + 4 * 8 + 12 + 3;

/// Encodes `snapshot` into document file bytes.
pub fn encode(snapshot: &Snapshot) -> std::io::Result<Vec<u8>> {
    let mut payload = Writer::default();
    payload.u32(snapshot.width());
    payload.u32(snapshot.height());
    payload.point(snapshot.reference());
    payload.color(snapshot.background());

    match snapshot.image() {
        Some(image) => {
            payload.u8(1);
            payload.u32(image.width());
            payload.u32(image.height());
            payload.u32(image.stride());
            payload.bytes(image.data());
        }
        None => payload.u8(0),
    }

    payload.u32(snapshot.shapes().len() as u32);
    for shape in snapshot.shapes() {
        write_shape(&mut payload, shape);
    }

    let mut out = Vec::with_capacity(payload.buf.len() / 2 + 8);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
    let mut encoder = GzEncoder::new(out, Compression::default());
    encoder.write_all(&payload.buf)?;
    encoder.finish()
}

fn write_shape(w: &mut Writer, shape: &Shape) {
    w.u8(shape.shape_type().tag());
    w.point(shape.reference());
    w.point(shape.end());
    if let Geometry::Freeform(path) = shape.geometry() {
        w.u32(path.points().len() as u32);
        for &p in path.points() {
            w.point(p);
        }
    }

    let params = shape.params();
    w.color(params.stroke_color);
    w.color(params.fill_color);
    w.color(params.text_color);
    w.color(params.text_background);
    w.fixed(params.thickness);
    w.fixed(params.corner_round);
    w.fixed(params.angle);
    w.u8(params.orientation as u8);
    w.opt_str(params.text.as_deref());
    w.opt_str(params.font_name.as_deref());
}

/// Decodes document file bytes into a snapshot with id 0.
pub fn decode(bytes: &[u8]) -> std::result::Result<Snapshot, FormatError> {
    if bytes.len() < 8 {
        return Err(FormatError::Truncated { context: "header" });
    }
    if bytes[..4] != MAGIC {
        return Err(FormatError::BadMagic);
    }
    let version = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion { version });
    }

    let payload = inflate(&bytes[8..])?;
    let mut r = Reader::new(&payload);
    let width = r.u32("canvas size")?;
    let height = r.u32("canvas size")?;
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(FormatError::Corrupt {
            reason: format!("canvas size {width}x{height} out of range"),
        });
    }
    let reference = r.point("canvas reference")?;
    let background = r.color("background")?;

    let mut snapshot = Snapshot::new(0, width, height, background);
    snapshot.set_reference(reference);
    if r.flag("image flag")? {
        snapshot.set_image(Some(read_image(&mut r)?));
    }

    let count = r.u32("shape count")? as usize;
    if count > r.remaining() / MIN_SHAPE_RECORD {
        return Err(FormatError::Truncated { context: "shapes" });
    }
    for _ in 0..count {
        snapshot.push_shape(read_shape(&mut r)?);
    }

    if r.remaining() != 0 {
        return Err(FormatError::Corrupt {
            reason: format!("{} trailing bytes", r.remaining()),
        });
    }
    Ok(snapshot)
}

/// Decompresses the payload in chunks. Once the header is in, the payload
/// may not outgrow the size its image header declares plus
/// [`MAX_SHAPE_BYTES`].
fn inflate(compressed: &[u8]) -> std::result::Result<Vec<u8>, FormatError> {
    let mut decoder = GzDecoder::new(compressed);
    let mut payload = Vec::new();
    let mut chunk = vec![0u8; INFLATE_CHUNK];
    let mut limit = None;
    loop {
        let n = match decoder.read(&mut chunk) {
            Ok(0) => return Ok(payload),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(FormatError::Corrupt {
                    reason: format!("compressed payload: {e}"),
                })
            }
        };
        payload
            .try_reserve(n)
            .map_err(|_| FormatError::AllocationFailed {
                bytes: payload.len() + n,
            })?;
        payload.extend_from_slice(&chunk[..n]);

        if limit.is_none() {
            limit = payload_limit(&payload)?;
        }
        if let Some(limit) = limit {
            if payload.len() > limit {
                return Err(FormatError::Corrupt {
                    reason: format!("payload larger than its declared {limit} bytes"),
                });
            }
        }
    }
}

/// Largest payload consistent with the header at the start of `head`, or
/// `None` while the header is incomplete.
fn payload_limit(head: &[u8]) -> std::result::Result<Option<usize>, FormatError> {
    let Some(&flag) = head.get(CANVAS_HEADER) else {
        return Ok(None);
    };
    if flag == 0 {
        return Ok(Some(CANVAS_HEADER + 1 + MAX_SHAPE_BYTES));
    }
    if head.len() < CANVAS_HEADER + IMAGE_HEADER {
        return Ok(None);
    }
    let field = |i: usize| {
        let at = CANVAS_HEADER + 1 + 4 * i;
        u32::from_be_bytes([head[at], head[at + 1], head[at + 2], head[at + 3]])
    };
    let (width, height, stride) = (field(0), field(1), field(2));
    if width > MAX_DIMENSION || height > MAX_DIMENSION || stride > MAX_DIMENSION * 4 {
        return Err(FormatError::ImageTooLarge { width, height });
    }
    let image = stride as usize * height as usize;
    Ok(Some(CANVAS_HEADER + IMAGE_HEADER + image + MAX_SHAPE_BYTES))
}

fn read_image(r: &mut Reader<'_>) -> std::result::Result<RasterImage, FormatError> {
    let width = r.u32("image header")?;
    let height = r.u32("image header")?;
    let stride = r.u32("image header")?;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(FormatError::ImageTooLarge { width, height });
    }
    let len = stride as usize * height as usize;
    if len > r.remaining() {
        return Err(FormatError::Truncated { context: "image data" });
    }
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| FormatError::AllocationFailed { bytes: len })?;
    data.extend_from_slice(r.take(len, "image data")?);
    RasterImage::from_raw(width, height, stride, data)
}

fn read_shape(r: &mut Reader<'_>) -> std::result::Result<Shape, FormatError> {
    let tag = r.u8("shape type")?;
    let shape_type = ShapeType::from_tag(tag).ok_or(FormatError::UnknownShapeType { tag })?;
    let reference = r.point("shape reference")?;
    let end = r.point("shape end")?;

    let geometry = if shape_type == ShapeType::Freeform {
        let count = r.u32("path length")? as usize;
        if count > r.remaining() / 8 {
            return Err(FormatError::Truncated { context: "path points" });
        }
        let mut points = Vec::new();
        points
            .try_reserve_exact(count)
            .map_err(|_| FormatError::AllocationFailed {
                bytes: count * std::mem::size_of::<Point>(),
            })?;
        for _ in 0..count {
            points.push(r.point("path points")?);
        }
        let path = Freeform::from_points(points).ok_or_else(|| FormatError::Corrupt {
            reason: "freeform path without points".to_string(),
        })?;
        if path.end() != end {
            return Err(FormatError::Corrupt {
                reason: "freeform end does not match its last point".to_string(),
            });
        }
        Geometry::Freeform(path)
    } else {
        Geometry::from_end(shape_type, end)
    };

    let params = StyleParams {
        stroke_color: r.color("stroke color")?,
        fill_color: r.color("fill color")?,
        text_color: r.color("text color")?,
        text_background: r.color("text background")?,
        thickness: r.fixed("thickness")?,
        corner_round: r.fixed("corner round")?,
        angle: r.fixed("angle")?,
        orientation: r.flag("orientation")?,
        text: r.opt_str("text")?,
        font_name: r.opt_str("font name")?,
    };
    if params.thickness < 0.0 || params.corner_round < 0.0 {
        return Err(FormatError::Corrupt {
            reason: "negative thickness or corner round".to_string(),
        });
    }
    Ok(Shape::from_parts(reference, geometry, params))
}

/// Writes `snapshot` to `path`, replacing any existing file atomically.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// failed save leaves the previous file untouched.
pub fn save_to_file(snapshot: &Snapshot, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode(snapshot)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;
    tracing::debug!(
        "Saved {} shapes ({} bytes) to {}",
        snapshot.shapes().len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

/// Reads a document file. A missing file is reported as an I/O
/// `NotFound` error.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Snapshot> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let snapshot = decode(&bytes)?;
    tracing::debug!(
        "Loaded {}x{} document with {} shapes from {}",
        snapshot.width(),
        snapshot.height(),
        snapshot.shapes().len(),
        path.display()
    );
    Ok(snapshot)
}

#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn fixed(&mut self, v: f64) {
        self.buf.extend_from_slice(&to_fixed(v).to_be_bytes());
    }

    fn point(&mut self, p: Point) {
        self.fixed(p.x);
        self.fixed(p.y);
    }

    fn color(&mut self, c: Color) {
        for channel in c.channels() {
            self.u16(channel);
        }
    }

    fn bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Presence flag, then NUL-terminated UTF-8. Interior NULs are dropped.
    fn opt_str(&mut self, s: Option<&str>) {
        match s {
            Some(s) => {
                self.u8(1);
                self.buf.extend(s.bytes().filter(|&b| b != 0));
                self.u8(0);
            }
            None => self.u8(0),
        }
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize, context: &'static str) -> std::result::Result<&'a [u8], FormatError> {
        if len > self.remaining() {
            return Err(FormatError::Truncated { context });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, context: &'static str) -> std::result::Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, context)?);
        Ok(out)
    }

    fn u8(&mut self, context: &'static str) -> std::result::Result<u8, FormatError> {
        Ok(self.array::<1>(context)?[0])
    }

    fn flag(&mut self, context: &'static str) -> std::result::Result<bool, FormatError> {
        match self.u8(context)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(FormatError::Corrupt {
                reason: format!("{context} is {other}, expected 0 or 1"),
            }),
        }
    }

    fn u16(&mut self, context: &'static str) -> std::result::Result<u16, FormatError> {
        Ok(u16::from_be_bytes(self.array(context)?))
    }

    fn u32(&mut self, context: &'static str) -> std::result::Result<u32, FormatError> {
        Ok(u32::from_be_bytes(self.array(context)?))
    }

    fn fixed(&mut self, context: &'static str) -> std::result::Result<f64, FormatError> {
        Ok(from_fixed(i32::from_be_bytes(self.array(context)?)))
    }

    fn point(&mut self, context: &'static str) -> std::result::Result<Point, FormatError> {
        let x = self.fixed(context)?;
        let y = self.fixed(context)?;
        Ok(Point::new(x, y))
    }

    fn color(&mut self, context: &'static str) -> std::result::Result<Color, FormatError> {
        let mut channels = [0u16; 4];
        for channel in &mut channels {
            *channel = self.u16(context)?;
        }
        Ok(Color::from(channels))
    }

    fn opt_str(&mut self, field: &'static str) -> std::result::Result<Option<String>, FormatError> {
        if !self.flag(field)? {
            return Ok(None);
        }
        let rest = &self.data[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(FormatError::Truncated { context: field })?;
        let s = std::str::from_utf8(&rest[..len])
            .map_err(|_| FormatError::InvalidString { field })?
            .to_string();
        self.pos += len + 1;
        Ok(Some(s))
    }
}
