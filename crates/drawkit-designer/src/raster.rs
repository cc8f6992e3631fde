//! Base raster images and the codec that loads and stores them.
//!
//! Pixels are premultiplied ARGB32 words stored little-endian, so each pixel
//! reads as the bytes B, G, R, A. Rows may be padded; `stride` is the byte
//! length of one row.

use std::io::ErrorKind;
use std::path::Path;

use drawkit_core::{CodecError, FormatError};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};

/// A premultiplied ARGB32 raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    stride: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Fully transparent image with unpadded rows.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width * 4;
        Self {
            width,
            height,
            stride,
            data: vec![0; stride as usize * height as usize],
        }
    }

    /// Wraps raw pixel rows, checking that the buffer matches the layout.
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: u32,
        data: Vec<u8>,
    ) -> Result<Self, FormatError> {
        let min_stride = width as u64 * 4;
        if (stride as u64) < min_stride {
            return Err(FormatError::Corrupt {
                reason: format!("row stride {stride} too small for width {width}"),
            });
        }
        let expected = stride as u64 * height as u64;
        if data.len() as u64 != expected {
            return Err(FormatError::Corrupt {
                reason: format!(
                    "image data is {} bytes, expected {}",
                    data.len(),
                    expected
                ),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel bytes `[b, g, r, a]` at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let at = y as usize * self.stride as usize + x as usize * 4;
        [
            self.data[at],
            self.data[at + 1],
            self.data[at + 2],
            self.data[at + 3],
        ]
    }

    /// Converts from straight-alpha RGBA.
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let mut raster = Self::new(image.width(), image.height());
        for (x, y, px) in image.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            let at = y as usize * raster.stride as usize + x as usize * 4;
            raster.data[at..at + 4].copy_from_slice(&[
                premultiply(b, a),
                premultiply(g, a),
                premultiply(r, a),
                a,
            ]);
        }
        raster
    }

    /// Converts to straight-alpha RGBA.
    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [b, g, r, a] = self.pixel(x, y);
            image::Rgba([
                unpremultiply(r, a),
                unpremultiply(g, a),
                unpremultiply(b, a),
                a,
            ])
        })
    }

    /// Resampled copy. Filtering runs on the premultiplied values so edges
    /// of transparent regions do not bleed colour.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let premultiplied = RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixel(x, y))
        });
        let scaled = image::imageops::resize(&premultiplied, width, height, FilterType::Triangle);
        let mut raster = Self::new(width, height);
        for (x, y, px) in scaled.enumerate_pixels() {
            let at = y as usize * raster.stride as usize + x as usize * 4;
            raster.data[at..at + 4].copy_from_slice(&px.0);
        }
        raster
    }
}

fn premultiply(c: u8, a: u8) -> u8 {
    ((c as u32 * a as u32 + 127) / 255) as u8
}

fn unpremultiply(c: u8, a: u8) -> u8 {
    if a == 0 {
        0
    } else {
        ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8
    }
}

/// Output formats for exported images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
    Bmp,
}

impl RasterFormat {
    /// Format implied by a file extension, case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(RasterFormat::Png),
            "jpg" | "jpeg" => Some(RasterFormat::Jpeg),
            "bmp" => Some(RasterFormat::Bmp),
            _ => None,
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
            RasterFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

/// Reads and writes raster images in common bitmap formats.
pub trait RasterCodec {
    fn decode(&self, path: &Path) -> Result<RasterImage, CodecError>;
    fn encode(&self, image: &RasterImage, path: &Path, format: RasterFormat)
        -> Result<(), CodecError>;
}

/// [`RasterCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl RasterCodec for ImageCodec {
    fn decode(&self, path: &Path) -> Result<RasterImage, CodecError> {
        let decoded = image::open(path).map_err(|e| match e {
            ImageError::IoError(io) if io.kind() == ErrorKind::NotFound => CodecError::NotFound {
                path: path.to_path_buf(),
            },
            ImageError::IoError(io) => CodecError::Io(io),
            other => CodecError::Unsupported {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;
        tracing::debug!(
            "Decoded {}x{} image from {}",
            decoded.width(),
            decoded.height(),
            path.display()
        );
        Ok(RasterImage::from_rgba(&decoded.to_rgba8()))
    }

    fn encode(
        &self,
        image: &RasterImage,
        path: &Path,
        format: RasterFormat,
    ) -> Result<(), CodecError> {
        let rgba = DynamicImage::ImageRgba8(image.to_rgba());
        // JPEG and BMP writers here take no alpha channel.
        let result = match format {
            RasterFormat::Png => rgba.save_with_format(path, format.image_format()),
            RasterFormat::Jpeg | RasterFormat::Bmp => DynamicImage::ImageRgb8(rgba.to_rgb8())
                .save_with_format(path, format.image_format()),
        };
        result.map_err(|e| match e {
            ImageError::IoError(io) => CodecError::Io(io),
            other => CodecError::Encode {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })
    }
}
