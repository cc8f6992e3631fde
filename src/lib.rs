//! # drawkit
//!
//! Core of an interactive 2-D drawing editor: a canvas holding a base raster
//! plus an ordered stack of vector shapes, edited through pointer gestures
//! with full undo/redo.
//!
//! ## Architecture
//!
//! drawkit is organized as a workspace with multiple crates:
//!
//! 1. **drawkit-core** - Error types, colors, fixed-point helpers
//! 2. **drawkit-settings** - Canvas, history, input and style configuration
//! 3. **drawkit-designer** - Shapes, hit testing, selection, document history,
//!    file format, raster codec and renderer
//! 4. **drawkit** - This facade, which wires configuration and logging to the
//!    designer
//!
//! ## Features
//!
//! - **Copy-on-write history**: every edit step is a snapshot sharing
//!   unchanged shapes with its predecessor
//! - **Coalescing**: a continuous drag or repeated edit of one parameter is a
//!   single undo step
//! - **Exact hit testing**: rounded, rotated and stroke-only outlines
//! - **Compact file format**: gzip-compressed binary, written atomically

pub use drawkit_designer as designer;
pub use drawkit_settings as settings;

pub use drawkit_core::{CodecError, Color, Error, FormatError, Result};
pub use drawkit_designer::{
    render_snapshot, Corner, Document, DocumentHistory, EditCategory, FontSpec, Hit, HitMode,
    ImageCodec, ParamKind, PixmapSurface, Point, RasterCodec, RasterFormat, RasterImage, Rect,
    RenderSurface, SelectionSet, Shape, ShapeType, Snapshot, StyleParam, StyleParams,
};
pub use drawkit_settings::{Config, StyleDefaults};

use std::path::Path;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Installs a global `tracing` subscriber printing to stderr, filtered by
/// `RUST_LOG` (default level `info`). Fails if a subscriber is already set.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    tracing::debug!("drawkit {} logging initialized", VERSION);
    Ok(())
}

/// Empty document built from `config` after validating it.
pub fn new_document(config: &Config) -> Result<Document> {
    config.validate()?;
    Ok(Document::new(config))
}

/// Opens a document file with history and input settings from `config`.
///
/// A path with a raster extension (png, jpg, bmp) is imported as the base
/// image of a new document instead.
pub fn open_document(path: impl AsRef<Path>, config: &Config) -> Result<Document> {
    let path = path.as_ref();
    config.validate()?;
    match RasterFormat::from_path(path) {
        Some(_) => Document::import_image(path, &ImageCodec, config),
        None => Document::open(path, config),
    }
}
