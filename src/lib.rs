//! A minimal PNG codec that can downsample images and export them as ICO
//! files.
//!
//! Only the subset of PNG needed for simple icon generation is supported:
//! non-interlaced images whose scanlines all use the "none" filter, with
//! 8- or 16-bit samples in a non-palette color type.
//!
//! The API is synchronous: every operation does blocking `std::io` and
//! returns once its work is done.
//!
//! ```no_run
//! let image = pngico::PngImage::load("icon.png").unwrap();
//! let small = image.resize(32, None).unwrap();
//! small.save_ico("favicon.ico").unwrap();
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod chunk;
mod colortype;
mod error;
mod header;
pub mod icon;
mod image;
pub mod observe;
pub mod raster;
pub mod resize;

pub use crate::chunk::Chunk;
pub use crate::colortype::ColorType;
pub use crate::error::{Error, Result};
pub use crate::header::ImageHeader;
pub use crate::icon::IconEntry;
pub use crate::image::PngImage;
pub use crate::observe::{Event, LogObserver, NoopObserver, Observer};
pub use flate2::Compression;

/// Reads and parses a PNG file.  Shorthand for [`PngImage::load`].
pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<PngImage> {
    PngImage::load(path)
}
