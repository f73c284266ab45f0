use crate::chunk::{self, Chunk, IDAT, IEND, IHDR, SIGNATURE};
use crate::error::{Error, Result};
use crate::header::ImageHeader;
use crate::icon::{self, MAX_SIZE};
use crate::observe::{Event, LogObserver, Observer};
use crate::raster;
use crate::resize::resize_raster;
use flate2::Compression;
use std::cell::OnceCell;
use std::fmt;
use std::fs;
use std::path::Path;

//===========================================================================//

/// A PNG image: its header, the chunks it was read from, and lazily
/// computed pixel data and encoded file contents.
///
/// The decoded raster and the encoded file are each computed at most once
/// and then kept for the lifetime of the image.  If computing one of them
/// fails, nothing is cached, so calling again will retry.
#[derive(Clone)]
pub struct PngImage {
    header: ImageHeader,
    chunks: Vec<Chunk>,
    compression: Compression,
    decoded: OnceCell<Vec<u8>>,
    encoded: OnceCell<Vec<u8>>,
}

impl PngImage {
    /// Reads and parses a PNG file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PngImage> {
        PngImage::load_with(path, &mut LogObserver)
    }

    /// Like [`load`](PngImage::load), reporting progress to `observer`.
    pub fn load_with<P: AsRef<Path>>(
        path: P,
        observer: &mut dyn Observer,
    ) -> Result<PngImage> {
        let bytes = observed(observer, "load", fs::read(path.as_ref()))?;
        PngImage::from_bytes_with(&bytes, observer)
    }

    /// Parses the contents of a PNG file.
    pub fn from_bytes(bytes: &[u8]) -> Result<PngImage> {
        PngImage::from_bytes_with(bytes, &mut LogObserver)
    }

    /// Like [`from_bytes`](PngImage::from_bytes), reporting progress to
    /// `observer`.
    pub fn from_bytes_with(
        bytes: &[u8],
        observer: &mut dyn Observer,
    ) -> Result<PngImage> {
        let parsed = chunk::parse_container(bytes, observer);
        let (header, chunks) = observed(observer, "parse", parsed)?;
        Ok(PngImage {
            header,
            chunks,
            compression: Compression::default(),
            decoded: OnceCell::new(),
            encoded: OnceCell::new(),
        })
    }

    /// Creates an image from raw, unfiltered pixel data in row-major order.
    /// Returns an error if `raw` is the wrong length for `header`.
    pub fn from_raw(header: ImageHeader, raw: Vec<u8>) -> Result<PngImage> {
        let expected = header.raw_len()?;
        if raw.len() != expected {
            invalid_input!(
                "Invalid data length (was {}, but must be {} for {}x{} image)",
                raw.len(),
                expected,
                header.width,
                header.height
            );
        }
        Ok(PngImage {
            header,
            chunks: Vec::new(),
            compression: Compression::default(),
            decoded: OnceCell::from(raw),
            encoded: OnceCell::new(),
        })
    }

    /// Sets the zlib compression level used when encoding this image.  Has
    /// no effect if the image has already been encoded.
    pub fn with_compression(mut self, compression: Compression) -> PngImage {
        self.compression = compression;
        self
    }

    /// Returns the image's header.
    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.header.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.header.height
    }

    /// Returns the chunks the image was parsed from, in file order.  Empty
    /// for images that weren't read from a file.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Returns the zlib compression level used when encoding this image.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns the unfiltered pixel data, decoding it on first use.
    pub fn image_data(&self) -> Result<&[u8]> {
        self.image_data_with(&mut LogObserver)
    }

    /// Like [`image_data`](PngImage::image_data), reporting progress to
    /// `observer`.
    pub fn image_data_with(
        &self,
        observer: &mut dyn Observer,
    ) -> Result<&[u8]> {
        if let Some(raw) = self.decoded.get() {
            return Ok(raw.as_slice());
        }
        let decoded = raster::decode(&self.header, &self.chunks, observer);
        let raw = observed(observer, "decode", decoded)?;
        Ok(self.decoded.get_or_init(|| raw).as_slice())
    }

    /// Returns the bytes of a PNG file holding this image, encoding it on
    /// first use.  The file has exactly three chunks: IHDR, IDAT, and IEND.
    pub fn content(&self) -> Result<&[u8]> {
        self.content_with(&mut LogObserver)
    }

    /// Like [`content`](PngImage::content), reporting progress to
    /// `observer`.
    pub fn content_with(&self, observer: &mut dyn Observer) -> Result<&[u8]> {
        if let Some(content) = self.encoded.get() {
            return Ok(content.as_slice());
        }
        let raw = self.image_data_with(observer)?;
        let encoded =
            raster::encode(raw, &self.header, self.compression, observer);
        let compressed = observed(observer, "encode", encoded)?;
        let header_chunk = chunk::write_chunk(&IHDR, &self.header.to_bytes());
        let data_chunk = chunk::write_chunk(&IDAT, &compressed);
        let end_chunk = chunk::write_chunk(&IEND, &[]);
        let mut content = Vec::with_capacity(
            SIGNATURE.len()
                + header_chunk.len()
                + data_chunk.len()
                + end_chunk.len(),
        );
        content.extend_from_slice(&SIGNATURE);
        content.extend(header_chunk);
        content.extend(data_chunk);
        content.extend(end_chunk);
        Ok(self.encoded.get_or_init(|| content).as_slice())
    }

    /// Downsamples the image to `width` by `height` pixels, returning a new
    /// image.  `height` defaults to `width`; only uniform scaling is
    /// supported, so the two must be equal, and neither may exceed the
    /// source's size.
    pub fn resize(&self, width: u32, height: Option<u32>) -> Result<PngImage> {
        self.resize_with(width, height, &mut LogObserver)
    }

    /// Like [`resize`](PngImage::resize), reporting progress to `observer`.
    pub fn resize_with(
        &self,
        width: u32,
        height: Option<u32>,
        observer: &mut dyn Observer,
    ) -> Result<PngImage> {
        let result = self.resize_internal(width, height, observer);
        observed(observer, "resize", result)
    }

    fn resize_internal(
        &self,
        width: u32,
        height: Option<u32>,
        observer: &mut dyn Observer,
    ) -> Result<PngImage> {
        let height = height.unwrap_or(width);
        if width != height {
            return Err(Error::UnsupportedShape { width, height });
        }
        if width == 0 {
            invalid_input!("Resize target must be at least 1 pixel");
        }
        if width > self.header.width || height > self.header.height {
            invalid_input!(
                "Invalid resize target (was {}x{}, but must be at most {}x{})",
                width,
                height,
                self.header.width,
                self.header.height
            );
        }
        if self.header.bit_depth != 8 {
            return Err(Error::UnsupportedBitDepth(self.header.bit_depth));
        }
        let bytes_per_pixel = self.header.bytes_per_pixel()?;
        let source = self.image_data_with(observer)?;
        let raw = resize_raster(
            source,
            self.header.width,
            self.header.height,
            width,
            height,
            bytes_per_pixel,
        )?;
        observer.observe(&Event::Resized {
            from: self.header.width,
            to: width,
        });
        let header = ImageHeader { width, height, ..self.header };
        Ok(PngImage::from_raw(header, raw)?.with_compression(self.compression))
    }

    /// Encodes the image as a PNG file and returns its bytes.  If `path` is
    /// given, the bytes are also written there.
    pub fn save_png(&self, path: Option<&Path>) -> Result<Vec<u8>> {
        self.save_png_with(path, &mut LogObserver)
    }

    /// Like [`save_png`](PngImage::save_png), reporting progress to
    /// `observer`.
    pub fn save_png_with(
        &self,
        path: Option<&Path>,
        observer: &mut dyn Observer,
    ) -> Result<Vec<u8>> {
        let content = self.content_with(observer)?;
        if let Some(path) = path {
            write_file(path, content, "save_png", observer)?;
        }
        Ok(content.to_vec())
    }

    /// Encodes the image as a PNG, wraps it in an ICO file, and writes that
    /// to `path`.  The image must be square and at most 256 pixels wide.
    pub fn save_ico<P: AsRef<Path>>(&self, path: P) -> Result<&PngImage> {
        self.save_ico_with(path, &mut LogObserver)
    }

    /// Like [`save_ico`](PngImage::save_ico), reporting progress to
    /// `observer`.
    pub fn save_ico_with<P: AsRef<Path>>(
        &self,
        path: P,
        observer: &mut dyn Observer,
    ) -> Result<&PngImage> {
        let result = self.ico_bytes(observer);
        let bytes = observed(observer, "save_ico", result)?;
        write_file(path.as_ref(), &bytes, "save_ico", observer)?;
        Ok(self)
    }

    fn ico_bytes(&self, observer: &mut dyn Observer) -> Result<Vec<u8>> {
        let (width, height) = (self.header.width, self.header.height);
        if width != height {
            return Err(Error::Shape { width, height });
        }
        if width > MAX_SIZE {
            return Err(Error::Size { width, max: MAX_SIZE });
        }
        let content = self.content_with(observer)?;
        Ok(icon::wrap(content, width, height))
    }
}

impl fmt::Debug for PngImage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PngImage")
            .field("header", &self.header)
            .field("chunks", &self.chunks)
            .field("decoded", &self.decoded.get().is_some())
            .field("encoded", &self.encoded.get().is_some())
            .finish()
    }
}

//===========================================================================//

fn observed<T, E: Into<Error>>(
    observer: &mut dyn Observer,
    operation: &'static str,
    result: ::std::result::Result<T, E>,
) -> Result<T> {
    result.map_err(|error| {
        let error = error.into();
        let message = error.to_string();
        observer.observe(&Event::Failed { operation, message: &message });
        error
    })
}

fn write_file(
    path: &Path,
    bytes: &[u8],
    operation: &'static str,
    observer: &mut dyn Observer,
) -> Result<()> {
    observed(observer, operation, fs::write(path, bytes))?;
    observer.observe(&Event::FileWritten { path, len: bytes.len() });
    Ok(())
}

//===========================================================================//


//===========================================================================//
