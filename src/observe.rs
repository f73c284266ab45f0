//! Hooks for watching what the codec does.
//!
//! Nothing in this crate logs on its own.  Every operation that does real
//! work takes an `&mut dyn Observer` and reports [`Event`]s to it; the
//! convenience methods on [`PngImage`](crate::PngImage) that don't take an
//! observer use a [`LogObserver`], which forwards to the `log` facade.

use std::path::Path;

//===========================================================================//

/// Something noteworthy that happened during an operation.
#[derive(Clone, Copy, Debug)]
pub enum Event<'a> {
    /// A chunk was read from a container.
    ChunkRead {
        /// The chunk's four-character type tag.
        chunk_type: &'a [u8; 4],
        /// The length of the chunk's payload.
        length: u32,
        /// The offset of the chunk within the container.
        offset: usize,
    },
    /// Compressed pixel data was inflated and de-filtered.
    RasterDecoded {
        /// Total length of the concatenated IDAT payloads.
        compressed_len: usize,
        /// Length of the unfiltered raster.
        raw_len: usize,
    },
    /// A raster was filtered and deflated.
    RasterEncoded {
        /// Length of the unfiltered raster.
        raw_len: usize,
        /// Length of the resulting zlib stream.
        compressed_len: usize,
    },
    /// An image was downsampled.
    Resized {
        /// Source width, in pixels.
        from: u32,
        /// Target side length, in pixels.
        to: u32,
    },
    /// Bytes were written to a file.
    FileWritten {
        /// Destination path.
        path: &'a Path,
        /// Number of bytes written.
        len: usize,
    },
    /// An operation failed; the error is still returned to the caller.
    Failed {
        /// Name of the operation that failed.
        operation: &'static str,
        /// The failure, rendered for display.
        message: &'a str,
    },
}

//===========================================================================//

/// Receives [`Event`]s from codec operations.
pub trait Observer {
    /// Called once for each event, in the order the events happen.
    fn observe(&mut self, event: &Event);
}

impl<F> Observer for F
where
    F: FnMut(&Event),
{
    fn observe(&mut self, event: &Event) {
        self(event)
    }
}

/// An observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn observe(&mut self, _event: &Event) {}
}

/// An observer that forwards events to the `log` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn observe(&mut self, event: &Event) {
        match *event {
            Event::ChunkRead { chunk_type, length, offset } => {
                log::trace!(
                    target: "pngico::chunk",
                    "read {} chunk ({} bytes) at offset {}",
                    String::from_utf8_lossy(chunk_type),
                    length,
                    offset
                );
            }
            Event::RasterDecoded { compressed_len, raw_len } => {
                log::debug!(
                    target: "pngico::raster",
                    "decoded {} compressed bytes into {} raw bytes",
                    compressed_len,
                    raw_len
                );
            }
            Event::RasterEncoded { raw_len, compressed_len } => {
                log::debug!(
                    target: "pngico::raster",
                    "encoded {} raw bytes into {} compressed bytes",
                    raw_len,
                    compressed_len
                );
            }
            Event::Resized { from, to } => {
                log::debug!(
                    target: "pngico::resize",
                    "resized from width {} to {}x{}",
                    from,
                    to,
                    to
                );
            }
            Event::FileWritten { path, len } => {
                log::info!(
                    target: "pngico::image",
                    "wrote {} bytes to {}",
                    len,
                    path.display()
                );
            }
            Event::Failed { operation, message } => {
                log::warn!(
                    target: "pngico::image",
                    "{} failed: {}",
                    operation,
                    message
                );
            }
        }
    }
}

//===========================================================================//


//===========================================================================//
