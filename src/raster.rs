//! Compression and scanline filtering of pixel data.

use crate::chunk::{Chunk, IDAT};
use crate::error::{Error, Result};
use crate::header::ImageHeader;
use crate::observe::{Event, Observer};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

//===========================================================================//

// The only scanline filter type this codec reads or writes.
const FILTER_NONE: u8 = 0;

//===========================================================================//

/// Inflates the concatenated IDAT payloads of `chunks` and strips the
/// per-scanline filter bytes, yielding `header.raw_len()` bytes of pixel
/// data in row-major order.
pub fn decode(
    header: &ImageHeader,
    chunks: &[Chunk],
    observer: &mut dyn Observer,
) -> Result<Vec<u8>> {
    check_filter_method(header)?;
    let compressed: Vec<u8> = chunks
        .iter()
        .filter(|chunk| *chunk.chunk_type() == IDAT)
        .flat_map(|chunk| chunk.data().iter().cloned())
        .collect();
    let mut filtered = Vec::new();
    if let Err(error) =
        ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut filtered)
    {
        return Err(Error::Compression(error));
    }
    let raw = unfilter(header, &filtered)?;
    observer.observe(&Event::RasterDecoded {
        compressed_len: compressed.len(),
        raw_len: raw.len(),
    });
    Ok(raw)
}

/// Adds a filter byte to each scanline of `raw` and deflates the result,
/// yielding the payload for an IDAT chunk.
pub fn encode(
    raw: &[u8],
    header: &ImageHeader,
    compression: Compression,
    observer: &mut dyn Observer,
) -> Result<Vec<u8>> {
    let filtered = filter(header, raw)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), compression);
    encoder.write_all(&filtered)?;
    let compressed = encoder.finish()?;
    observer.observe(&Event::RasterEncoded {
        raw_len: raw.len(),
        compressed_len: compressed.len(),
    });
    Ok(compressed)
}

//===========================================================================//

fn check_filter_method(header: &ImageHeader) -> Result<()> {
    if header.filter_method != 0 {
        return Err(Error::UnsupportedFilter(header.filter_method));
    }
    Ok(())
}

fn unfilter(header: &ImageHeader, filtered: &[u8]) -> Result<Vec<u8>> {
    check_filter_method(header)?;
    let scanline_len = header.scanline_len()?;
    let expected = header.filtered_len()?;
    if filtered.len() < expected {
        truncated_input!(
            "Pixel data is {} bytes, but a {}x{} image needs {}",
            filtered.len(),
            header.width,
            header.height,
            expected
        );
    }
    let mut raw = Vec::with_capacity(header.raw_len()?);
    for scanline in filtered[..expected].chunks(scanline_len) {
        let filter_type = scanline[0];
        if filter_type != FILTER_NONE {
            return Err(Error::UnsupportedFilter(filter_type));
        }
        raw.extend_from_slice(&scanline[1..]);
    }
    Ok(raw)
}

fn filter(header: &ImageHeader, raw: &[u8]) -> Result<Vec<u8>> {
    check_filter_method(header)?;
    let row_len = header.row_len()?;
    let expected = header.raw_len()?;
    if raw.len() != expected {
        invalid_input!(
            "Invalid raster length (was {}, but must be {} for {}x{} image)",
            raw.len(),
            expected,
            header.width,
            header.height
        );
    }
    let mut filtered = Vec::with_capacity(header.filtered_len()?);
    if row_len == 0 {
        filtered.resize(header.height as usize, FILTER_NONE);
        return Ok(filtered);
    }
    for row in raw.chunks(row_len) {
        filtered.push(FILTER_NONE);
        filtered.extend_from_slice(row);
    }
    Ok(filtered)
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{decode, encode, filter, unfilter};
    use crate::chunk::Chunk;
    use crate::error::Error;
    use crate::header::ImageHeader;
    use crate::observe::NoopObserver;
    use flate2::Compression;

    fn idat(data: Vec<u8>) -> Chunk {
        Chunk::new(*b"IDAT", data)
    }

    #[test]
    fn two_by_two_truecolor_round_trip() {
        let header = ImageHeader::truecolor(2, 2);
        let raw: &[u8] = b"\xff\x00\x00\x00\xff\x00\
                           \x00\x00\xff\xff\xff\xff";
        let compressed =
            encode(raw, &header, Compression::default(), &mut NoopObserver)
                .unwrap();
        let decoded =
            decode(&header, &[idat(compressed)], &mut NoopObserver).unwrap();
        assert_eq!(decoded.as_slice(), raw);
    }

    #[test]
    fn filter_bytes_prefix_each_scanline() {
        let header = ImageHeader::truecolor(1, 3);
        let filtered = filter(&header, &[1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        assert_eq!(filtered, vec![0, 1, 2, 3, 0, 4, 5, 6, 0, 7, 8, 9]);
        let raw = unfilter(&header, &filtered).unwrap();
        assert_eq!(raw, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn decode_concatenates_split_idat_chunks() {
        let header = ImageHeader::truecolor(3, 5);
        let raw: Vec<u8> = (0..45).collect();
        let compressed =
            encode(&raw, &header, Compression::best(), &mut NoopObserver)
                .unwrap();
        let (first, second) = compressed.split_at(compressed.len() / 2);
        let chunks = vec![
            idat(first.to_vec()),
            Chunk::new(*b"tEXt", b"ignored".to_vec()),
            idat(second.to_vec()),
        ];
        let decoded = decode(&header, &chunks, &mut NoopObserver).unwrap();
        assert_eq!(decoded, raw);
    }

    #[test]
    fn nonzero_filter_method_is_unsupported() {
        let mut header = ImageHeader::truecolor(1, 1);
        header.filter_method = 1;
        let result = unfilter(&header, &[0, 1, 2, 3]);
        assert!(matches!(result, Err(Error::UnsupportedFilter(1))));
        let result = filter(&header, &[1, 2, 3]);
        assert!(matches!(result, Err(Error::UnsupportedFilter(1))));
    }

    #[test]
    fn nonzero_filter_type_is_unsupported() {
        let header = ImageHeader::truecolor(1, 2);
        let result = unfilter(&header, &[0, 1, 2, 3, 2, 4, 5, 6]);
        assert!(matches!(result, Err(Error::UnsupportedFilter(2))));
    }

    #[test]
    fn short_pixel_data_is_truncated() {
        let header = ImageHeader::truecolor(2, 2);
        let result = unfilter(&header, &[0, 1, 2, 3, 4, 5, 6]);
        assert!(matches!(result, Err(Error::TruncatedInput(_))));
    }

    #[test]
    fn wrong_raster_length_is_invalid() {
        let header = ImageHeader::truecolor(2, 2);
        let result =
            encode(&[0; 11], &header, Compression::fast(), &mut NoopObserver);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn huge_dimensions_are_rejected_before_decoding() {
        let header = ImageHeader {
            width: 0x7fff_ffff,
            height: 0x7fff_ffff,
            bit_depth: 16,
            color_type: 6,
            compression_method: 0,
            filter_method: 0,
            interlace_method: 0,
        };
        let empty = ImageHeader::truecolor(0, 0);
        let compressed =
            encode(&[], &empty, Compression::fast(), &mut NoopObserver)
                .unwrap();
        let result = decode(&header, &[idat(compressed)], &mut NoopObserver);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        let result = unfilter(&header, &[0; 16]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn garbage_idat_fails_to_inflate() {
        let header = ImageHeader::truecolor(1, 1);
        let chunks = vec![idat(b"definitely not zlib".to_vec())];
        let result = decode(&header, &chunks, &mut NoopObserver);
        assert!(matches!(result, Err(Error::Compression(_))));
    }
}

//===========================================================================//
