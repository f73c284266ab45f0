use crate::colortype::ColorType;
use crate::error::{Error, Result};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

/// The size of an IHDR chunk's payload, in bytes.
pub const HEADER_LEN: usize = 13;

//===========================================================================//

/// The metadata stored in a PNG file's IHDR chunk.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ImageHeader {
    /// Width of the image, in pixels.
    pub width: u32,
    /// Height of the image, in pixels.
    pub height: u32,
    /// Bits per sample.
    pub bit_depth: u8,
    /// Numeric color type (see [`ColorType`]).
    pub color_type: u8,
    /// Compression method; always 0 (zlib) in valid files.
    pub compression_method: u8,
    /// Filter method; only 0 is supported.
    pub filter_method: u8,
    /// Interlace method; recorded but never applied.
    pub interlace_method: u8,
}

impl ImageHeader {
    /// Creates a header for a non-interlaced, unfiltered 8-bit truecolor
    /// image.
    pub fn truecolor(width: u32, height: u32) -> ImageHeader {
        ImageHeader {
            width,
            height,
            bit_depth: 8,
            color_type: ColorType::Truecolor.number(),
            compression_method: 0,
            filter_method: 0,
            interlace_method: 0,
        }
    }

    /// Parses the 13-byte IHDR payload.  Trailing bytes are ignored.
    pub fn from_bytes(mut data: &[u8]) -> Result<ImageHeader> {
        if data.len() < HEADER_LEN {
            truncated_input!(
                "IHDR payload is {} bytes, but must be {}",
                data.len(),
                HEADER_LEN
            );
        }
        Ok(ImageHeader {
            width: data.read_u32::<BigEndian>()?,
            height: data.read_u32::<BigEndian>()?,
            bit_depth: data.read_u8()?,
            color_type: data.read_u8()?,
            compression_method: data.read_u8()?,
            filter_method: data.read_u8()?,
            interlace_method: data.read_u8()?,
        })
    }

    /// Serializes the header as a 13-byte IHDR payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(HEADER_LEN);
        // Writes into a Vec can't fail.
        let _ = data.write_u32::<BigEndian>(self.width);
        let _ = data.write_u32::<BigEndian>(self.height);
        data.push(self.bit_depth);
        data.push(self.color_type);
        data.push(self.compression_method);
        data.push(self.filter_method);
        data.push(self.interlace_method);
        data
    }

    /// Returns the decoded color type, or `None` for undefined values.
    pub fn color(&self) -> Option<ColorType> {
        ColorType::from_number(self.color_type)
    }

    /// Returns the number of bytes each pixel occupies in the raster.
    pub fn bytes_per_pixel(&self) -> Result<usize> {
        let channels = match self.color().and_then(|c| c.channels()) {
            Some(channels) => channels,
            None => return Err(Error::UnsupportedColorType(self.color_type)),
        };
        if self.bit_depth < 8 || self.bit_depth % 8 != 0 {
            return Err(Error::UnsupportedBitDepth(self.bit_depth));
        }
        Ok((self.bit_depth as usize) * (channels as usize) / 8)
    }

    /// Returns the length of one raster row, without its filter-type byte.
    pub fn row_len(&self) -> Result<usize> {
        let bytes_per_pixel = self.bytes_per_pixel()?;
        match (self.width as usize).checked_mul(bytes_per_pixel) {
            Some(len) => Ok(len),
            None => self.too_large(),
        }
    }

    /// Returns the length of one filtered scanline: the filter-type byte
    /// followed by the row.
    pub fn scanline_len(&self) -> Result<usize> {
        match self.row_len()?.checked_add(1) {
            Some(len) => Ok(len),
            None => self.too_large(),
        }
    }

    /// Returns the size of the unfiltered raster, in bytes.
    pub fn raw_len(&self) -> Result<usize> {
        match (self.height as usize).checked_mul(self.row_len()?) {
            Some(len) => Ok(len),
            None => self.too_large(),
        }
    }

    /// Returns the size of the inflated IDAT stream: every scanline with
    /// its filter-type byte.
    pub fn filtered_len(&self) -> Result<usize> {
        match (self.height as usize).checked_mul(self.scanline_len()?) {
            Some(len) => Ok(len),
            None => self.too_large(),
        }
    }

    fn too_large<T>(&self) -> Result<T> {
        invalid_input!(
            "Image dimensions too large (was {}x{}, but the raster must fit \
             in memory)",
            self.width,
            self.height
        );
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{ImageHeader, HEADER_LEN};
    use crate::error::Error;

    #[test]
    fn header_bytes_round_trip() {
        let header = ImageHeader {
            width: 0x0102_0304,
            height: 17,
            bit_depth: 8,
            color_type: 6,
            compression_method: 0,
            filter_method: 0,
            interlace_method: 1,
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(&bytes[..4], &[1, 2, 3, 4]);
        assert_eq!(ImageHeader::from_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn short_header_is_truncated() {
        let result = ImageHeader::from_bytes(&[0; 12]);
        assert!(matches!(result, Err(Error::TruncatedInput(_))));
    }

    #[test]
    fn truecolor_sizes() {
        let header = ImageHeader::truecolor(5, 4);
        assert_eq!(header.bytes_per_pixel().unwrap(), 3);
        assert_eq!(header.scanline_len().unwrap(), 16);
        assert_eq!(header.raw_len().unwrap(), 60);
        assert_eq!(header.filtered_len().unwrap(), 64);
    }

    #[test]
    fn sixteen_bit_rgba_sizes() {
        let mut header = ImageHeader::truecolor(2, 2);
        header.color_type = 6;
        header.bit_depth = 16;
        assert_eq!(header.bytes_per_pixel().unwrap(), 8);
    }

    #[test]
    fn huge_dimensions_are_invalid_not_overflow() {
        let header = ImageHeader {
            width: 0x7fff_ffff,
            height: 0x7fff_ffff,
            bit_depth: 16,
            color_type: 6,
            compression_method: 0,
            filter_method: 0,
            interlace_method: 0,
        };
        assert_eq!(header.bytes_per_pixel().unwrap(), 8);
        assert!(matches!(header.raw_len(), Err(Error::InvalidInput(_))));
        assert!(matches!(header.filtered_len(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn indexed_has_no_pixel_size() {
        let mut header = ImageHeader::truecolor(2, 2);
        header.color_type = 3;
        assert!(matches!(
            header.bytes_per_pixel(),
            Err(Error::UnsupportedColorType(3))
        ));
    }

    #[test]
    fn sub_byte_depth_has_no_pixel_size() {
        let mut header = ImageHeader::truecolor(2, 2);
        header.color_type = 0;
        header.bit_depth = 4;
        assert!(matches!(
            header.bytes_per_pixel(),
            Err(Error::UnsupportedBitDepth(4))
        ));
    }
}

//===========================================================================//
