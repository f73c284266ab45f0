//! Wrapping PNG data in single-image ICO files.

use crate::chunk::SIGNATURE;
use crate::error::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

//===========================================================================//

/// The largest width or height an ICO entry can describe.
pub const MAX_SIZE: u32 = 256;

// The size of the ICONDIR header plus one ICONDIRENTRY.
const DATA_OFFSET: u32 = 6 + 16;

// The resource type number for icons (as opposed to cursors).
const ICON_TYPE: u16 = 1;

//===========================================================================//

/// Wraps an encoded PNG in a single-entry ICO file.
pub fn wrap(content: &[u8], width: u32, height: u32) -> Vec<u8> {
    let mut output = Vec::with_capacity(DATA_OFFSET as usize + content.len());
    // Writes into a Vec can't fail.
    let _ = IconEntry::write_header(&mut output, content.len(), width, height);
    output.extend_from_slice(content);
    output
}

//===========================================================================//

/// The single image stored in an ICO file written by [`wrap`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconEntry {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl IconEntry {
    /// Returns the width recorded in the directory entry, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height recorded in the directory entry, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the embedded image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns true if the embedded data is a PNG.
    pub fn is_png(&self) -> bool {
        self.data.starts_with(&SIGNATURE)
    }

    /// Reads the first image of an ICO file.
    pub fn read<R: Read>(mut reader: R) -> Result<IconEntry> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            invalid_input!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        if restype != ICON_TYPE {
            invalid_input!("Invalid resource type ({})", restype);
        }
        let num_entries = reader.read_u16::<LittleEndian>()?;
        if num_entries == 0 {
            invalid_input!("ICO file has no images");
        }
        let width_byte = reader.read_u8()?;
        let height_byte = reader.read_u8()?;
        let _num_colors = reader.read_u8()?;
        let _reserved = reader.read_u8()?;
        let _color_planes = reader.read_u16::<LittleEndian>()?;
        let _bits_per_pixel = reader.read_u16::<LittleEndian>()?;
        let data_size = reader.read_u32::<LittleEndian>()?;
        let data_offset = reader.read_u32::<LittleEndian>()?;
        if data_offset < DATA_OFFSET {
            invalid_input!(
                "Image data offset {} overlaps the ICO directory",
                data_offset
            );
        }
        // Skip any further directory entries to reach the image data.
        let mut skipped = vec![0u8; (data_offset - DATA_OFFSET) as usize];
        reader.read_exact(&mut skipped)?;
        let mut data = vec![0u8; data_size as usize];
        reader.read_exact(&mut data)?;
        Ok(IconEntry {
            width: if width_byte == 0 { MAX_SIZE } else { width_byte as u32 },
            height: if height_byte == 0 {
                MAX_SIZE
            } else {
                height_byte as u32
            },
            data,
        })
    }

    fn write_header<W: Write>(
        writer: &mut W,
        data_size: usize,
        width: u32,
        height: u32,
    ) -> Result<()> {
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(ICON_TYPE)?;
        writer.write_u16::<LittleEndian>(1)?; // number of images
        // A width/height byte of zero indicates a size of 256.
        writer.write_u8(if width >= MAX_SIZE { 0 } else { width as u8 })?;
        writer.write_u8(if height >= MAX_SIZE { 0 } else { height as u8 })?;
        writer.write_u8(0)?; // no palette
        writer.write_u8(0)?; // reserved
        writer.write_u16::<LittleEndian>(0)?; // color planes
        writer.write_u16::<LittleEndian>(0)?; // bits per pixel; see PNG data
        writer.write_u32::<LittleEndian>(data_size as u32)?;
        writer.write_u32::<LittleEndian>(DATA_OFFSET)?;
        Ok(())
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{wrap, IconEntry, MAX_SIZE};
    use crate::error::Error;

    #[test]
    fn wrap_writes_single_entry_directory() {
        let output = wrap(b"\x89PNGdata", 32, 32);
        let expected: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x20\x20\x00\x00\x00\x00\x00\x00\
            \x08\x00\x00\x00\x16\x00\x00\x00\
            \
            \x89PNGdata";
        assert_eq!(output.as_slice(), expected);
    }

    #[test]
    fn full_size_is_written_as_zero() {
        let output = wrap(&[], MAX_SIZE, MAX_SIZE);
        assert_eq!(output.len(), 22);
        assert_eq!(output[6], 0);
        assert_eq!(output[7], 0);
    }

    #[test]
    fn read_wrapped_entry() {
        let content = b"\x89PNG\r\n\x1a\nrest of file".to_vec();
        let entry = IconEntry::read(wrap(&content, 256, 256).as_slice())
            .unwrap();
        assert_eq!(entry.width(), 256);
        assert_eq!(entry.height(), 256);
        assert!(entry.is_png());
        assert_eq!(entry.data(), content.as_slice());
    }

    #[test]
    fn read_rejects_cursor_files() {
        let mut bytes = wrap(b"x", 1, 1);
        bytes[2] = 2;
        let result = IconEntry::read(bytes.as_slice());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn read_truncated_data_is_io_error() {
        let mut bytes = wrap(b"abcdef", 4, 4);
        bytes.truncate(bytes.len() - 2);
        let result = IconEntry::read(bytes.as_slice());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}

//===========================================================================//
