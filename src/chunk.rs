//! Reading and writing the chunks that make up a PNG file.

use crate::error::{Error, Result};
use crate::header::ImageHeader;
use crate::observe::{Event, Observer};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::fmt;

//===========================================================================//

/// The signature that all PNG files start with.
pub const SIGNATURE: [u8; 8] =
    [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// The type tag of the header chunk.
pub const IHDR: [u8; 4] = *b"IHDR";
/// The type tag of pixel-data chunks.
pub const IDAT: [u8; 4] = *b"IDAT";
/// The type tag of the end-marker chunk.
pub const IEND: [u8; 4] = *b"IEND";

// Length field, type tag, and checksum.
const CHUNK_OVERHEAD: usize = 12;

//===========================================================================//

/// One length-prefixed, typed, checksummed unit of a PNG file.
#[derive(Clone, Eq, PartialEq)]
pub struct Chunk {
    chunk_type: [u8; 4],
    data: Vec<u8>,
    checksum: u32,
}

impl Chunk {
    /// Creates a chunk with a freshly computed checksum.
    pub fn new(chunk_type: [u8; 4], data: Vec<u8>) -> Chunk {
        let checksum = checksum(&chunk_type, &data);
        Chunk { chunk_type, data, checksum }
    }

    /// Returns the chunk's four-character type tag.
    pub fn chunk_type(&self) -> &[u8; 4] {
        &self.chunk_type
    }

    /// Returns the length of the chunk's payload.
    pub fn length(&self) -> u32 {
        self.data.len() as u32
    }

    /// Returns the chunk's payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the checksum stored with the chunk.
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Returns true if the stored checksum matches the type and payload.
    pub fn has_valid_checksum(&self) -> bool {
        self.checksum == checksum(&self.chunk_type, &self.data)
    }

    /// Serializes the chunk, recomputing its checksum.
    pub fn to_bytes(&self) -> Vec<u8> {
        write_chunk(&self.chunk_type, &self.data)
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("chunk_type", &String::from_utf8_lossy(&self.chunk_type))
            .field("length", &self.data.len())
            .field("checksum", &format_args!("{:#010x}", self.checksum))
            .finish()
    }
}

//===========================================================================//

/// Computes the CRC-32 of a chunk's type tag followed by its payload.
pub fn checksum(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    hasher.finalize()
}

/// Reads the chunk starting at `offset` within `buffer`, and returns it
/// along with the offset of the following chunk.
pub fn read_chunk(offset: usize, buffer: &[u8]) -> Result<(Chunk, usize)> {
    let remaining = buffer.len().saturating_sub(offset);
    if remaining < CHUNK_OVERHEAD {
        truncated_input!(
            "Chunk at offset {} needs at least {} bytes, but only {} remain",
            offset,
            CHUNK_OVERHEAD,
            remaining
        );
    }
    let length = BigEndian::read_u32(&buffer[offset..]) as usize;
    let needed = match length.checked_add(CHUNK_OVERHEAD) {
        Some(needed) => needed,
        None => truncated_input!("Chunk length {} is too large", length),
    };
    if remaining < needed {
        truncated_input!(
            "Chunk at offset {} declares {} data bytes, but only {} remain",
            offset,
            length,
            remaining - CHUNK_OVERHEAD
        );
    }
    let mut chunk_type = [0u8; 4];
    chunk_type.copy_from_slice(&buffer[(offset + 4)..(offset + 8)]);
    let data_start = offset + 8;
    let data = buffer[data_start..(data_start + length)].to_vec();
    let checksum = BigEndian::read_u32(&buffer[(data_start + length)..]);
    Ok((Chunk { chunk_type, data, checksum }, offset + needed))
}

/// Serializes a chunk: big-endian length, type tag, payload, and the CRC-32
/// of the type tag and payload.
pub fn write_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len() + CHUNK_OVERHEAD);
    // Writes into a Vec can't fail.
    let _ = output.write_u32::<BigEndian>(data.len() as u32);
    output.extend_from_slice(chunk_type);
    output.extend_from_slice(data);
    let _ = output.write_u32::<BigEndian>(checksum(chunk_type, data));
    output
}

/// Checks the signature of a PNG file, then reads its header and every one
/// of its chunks (the header chunk included), in file order.
pub fn parse_container(
    buffer: &[u8],
    observer: &mut dyn Observer,
) -> Result<(ImageHeader, Vec<Chunk>)> {
    if !buffer.starts_with(&SIGNATURE) {
        return Err(Error::BadSignature);
    }
    let mut offset = SIGNATURE.len();
    let (first, next) = read_chunk(offset, buffer)?;
    report(observer, &first, offset);
    let header = ImageHeader::from_bytes(first.data())?;
    let mut chunks = vec![first];
    offset = next;
    while offset < buffer.len() {
        let (chunk, next) = read_chunk(offset, buffer)?;
        report(observer, &chunk, offset);
        chunks.push(chunk);
        offset = next;
    }
    Ok((header, chunks))
}

fn report(observer: &mut dyn Observer, chunk: &Chunk, offset: usize) {
    observer.observe(&Event::ChunkRead {
        chunk_type: chunk.chunk_type(),
        length: chunk.length(),
        offset,
    });
}

//===========================================================================//


//===========================================================================//
