//! File header and the three globally shared buffers that follow it.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use serde::Serialize;
use std::io::{self, Write};

use crate::cursor::ByteCursor;
use crate::error::{FormatError, FormatResult};
use crate::mesh::Channel;

/// Magic value stored in the first 32-bit word of every container.
pub const BINFBX_MAGIC: u32 = 0x2E;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 20;

/// Element width of the global (and every local) index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexWidth {
    U8,
    U16,
    U32,
    U64,
}

impl IndexWidth {
    /// Parse a width given in bytes.
    pub fn from_bytes(width: u32) -> FormatResult<Self> {
        match width {
            1 => Ok(IndexWidth::U8),
            2 => Ok(IndexWidth::U16),
            4 => Ok(IndexWidth::U32),
            8 => Ok(IndexWidth::U64),
            _ => Err(FormatError::UnsupportedIndexWidth { width }),
        }
    }

    /// Width in bytes.
    pub fn bytes(self) -> usize {
        match self {
            IndexWidth::U8 => 1,
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
            IndexWidth::U64 => 8,
        }
    }

    /// Decode one element. `bytes` must be exactly [`Self::bytes`] long.
    pub fn decode(self, bytes: &[u8]) -> u64 {
        match self {
            IndexWidth::U8 => u64::from(bytes[0]),
            IndexWidth::U16 => u64::from(LittleEndian::read_u16(bytes)),
            IndexWidth::U32 => u64::from(LittleEndian::read_u32(bytes)),
            IndexWidth::U64 => LittleEndian::read_u64(bytes),
        }
    }

    /// Encode one element into `out`, which must be exactly [`Self::bytes`] long.
    /// Values wider than the element are truncated to its low bytes.
    pub fn encode(self, value: u64, out: &mut [u8]) {
        match self {
            IndexWidth::U8 => out[0] = value as u8,
            IndexWidth::U16 => LittleEndian::write_u16(out, value as u16),
            IndexWidth::U32 => LittleEndian::write_u32(out, value as u32),
            IndexWidth::U64 => LittleEndian::write_u64(out, value),
        }
    }
}

/// The fixed 20-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    pub magic: u32,
    pub attribute_buffer_size: u32,
    pub vertex_buffer_size: u32,
    pub index_count: u32,
    pub index_width: IndexWidth,
}

impl Header {
    /// Decode and validate the header.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> FormatResult<Self> {
        let magic = cursor.read_u32()?;
        if magic != BINFBX_MAGIC {
            return Err(FormatError::invalid(format!(
                "bad magic 0x{:08X}, expected 0x{:08X}",
                magic, BINFBX_MAGIC
            )));
        }
        let attribute_buffer_size = cursor.read_u32()?;
        let vertex_buffer_size = cursor.read_u32()?;
        let index_count = cursor.read_u32()?;
        let index_width = IndexWidth::from_bytes(cursor.read_u32()?)?;

        Ok(Self {
            magic,
            attribute_buffer_size,
            vertex_buffer_size,
            index_count,
            index_width,
        })
    }

    /// Byte length of the global index buffer described by this header.
    pub fn index_buffer_len(&self) -> FormatResult<usize> {
        (self.index_count as usize)
            .checked_mul(self.index_width.bytes())
            .ok_or_else(|| FormatError::invalid("index buffer size overflows"))
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.magic)?;
        writer.write_u32::<LittleEndian>(self.attribute_buffer_size)?;
        writer.write_u32::<LittleEndian>(self.vertex_buffer_size)?;
        writer.write_u32::<LittleEndian>(self.index_count)?;
        writer.write_u32::<LittleEndian>(self.index_width.bytes() as u32)
    }
}

/// Vertex and index pools shared by every mesh in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalBuffers {
    /// Auxiliary attribute channel (texcoords, tangents, weights...).
    pub attribute: Vec<u8>,
    /// Position/normal channel.
    pub vertex: Vec<u8>,
    /// Triangle corner indices, `index_width` bytes each.
    pub index: Vec<u8>,
    pub index_width: IndexWidth,
}

impl GlobalBuffers {
    /// Read the three buffers whose sizes the header declares.
    pub fn decode(cursor: &mut ByteCursor<'_>, header: &Header) -> FormatResult<Self> {
        let attribute = cursor.take(header.attribute_buffer_size as usize)?.to_vec();
        let vertex = cursor.take(header.vertex_buffer_size as usize)?.to_vec();
        let index = cursor.take(header.index_buffer_len()?)?.to_vec();
        Ok(Self {
            attribute,
            vertex,
            index,
            index_width: header.index_width,
        })
    }

    /// Header describing the current buffer contents. The index count is
    /// derived from the index buffer length.
    pub fn header(&self) -> io::Result<Header> {
        Ok(Header {
            magic: BINFBX_MAGIC,
            attribute_buffer_size: size_u32(self.attribute.len())?,
            vertex_buffer_size: size_u32(self.vertex.len())?,
            index_count: size_u32(self.index_count())?,
            index_width: self.index_width,
        })
    }

    /// Number of elements in the global index buffer.
    pub fn index_count(&self) -> usize {
        self.index.len() / self.index_width.bytes()
    }

    /// Buffer backing a vertex channel.
    pub fn channel(&self, channel: Channel) -> &[u8] {
        match channel {
            Channel::Attribute => &self.attribute,
            Channel::Vertex => &self.vertex,
        }
    }

    /// Read the global index stored at element position `element`.
    pub fn read_index(&self, element: usize) -> FormatResult<u64> {
        let width = self.index_width.bytes();
        let start = element.saturating_mul(width);
        match self.index.get(start..start.saturating_add(width)) {
            Some(bytes) => Ok(self.index_width.decode(bytes)),
            None => Err(FormatError::Truncated {
                offset: start,
                needed: width,
                available: self.index.len().saturating_sub(start),
            }),
        }
    }

    /// Write header plus buffers.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.header()?.write(writer)?;
        writer.write_all(&self.attribute)?;
        writer.write_all(&self.vertex)?;
        writer.write_all(&self.index)
    }
}

fn size_u32(len: usize) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("buffer size {} does not fit in 32 bits", len),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header_bytes(magic: u32, sizes: [u32; 3], width: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&magic.to_le_bytes());
        for s in sizes {
            data.extend_from_slice(&s.to_le_bytes());
        }
        data.extend_from_slice(&width.to_le_bytes());
        data
    }

    #[test]
    fn test_decode_header() {
        let data = header_bytes(BINFBX_MAGIC, [16, 24, 6], 2);
        let header = Header::decode(&mut ByteCursor::new(&data)).unwrap();
        assert_eq!(header.attribute_buffer_size, 16);
        assert_eq!(header.vertex_buffer_size, 24);
        assert_eq!(header.index_count, 6);
        assert_eq!(header.index_width, IndexWidth::U16);
        assert_eq!(header.index_buffer_len().unwrap(), 12);
    }

    #[test]
    fn test_bad_magic_is_invalid_format() {
        let data = header_bytes(0x2F, [0, 0, 0], 2);
        let err = Header::decode(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(err, FormatError::InvalidFormat { .. }));
    }

    #[test]
    fn test_odd_index_width_rejected() {
        let data = header_bytes(BINFBX_MAGIC, [0, 0, 0], 3);
        let err = Header::decode(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedIndexWidth { width: 3 }));
    }

    #[test]
    fn test_index_width_encode_decode_all_widths() {
        for width in [IndexWidth::U8, IndexWidth::U16, IndexWidth::U32, IndexWidth::U64] {
            let mut buf = vec![0u8; width.bytes()];
            width.encode(200, &mut buf);
            assert_eq!(width.decode(&buf), 200);
        }
    }

    #[test]
    fn test_header_derived_from_buffers() {
        let buffers = GlobalBuffers {
            attribute: vec![0; 8],
            vertex: vec![0; 12],
            index: vec![0; 12],
            index_width: IndexWidth::U32,
        };
        let header = buffers.header().unwrap();
        assert_eq!(header.index_count, 3);

        let mut out = Vec::new();
        buffers.write(&mut out).unwrap();
        assert_eq!(out.len(), HEADER_SIZE + 32);
    }

    #[test]
    fn test_read_index_past_end_is_truncated() {
        let buffers = GlobalBuffers {
            attribute: Vec::new(),
            vertex: Vec::new(),
            index: vec![1, 0, 2, 0],
            index_width: IndexWidth::U16,
        };
        assert_eq!(buffers.read_index(1).unwrap(), 2);
        assert!(matches!(
            buffers.read_index(2),
            Err(FormatError::Truncated { .. })
        ));
    }
}
