//! Shader uniform variables: a name, a 32-bit type tag and a payload whose
//! shape is fixed by the tag.

use byteorder::{LittleEndian, WriteBytesExt};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

use crate::cursor::ByteCursor;
use crate::error::{FormatError, FormatResult};
use crate::string::BinString;
use crate::write::BinWrite;

/// Type tags as stored on disk.
pub mod tag {
    pub const FLOAT: u32 = 0x00;
    pub const RANGE: u32 = 0x01;
    pub const VECTOR: u32 = 0x02;
    pub const COLOR: u32 = 0x03;
    pub const NO_PAYLOAD: u32 = 0x04;
    pub const TEXTURE_SAMPLER: u32 = 0x08;
    pub const TEXTURE_MAP: u32 = 0x09;
    pub const BOOLEAN: u32 = 0x0C;
}

/// Uniform payload. One variant per type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Range([f32; 2]),
    Vector([f32; 3]),
    Color([f32; 4]),
    /// Raw 32-bit word; any non-zero value reads as true.
    Boolean(u32),
    TextureMap(BinString),
    TextureSampler,
    NoPayload,
}

/// Payload kind, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UniformKind {
    Float,
    Range,
    Vector,
    Color,
    Boolean,
    TextureMap,
    TextureSampler,
    NoPayload,
}

impl UniformValue {
    pub fn tag(&self) -> u32 {
        match self {
            UniformValue::Float(_) => tag::FLOAT,
            UniformValue::Range(_) => tag::RANGE,
            UniformValue::Vector(_) => tag::VECTOR,
            UniformValue::Color(_) => tag::COLOR,
            UniformValue::Boolean(_) => tag::BOOLEAN,
            UniformValue::TextureMap(_) => tag::TEXTURE_MAP,
            UniformValue::TextureSampler => tag::TEXTURE_SAMPLER,
            UniformValue::NoPayload => tag::NO_PAYLOAD,
        }
    }

    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Range(_) => UniformKind::Range,
            UniformValue::Vector(_) => UniformKind::Vector,
            UniformValue::Color(_) => UniformKind::Color,
            UniformValue::Boolean(_) => UniformKind::Boolean,
            UniformValue::TextureMap(_) => UniformKind::TextureMap,
            UniformValue::TextureSampler => UniformKind::TextureSampler,
            UniformValue::NoPayload => UniformKind::NoPayload,
        }
    }

    /// Encoded payload size in bytes (excluding name and tag).
    pub fn payload_len(&self) -> usize {
        match self {
            UniformValue::Float(_) | UniformValue::Boolean(_) => 4,
            UniformValue::Range(_) => 8,
            UniformValue::Vector(_) => 12,
            UniformValue::Color(_) => 16,
            UniformValue::TextureMap(path) => 4 + path.len(),
            UniformValue::TextureSampler | UniformValue::NoPayload => 0,
        }
    }

    /// Decode the payload that follows `tag`. The cursor must sit right after
    /// the tag word.
    fn decode_payload(tag: u32, cursor: &mut ByteCursor<'_>) -> FormatResult<Self> {
        Ok(match tag {
            tag::FLOAT => UniformValue::Float(cursor.read_f32()?),
            tag::RANGE => UniformValue::Range(cursor.read_f32_array()?),
            tag::VECTOR => UniformValue::Vector(cursor.read_f32_array()?),
            tag::COLOR => UniformValue::Color(cursor.read_f32_array()?),
            tag::BOOLEAN => UniformValue::Boolean(cursor.read_u32()?),
            tag::TEXTURE_MAP => UniformValue::TextureMap(cursor.read_string()?),
            tag::TEXTURE_SAMPLER => UniformValue::TextureSampler,
            tag::NO_PAYLOAD => UniformValue::NoPayload,
            _ => {
                return Err(FormatError::UnknownUniformType {
                    tag,
                    offset: cursor.position() - 4,
                })
            }
        })
    }

    fn write_payload<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            UniformValue::Float(v) => writer.write_f32::<LittleEndian>(*v),
            UniformValue::Range(v) => writer.write_f32s(v),
            UniformValue::Vector(v) => writer.write_f32s(v),
            UniformValue::Color(v) => writer.write_f32s(v),
            UniformValue::Boolean(v) => writer.write_u32::<LittleEndian>(*v),
            UniformValue::TextureMap(path) => writer.write_string(path),
            UniformValue::TextureSampler | UniformValue::NoPayload => Ok(()),
        }
    }
}

impl fmt::Display for UniformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformValue::Float(v) => write!(f, "float {}", v),
            UniformValue::Range([a, b]) => write!(f, "range [{}, {}]", a, b),
            UniformValue::Vector([x, y, z]) => write!(f, "vector ({}, {}, {})", x, y, z),
            UniformValue::Color([r, g, b, a]) => write!(f, "color ({}, {}, {}, {})", r, g, b, a),
            UniformValue::Boolean(v) => write!(f, "boolean {}", *v != 0),
            UniformValue::TextureMap(path) => write!(f, "texture {}", path),
            UniformValue::TextureSampler => f.write_str("sampler"),
            UniformValue::NoPayload => f.write_str("(no payload)"),
        }
    }
}

/// A named uniform variable attached to a material.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformVariable {
    pub name: BinString,
    pub value: UniformValue,
}

impl UniformVariable {
    pub fn decode(cursor: &mut ByteCursor<'_>) -> FormatResult<Self> {
        let name = cursor.read_string()?;
        let tag = cursor.read_u32()?;
        let value = UniformValue::decode_payload(tag, cursor)?;
        Ok(Self { name, value })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_string(&self.name)?;
        writer.write_u32::<LittleEndian>(self.value.tag())?;
        self.value.write_payload(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode(var: &UniformVariable) -> Vec<u8> {
        let mut buf = Vec::new();
        var.write(&mut buf).unwrap();
        buf
    }

    fn all_values() -> Vec<UniformValue> {
        vec![
            UniformValue::Float(0.5),
            UniformValue::Range([0.0, 1.0]),
            UniformValue::Vector([1.0, 2.0, 3.0]),
            UniformValue::Color([1.0, 0.5, 0.25, 1.0]),
            UniformValue::Boolean(1),
            UniformValue::TextureMap(BinString::from("runtimedata/textures/a.dds\0")),
            UniformValue::TextureSampler,
            UniformValue::NoPayload,
        ]
    }

    #[test]
    fn test_payload_size_matches_tag() {
        for value in all_values() {
            let var = UniformVariable {
                name: BinString::from("g_param"),
                value: value.clone(),
            };
            let bytes = encode(&var);
            // name (4 + 7) + tag (4) + payload
            assert_eq!(bytes.len(), 15 + value.payload_len(), "{:?}", value.kind());

            let tag = u32::from_le_bytes([bytes[11], bytes[12], bytes[13], bytes[14]]);
            assert_eq!(tag, value.tag());

            let mut cursor = ByteCursor::new(&bytes);
            assert_eq!(UniformVariable::decode(&mut cursor).unwrap(), var);
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn test_zero_payload_tags_consume_nothing() {
        let mut bytes = encode(&UniformVariable {
            name: BinString::from("s"),
            value: UniformValue::TextureSampler,
        });
        bytes.extend_from_slice(&0xDEADBEEFu32.to_le_bytes());

        let mut cursor = ByteCursor::new(&bytes);
        UniformVariable::decode(&mut cursor).unwrap();
        assert_eq!(cursor.read_u32().unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.push(b'x');
        bytes.extend_from_slice(&0x0Bu32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]);

        let err = UniformVariable::decode(&mut ByteCursor::new(&bytes)).unwrap_err();
        match err {
            FormatError::UnknownUniformType { tag, offset } => {
                assert_eq!(tag, 0x0B);
                assert_eq!(offset, 5);
            }
            other => panic!("expected unknown uniform type, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(UniformValue::Boolean(0).to_string(), "boolean false");
        assert_eq!(UniformValue::Range([0.0, 2.0]).to_string(), "range [0, 2]");
    }
}
