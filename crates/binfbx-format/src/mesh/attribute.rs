//! Vertex attribute descriptors.

use serde::Serialize;
use std::fmt;

use crate::cursor::ByteCursor;
use crate::error::FormatResult;

/// One of the two global vertex pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    /// Auxiliary attribute buffer (first buffer after the header).
    Attribute,
    /// Position/normal buffer (second buffer after the header).
    Vertex,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Attribute, Channel::Vertex];

    /// Slot used by per-channel arrays such as the mesh buffer offsets.
    pub fn index(self) -> usize {
        match self {
            Channel::Attribute => 0,
            Channel::Vertex => 1,
        }
    }

    /// Map an on-disk storage selector to its channel. Selector 0 addresses the
    /// vertex buffer and selector 1 the attribute buffer.
    pub fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            0 => Some(Channel::Vertex),
            1 => Some(Channel::Attribute),
            _ => None,
        }
    }
}

/// Element format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeFormat {
    Float3,
    Byte4Unorm,
    Byte4Uint,
    Short2Sint,
    Short4Sint,
    Short4Uint,
    /// A tag with no known size.
    Unknown(u8),
}

impl AttributeFormat {
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0x02 => AttributeFormat::Float3,
            0x04 => AttributeFormat::Byte4Unorm,
            0x05 => AttributeFormat::Byte4Uint,
            0x07 => AttributeFormat::Short2Sint,
            0x08 => AttributeFormat::Short4Sint,
            0x0D => AttributeFormat::Short4Uint,
            other => AttributeFormat::Unknown(other),
        }
    }

    /// Size of one element in bytes, `None` for unknown formats.
    pub fn size(self) -> Option<usize> {
        match self {
            AttributeFormat::Float3 => Some(12),
            AttributeFormat::Byte4Unorm
            | AttributeFormat::Byte4Uint
            | AttributeFormat::Short2Sint => Some(4),
            AttributeFormat::Short4Sint | AttributeFormat::Short4Uint => Some(8),
            AttributeFormat::Unknown(_) => None,
        }
    }
}

/// Semantic of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeUsage {
    Position,
    Normal,
    TexCoord,
    Tangent,
    Index,
    Weight,
    Unknown(u8),
}

impl AttributeUsage {
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0x0 => AttributeUsage::Position,
            0x1 => AttributeUsage::Normal,
            0x2 => AttributeUsage::TexCoord,
            0x3 => AttributeUsage::Tangent,
            0x5 => AttributeUsage::Index,
            0x6 => AttributeUsage::Weight,
            other => AttributeUsage::Unknown(other),
        }
    }
}

/// Raw 4-byte attribute descriptor. Fields are kept as read so unknown values
/// round-trip; typed views are available through the accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeInfo {
    pub selector: u8,
    pub format: u8,
    pub usage: u8,
    pub reserved: u8,
}

impl AttributeInfo {
    pub fn decode(cursor: &mut ByteCursor<'_>) -> FormatResult<Self> {
        let [selector, format, usage, reserved] = cursor.read_byte_array()?;
        Ok(Self {
            selector,
            format,
            usage,
            reserved,
        })
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.selector, self.format, self.usage, self.reserved]
    }

    pub fn channel(&self) -> Option<Channel> {
        Channel::from_selector(self.selector)
    }

    pub fn format(&self) -> AttributeFormat {
        AttributeFormat::from_tag(self.format)
    }

    pub fn usage(&self) -> AttributeUsage {
        AttributeUsage::from_tag(self.usage)
    }

    /// Bytes this attribute adds to its channel's stride.
    pub fn stride_contribution(&self) -> usize {
        match self.channel() {
            Some(_) => self.format().size().unwrap_or(0),
            None => 0,
        }
    }
}

impl fmt::Display for AttributeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = match self.channel() {
            Some(Channel::Attribute) => "attribute",
            Some(Channel::Vertex) => "vertex",
            None => "?",
        };
        write!(f, "{:?} {:?} in {} buffer", self.usage(), self.format(), channel)?;
        if let AttributeFormat::Unknown(tag) = self.format() {
            write!(f, " [unknown format 0x{:02X}, no stride]", tag)?;
        }
        Ok(())
    }
}

/// Stride of `channel`: the sum of the sizes of every attribute stored in it.
pub fn channel_stride(attributes: &[AttributeInfo], channel: Channel) -> usize {
    attributes
        .iter()
        .filter(|a| a.channel() == Some(channel))
        .map(AttributeInfo::stride_contribution)
        .sum()
}

/// Byte offset of `attributes[position]` within its channel's vertex record.
pub fn attribute_offset(attributes: &[AttributeInfo], position: usize) -> usize {
    let channel = attributes[position].channel();
    attributes[..position]
        .iter()
        .filter(|a| a.channel() == channel)
        .map(AttributeInfo::stride_contribution)
        .sum()
}
