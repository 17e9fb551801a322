//! Model-wide scalar and vector metadata stored between the joint table and
//! the materials.

use byteorder::{LittleEndian, WriteBytesExt};
use serde::Serialize;
use std::io::{self, Write};

use crate::cursor::ByteCursor;
use crate::error::FormatResult;
use crate::write::BinWrite;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalParameters {
    /// Two words of unknown meaning, kept verbatim.
    pub reserved: [u32; 2],
    pub scale: f32,
    /// Screen-size thresholds at which each LOD is swapped in.
    pub lod_thresholds: Vec<f32>,
    /// `-1.0` when the model is mirrored, `1.0` otherwise.
    pub mirror_sign: f32,
    /// Center (xyz) and radius.
    pub bounding_sphere: [f32; 4],
    /// Min (xyz) then max (xyz).
    pub bounding_box: [f32; 6],
    pub lod_count: u32,
}

impl GlobalParameters {
    pub fn decode(cursor: &mut ByteCursor<'_>) -> FormatResult<Self> {
        Ok(Self {
            reserved: cursor.read_u32_array()?,
            scale: cursor.read_f32()?,
            lod_thresholds: cursor.read_counted_f32s()?,
            mirror_sign: cursor.read_f32()?,
            bounding_sphere: cursor.read_f32_array()?,
            bounding_box: cursor.read_f32_array()?,
            lod_count: cursor.read_u32()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32s(&self.reserved)?;
        writer.write_f32::<LittleEndian>(self.scale)?;
        writer.write_counted_f32s(&self.lod_thresholds)?;
        writer.write_f32::<LittleEndian>(self.mirror_sign)?;
        writer.write_f32s(&self.bounding_sphere)?;
        writer.write_f32s(&self.bounding_box)?;
        writer.write_u32::<LittleEndian>(self.lod_count)
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror_sign < 0.0
    }
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self {
            reserved: [0; 2],
            scale: 1.0,
            lod_thresholds: Vec::new(),
            mirror_sign: 1.0,
            bounding_sphere: [0.0; 4],
            bounding_box: [0.0; 6],
            lod_count: 1,
        }
    }
}
