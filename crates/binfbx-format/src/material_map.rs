//! Per-group material index tables.
//!
//! A material map holds one material index per mesh of its group, in mesh
//! order. Alternate maps are named variants aligned with group 0 only.

use std::io::{self, Write};

use crate::cursor::ByteCursor;
use crate::error::FormatResult;
use crate::string::BinString;
use crate::write::BinWrite;

pub fn decode_material_map(cursor: &mut ByteCursor<'_>) -> FormatResult<Vec<u32>> {
    cursor.read_counted_u32s()
}

pub fn write_material_map<W: Write>(writer: &mut W, map: &[u32]) -> io::Result<()> {
    writer.write_counted_u32s(map)
}

/// A named alternate material assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateMaterialMap {
    pub name: BinString,
    pub materials: Vec<u32>,
}

impl AlternateMaterialMap {
    pub fn decode(cursor: &mut ByteCursor<'_>) -> FormatResult<Self> {
        Ok(Self {
            name: cursor.read_string()?,
            materials: cursor.read_counted_u32s()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_string(&self.name)?;
        writer.write_counted_u32s(&self.materials)
    }
}

pub fn decode_alternate_maps(
    cursor: &mut ByteCursor<'_>,
) -> FormatResult<Vec<AlternateMaterialMap>> {
    let count = cursor.read_count()?;
    let mut maps = Vec::with_capacity(count.min(cursor.remaining()));
    for _ in 0..count {
        maps.push(AlternateMaterialMap::decode(cursor)?);
    }
    Ok(maps)
}

pub fn write_alternate_maps<W: Write>(
    writer: &mut W,
    maps: &[AlternateMaterialMap],
) -> io::Result<()> {
    writer.write_count(maps.len())?;
    for map in maps {
        map.write(writer)?;
    }
    Ok(())
}
