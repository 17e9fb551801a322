//! Material records.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use crate::cursor::ByteCursor;
use crate::error::{FormatError, FormatResult};
use crate::string::BinString;
use crate::uniform::UniformVariable;
use crate::write::BinWrite;

/// Leading word every material record must carry.
pub const MATERIAL_SENTINEL: u32 = 7;

/// Bit in `parameters[0]` the engine uses to route a material to a special
/// render pipeline. Only this bit is known; the rest round-trips opaquely.
pub const SPECIAL_PIPELINE_BIT: u32 = 0x8000_0000;

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: [u8; 8],
    pub name: BinString,
    /// Material definition (shader family) name.
    pub definition: BinString,
    pub path: BinString,
    /// Reserved parameter words, kept verbatim.
    pub parameters: [u32; 6],
    pub uniforms: Vec<UniformVariable>,
}

impl Material {
    pub fn decode(cursor: &mut ByteCursor<'_>) -> FormatResult<Self> {
        let offset = cursor.position();
        let sentinel = cursor.read_u32()?;
        if sentinel != MATERIAL_SENTINEL {
            return Err(FormatError::invalid(format!(
                "material at offset {} starts with {}, expected {}",
                offset, sentinel, MATERIAL_SENTINEL
            )));
        }
        let id = cursor.read_byte_array()?;
        let name = cursor.read_string()?;
        let definition = cursor.read_string()?;
        let path = cursor.read_string()?;
        let parameters = cursor.read_u32_array()?;

        let count = cursor.read_count()?;
        let mut uniforms = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            uniforms.push(UniformVariable::decode(cursor)?);
        }

        Ok(Self {
            id,
            name,
            definition,
            path,
            parameters,
            uniforms,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(MATERIAL_SENTINEL)?;
        writer.write_all(&self.id)?;
        writer.write_string(&self.name)?;
        writer.write_string(&self.definition)?;
        writer.write_string(&self.path)?;
        writer.write_u32s(&self.parameters)?;
        writer.write_count(self.uniforms.len())?;
        for uniform in &self.uniforms {
            uniform.write(writer)?;
        }
        Ok(())
    }

    pub fn uses_special_pipeline(&self) -> bool {
        self.parameters[0] & SPECIAL_PIPELINE_BIT != 0
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformVariable> {
        self.uniforms.iter().find(|u| u.name.display() == name)
    }
}

pub fn decode_materials(cursor: &mut ByteCursor<'_>) -> FormatResult<Vec<Material>> {
    let count = cursor.read_count()?;
    let mut materials = Vec::with_capacity(count.min(cursor.remaining()));
    for _ in 0..count {
        materials.push(Material::decode(cursor)?);
    }
    Ok(materials)
}

pub fn write_materials<W: Write>(writer: &mut W, materials: &[Material]) -> io::Result<()> {
    writer.write_count(materials.len())?;
    for material in materials {
        material.write(writer)?;
    }
    Ok(())
}
