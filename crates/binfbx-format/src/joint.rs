//! Bind-skeleton joints.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use crate::cursor::ByteCursor;
use crate::error::FormatResult;
use crate::string::BinString;
use crate::write::BinWrite;

/// Parent index marking a root joint.
pub const ROOT_PARENT: i32 = -1;

/// One joint of the bind skeleton. Written back exactly as read.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: BinString,
    /// 3x3 rotation rows followed by the translation (4x3, row major).
    pub matrix: [f32; 12],
    /// Envelope tail position.
    pub envelope: [f32; 3],
    pub radius: f32,
    pub parent: i32,
}

impl Joint {
    pub fn decode(cursor: &mut ByteCursor<'_>) -> FormatResult<Self> {
        Ok(Self {
            name: cursor.read_string()?,
            matrix: cursor.read_f32_array()?,
            envelope: cursor.read_f32_array()?,
            radius: cursor.read_f32()?,
            parent: cursor.read_i32()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_string(&self.name)?;
        writer.write_f32s(&self.matrix)?;
        writer.write_f32s(&self.envelope)?;
        writer.write_f32::<LittleEndian>(self.radius)?;
        writer.write_i32::<LittleEndian>(self.parent)
    }

    pub fn is_root(&self) -> bool {
        self.parent == ROOT_PARENT
    }

    /// Translation part of the bind matrix.
    pub fn translation(&self) -> [f32; 3] {
        [self.matrix[9], self.matrix[10], self.matrix[11]]
    }
}

/// Decode a counted joint table.
pub fn decode_joints(cursor: &mut ByteCursor<'_>) -> FormatResult<Vec<Joint>> {
    let count = cursor.read_count()?;
    let mut joints = Vec::with_capacity(count.min(cursor.remaining()));
    for _ in 0..count {
        joints.push(Joint::decode(cursor)?);
    }
    Ok(joints)
}

pub fn write_joints<W: Write>(writer: &mut W, joints: &[Joint]) -> io::Result<()> {
    writer.write_count(joints.len())?;
    for joint in joints {
        joint.write(writer)?;
    }
    Ok(())
}
