//! Mesh records.
//!
//! A mesh is one drawable unit at a given LOD inside one of the two mesh
//! groups. Its on-disk record only points into the global buffers; the
//! decoder also builds a compacted [`LocalBuffers`] copy so the mesh can be
//! inspected, measured and removed without touching any other mesh.

mod attribute;
mod reconstruct;


use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use crate::cursor::ByteCursor;
use crate::error::FormatResult;
use crate::header::GlobalBuffers;
use crate::write::BinWrite;

pub use attribute::{
    attribute_offset, channel_stride, AttributeFormat, AttributeInfo, AttributeUsage, Channel,
};
pub use reconstruct::{reconstruct, LocalBuffers, MeshSource};

/// Identity of a mesh: its group, its LOD and its position among the
/// consecutive meshes of that LOD. Assigned at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MeshId {
    pub group: u32,
    pub lod: u32,
    pub index: u32,
}

impl MeshId {
    pub fn new(group: u32, lod: u32, index: u32) -> Self {
        Self { group, lod, index }
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group {} lod {} #{}", self.group, self.lod, self.index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub id: MeshId,
    pub vertex_count: u32,
    pub triangle_count: u32,
    /// Byte offsets into the attribute and vertex buffers, in that order.
    pub vertex_buffer_offsets: [u32; 2],
    /// First triangle corner, in index elements.
    pub index_buffer_offset: u32,
    /// Partially understood flag words, kept verbatim.
    pub flags: [u32; 2],
    pub bounding_sphere: [f32; 4],
    pub bounding_box: [f32; 6],
    pub attributes: Vec<AttributeInfo>,
    /// Joint palette entry used by rigid meshes, -1 when unused.
    pub joint_palette: i32,
    pub reserved0: f32,
    /// Non-zero for rigid meshes, zero for skinned ones.
    pub rigid: u8,
    pub reserved1: f32,
    pub local: LocalBuffers,
}

impl Mesh {
    /// Decode one mesh record and build its local buffers. The returned mesh
    /// carries `group` and `index` 0; the group decoder assigns them.
    pub fn decode(cursor: &mut ByteCursor<'_>, buffers: &GlobalBuffers) -> FormatResult<Self> {
        let lod = cursor.read_u32()?;
        let vertex_count = cursor.read_u32()?;
        let triangle_count = cursor.read_u32()?;
        let vertex_buffer_offsets = cursor.read_u32_array()?;
        let index_buffer_offset = cursor.read_u32()?;
        let flags0 = cursor.read_u32()?;
        let bounding_sphere = cursor.read_f32_array()?;
        let bounding_box = cursor.read_f32_array()?;
        let flags1 = cursor.read_u32()?;

        // Attribute count is a single byte, unlike every other array.
        let attribute_count = cursor.read_u8()?;
        let attributes = (0..attribute_count)
            .map(|_| AttributeInfo::decode(cursor))
            .collect::<FormatResult<Vec<_>>>()?;

        let joint_palette = cursor.read_i32()?;
        let reserved0 = cursor.read_f32()?;
        let rigid = cursor.read_u8()?;
        let reserved1 = cursor.read_f32()?;

        let local = reconstruct(
            MeshSource {
                attributes: &attributes,
                triangle_count,
                vertex_buffer_offsets,
                index_buffer_offset,
            },
            buffers,
        )?;

        Ok(Self {
            id: MeshId::new(0, lod, 0),
            vertex_count,
            triangle_count,
            vertex_buffer_offsets,
            index_buffer_offset,
            flags: [flags0, flags1],
            bounding_sphere,
            bounding_box,
            attributes,
            joint_palette,
            reserved0,
            rigid,
            reserved1,
            local,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.id.lod)?;
        writer.write_u32::<LittleEndian>(self.vertex_count)?;
        writer.write_u32::<LittleEndian>(self.triangle_count)?;
        writer.write_u32s(&self.vertex_buffer_offsets)?;
        writer.write_u32::<LittleEndian>(self.index_buffer_offset)?;
        writer.write_u32::<LittleEndian>(self.flags[0])?;
        writer.write_f32s(&self.bounding_sphere)?;
        writer.write_f32s(&self.bounding_box)?;
        writer.write_u32::<LittleEndian>(self.flags[1])?;

        let attribute_count = u8::try_from(self.attributes.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "mesh {} has {} attributes, at most 255 fit",
                    self.id,
                    self.attributes.len()
                ),
            )
        })?;
        writer.write_u8(attribute_count)?;
        for attribute in &self.attributes {
            writer.write_all(&attribute.to_bytes())?;
        }

        writer.write_i32::<LittleEndian>(self.joint_palette)?;
        writer.write_f32::<LittleEndian>(self.reserved0)?;
        writer.write_u8(self.rigid)?;
        writer.write_f32::<LittleEndian>(self.reserved1)
    }

    pub fn is_rigid(&self) -> bool {
        self.rigid != 0
    }

    /// Number of distinct vertices the mesh's triangles reference.
    pub fn local_vertex_count(&self) -> usize {
        self.local.vertex_count
    }

    /// Local index of triangle corner `corner`.
    pub fn local_index(&self, corner: usize) -> Option<u64> {
        self.local.index(corner)
    }

    pub fn stride(&self, channel: Channel) -> usize {
        self.local.stride(channel)
    }

    /// Attributes whose format tag has no known size.
    pub fn unknown_formats(&self) -> Vec<u8> {
        self.attributes
            .iter()
            .filter_map(|a| match a.format() {
                AttributeFormat::Unknown(tag) => Some(tag),
                _ => None,
            })
            .collect()
    }

    /// Location of the FLOAT3 position attribute: channel and byte offset
    /// within the channel's vertex record.
    pub fn position_attribute(&self) -> Option<(Channel, usize)> {
        let position = self.attributes.iter().position(|a| {
            a.usage() == AttributeUsage::Position && a.format() == AttributeFormat::Float3
        })?;
        let channel = self.attributes[position].channel()?;
        Some((channel, attribute_offset(&self.attributes, position)))
    }

    /// Local vertex positions, or `None` without a FLOAT3 position attribute.
    pub fn positions(&self) -> Option<Vec<[f32; 3]>> {
        let (channel, offset) = self.position_attribute()?;
        let positions = (0..self.local.vertex_count)
            .filter_map(|v| self.local.vertex(channel, v))
            .map(|record| {
                let mut xyz = [0.0f32; 3];
                LittleEndian::read_f32_into(&record[offset..offset + 12], &mut xyz);
                xyz
            })
            .collect();
        Some(positions)
    }
}

/// Decode a counted mesh array for `group`, assigning each mesh its
/// position among the meshes of the same LOD in the group. Positions count
/// per LOD across the whole group, so identities stay unique even when a LOD
/// reappears after another one.
pub fn decode_mesh_group(
    cursor: &mut ByteCursor<'_>,
    group: u32,
    buffers: &GlobalBuffers,
) -> FormatResult<Vec<Mesh>> {
    let count = cursor.read_count()?;
    let mut meshes: Vec<Mesh> = Vec::with_capacity(count.min(cursor.remaining()));
    let mut next_index: HashMap<u32, u32> = HashMap::new();
    for _ in 0..count {
        let mut mesh = Mesh::decode(cursor, buffers)?;
        let slot = next_index.entry(mesh.id.lod).or_insert(0);
        mesh.id.group = group;
        mesh.id.index = *slot;
        *slot += 1;

        for tag in mesh.unknown_formats() {
            tracing::warn!(
                mesh = %mesh.id,
                tag,
                "attribute format has no known size; it adds nothing to the channel stride"
            );
        }
        meshes.push(mesh);
    }
    Ok(meshes)
}

pub fn write_mesh_group<W: Write>(writer: &mut W, meshes: &[Mesh]) -> io::Result<()> {
    writer.write_count(meshes.len())?;
    for mesh in meshes {
        mesh.write(writer)?;
    }
    Ok(())
}
