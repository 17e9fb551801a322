//! Local-buffer reconstruction.
//!
//! Meshes index into vertex pools shared by the whole file. At decode time
//! each mesh gets its own compacted copy: every distinct global vertex it
//! references is copied once, in first-use order, and its triangle corners are
//! rewritten to 0-based local indices with the same element width.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::attribute::{channel_stride, AttributeInfo, Channel};
use crate::error::{FormatError, FormatResult};
use crate::header::{GlobalBuffers, IndexWidth};

/// Mesh-owned, deduplicated vertex and index data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBuffers {
    /// Vertex records per channel, indexed by [`Channel::index`].
    pub channels: [Vec<u8>; 2],
    /// Byte stride of each channel's records.
    pub strides: [usize; 2],
    /// Local triangle corner indices, `index_width` bytes each.
    pub indices: Vec<u8>,
    pub index_width: IndexWidth,
    /// Number of distinct vertices referenced by the mesh.
    pub vertex_count: usize,
}

impl LocalBuffers {
    pub fn channel(&self, channel: Channel) -> &[u8] {
        &self.channels[channel.index()]
    }

    pub fn stride(&self, channel: Channel) -> usize {
        self.strides[channel.index()]
    }

    /// Number of triangle corners.
    pub fn corner_count(&self) -> usize {
        self.indices.len() / self.index_width.bytes()
    }

    /// Local index stored at `corner`, if in range.
    pub fn index(&self, corner: usize) -> Option<u64> {
        let width = self.index_width.bytes();
        let start = corner.checked_mul(width)?;
        self.indices
            .get(start..start + width)
            .map(|bytes| self.index_width.decode(bytes))
    }

    /// Iterator over local triangle indices.
    pub fn triangles(&self) -> impl Iterator<Item = [u64; 3]> + '_ {
        let width = self.index_width.bytes();
        self.indices.chunks_exact(width * 3).map(move |tri| {
            [
                self.index_width.decode(&tri[..width]),
                self.index_width.decode(&tri[width..2 * width]),
                self.index_width.decode(&tri[2 * width..]),
            ]
        })
    }

    /// Vertex record of `vertex` in `channel`.
    pub fn vertex(&self, channel: Channel, vertex: usize) -> Option<&[u8]> {
        let stride = self.stride(channel);
        let start = vertex.checked_mul(stride)?;
        self.channel(channel).get(start..start + stride)
    }
}

/// Where a mesh's data lives inside the global buffers.
#[derive(Debug, Clone, Copy)]
pub struct MeshSource<'a> {
    pub attributes: &'a [AttributeInfo],
    pub triangle_count: u32,
    /// Byte offsets into the attribute and vertex buffers.
    pub vertex_buffer_offsets: [u32; 2],
    /// Offset into the index buffer, in index elements.
    pub index_buffer_offset: u32,
}

/// Build the compacted local buffers for one mesh.
pub fn reconstruct(
    source: MeshSource<'_>,
    buffers: &GlobalBuffers,
) -> FormatResult<LocalBuffers> {
    let strides = Channel::ALL.map(|channel| channel_stride(source.attributes, channel));
    let width = buffers.index_width;
    let corners = source.triangle_count as usize * 3;

    let first = source.index_buffer_offset as usize;
    let available = buffers.index_count().saturating_sub(first);
    if corners > available {
        return Err(FormatError::Truncated {
            offset: first * width.bytes(),
            needed: corners * width.bytes(),
            available: available * width.bytes(),
        });
    }

    let mut remap: HashMap<u64, u64> = HashMap::new();
    let mut channels: [Vec<u8>; 2] = [Vec::new(), Vec::new()];
    let mut indices = vec![0u8; corners * width.bytes()];

    for (corner, slot) in indices.chunks_exact_mut(width.bytes()).enumerate() {
        let global = buffers.read_index(first + corner)?;
        let next = remap.len() as u64;
        let local = match remap.entry(global) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                for channel in Channel::ALL {
                    let stride = strides[channel.index()];
                    if stride == 0 {
                        continue;
                    }
                    let offset = source.vertex_buffer_offsets[channel.index()] as usize;
                    let record = vertex_record(buffers.channel(channel), offset, global, stride)?;
                    channels[channel.index()].extend_from_slice(record);
                }
                *entry.insert(next)
            }
        };
        width.encode(local, slot);
    }

    Ok(LocalBuffers {
        channels,
        strides,
        indices,
        index_width: width,
        vertex_count: remap.len(),
    })
}

/// Slice out the `stride`-byte record of vertex `global` at `offset`.
fn vertex_record(pool: &[u8], offset: usize, global: u64, stride: usize) -> FormatResult<&[u8]> {
    let start = usize::try_from(global)
        .ok()
        .and_then(|g| g.checked_mul(stride))
        .and_then(|o| o.checked_add(offset));
    start
        .and_then(|s| pool.get(s..s.checked_add(stride)?))
        .ok_or(FormatError::Truncated {
            offset: start.unwrap_or(usize::MAX),
            needed: stride,
            available: start.map_or(0, |s| pool.len().saturating_sub(s)),
        })
}
