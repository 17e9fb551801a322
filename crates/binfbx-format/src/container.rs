//! The top-level container: decode, encode and structural edits.

use std::io::{self, Write};

use crate::cursor::ByteCursor;
use crate::error::{FormatError, FormatResult};
use crate::header::{GlobalBuffers, Header};
use crate::joint::{decode_joints, write_joints, Joint};
use crate::material::{decode_materials, write_materials, Material};
use crate::material_map::{
    decode_alternate_maps, decode_material_map, write_alternate_maps, write_material_map,
    AlternateMaterialMap,
};
use crate::mesh::{decode_mesh_group, write_mesh_group, Mesh, MeshId};
use crate::params::GlobalParameters;
use crate::trailer::{Trailer, TrailerUpdate};

/// Number of mesh groups in every container.
pub const GROUP_COUNT: usize = 2;

/// Meshes of one group together with the material map aligned to them.
/// Entry `k` of `material_map` belongs to `meshes[k]`; the two only change
/// together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshGroup {
    meshes: Vec<Mesh>,
    material_map: Vec<u32>,
}

impl MeshGroup {
    /// Pair meshes with their material map. Fails when the lengths differ.
    pub fn new(meshes: Vec<Mesh>, material_map: Vec<u32>) -> FormatResult<Self> {
        if meshes.len() != material_map.len() {
            return Err(FormatError::invalid(format!(
                "material map has {} entries for {} meshes",
                material_map.len(),
                meshes.len()
            )));
        }
        Ok(Self {
            meshes,
            material_map,
        })
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn material_map(&self) -> &[u32] {
        &self.material_map
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Position of the mesh with the given LOD and position within that LOD.
    pub fn position_of(&self, lod: u32, index: u32) -> Option<usize> {
        self.meshes
            .iter()
            .position(|m| m.id.lod == lod && m.id.index == index)
    }

    /// Iterate meshes with their material index.
    pub fn iter(&self) -> impl Iterator<Item = (&Mesh, u32)> + '_ {
        self.meshes.iter().zip(self.material_map.iter().copied())
    }

    fn remove_at(&mut self, position: usize) -> (Mesh, u32) {
        (
            self.meshes.remove(position),
            self.material_map.remove(position),
        )
    }
}

/// What a successful removal took out of the container.
#[derive(Debug, Clone)]
pub struct RemovedMesh {
    pub mesh: Mesh,
    pub material: u32,
    pub alternate: Option<AlternateMaterialMap>,
    pub trailer: TrailerUpdate,
}

/// Result of [`Container::remove_mesh`].
#[derive(Debug, Clone)]
pub enum RemovalOutcome {
    Removed(Box<RemovedMesh>),
    /// No mesh has this identity; the container is unchanged.
    NotFound(MeshId),
}

impl RemovalOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, RemovalOutcome::Removed(_))
    }

    /// For callers that treat a missing mesh as fatal.
    pub fn into_result(self) -> FormatResult<RemovedMesh> {
        match self {
            RemovalOutcome::Removed(removed) => Ok(*removed),
            RemovalOutcome::NotFound(id) => Err(FormatError::MeshNotFound {
                group: id.group,
                lod: id.lod,
                index: id.index,
            }),
        }
    }
}

/// A fully decoded container.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub buffers: GlobalBuffers,
    pub joints: Vec<Joint>,
    pub parameters: GlobalParameters,
    pub materials: Vec<Material>,
    groups: [MeshGroup; GROUP_COUNT],
    alternate_material_maps: Vec<AlternateMaterialMap>,
    pub trailer: Trailer,
    /// Bytes found after the trailer, re-emitted verbatim.
    pub trailing: Vec<u8>,
}

impl Container {
    /// Decode a complete, fully buffered container.
    pub fn decode(data: &[u8]) -> FormatResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let header = Header::decode(&mut cursor)?;
        let buffers = GlobalBuffers::decode(&mut cursor, &header)?;
        tracing::debug!(
            offset = cursor.position(),
            attribute_bytes = buffers.attribute.len(),
            vertex_bytes = buffers.vertex.len(),
            indices = buffers.index_count(),
            "decoded global buffers"
        );

        let joints = decode_joints(&mut cursor)?;
        let parameters = GlobalParameters::decode(&mut cursor)?;
        tracing::debug!(offset = cursor.position(), joints = joints.len(), "decoded skeleton");

        let materials = decode_materials(&mut cursor)?;
        let primary_map = decode_material_map(&mut cursor)?;
        let alternate_material_maps = decode_alternate_maps(&mut cursor)?;
        let secondary_map = decode_material_map(&mut cursor)?;
        tracing::debug!(
            offset = cursor.position(),
            materials = materials.len(),
            alternates = alternate_material_maps.len(),
            "decoded materials"
        );

        let group0 = decode_mesh_group(&mut cursor, 0, &buffers)?;
        let group1 = decode_mesh_group(&mut cursor, 1, &buffers)?;
        let groups = [
            MeshGroup::new(group0, primary_map)?,
            MeshGroup::new(group1, secondary_map)?,
        ];
        tracing::debug!(
            offset = cursor.position(),
            group0 = groups[0].len(),
            group1 = groups[1].len(),
            "decoded meshes"
        );

        let trailer = Trailer::decode(&mut cursor)?;
        let trailing = cursor.take_rest().to_vec();
        if !trailing.is_empty() {
            tracing::warn!(
                bytes = trailing.len(),
                offset = data.len() - trailing.len(),
                "unexpected data after trailer; kept verbatim"
            );
        }

        Ok(Self {
            buffers,
            joints,
            parameters,
            materials,
            groups,
            alternate_material_maps,
            trailer,
            trailing,
        })
    }

    /// Serialize the container in file order.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.buffers.write(writer)?;
        write_joints(writer, &self.joints)?;
        self.parameters.write(writer)?;
        write_materials(writer, &self.materials)?;
        write_material_map(writer, &self.groups[0].material_map)?;
        write_alternate_maps(writer, &self.alternate_material_maps)?;
        write_material_map(writer, &self.groups[1].material_map)?;
        for group in &self.groups {
            write_mesh_group(writer, &group.meshes)?;
        }
        self.trailer.write(writer)?;
        writer.write_all(&self.trailing)
    }

    /// Serialize to a new buffer.
    pub fn to_bytes(&self) -> FormatResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    pub fn group(&self, group: usize) -> Option<&MeshGroup> {
        self.groups.get(group)
    }

    pub fn groups(&self) -> &[MeshGroup; GROUP_COUNT] {
        &self.groups
    }

    pub fn alternate_material_maps(&self) -> &[AlternateMaterialMap] {
        &self.alternate_material_maps
    }

    /// Every mesh, group 0 first, in decode order.
    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> + '_ {
        self.groups.iter().flat_map(|g| g.meshes.iter())
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        let group = self.groups.get(id.group as usize)?;
        group.position_of(id.lod, id.index).map(|k| &group.meshes[k])
    }

    /// Material assigned to the mesh at `position` in `group`, resolved
    /// through that group's material map.
    pub fn material_for(&self, group: usize, position: usize) -> Option<&Material> {
        let index = *self.groups.get(group)?.material_map.get(position)?;
        self.materials.get(index as usize)
    }

    /// Materials no material map (primary, secondary or alternate) refers to.
    /// Removal never deletes materials, so this grows as meshes go away.
    pub fn unreferenced_materials(&self) -> Vec<usize> {
        let mut used = vec![false; self.materials.len()];
        let referenced = self
            .groups
            .iter()
            .flat_map(|g| g.material_map.iter())
            .chain(
                self.alternate_material_maps
                    .iter()
                    .flat_map(|a| a.materials.iter()),
            );
        for &m in referenced {
            if let Some(slot) = used.get_mut(m as usize) {
                *slot = true;
            }
        }
        used.iter()
            .enumerate()
            .filter(|(_, &u)| !u)
            .map(|(i, _)| i)
            .collect()
    }

    /// Remove one mesh and everything aligned with it, then refresh the
    /// surface-area trailer.
    ///
    /// The mesh's material map entry is removed with it; for group 0 the
    /// alternate material map at the same position goes too, when present.
    /// A missing mesh is logged and reported as [`RemovalOutcome::NotFound`]
    /// without touching the container.
    pub fn remove_mesh(&mut self, id: MeshId) -> RemovalOutcome {
        let Some(position) = self
            .groups
            .get(id.group as usize)
            .and_then(|g| g.position_of(id.lod, id.index))
        else {
            tracing::warn!(mesh = %id, "mesh not found; nothing removed");
            return RemovalOutcome::NotFound(id);
        };

        let (mesh, material) = self.groups[id.group as usize].remove_at(position);
        let alternate = if id.group == 0 && position < self.alternate_material_maps.len() {
            Some(self.alternate_material_maps.remove(position))
        } else {
            None
        };
        tracing::debug!(
            mesh = %id,
            position,
            material,
            alternate = alternate.is_some(),
            "removed mesh"
        );

        let trailer = self.recompute_trailer();
        RemovalOutcome::Removed(Box::new(RemovedMesh {
            mesh,
            material,
            alternate,
            trailer,
        }))
    }

    /// Rebuild the surface-area trailer from the current meshes.
    pub fn recompute_trailer(&mut self) -> TrailerUpdate {
        let meshes = self.groups.iter().flat_map(|g| g.meshes.iter());
        self.trailer.recompute(meshes)
    }

    /// Header matching the current buffer contents.
    pub fn header(&self) -> io::Result<Header> {
        self.buffers.header()
    }
}
