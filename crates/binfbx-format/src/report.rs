//! Human-readable dump and machine-readable summary of a container.

use serde::Serialize;
use std::fmt::{self, Write};

use crate::container::Container;
use crate::header::IndexWidth;
use crate::material::Material;
use crate::mesh::{Channel, Mesh, MeshId};
use crate::params::GlobalParameters;
use crate::string::BinString;
use crate::uniform::UniformKind;

/// How much the dump prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Section counts and totals.
    #[default]
    Summary,
    /// Adds one line per joint, material, mesh and alternate map.
    Detailed,
    /// Adds uniforms, attributes, bounding volumes and the CDF.
    Full,
}

/// Write the dump of `container` to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    container: &Container,
    verbosity: Verbosity,
) -> fmt::Result {
    let detailed = verbosity >= Verbosity::Detailed;
    let full = verbosity >= Verbosity::Full;
    let buffers = &container.buffers;

    writeln!(out, "Global buffers")?;
    writeln!(out, "  attribute buffer: {} bytes", buffers.attribute.len())?;
    writeln!(out, "  vertex buffer:    {} bytes", buffers.vertex.len())?;
    writeln!(
        out,
        "  index buffer:     {} x {} byte(s)",
        buffers.index_count(),
        buffers.index_width.bytes()
    )?;

    writeln!(out, "Joints: {}", container.joints.len())?;
    if detailed {
        for (i, joint) in container.joints.iter().enumerate() {
            let [x, y, z] = joint.translation();
            writeln!(
                out,
                "  [{}] {} parent {} at ({}, {}, {}) radius {}",
                i, joint.name, joint.parent, x, y, z, joint.radius
            )?;
        }
    }

    write_parameters(out, &container.parameters, full)?;

    writeln!(out, "Materials: {}", container.materials.len())?;
    if detailed {
        for (i, material) in container.materials.iter().enumerate() {
            write_material(out, i, material, full)?;
        }
    }
    let unreferenced = container.unreferenced_materials();
    if !unreferenced.is_empty() {
        writeln!(out, "  unreferenced: {:?}", unreferenced)?;
    }

    for (g, group) in container.groups().iter().enumerate() {
        writeln!(out, "Group {}: {} mesh(es)", g, group.len())?;
        if detailed {
            for (mesh, material) in group.iter() {
                write_mesh(out, mesh, material, full)?;
            }
        }
    }

    let alternates = container.alternate_material_maps();
    writeln!(out, "Alternate material maps: {}", alternates.len())?;
    if detailed {
        for (i, alternate) in alternates.iter().enumerate() {
            writeln!(out, "  [{}] {} -> {:?}", i, alternate.name, alternate.materials)?;
        }
    }

    let trailer = &container.trailer;
    writeln!(out, "Trailer")?;
    writeln!(out, "  total surface area: {}", trailer.total_surface_area)?;
    writeln!(out, "  triangles sampled:  {}", trailer.cdf.len())?;
    if full {
        for chunk in trailer.cdf.chunks(8) {
            let line: Vec<String> = chunk.iter().map(|v| format!("{:.6}", v)).collect();
            writeln!(out, "    {}", line.join(" "))?;
        }
    }

    if !container.trailing.is_empty() {
        writeln!(
            out,
            "Trailing data: {} byte(s) after the trailer",
            container.trailing.len()
        )?;
    }
    Ok(())
}

/// Render the dump into a new string.
pub fn report(container: &Container, verbosity: Verbosity) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, container, verbosity);
    out
}

fn write_parameters<W: Write>(out: &mut W, params: &GlobalParameters, full: bool) -> fmt::Result {
    writeln!(out, "Parameters")?;
    writeln!(out, "  scale: {}", params.scale)?;
    writeln!(out, "  mirrored: {}", params.is_mirrored())?;
    writeln!(out, "  lod count: {}", params.lod_count)?;
    if full {
        writeln!(out, "  lod thresholds: {:?}", params.lod_thresholds)?;
        writeln!(out, "  bounding sphere: {:?}", params.bounding_sphere)?;
        writeln!(out, "  bounding box: {:?}", params.bounding_box)?;
        writeln!(out, "  reserved: {:08X?}", params.reserved)?;
    }
    Ok(())
}

fn write_material<W: Write>(out: &mut W, i: usize, material: &Material, full: bool) -> fmt::Result {
    write!(
        out,
        "  [{}] {} ({}) {}",
        i, material.name, material.definition, material.path
    )?;
    if material.uses_special_pipeline() {
        write!(out, " [special pipeline]")?;
    }
    writeln!(out)?;
    if full {
        writeln!(out, "      parameters: {:08X?}", material.parameters)?;
        for uniform in &material.uniforms {
            writeln!(out, "      {} = {}", uniform.name, uniform.value)?;
        }
    }
    Ok(())
}

fn write_mesh<W: Write>(out: &mut W, mesh: &Mesh, material: u32, full: bool) -> fmt::Result {
    writeln!(
        out,
        "  {}: material {}, {} vertices ({} used), {} triangles, {}",
        mesh.id,
        material,
        mesh.vertex_count,
        mesh.local_vertex_count(),
        mesh.triangle_count,
        if mesh.is_rigid() { "rigid" } else { "skinned" }
    )?;
    if full {
        writeln!(
            out,
            "      offsets: attribute {} vertex {} index {}",
            mesh.vertex_buffer_offsets[0], mesh.vertex_buffer_offsets[1], mesh.index_buffer_offset
        )?;
        writeln!(
            out,
            "      strides: attribute {} vertex {}",
            mesh.stride(Channel::Attribute),
            mesh.stride(Channel::Vertex)
        )?;
        writeln!(out, "      flags: {:08X?}", mesh.flags)?;
        writeln!(out, "      bounding sphere: {:?}", mesh.bounding_sphere)?;
        writeln!(out, "      bounding box: {:?}", mesh.bounding_box)?;
        for attribute in &mesh.attributes {
            writeln!(out, "      attribute {}", attribute)?;
        }
    }
    Ok(())
}

/// Machine-readable overview of a container.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerSummary {
    pub attribute_buffer_bytes: usize,
    pub vertex_buffer_bytes: usize,
    pub index_count: usize,
    pub index_width: IndexWidth,
    pub joints: Vec<BinString>,
    pub parameters: GlobalParameters,
    pub materials: Vec<MaterialSummary>,
    pub unreferenced_materials: Vec<usize>,
    pub groups: Vec<Vec<MeshSummary>>,
    pub alternate_material_maps: Vec<AlternateSummary>,
    pub total_surface_area: f32,
    pub triangles_sampled: usize,
    pub trailing_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialSummary {
    pub name: BinString,
    pub definition: BinString,
    pub path: BinString,
    pub special_pipeline: bool,
    pub uniforms: Vec<UniformSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniformSummary {
    pub name: BinString,
    pub kind: UniformKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeshSummary {
    pub id: MeshId,
    pub material: u32,
    pub vertex_count: u32,
    pub triangle_count: u32,
    pub local_vertex_count: usize,
    pub rigid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_formats: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlternateSummary {
    pub name: BinString,
    pub materials: Vec<u32>,
}

impl ContainerSummary {
    pub fn new(container: &Container) -> Self {
        let materials = container
            .materials
            .iter()
            .map(|m| MaterialSummary {
                name: m.name.clone(),
                definition: m.definition.clone(),
                path: m.path.clone(),
                special_pipeline: m.uses_special_pipeline(),
                uniforms: m
                    .uniforms
                    .iter()
                    .map(|u| UniformSummary {
                        name: u.name.clone(),
                        kind: u.value.kind(),
                    })
                    .collect(),
            })
            .collect();

        let groups = container
            .groups()
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|(mesh, material)| MeshSummary {
                        id: mesh.id,
                        material,
                        vertex_count: mesh.vertex_count,
                        triangle_count: mesh.triangle_count,
                        local_vertex_count: mesh.local_vertex_count(),
                        rigid: mesh.is_rigid(),
                        unknown_formats: mesh.unknown_formats(),
                    })
                    .collect()
            })
            .collect();

        let alternate_material_maps = container
            .alternate_material_maps()
            .iter()
            .map(|a| AlternateSummary {
                name: a.name.clone(),
                materials: a.materials.clone(),
            })
            .collect();

        Self {
            attribute_buffer_bytes: container.buffers.attribute.len(),
            vertex_buffer_bytes: container.buffers.vertex.len(),
            index_count: container.buffers.index_count(),
            index_width: container.buffers.index_width,
            joints: container.joints.iter().map(|j| j.name.clone()).collect(),
            parameters: container.parameters.clone(),
            materials,
            unreferenced_materials: container.unreferenced_materials(),
            groups,
            alternate_material_maps,
            total_surface_area: container.trailer.total_surface_area,
            triangles_sampled: container.trailer.cdf.len(),
            trailing_bytes: container.trailing.len(),
        }
    }
}
