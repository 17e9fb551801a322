//! Synthetic container builder shared by the integration tests.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};

pub const POSITION: [u8; 4] = [0, 0x02, 0, 0];
pub const NORMAL_BYTE4: [u8; 4] = [0, 0x04, 1, 0];
pub const TEXCOORD: [u8; 4] = [1, 0x07, 2, 0];

/// Uniform record: name, tag and raw payload bytes.
pub struct UniformSpec {
    pub name: &'static str,
    pub tag: u32,
    pub payload: Vec<u8>,
}

pub struct MaterialSpec {
    pub name: &'static str,
    pub parameters: [u32; 6],
    pub uniforms: Vec<UniformSpec>,
}

pub struct MeshSpec {
    pub lod: u32,
    pub vertex_count: u32,
    pub triangle_count: u32,
    pub vertex_buffer_offsets: [u32; 2],
    pub index_buffer_offset: u32,
    pub attributes: Vec<[u8; 4]>,
}

pub struct Fixture {
    pub attribute: Vec<u8>,
    pub vertex: Vec<u8>,
    pub indices: Vec<u64>,
    pub index_width: u32,
    pub joints: Vec<(&'static str, i32)>,
    pub materials: Vec<MaterialSpec>,
    pub primary_map: Vec<u32>,
    pub alternates: Vec<(&'static str, Vec<u32>)>,
    pub secondary_map: Vec<u32>,
    pub groups: [Vec<MeshSpec>; 2],
    pub trailer: (u32, f32, Vec<f32>),
    pub trailing: Vec<u8>,
}

fn string(out: &mut Vec<u8>, s: &str) {
    out.write_u32::<LittleEndian>(s.len() as u32).unwrap();
    out.extend_from_slice(s.as_bytes());
}

fn u32s(out: &mut Vec<u8>, values: &[u32]) {
    out.write_u32::<LittleEndian>(values.len() as u32).unwrap();
    for &v in values {
        out.write_u32::<LittleEndian>(v).unwrap();
    }
}

fn f32s(out: &mut Vec<u8>, values: &[f32]) {
    for &v in values {
        out.write_f32::<LittleEndian>(v).unwrap();
    }
}

pub fn f32_payload(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::new();
    f32s(&mut out, values);
    out
}

pub fn string_payload(s: &str) -> Vec<u8> {
    let mut out = Vec::new();
    string(&mut out, s);
    out
}

/// Little-endian FLOAT3 positions.
pub fn positions(points: &[[f32; 3]]) -> Vec<u8> {
    let mut out = Vec::new();
    for p in points {
        f32s(&mut out, p);
    }
    out
}

impl Fixture {
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(0x2E).unwrap();
        out.write_u32::<LittleEndian>(self.attribute.len() as u32)
            .unwrap();
        out.write_u32::<LittleEndian>(self.vertex.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(self.indices.len() as u32)
            .unwrap();
        out.write_u32::<LittleEndian>(self.index_width).unwrap();
        out.extend_from_slice(&self.attribute);
        out.extend_from_slice(&self.vertex);
        for &i in &self.indices {
            match self.index_width {
                1 => out.write_u8(i as u8).unwrap(),
                2 => out.write_u16::<LittleEndian>(i as u16).unwrap(),
                4 => out.write_u32::<LittleEndian>(i as u32).unwrap(),
                _ => out.write_u64::<LittleEndian>(i).unwrap(),
            }
        }

        out.write_u32::<LittleEndian>(self.joints.len() as u32)
            .unwrap();
        for (k, (name, parent)) in self.joints.iter().enumerate() {
            string(&mut out, name);
            let t = k as f32;
            f32s(
                &mut out,
                &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, t, 0.0],
            );
            f32s(&mut out, &[0.0, t + 1.0, 0.0, 0.25]);
            out.write_i32::<LittleEndian>(*parent).unwrap();
        }

        // Global parameter block.
        out.write_u32::<LittleEndian>(1).unwrap();
        out.write_u32::<LittleEndian>(2).unwrap();
        out.write_f32::<LittleEndian>(1.0).unwrap();
        out.write_u32::<LittleEndian>(1).unwrap();
        out.write_f32::<LittleEndian>(0.5).unwrap();
        out.write_f32::<LittleEndian>(1.0).unwrap();
        f32s(&mut out, &[1.0, 1.0, 0.5, 2.0]);
        f32s(&mut out, &[0.0, 0.0, 0.0, 2.0, 2.0, 1.0]);
        out.write_u32::<LittleEndian>(2).unwrap();

        out.write_u32::<LittleEndian>(self.materials.len() as u32)
            .unwrap();
        for (k, material) in self.materials.iter().enumerate() {
            out.write_u32::<LittleEndian>(7).unwrap();
            out.extend_from_slice(&[k as u8, 1, 2, 3, 4, 5, 6, 0xFF]);
            string(&mut out, material.name);
            string(&mut out, "standard");
            string(&mut out, "materials/test.mat\0");
            for p in material.parameters {
                out.write_u32::<LittleEndian>(p).unwrap();
            }
            out.write_u32::<LittleEndian>(material.uniforms.len() as u32)
                .unwrap();
            for uniform in &material.uniforms {
                string(&mut out, uniform.name);
                out.write_u32::<LittleEndian>(uniform.tag).unwrap();
                out.extend_from_slice(&uniform.payload);
            }
        }

        u32s(&mut out, &self.primary_map);
        out.write_u32::<LittleEndian>(self.alternates.len() as u32)
            .unwrap();
        for (name, materials) in &self.alternates {
            string(&mut out, name);
            u32s(&mut out, materials);
        }
        u32s(&mut out, &self.secondary_map);

        for group in &self.groups {
            out.write_u32::<LittleEndian>(group.len() as u32).unwrap();
            for mesh in group {
                write_mesh(&mut out, mesh);
            }
        }

        let (reserved, area, cdf) = &self.trailer;
        out.write_u32::<LittleEndian>(*reserved).unwrap();
        out.write_f32::<LittleEndian>(*area).unwrap();
        out.write_u32::<LittleEndian>(cdf.len() as u32).unwrap();
        f32s(&mut out, cdf);

        out.extend_from_slice(&self.trailing);
        out
    }
}

fn write_mesh(out: &mut Vec<u8>, mesh: &MeshSpec) {
    out.write_u32::<LittleEndian>(mesh.lod).unwrap();
    out.write_u32::<LittleEndian>(mesh.vertex_count).unwrap();
    out.write_u32::<LittleEndian>(mesh.triangle_count).unwrap();
    out.write_u32::<LittleEndian>(mesh.vertex_buffer_offsets[0])
        .unwrap();
    out.write_u32::<LittleEndian>(mesh.vertex_buffer_offsets[1])
        .unwrap();
    out.write_u32::<LittleEndian>(mesh.index_buffer_offset).unwrap();
    out.write_u32::<LittleEndian>(0x0000_0011).unwrap();
    f32s(out, &[0.5, 0.5, 0.0, 1.0]);
    f32s(out, &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
    out.write_u32::<LittleEndian>(0x8000_0000).unwrap();
    out.write_u8(mesh.attributes.len() as u8).unwrap();
    for a in &mesh.attributes {
        out.extend_from_slice(a);
    }
    out.write_i32::<LittleEndian>(-1).unwrap();
    out.write_f32::<LittleEndian>(0.0).unwrap();
    out.write_u8(1).unwrap();
    out.write_f32::<LittleEndian>(0.0).unwrap();
}

/// One uniform of every known type tag.
pub fn all_uniforms() -> Vec<UniformSpec> {
    vec![
        UniformSpec {
            name: "roughness",
            tag: 0x00,
            payload: f32_payload(&[0.25]),
        },
        UniformSpec {
            name: "fade",
            tag: 0x01,
            payload: f32_payload(&[10.0, 20.0]),
        },
        UniformSpec {
            name: "wind",
            tag: 0x02,
            payload: f32_payload(&[1.0, 0.0, -1.0]),
        },
        UniformSpec {
            name: "tint",
            tag: 0x03,
            payload: f32_payload(&[1.0, 0.5, 0.25, 1.0]),
        },
        UniformSpec {
            name: "marker",
            tag: 0x04,
            payload: Vec::new(),
        },
        UniformSpec {
            name: "sampler",
            tag: 0x08,
            payload: Vec::new(),
        },
        UniformSpec {
            name: "albedo",
            tag: 0x09,
            payload: string_payload("textures/albedo.tga\0"),
        },
        UniformSpec {
            name: "two_sided",
            tag: 0x0C,
            payload: 1u32.to_le_bytes().to_vec(),
        },
    ]
}

/// A small model:
///
/// - group 0: two quads at LOD 0 (unit square at z=0, 2x2 square at z=1)
///   and one triangle at LOD 1
/// - group 1: one triangle of the 2x2 square
///
/// Triangle areas in decode order: 0.5, 0.5, 2, 2, 0.5, 2 (total 7.5).
pub fn sample() -> Fixture {
    let points = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [2.0, 0.0, 1.0],
        [2.0, 2.0, 1.0],
        [0.0, 2.0, 1.0],
    ];
    let mut attribute = Vec::new();
    for i in 0..8i16 {
        attribute.extend_from_slice(&i.to_le_bytes());
        attribute.extend_from_slice(&(-i).to_le_bytes());
    }
    let quad = |lod, vertex_offset: u32, attribute_offset: u32| MeshSpec {
        lod,
        vertex_count: 4,
        triangle_count: 2,
        vertex_buffer_offsets: [attribute_offset, vertex_offset],
        index_buffer_offset: 0,
        attributes: vec![POSITION, TEXCOORD],
    };

    Fixture {
        attribute,
        vertex: positions(&points),
        indices: vec![0, 1, 2, 0, 2, 3, 4, 5, 6],
        index_width: 2,
        joints: vec![("root", -1), ("spine", 0)],
        materials: vec![
            MaterialSpec {
                name: "body",
                parameters: [0x8000_0001, 0, 0, 0, 0, 0xDEAD_BEEF],
                uniforms: all_uniforms(),
            },
            MaterialSpec {
                name: "trim",
                parameters: [0; 6],
                uniforms: Vec::new(),
            },
            MaterialSpec {
                name: "lod",
                parameters: [1, 2, 3, 4, 5, 6],
                uniforms: Vec::new(),
            },
        ],
        primary_map: vec![0, 1, 2],
        alternates: vec![("damaged", vec![1, 1]), ("clean", vec![0])],
        secondary_map: vec![1],
        groups: [
            vec![
                quad(0, 0, 0),
                quad(0, 48, 16),
                MeshSpec {
                    lod: 1,
                    vertex_count: 3,
                    triangle_count: 1,
                    vertex_buffer_offsets: [0, 0],
                    index_buffer_offset: 0,
                    attributes: vec![POSITION],
                },
            ],
            vec![MeshSpec {
                lod: 0,
                vertex_count: 3,
                triangle_count: 1,
                vertex_buffer_offsets: [0, 0],
                index_buffer_offset: 6,
                attributes: vec![TEXCOORD, POSITION],
            }],
        ],
        trailer: (5, 99.0, vec![0.5, 1.0]),
        trailing: Vec::new(),
    }
}
