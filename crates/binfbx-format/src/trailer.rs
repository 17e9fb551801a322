//! Surface-area trailer.
//!
//! The trailer stores the total triangle surface area of the model and a
//! cumulative distribution over per-triangle areas, used by the engine for
//! area-weighted surface sampling. It goes stale whenever meshes are removed.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use crate::cursor::ByteCursor;
use crate::error::FormatResult;
use crate::mesh::Mesh;
use crate::write::BinWrite;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trailer {
    pub reserved: u32,
    pub total_surface_area: f32,
    /// One entry per triangle, non-decreasing, ending at exactly 1.0.
    pub cdf: Vec<f32>,
}

/// Outcome of [`Trailer::recompute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerUpdate {
    Recomputed,
    /// No mesh exposes a FLOAT3 position attribute; the trailer was kept.
    Unchanged,
}

impl Trailer {
    pub fn decode(cursor: &mut ByteCursor<'_>) -> FormatResult<Self> {
        Ok(Self {
            reserved: cursor.read_u32()?,
            total_surface_area: cursor.read_f32()?,
            cdf: cursor.read_counted_f32s()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.reserved)?;
        writer.write_f32::<LittleEndian>(self.total_surface_area)?;
        writer.write_counted_f32s(&self.cdf)
    }

    /// Rebuild total area and CDF from the local geometry of `meshes`, visited
    /// in order. Meshes without a FLOAT3 position attribute contribute nothing.
    /// A triangle whose area is not finite counts as zero area so the CDF keeps
    /// one entry per triangle.
    pub fn recompute<'a>(&mut self, meshes: impl IntoIterator<Item = &'a Mesh>) -> TrailerUpdate {
        let mut areas: Vec<f64> = meshes.into_iter().flat_map(triangle_areas).collect();
        if areas.is_empty() {
            tracing::warn!("no mesh has FLOAT3 positions; surface-area trailer left unchanged");
            return TrailerUpdate::Unchanged;
        }

        let mut non_finite = 0usize;
        for area in areas.iter_mut().filter(|a| !a.is_finite()) {
            *area = 0.0;
            non_finite += 1;
        }
        if non_finite > 0 {
            tracing::warn!(
                triangles = non_finite,
                "non-finite triangle area (NaN or infinite position); counted as zero"
            );
        }

        let (total, cdf) = build_cdf(&areas);
        self.reserved = 0;
        self.total_surface_area = total as f32;
        self.cdf = cdf;
        tracing::debug!(
            triangles = self.cdf.len(),
            total_surface_area = self.total_surface_area,
            "recomputed surface-area trailer"
        );
        TrailerUpdate::Recomputed
    }
}

/// Cumulative distribution over `areas`, normalized by their sum. The last
/// entry is forced to 1.0. A total that is zero or not finite yields a uniform
/// distribution.
pub fn build_cdf(areas: &[f64]) -> (f64, Vec<f32>) {
    let total: f64 = areas.iter().sum();
    let n = areas.len();
    let mut cdf: Vec<f32> = if total > 0.0 && total.is_finite() {
        let mut running = 0.0;
        areas
            .iter()
            .map(|a| {
                running += a;
                (running / total).min(1.0) as f32
            })
            .collect()
    } else {
        (1..=n).map(|i| i as f32 / n as f32).collect()
    };
    if let Some(last) = cdf.last_mut() {
        *last = 1.0;
    }
    (total, cdf)
}

/// Areas of every triangle of `mesh`, computed from its local positions.
/// Empty when the mesh has no FLOAT3 position attribute.
pub fn triangle_areas(mesh: &Mesh) -> Vec<f64> {
    let Some(positions) = mesh.positions() else {
        return Vec::new();
    };
    mesh.local
        .triangles()
        .filter_map(|triangle| triangle_area(&positions, triangle))
        .collect()
}

/// Area of the triangle whose corners are `corners` in `positions`: half the
/// length of the cross product of its two edges from the first corner.
/// `None` when a corner is out of range.
pub fn triangle_area(positions: &[[f32; 3]], corners: [u64; 3]) -> Option<f64> {
    let corner = |i: u64| -> Option<[f64; 3]> {
        let p = positions.get(usize::try_from(i).ok()?)?;
        Some(p.map(f64::from))
    };
    let [a, b, c] = [corner(corners[0])?, corner(corners[1])?, corner(corners[2])?];
    let u: [f64; 3] = std::array::from_fn(|k| b[k] - a[k]);
    let v: [f64; 3] = std::array::from_fn(|k| c[k] - a[k]);
    let normal = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    Some(0.5 * normal.iter().map(|n| n * n).sum::<f64>().sqrt())
}
