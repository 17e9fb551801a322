//! binfbx mesh container codec
//!
//! Decodes, edits and re-encodes the binfbx container: global vertex and
//! index buffers, bind skeleton, materials with their uniform variables,
//! material maps, two groups of LOD meshes and a surface-area trailer.
//!
//! # Overview
//!
//! - Decoding is bounds-checked end to end; a short buffer yields
//!   [`FormatError::Truncated`], never a panic.
//! - Every mesh gets a deduplicated local copy of the vertices it uses
//!   ([`LocalBuffers`]), so it can be measured or removed on its own.
//! - Encoding an unmodified container reproduces the input byte for byte.
//! - [`Container::remove_mesh`] drops a mesh together with its material map
//!   entries and rebuilds the surface-area trailer.
//!
//! # Example
//!
//! ```no_run
//! use binfbx_format::{report, Container, MeshId, Verbosity};
//!
//! let data = std::fs::read("model.binfbx")?;
//! let mut container = Container::decode(&data)?;
//! container.remove_mesh(MeshId::new(0, 0, 1)).into_result()?;
//! print!("{}", report(&container, Verbosity::Summary));
//! std::fs::write("model.edited.binfbx", container.to_bytes()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod container;
pub mod cursor;
pub mod error;
pub mod header;
pub mod joint;
pub mod material;
pub mod material_map;
pub mod mesh;
pub mod params;
pub mod report;
pub mod string;
pub mod trailer;
pub mod uniform;

mod write;

pub use container::{Container, MeshGroup, RemovalOutcome, RemovedMesh, GROUP_COUNT};
pub use cursor::ByteCursor;
pub use error::{FormatError, FormatResult};
pub use header::{GlobalBuffers, Header, IndexWidth, BINFBX_MAGIC};
pub use joint::Joint;
pub use material::Material;
pub use material_map::AlternateMaterialMap;
pub use mesh::{
    AttributeFormat, AttributeInfo, AttributeUsage, Channel, LocalBuffers, Mesh, MeshId,
};
pub use params::GlobalParameters;
pub use report::{report, write_report, ContainerSummary, Verbosity};
pub use string::BinString;
pub use trailer::{Trailer, TrailerUpdate};
pub use uniform::{UniformKind, UniformValue, UniformVariable};

/// Decode a fully buffered container.
pub fn decode(data: &[u8]) -> FormatResult<Container> {
    Container::decode(data)
}

/// Encode a container to bytes.
pub fn encode(container: &Container) -> FormatResult<Vec<u8>> {
    container.to_bytes()
}
