use thiserror::Error;

/// Buffers handed to [`crate::Mesh::from_parts`] that break the mesh invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("mesh has {positions} positions but {normals} normals")]
    NormalCountMismatch { positions: usize, normals: usize },

    #[error("index {index} is out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },

    #[error("{count} is not a whole number of triangles")]
    IncompleteTriangle { count: usize },
}
