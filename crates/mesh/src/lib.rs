mod error;
mod geometry;
mod mesh;
mod primitives;
mod shell;

pub use error::*;
pub use geometry::*;
pub use mesh::*;
pub use shell::*;

pub trait TriangleMesh: Sized {
    /// Creates a TriangleMesh from a list of triangles.
    ///
    /// # Arguments
    ///
    /// * `triangles` - A vector of the triangles of the mesh.
    fn from_triangles(triangles: Vec<Triangle>) -> Self;

    /// Returns the number of triangles that comprises this mesh.
    fn triangle_count(&self) -> usize;
}
