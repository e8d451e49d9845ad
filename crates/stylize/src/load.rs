use std::io::ErrorKind;
use std::path::Path;

use lustre_mesh::{Mesh, MeshError};
use thiserror::Error;

/// Why the model never made it into the scene.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read model: {0}")]
    Io(std::io::Error),

    #[error("failed to fetch model: {0}")]
    Fetch(String),

    #[error("malformed STL data: {0}")]
    Parse(std::io::Error),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("model contains no triangles")]
    Empty,
}

impl LoadError {
    /// Errors from the STL reader are either about getting the bytes or about
    /// the bytes themselves. Running out of data halfway through a triangle,
    /// or data the reader rejects outright, means the file is malformed.
    pub fn from_stl(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof | ErrorKind::InvalidData | ErrorKind::InvalidInput => {
                LoadError::Parse(err)
            }
            _ => LoadError::Io(err),
        }
    }
}

fn non_empty(mesh: Mesh) -> Result<Mesh, LoadError> {
    if mesh.is_empty() {
        Err(LoadError::Empty)
    } else {
        Ok(mesh)
    }
}

/// Parses a binary STL file already in memory.
pub fn parse_model(data: &[u8]) -> Result<Mesh, LoadError> {
    let mesh: Mesh = lustre_stl::parse_stl(data).map_err(LoadError::from_stl)?;
    non_empty(mesh)
}

/// Reads a binary STL file from disk.
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
    let data = std::fs::read(path).map_err(LoadError::Io)?;
    parse_model(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lustre_mesh::TriangleMesh;
    use lustre_test_data::cube_stl;

    #[test]
    fn parses_cube() {
        let mesh = parse_model(&cube_stl()).unwrap();
        assert_eq!(12, mesh.triangle_count());
    }

    #[test]
    fn truncated_data_is_a_parse_error() {
        let data = cube_stl();
        let err = parse_model(&data[..data.len() - 10]).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)), "{err:?}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_model("/definitely/not/here/model.stl").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)), "{err:?}");
    }

    #[test]
    fn zero_triangles_is_empty() {
        let mut data = vec![0u8; 84];
        data[80..84].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(parse_model(&data), Err(LoadError::Empty)));
    }
}
