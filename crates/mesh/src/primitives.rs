use crate::{Mesh, Vector3};

impl Mesh {
    /// A flat rectangle in the xz plane, centered on the origin and facing +y.
    pub fn plane(width: f32, depth: f32) -> Mesh {
        let (w, d) = (width * 0.5, depth * 0.5);
        let positions = vec![
            Vector3::new(-w, 0.0, d),
            Vector3::new(w, 0.0, d),
            Vector3::new(w, 0.0, -d),
            Vector3::new(-w, 0.0, -d),
        ];
        let normals = vec![Vector3::unit_y(); 4];
        Mesh::from_parts_unchecked(positions, normals, Some(vec![0, 1, 2, 0, 2, 3]))
    }
}
