use std::collections::HashMap;

use cgmath::{InnerSpace, Zero};
use ordered_float::OrderedFloat;

use crate::{Aabb, MeshError, Triangle, TriangleMesh, Vector3};

/// A triangle surface with per-vertex normals.
///
/// Positions and normals are index aligned: `normals[i]` is the normal of
/// `positions[i]`. Triangles are either described by an index buffer, or, when
/// there are no indices, by consecutive triples of vertices (the layout STL
/// files use).
///
/// The fields are private so these invariants always hold:
///
///  * there is exactly one normal per position;
///  * every index refers to an existing vertex;
///  * the index buffer (or the vertex buffer for unindexed meshes) describes a
///    whole number of triangles.
///
/// Normals are the normalized, area weighted sum of the face normals around
/// each vertex and are recomputed whenever the shape of the mesh changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<Vector3>,
    normals: Vec<Vector3>,
    indices: Option<Vec<u32>>,
}

fn validate(vertices: usize, indices: Option<&[u32]>) -> Result<(), MeshError> {
    match indices {
        Some(indices) => {
            if indices.len() % 3 != 0 {
                return Err(MeshError::IncompleteTriangle {
                    count: indices.len(),
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices) {
                return Err(MeshError::IndexOutOfRange { index, vertices });
            }
        }
        None if vertices % 3 != 0 => {
            return Err(MeshError::IncompleteTriangle { count: vertices });
        }
        None => {}
    }
    Ok(())
}

/// Returns `n` scaled to unit length, or `None` when it has no usable direction.
pub(crate) fn unit_or_none(n: &Vector3) -> Option<Vector3> {
    let len2 = n.magnitude2();
    if len2 > 0.0 && len2.is_finite() {
        Some(*n / len2.sqrt())
    } else {
        None
    }
}

impl Mesh {
    /// Creates a mesh and computes its vertex normals from the topology.
    pub fn new(positions: Vec<Vector3>, indices: Option<Vec<u32>>) -> Result<Self, MeshError> {
        validate(positions.len(), indices.as_deref())?;
        Ok(Self::with_computed_normals(positions, indices))
    }

    /// Creates a mesh from buffers produced elsewhere (ex: a model loader).
    ///
    /// The normals are taken as-is. Callers that cannot vouch for them should
    /// call [`Mesh::compute_vertex_normals`] afterwards.
    pub fn from_parts(
        positions: Vec<Vector3>,
        normals: Vec<Vector3>,
        indices: Option<Vec<u32>>,
    ) -> Result<Self, MeshError> {
        if positions.len() != normals.len() {
            return Err(MeshError::NormalCountMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        validate(positions.len(), indices.as_deref())?;
        Ok(Self {
            positions,
            normals,
            indices,
        })
    }

    // Callers must have validated the buffers already.
    pub(crate) fn from_parts_unchecked(
        positions: Vec<Vector3>,
        normals: Vec<Vector3>,
        indices: Option<Vec<u32>>,
    ) -> Self {
        debug_assert_eq!(positions.len(), normals.len());
        debug_assert_eq!(Ok(()), validate(positions.len(), indices.as_deref()));
        Self {
            positions,
            normals,
            indices,
        }
    }

    // Callers must have validated the buffers already.
    fn with_computed_normals(positions: Vec<Vector3>, indices: Option<Vec<u32>>) -> Self {
        let mut mesh = Self {
            normals: Vec::new(),
            positions,
            indices,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    pub fn positions(&self) -> &[Vector3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3] {
        &self.normals
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterates the vertex indices of every triangle.
    pub fn faces(&self) -> Faces<'_> {
        Faces {
            indices: self.indices.as_deref(),
            next: 0,
            count: self.triangle_count(),
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces().map(|[a, b, c]| Triangle {
            p0: self.positions[a],
            p1: self.positions[b],
            p2: self.positions[c],
        })
    }

    /// Bounding box of all vertices, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Recomputes every vertex normal from the faces that share the vertex.
    ///
    /// Each face contributes its area weighted normal. Vertices that belong
    /// only to degenerate faces end up with a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3::zero(); self.positions.len()];
        for face in self.faces() {
            let [a, b, c] = face;
            let n = Triangle {
                p0: self.positions[a],
                p1: self.positions[b],
                p2: self.positions[c],
            }
            .area_normal();
            for i in face {
                normals[i] += n;
            }
        }
        for n in &mut normals {
            *n = unit_or_none(n).unwrap_or_else(Vector3::zero);
        }
        self.normals = normals;
    }

    /// Moves every vertex along its normal by `offset`.
    ///
    /// The stored normals are used as-is, normalized first so the distance
    /// moved is exactly `|offset|`. Vertices with a zero or non-finite normal
    /// stay where they are. The result owns fresh buffers, shares the
    /// topology of `self`, and has its normals recomputed for the new shape.
    pub fn displaced(&self, offset: f32) -> Mesh {
        let positions = self
            .positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| match unit_or_none(n) {
                Some(n) => *p + n * offset,
                None => *p,
            })
            .collect();
        Self::with_computed_normals(positions, self.indices.clone())
    }

    /// Moves the whole mesh by `delta`. Normals are unaffected.
    pub fn translate(&mut self, delta: Vector3) {
        for p in &mut self.positions {
            *p += delta;
        }
    }

    /// Merges vertices that share exactly the same position.
    ///
    /// STL files repeat every corner once per triangle, so adjacent faces never
    /// share a vertex and every normal is a hard face normal. Welding gives
    /// the surface shared, smooth normals which keeps offset shells closed.
    /// The result is always indexed.
    pub fn weld(&self) -> Mesh {
        // Floats are not hash nor eq, so we key on ordered-float. This only
        // merges bit-identical coordinates, which is what exporters emit for
        // shared corners.
        let mut lookup: HashMap<[OrderedFloat<f32>; 3], u32> = HashMap::new();
        let mut positions = Vec::new();
        let remap: Vec<u32> = self
            .positions
            .iter()
            .map(|p| {
                let key = [OrderedFloat(p.x), OrderedFloat(p.y), OrderedFloat(p.z)];
                *lookup.entry(key).or_insert_with(|| {
                    positions.push(*p);
                    (positions.len() - 1) as u32
                })
            })
            .collect();
        let indices = self
            .faces()
            .flat_map(|face| face.map(|i| remap[i]))
            .collect();
        log::debug!(
            "welded {} vertices into {}",
            self.positions.len(),
            positions.len()
        );
        Self::with_computed_normals(positions, Some(indices))
    }
}

impl TriangleMesh for Mesh {
    fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let positions = triangles
            .into_iter()
            .flat_map(|t| [t.p0, t.p1, t.p2])
            .collect();
        Self::with_computed_normals(positions, None)
    }

    fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }
}

/// Iterator over the vertex indices of each triangle in a [`Mesh`].
pub struct Faces<'a> {
    indices: Option<&'a [u32]>,
    next: usize,
    count: usize,
}

impl<'a> Iterator for Faces<'a> {
    type Item = [usize; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let base = self.next * 3;
        self.next += 1;
        Some(match self.indices {
            Some(indices) => [
                indices[base] as usize,
                indices[base + 1] as usize,
                indices[base + 2] as usize,
            ],
            None => [base, base + 1, base + 2],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Faces<'a> {}
