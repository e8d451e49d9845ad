//! Small models shared by the workspace's tests.
//!
//! Fixtures are plain arrays so that any crate, including the mesh crate
//! itself, can depend on this one without a cycle.

use byteorder::{LittleEndian, WriteBytesExt};

pub struct TestModel {
    pub positions: &'static [[f32; 3]],
    pub indices: &'static [u32],
    pub model_height: f32,
}

/// A unit quad in the xy plane, wound counter-clockwise so it faces +z.
pub const QUAD: TestModel = TestModel {
    positions: &[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ],
    indices: &[0, 1, 2, 0, 2, 3],
    model_height: 1.0,
};

/// A regular octahedron with its corners on the unit axes.
///
/// Every corner is shared by four faces whose normals cancel out except along
/// the corner's axis, so vertex normals are exact and an offset shell of it is
/// exactly a scaled octahedron.
pub const OCTAHEDRON: TestModel = TestModel {
    positions: &[
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ],
    indices: &[
        0, 2, 4, //
        1, 4, 2, //
        0, 4, 3, //
        1, 3, 4, //
        0, 5, 2, //
        1, 2, 5, //
        0, 3, 5, //
        1, 5, 3, //
    ],
    model_height: 2.0,
};

/// The 12 facets of a 20mm cube spanning 0-20 on every axis, in file order.
pub const CUBE_TRIANGLES: [[[f32; 3]; 3]; 12] = {
    const X0: [f32; 3] = [0.0, 20.0, 20.0];
    const X1: [f32; 3] = [20.0, 0.0, 20.0];
    const X2: [f32; 3] = [20.0, 20.0, 20.0];
    const X3: [f32; 3] = [0.0, 0.0, 20.0];
    const X4: [f32; 3] = [0.0, 0.0, 0.0];
    const X5: [f32; 3] = [20.0, 20.0, 0.0];
    const X6: [f32; 3] = [20.0, 0.0, 0.0];
    const X7: [f32; 3] = [0.0, 20.0, 0.0];
    [
        [X0, X1, X2],
        [X1, X0, X3],
        [X4, X5, X6],
        [X5, X4, X7],
        [X4, X1, X3],
        [X1, X4, X6],
        [X1, X5, X2],
        [X5, X1, X6],
        [X5, X0, X2],
        [X0, X5, X7],
        [X4, X0, X7],
        [X0, X4, X3],
    ]
};

// Generate a closed UV sphere centered at origin.
// stacks: latitude segments (>= 3), slices: longitude segments (>= 3)
//
// Each pole is a single vertex shared by a triangle fan and the rings wrap
// around without a seam, so every triangle has non-zero area.
pub fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> (Vec<[f32; 3]>, Vec<u32>) {
    let stacks = stacks.max(3);
    let slices = slices.max(3);
    let mut positions = vec![[0.0, radius, 0.0]];
    let mut indices = Vec::new();

    for i in 1..stacks {
        let theta = i as f32 / stacks as f32 * std::f32::consts::PI;
        for j in 0..slices {
            let phi = j as f32 / slices as f32 * std::f32::consts::TAU;
            positions.push([
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            ]);
        }
    }
    let bottom = positions.len() as u32;
    positions.push([0.0, -radius, 0.0]);

    let ring = |i: u32, j: u32| 1 + (i - 1) * slices + j % slices;
    for j in 0..slices {
        indices.extend_from_slice(&[0, ring(1, j + 1), ring(1, j)]);
    }
    for i in 1..stacks - 1 {
        for j in 0..slices {
            let a = ring(i, j);
            let b = ring(i, j + 1);
            let c = ring(i + 1, j);
            let d = ring(i + 1, j + 1);
            indices.extend_from_slice(&[a, b, c]);
            indices.extend_from_slice(&[b, d, c]);
        }
    }
    for j in 0..slices {
        indices.extend_from_slice(&[ring(stacks - 1, j), ring(stacks - 1, j + 1), bottom]);
    }

    (positions, indices)
}

/// Encodes triangles as a binary STL file.
///
/// Facet normals are written as zero, which readers are expected to ignore.
pub fn stl_bytes(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut out = vec![0u8; 80];
    // Writes into a Vec<u8> cannot fail.
    out.write_u32::<LittleEndian>(triangles.len() as u32).unwrap();
    for t in triangles {
        for _ in 0..3 {
            out.write_f32::<LittleEndian>(0.0).unwrap();
        }
        for p in t.iter().flatten() {
            out.write_f32::<LittleEndian>(*p).unwrap();
        }
        out.write_u16::<LittleEndian>(0).unwrap();
    }
    out
}

pub fn cube_stl() -> Vec<u8> {
    stl_bytes(&CUBE_TRIANGLES)
}
