use cgmath::InnerSpace;
use float_eq::assert_float_eq;
use lustre_mesh::{build_shell, Mesh, Vector3};
use lustre_test_data::{uv_sphere, TestModel, OCTAHEDRON, QUAD};

fn mesh(model: &TestModel) -> Mesh {
    let positions = model.positions.iter().map(|p| (*p).into()).collect();
    Mesh::new(positions, Some(model.indices.to_vec())).unwrap()
}

fn sphere() -> Mesh {
    let (positions, indices) = uv_sphere(2.0, 12, 16);
    Mesh::new(positions.into_iter().map(Vector3::from).collect(), Some(indices)).unwrap()
}

fn assert_close(a: &[Vector3], b: &[Vector3], tolerance: f32) {
    assert_eq!(a.len(), b.len());
    for (a, b) in a.iter().zip(b) {
        assert_float_eq!(a.x, b.x, abs <= tolerance);
        assert_float_eq!(a.y, b.y, abs <= tolerance);
        assert_float_eq!(a.z, b.z, abs <= tolerance);
    }
}

#[test]
fn quad_shell_moves_along_z() {
    let quad = mesh(&QUAD);
    assert!(quad.normals().iter().all(|n| *n == Vector3::unit_z()));

    let shell = build_shell(&quad, 0.1);
    for (s, p) in shell.positions().iter().zip(quad.positions()) {
        assert_eq!(*p + Vector3::new(0.0, 0.0, 0.1), *s);
    }
}

#[test]
fn shell_preserves_topology() {
    for source in [mesh(&QUAD), mesh(&OCTAHEDRON), sphere()] {
        for offset in [0.03, -0.01, 1.5] {
            let shell = build_shell(&source, offset);
            assert_eq!(source.vertex_count(), shell.vertex_count());
            assert_eq!(source.indices(), shell.indices());
        }
    }
}

#[test]
fn shell_vertices_move_by_offset() {
    let source = sphere();
    for offset in [0.05f32, -0.05] {
        let shell = build_shell(&source, offset);
        for (s, p) in shell.positions().iter().zip(source.positions()) {
            assert_float_eq!((*s - *p).magnitude(), offset.abs(), abs <= 1e-5);
        }
    }
}

#[test]
fn sphere_poles_move_along_the_axis() {
    let source = sphere();
    let shell = build_shell(&source, 0.05);
    let top = source.positions().iter().position(|p| p.y == 2.0).unwrap();
    let bottom = source.positions().iter().position(|p| p.y == -2.0).unwrap();
    assert_close(
        &[Vector3::new(0.0, 2.05, 0.0), Vector3::new(0.0, -2.05, 0.0)],
        &[shell.positions()[top], shell.positions()[bottom]],
        1e-5,
    );
}

#[test]
fn outer_shell_encloses_inner_shell() {
    let source = sphere();
    let outer = build_shell(&source, 0.1);
    let inner = build_shell(&source, -0.1);
    for ((o, i), p) in outer
        .positions()
        .iter()
        .zip(inner.positions())
        .zip(source.positions())
    {
        assert!(o.magnitude() > p.magnitude());
        assert!(i.magnitude() < p.magnitude());
    }
}

#[test]
fn zero_offset_is_identity() {
    for source in [mesh(&QUAD), mesh(&OCTAHEDRON), sphere()] {
        let shell = build_shell(&source, 0.0);
        assert_eq!(source.positions(), shell.positions());
    }
}

#[test]
fn shell_does_not_alias_source() {
    let source = mesh(&OCTAHEDRON);
    let before = source.clone();
    let mut shell = build_shell(&source, 0.2);
    shell.translate(Vector3::new(5.0, 0.0, 0.0));
    assert_eq!(before, source);
}

#[test]
fn octahedron_shell_is_scaled_octahedron() {
    let source = mesh(&OCTAHEDRON);
    let shell = build_shell(&source, 0.5);
    let scaled: Vec<Vector3> = source.positions().iter().map(|p| *p * 1.5).collect();
    assert_close(&scaled, shell.positions(), 1e-6);
    assert_close(source.normals(), shell.normals(), 1e-6);
}

#[test]
fn opposite_offset_approximately_inverts() {
    let source = mesh(&OCTAHEDRON);
    let back = build_shell(&build_shell(&source, 0.3), -0.3);
    assert_close(source.positions(), back.positions(), 1e-5);

    let source = sphere();
    let back = build_shell(&build_shell(&source, 0.01), -0.01);
    assert_close(source.positions(), back.positions(), 1e-3);
}

#[test]
fn negated_normals_undo_displacement() {
    let source = sphere();
    let shell = source.displaced(0.2);

    let negated = source.normals().iter().map(|n| -*n).collect();
    let flipped =
        Mesh::from_parts(shell.positions().to_vec(), negated, shell.indices().map(<[u32]>::to_vec))
            .unwrap();
    let back = flipped.displaced(0.2);
    assert_close(source.positions(), back.positions(), 1e-5);
}

#[test]
fn welded_soup_gets_smooth_shell() {
    // The octahedron as a triangle soup: every face has its own corners, so
    // an unwelded shell splits apart into separate facets.
    let indexed = mesh(&OCTAHEDRON);
    let soup = Mesh::new(indexed.triangles().flat_map(|t| [t.p0, t.p1, t.p2]).collect(), None)
        .unwrap();

    let split = build_shell(&soup, 0.5);
    let corners: Vec<_> = split
        .positions()
        .iter()
        .filter(|p| (p.x - 1.0).abs() < 0.5 && p.y.abs() < 0.5 && p.z.abs() < 0.5)
        .collect();
    assert!(corners.windows(2).any(|w| w[0] != w[1]));

    let welded = soup.weld();
    assert_eq!(6, welded.vertex_count());
    let shell = build_shell(&welded, 0.5);
    let scaled: Vec<Vector3> = welded.positions().iter().map(|p| *p * 1.5).collect();
    assert_close(&scaled, shell.positions(), 1e-6);
}
