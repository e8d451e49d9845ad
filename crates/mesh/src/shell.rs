//! Offset shells used to fake outlines and glows.
//!
//! A shell is a copy of a surface pushed out (or pulled in) along its vertex
//! normals. Drawn behind the original with only its back faces visible it
//! reads as an ink outline; drawn translucent on top it reads as a glow.

use crate::{Mesh, TriangleMesh};

/// Which side of the source surface a shell sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellRole {
    /// Built with a positive offset, enclosing the source.
    Outer,
    /// Built with a negative offset, enclosed by the source.
    Inner,
}

impl ShellRole {
    /// The role a shell built with `offset` plays.
    pub fn of_offset(offset: f32) -> Self {
        if offset < 0.0 {
            ShellRole::Inner
        } else {
            ShellRole::Outer
        }
    }
}

/// Builds a shell around `source` at a signed distance of `offset`.
///
/// Normals are recomputed from the topology on a private copy first, so stale
/// normals on `source` never skew the displacement. Every vertex `i` then
/// moves to `position[i] + normal[i] * offset`. The returned mesh owns its
/// buffers, has exactly the topology of `source`, and carries normals
/// computed for its own shape.
///
/// An `offset` of zero yields a shell that coincides with `source`.
pub fn build_shell(source: &Mesh, offset: f32) -> Mesh {
    let mut refreshed = source.clone();
    refreshed.compute_vertex_normals();
    let shell = refreshed.displaced(offset);
    log::debug!(
        "built {:?} shell at {}: {} vertices, {} triangles",
        ShellRole::of_offset(offset),
        offset,
        shell.vertex_count(),
        shell.triangle_count()
    );
    shell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector3;

    #[test]
    fn offset_sign_picks_role() {
        assert_eq!(ShellRole::Outer, ShellRole::of_offset(0.03));
        assert_eq!(ShellRole::Outer, ShellRole::of_offset(0.0));
        assert_eq!(ShellRole::Inner, ShellRole::of_offset(-0.01));
    }

    #[test]
    fn stale_normals_are_ignored() {
        // Loader normals pointing sideways; the surface itself faces +z.
        let source = Mesh::from_parts(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            vec![Vector3::unit_x(); 3],
            None,
        )
        .unwrap();
        let shell = build_shell(&source, 0.5);
        for (s, p) in shell.positions().iter().zip(source.positions()) {
            assert_eq!(*p + Vector3::new(0.0, 0.0, 0.5), *s);
        }
        // The source is untouched, stale normals and all.
        assert_eq!(&[Vector3::unit_x(); 3][..], source.normals());
    }
}
