use anyhow::Context;
use lustre_mesh::build_shell;

use crate::args::ShellArgs;

pub fn shell_command(args: &ShellArgs) -> anyhow::Result<()> {
    let mesh = lustre::read_model(&args.stl_path)
        .with_context(|| format!("failed to load {}", args.stl_path.display()))?;
    let mesh = if args.no_weld { mesh } else { mesh.weld() };

    let shell = build_shell(&mesh, args.offset);
    lustre_stl::write_stl(&args.output, &shell)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    log::info!(
        "wrote shell at offset {} with {} vertices to {}",
        args.offset,
        shell.vertex_count(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use lustre_mesh::{Mesh, TriangleMesh};
    use std::path::Path;

    fn write_cube(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("cube.stl");
        std::fs::write(&path, lustre_test_data::cube_stl()).unwrap();
        path
    }

    fn run(dir: &Path, offset: f32, no_weld: bool) -> Mesh {
        let output = dir.join("shell.stl");
        shell_command(&ShellArgs {
            stl_path: write_cube(dir),
            offset,
            output: output.clone(),
            no_weld,
        })
        .unwrap();
        lustre_stl::read_stl(output).unwrap()
    }

    #[test]
    fn welded_shell_rounds_corners() {
        let dir = tempfile::tempdir().unwrap();
        let shell = run(dir.path(), 0.5, false);
        assert_eq!(12, shell.triangle_count());
        // Welded corners move diagonally, so no face is pushed the full
        // offset along its own axis.
        let bounds = shell.bounds().unwrap();
        assert!(bounds.min.x < 0.0 && bounds.min.x > -0.5, "{:?}", bounds);
        assert!(bounds.max.y > 20.0 && bounds.max.y < 20.5, "{:?}", bounds);
    }

    #[test]
    fn unwelded_shell_moves_facets_apart() {
        let dir = tempfile::tempdir().unwrap();
        let shell = run(dir.path(), 0.5, true);
        assert_eq!(12, shell.triangle_count());
        let bounds = shell.bounds().unwrap();
        assert_float_eq!(bounds.min.x, -0.5, abs <= 1e-5);
        assert_float_eq!(bounds.max.z, 20.5, abs <= 1e-5);
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = shell_command(&ShellArgs {
            stl_path: dir.path().join("nope.stl"),
            offset: 0.1,
            output: dir.path().join("out.stl"),
            no_weld: false,
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("nope.stl"));
        assert!(!dir.path().join("out.stl").exists());
    }
}
