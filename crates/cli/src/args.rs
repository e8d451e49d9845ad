use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitArg {
    /// The camera follows every pointer movement.
    Pointer,
    /// The camera orbits while the left button is held.
    Drag,
}

#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    pub stl_path: PathBuf,

    #[arg(long, value_enum, default_value_t = OrbitArg::Pointer)]
    pub orbit: OrbitArg,

    /// Click through metal tints instead of appearance modes.
    #[arg(long)]
    pub palette: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShellArgs {
    pub stl_path: PathBuf,

    /// Distance to move every vertex along its normal. Negative values
    /// shrink the model.
    #[arg(long, allow_negative_numbers = true)]
    pub offset: f32,

    /// Output path for the shell, written as binary STL.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep duplicate vertices, giving every facet its own hard normals.
    #[arg(long)]
    pub no_weld: bool,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open a model in the viewer.
    View(ViewArgs),
    /// Write the offset shell of a model to a file.
    Shell(ShellArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_offset() {
        let args = Args::try_parse_from([
            "lustre", "shell", "in.stl", "--offset", "-0.25", "-o", "out.stl",
        ])
        .unwrap();
        let Commands::Shell(shell) = args.command else {
            panic!("expected shell command");
        };
        assert_eq!(-0.25, shell.offset);
        assert_eq!(PathBuf::from("out.stl"), shell.output);
        assert!(!shell.no_weld);
    }

    #[test]
    fn view_defaults() {
        let args = Args::try_parse_from(["lustre", "view", "model.stl"]).unwrap();
        let Commands::View(view) = args.command else {
            panic!("expected view command");
        };
        assert_eq!(OrbitArg::Pointer, view.orbit);
        assert!(!view.palette);
    }

    #[test]
    fn shell_requires_output() {
        assert!(Args::try_parse_from(["lustre", "shell", "in.stl", "--offset", "1"]).is_err());
    }
}
