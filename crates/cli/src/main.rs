use clap::Parser;

mod args;
mod shell;
mod view;

use args::{Args, Commands};

fn main() -> anyhow::Result<()> {
    lustre_viewer::init_logging();

    let args = Args::parse();
    match args.command {
        Commands::View(args) => view::view_command(args),
        Commands::Shell(args) => shell::shell_command(&args),
    }
}
