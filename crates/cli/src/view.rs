use lustre::{ModeCycle, OrbitKind, ViewerConfig};

use crate::args::{OrbitArg, ViewArgs};

pub fn viewer_config(args: &ViewArgs) -> ViewerConfig {
    let mut config = ViewerConfig {
        model_path: args.stl_path.clone(),
        orbit: match args.orbit {
            OrbitArg::Pointer => OrbitKind::PointerFollow,
            OrbitArg::Drag => OrbitKind::Drag,
        },
        ..ViewerConfig::default()
    };
    if args.palette {
        config.cycle = ModeCycle::metal_palette();
    }
    config
}

pub fn view_command(args: ViewArgs) -> anyhow::Result<()> {
    pollster::block_on(lustre_viewer::run_with(viewer_config(&args)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn maps_arguments() {
        let config = viewer_config(&ViewArgs {
            stl_path: PathBuf::from("statue.stl"),
            orbit: OrbitArg::Drag,
            palette: true,
        });
        assert_eq!(PathBuf::from("statue.stl"), config.model_path);
        assert_eq!(OrbitKind::Drag, config.orbit);
        assert_eq!(ModeCycle::metal_palette(), config.cycle);
    }
}
