use std::path::PathBuf;

use crate::{Color, ModeCycle, OrbitKind};

/// Offsets of the shells wrapped around the model, in model units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellConfig {
    pub outer: Option<f32>,
    pub inner: Option<f32>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            outer: Some(0.03),
            inner: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundConfig {
    /// Edge length of the square plane.
    pub size: f32,
    pub height: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            height: -0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// File path on native, a path relative to the page's `res/` on wasm.
    pub model_path: PathBuf,
    /// Uniform scale applied to the model after centering it.
    pub model_scale: f32,
    /// Height the centered model and its shells are raised to.
    pub lift: f32,
    /// Merge coincident vertices before generating shells.
    pub weld: bool,
    pub shells: ShellConfig,
    pub ground: Option<GroundConfig>,
    pub orbit: OrbitKind,
    pub cycle: ModeCycle,
    /// Background shown when the model could not be loaded.
    pub error_color: Color,
    pub fov_degrees: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model.stl"),
            model_scale: 0.05,
            lift: 0.5,
            weld: true,
            shells: ShellConfig::default(),
            ground: Some(GroundConfig::default()),
            orbit: OrbitKind::default(),
            cycle: ModeCycle::default(),
            error_color: Color::from_hex(0x5a1a1a),
            fov_degrees: 60.0,
        }
    }
}
