use cgmath::Point3;

use crate::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    /// Parallel light shining from `position` towards the origin.
    Directional {
        color: Color,
        intensity: f32,
        position: Point3<f32>,
    },
    /// Light radiating from `position`, fading out to nothing at `distance`.
    /// A distance of zero means no falloff.
    Point {
        color: Color,
        intensity: f32,
        distance: f32,
        position: Point3<f32>,
    },
}

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToneMapping {
    #[default]
    None,
    /// ACES filmic curve applied after scaling by `exposure`.
    Aces { exposure: f32 },
}
