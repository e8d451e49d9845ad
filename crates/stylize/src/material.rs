use crate::Color;

/// Which faces of a mesh are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    /// Only faces pointing away from the camera. On an outer shell this
    /// leaves a rim around the silhouette of whatever it encloses.
    Back,
    Double,
}

/// How a fragment is combined with what is already on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blend {
    Opaque,
    Alpha,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// A flat color, unaffected by lights.
    Unlit {
        color: Color,
        opacity: f32,
        blend: Blend,
        side: Side,
        depth_write: bool,
    },
    /// Physically shaded surface, used for the metallic looks.
    Physical {
        color: Color,
        metalness: f32,
        roughness: f32,
        clearcoat: f32,
        clearcoat_roughness: f32,
        reflectivity: f32,
        side: Side,
    },
    /// Cel shading: diffuse light is quantized into `steps` bands between
    /// `shade` and `color`.
    Toon {
        color: Color,
        shade: Color,
        steps: u32,
        side: Side,
    },
    /// Light-independent shading from the vertex height: `top` at the top of
    /// the mesh fading to `bottom`, with the lowest part darkened by up to
    /// `occlusion` to suggest contact shadowing.
    Shaded {
        top: Color,
        bottom: Color,
        occlusion: f32,
    },
}

impl Default for Material {
    fn default() -> Self {
        Material::Unlit {
            color: Color::WHITE,
            opacity: 1.0,
            blend: Blend::Opaque,
            side: Side::Front,
            depth_write: true,
        }
    }
}

impl Material {
    /// Solid outline ink: only the back faces of a shell, drawn opaque.
    pub fn ink(color: Color) -> Self {
        Material::Unlit {
            color,
            opacity: 1.0,
            blend: Blend::Opaque,
            side: Side::Back,
            depth_write: true,
        }
    }

    /// A see-through halo that does not hide what is behind it.
    pub fn glow(color: Color, opacity: f32, blend: Blend) -> Self {
        Material::Unlit {
            color,
            opacity,
            blend,
            side: Side::Double,
            depth_write: false,
        }
    }

    pub fn side(&self) -> Side {
        match *self {
            Material::Unlit { side, .. }
            | Material::Physical { side, .. }
            | Material::Toon { side, .. } => side,
            Material::Shaded { .. } => Side::Front,
        }
    }

    pub fn blend(&self) -> Blend {
        match *self {
            Material::Unlit { blend, .. } => blend,
            _ => Blend::Opaque,
        }
    }

    pub fn depth_write(&self) -> bool {
        match *self {
            Material::Unlit { depth_write, .. } => depth_write,
            _ => true,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.blend() != Blend::Opaque
    }
}
