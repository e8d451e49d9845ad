//! CPU side mirrors of the uniform blocks in `scene.wgsl`.
//!
//! Every field is a `vec4` or a `mat4x4` so the Rust layout matches the WGSL
//! uniform layout without any padding rules coming into play.

use lustre::{Camera, Color, Light, Material, Node, Scene, ToneMapping};

use crate::OPENGL_TO_WGPU_MATRIX;

/// Lights beyond this many are not drawn.
pub const MAX_LIGHTS: usize = 4;

const LIGHT_AMBIENT: f32 = 0.0;
const LIGHT_DIRECTIONAL: f32 = 1.0;
const LIGHT_POINT: f32 = 2.0;

pub const MATERIAL_UNLIT: f32 = 0.0;
pub const MATERIAL_PHYSICAL: f32 = 1.0;
pub const MATERIAL_TOON: f32 = 2.0;
pub const MATERIAL_SHADED: f32 = 3.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct LightUniform {
    /// Color premultiplied by intensity.
    pub color: [f32; 4],
    /// xyz is the position, w the kind of light.
    pub position: [f32; 4],
    /// x is the point light cutoff distance.
    pub params: [f32; 4],
}

fn scaled(color: Color, intensity: f32) -> [f32; 4] {
    [
        color.r * intensity,
        color.g * intensity,
        color.b * intensity,
        1.0,
    ]
}

impl From<&Light> for LightUniform {
    fn from(light: &Light) -> Self {
        match *light {
            Light::Ambient { color, intensity } => Self {
                color: scaled(color, intensity),
                position: [0.0, 0.0, 0.0, LIGHT_AMBIENT],
                params: [0.0; 4],
            },
            Light::Directional {
                color,
                intensity,
                position,
            } => Self {
                color: scaled(color, intensity),
                position: [position.x, position.y, position.z, LIGHT_DIRECTIONAL],
                params: [0.0; 4],
            },
            Light::Point {
                color,
                intensity,
                distance,
                position,
            } => Self {
                color: scaled(color, intensity),
                position: [position.x, position.y, position.z, LIGHT_POINT],
                params: [distance, 0.0, 0.0, 0.0],
            },
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct GlobalsUniform {
    // We can't use cgmath with bytemuck directly so we'll have
    // to convert the Matrix4 into a 4x4 f32 array
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub fog_color: [f32; 4],
    /// near, far, enabled.
    pub fog: [f32; 4],
    /// tone mapping enabled, exposure, light count.
    pub settings: [f32; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
}

static_assertions::const_assert_eq!(std::mem::size_of::<GlobalsUniform>() % 16, 0);

impl GlobalsUniform {
    pub fn new(camera: &Camera, scene: &Scene) -> Self {
        let mut lights = [LightUniform::from(&Light::Ambient {
            color: Color::BLACK,
            intensity: 0.0,
        }); MAX_LIGHTS];
        let mut count = 0;
        for (slot, (_, light)) in lights.iter_mut().zip(scene.lights()) {
            *slot = light.into();
            count += 1;
        }

        let (fog_color, fog) = match scene.fog() {
            Some(fog) => (fog.color.to_array(), [fog.near, fog.far, 1.0, 0.0]),
            None => ([0.0; 4], [0.0; 4]),
        };
        let settings = match scene.tone_mapping() {
            ToneMapping::None => [0.0, 1.0, count as f32, 0.0],
            ToneMapping::Aces { exposure } => [1.0, exposure, count as f32, 0.0],
        };

        Self {
            view_proj: (OPENGL_TO_WGPU_MATRIX * camera.build_view_projection_matrix()).into(),
            eye: [camera.eye.x, camera.eye.y, camera.eye.z, 1.0],
            fog_color,
            fog,
            settings,
            lights,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    /// Surface color, alpha is the opacity.
    pub color: [f32; 4],
    /// Dark end of toon and height shading.
    pub shade: [f32; 4],
    /// x is the material kind, the rest depends on it.
    pub params: [f32; 4],
    pub extra: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<NodeUniform>() % 16, 0);

impl NodeUniform {
    /// `heights` is the lowest and highest model space y of the node's mesh,
    /// which height shading spreads its gradient over.
    pub fn new(node: &Node, heights: (f32, f32)) -> Self {
        let (lo, hi) = heights;
        let (color, shade, params, extra) = match node.material {
            Material::Unlit { color, opacity, .. } => (
                color.with_alpha(opacity).to_array(),
                [0.0; 4],
                [MATERIAL_UNLIT, 0.0, 0.0, 0.0],
                [0.0; 4],
            ),
            Material::Physical {
                color,
                metalness,
                roughness,
                clearcoat,
                clearcoat_roughness,
                reflectivity,
                ..
            } => (
                color.to_array(),
                [0.0; 4],
                [MATERIAL_PHYSICAL, metalness, roughness, clearcoat],
                [clearcoat_roughness, reflectivity, 0.0, 0.0],
            ),
            Material::Toon {
                color,
                shade,
                steps,
                ..
            } => (
                color.to_array(),
                shade.to_array(),
                [MATERIAL_TOON, steps.max(1) as f32, 0.0, 0.0],
                [0.0; 4],
            ),
            Material::Shaded {
                top,
                bottom,
                occlusion,
            } => (
                top.to_array(),
                bottom.to_array(),
                [MATERIAL_SHADED, occlusion, 0.0, 0.0],
                [0.0, 0.0, lo, hi],
            ),
        };
        Self {
            model: node.transform.into(),
            color,
            shade,
            params,
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;
    use float_eq::assert_float_eq;
    use lustre::{AppearanceMode, Fog, NodeRole, GOLD};
    use lustre_mesh::Mesh;

    fn ambient(intensity: f32) -> Light {
        Light::Ambient {
            color: Color::WHITE,
            intensity,
        }
    }

    #[test]
    fn lights_are_truncated() {
        let mut scene = Scene::new(Color::BLACK);
        for i in 0..MAX_LIGHTS + 2 {
            scene.add_light(ambient(i as f32));
        }
        let globals = GlobalsUniform::new(&Camera::new(60.0, 1.0), &scene);
        assert_eq!(MAX_LIGHTS as f32, globals.settings[2]);
        assert_eq!(3.0, globals.lights[3].color[0]);
    }

    #[test]
    fn light_kinds() {
        let point = LightUniform::from(&Light::Point {
            color: Color::WHITE,
            intensity: 0.5,
            distance: 10.0,
            position: Point3::new(0.0, 1.0, 0.0),
        });
        assert_eq!([0.0, 1.0, 0.0, LIGHT_POINT], point.position);
        assert_eq!(10.0, point.params[0]);
        assert_eq!([0.5, 0.5, 0.5, 1.0], point.color);

        let ambient = LightUniform::from(&ambient(2.0));
        assert_eq!(LIGHT_AMBIENT, ambient.position[3]);
    }

    #[test]
    fn fog_and_tone_mapping() {
        let mut scene = Scene::new(Color::BLACK);
        let globals = GlobalsUniform::new(&Camera::new(60.0, 1.0), &scene);
        assert_eq!(0.0, globals.fog[2]);
        assert_eq!(0.0, globals.settings[0]);

        scene.set_fog(Some(Fog {
            color: Color::WHITE,
            near: 6.0,
            far: 14.0,
        }));
        scene.set_tone_mapping(ToneMapping::Aces { exposure: 1.5 });
        let globals = GlobalsUniform::new(&Camera::new(60.0, 1.0), &scene);
        assert_eq!([6.0, 14.0, 1.0, 0.0], globals.fog);
        assert_eq!(1.0, globals.settings[0]);
        assert_float_eq!(globals.settings[1], 1.5, abs <= 1e-6);
    }

    #[test]
    fn materials_pick_their_kind() {
        let mut scene = Scene::new(Color::BLACK);
        let mesh = scene.add_mesh(Mesh::plane(1.0, 1.0));
        let mut node = Node::new(NodeRole::Base, mesh);

        node.material = AppearanceMode::metallic(GOLD).spec().base;
        assert_eq!(MATERIAL_PHYSICAL, NodeUniform::new(&node, (0.0, 1.0)).params[0]);

        node.material = AppearanceMode::ToonLight.spec().base;
        let uniform = NodeUniform::new(&node, (0.0, 1.0));
        assert_eq!([MATERIAL_TOON, 3.0, 0.0, 0.0], uniform.params);

        node.material = AppearanceMode::Soft.spec().base;
        let uniform = NodeUniform::new(&node, (-2.0, 5.0));
        assert_eq!(MATERIAL_SHADED, uniform.params[0]);
        assert_eq!([-2.0, 5.0], [uniform.extra[2], uniform.extra[3]]);

        node.material = Material::glow(Color::WHITE, 0.25, lustre::Blend::Alpha);
        let uniform = NodeUniform::new(&node, (0.0, 1.0));
        assert_eq!(MATERIAL_UNLIT, uniform.params[0]);
        assert_eq!(0.25, uniform.color[3]);
    }
}
