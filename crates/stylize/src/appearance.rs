//! Appearance modes and the cycle a click steps through.
//!
//! Every mode is described by a single [`ModeSpec`] record, and one function,
//! [`apply_mode`], knows how to put any record into a [`Scene`].

use cgmath::Point3;
use lustre_mesh::ShellRole;

use crate::{Blend, Color, Fog, Light, Material, NodeRole, Scene, Side, ToneMapping};

pub const GOLD: u32 = 0xd4af37;
pub const ROSE_GOLD: u32 = 0xb76e79;
pub const STEEL: u32 = 0xa8c7d8;
pub const GRAPHITE: u32 = 0x3a3a3a;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppearanceMode {
    /// Polished metal with a faint translucent halo.
    Metallic { tint: Color },
    /// Cel shading on a pale background with dark ink outlines.
    ToonLight,
    /// Matte black graphic look with light outlines.
    ToonDark,
    /// Unlit, softly graded surface with fog.
    Soft,
}

/// Everything a mode sets when it becomes active.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSpec {
    pub base: Material,
    /// Material for the outer shell, `None` hides it.
    pub outer: Option<Material>,
    /// Material for the inner shell, `None` hides it.
    pub inner: Option<Material>,
    /// Material for the ground plane, `None` hides it.
    pub ground: Option<Material>,
    pub lights: Vec<Light>,
    pub background: Color,
    pub fog: Option<Fog>,
    pub tone_mapping: ToneMapping,
}

impl ModeSpec {
    pub fn shell(&self, role: ShellRole) -> Option<&Material> {
        match role {
            ShellRole::Outer => self.outer.as_ref(),
            ShellRole::Inner => self.inner.as_ref(),
        }
    }
}

fn key_light(color: u32, intensity: f32) -> Light {
    Light::Directional {
        color: Color::from_hex(color),
        intensity,
        position: Point3::new(3.0, 5.0, 4.0),
    }
}

impl AppearanceMode {
    pub fn name(&self) -> &'static str {
        match self {
            AppearanceMode::Metallic { .. } => "metallic",
            AppearanceMode::ToonLight => "toon-light",
            AppearanceMode::ToonDark => "toon-dark",
            AppearanceMode::Soft => "soft",
        }
    }

    pub fn metallic(hex: u32) -> Self {
        AppearanceMode::Metallic {
            tint: Color::from_hex(hex),
        }
    }

    pub fn spec(&self) -> ModeSpec {
        match *self {
            AppearanceMode::Metallic { tint } => ModeSpec {
                base: Material::Physical {
                    color: tint,
                    metalness: 0.8,
                    roughness: 0.3,
                    clearcoat: 0.4,
                    clearcoat_roughness: 0.2,
                    reflectivity: 0.6,
                    side: Side::Double,
                },
                outer: Some(Material::glow(Color::WHITE, 0.25, Blend::Alpha)),
                inner: None,
                ground: Some(Material::Physical {
                    color: Color::from_hex(0x2a2115),
                    metalness: 0.0,
                    roughness: 0.8,
                    clearcoat: 0.0,
                    clearcoat_roughness: 0.0,
                    reflectivity: 0.5,
                    side: Side::Front,
                }),
                lights: vec![
                    Light::Ambient {
                        color: Color::from_hex(0xffe6cc),
                        intensity: 0.6,
                    },
                    key_light(0xfff2cc, 1.2),
                    Light::Point {
                        color: Color::from_hex(0xffddaa),
                        intensity: 0.4,
                        distance: 10.0,
                        position: Point3::new(0.0, 1.0, 0.0),
                    },
                ],
                background: Color::from_hex(0x3a2f1d),
                fog: None,
                tone_mapping: ToneMapping::None,
            },
            AppearanceMode::ToonLight => ModeSpec {
                base: Material::Toon {
                    color: Color::from_hex(0xf2efe6),
                    shade: Color::from_hex(0xa59d8c),
                    steps: 3,
                    side: Side::Front,
                },
                outer: Some(Material::ink(Color::from_hex(0x161412))),
                inner: Some(Material::ink(Color::from_hex(0x161412))),
                ground: Some(Material::Unlit {
                    color: Color::from_hex(0xe2dccf),
                    opacity: 1.0,
                    blend: Blend::Opaque,
                    side: Side::Front,
                    depth_write: true,
                }),
                lights: vec![
                    Light::Ambient {
                        color: Color::WHITE,
                        intensity: 0.5,
                    },
                    key_light(0xffffff, 1.0),
                ],
                background: Color::from_hex(0xf4f1ea),
                fog: None,
                tone_mapping: ToneMapping::None,
            },
            AppearanceMode::ToonDark => ModeSpec {
                base: Material::Toon {
                    color: Color::from_hex(0x2b2b2b),
                    shade: Color::from_hex(0x0c0c0c),
                    steps: 2,
                    side: Side::Front,
                },
                outer: Some(Material::ink(Color::from_hex(0xf5f5f5))),
                inner: Some(Material::ink(Color::from_hex(0xf5f5f5))),
                ground: None,
                lights: vec![
                    Light::Ambient {
                        color: Color::WHITE,
                        intensity: 0.3,
                    },
                    key_light(0xffffff, 1.4),
                ],
                background: Color::from_hex(0x0e0e10),
                fog: None,
                tone_mapping: ToneMapping::None,
            },
            AppearanceMode::Soft => {
                let background = Color::from_hex(0xd8d2c8);
                ModeSpec {
                    base: Material::Shaded {
                        top: Color::from_hex(0xf3e9dc),
                        bottom: Color::from_hex(0x6b5a48),
                        occlusion: 0.6,
                    },
                    outer: None,
                    inner: None,
                    ground: Some(Material::Unlit {
                        color: Color::from_hex(0xc9c1b4),
                        opacity: 1.0,
                        blend: Blend::Opaque,
                        side: Side::Front,
                        depth_write: true,
                    }),
                    lights: Vec::new(),
                    background,
                    fog: Some(Fog {
                        color: background,
                        near: 6.0,
                        far: 14.0,
                    }),
                    tone_mapping: ToneMapping::Aces { exposure: 1.0 },
                }
            }
        }
    }
}

/// Makes `spec` the scene's complete look.
///
/// Lights from whatever was active before are removed first, and every base,
/// shell and ground node gets its material and visibility rewritten, so the
/// result depends only on `spec`. Applying the same spec twice is harmless.
pub fn apply_mode(scene: &mut Scene, spec: &ModeSpec) {
    scene.clear_lights();

    for node in scene.nodes_with_role(NodeRole::Base) {
        node.material = spec.base;
        node.visible = true;
    }
    for role in [ShellRole::Outer, ShellRole::Inner] {
        let material = spec.shell(role).copied();
        for node in scene.nodes_with_role(NodeRole::Shell(role)) {
            if let Some(material) = material {
                node.material = material;
            }
            node.visible = material.is_some();
        }
    }
    for node in scene.nodes_with_role(NodeRole::Ground) {
        if let Some(material) = spec.ground {
            node.material = material;
        }
        node.visible = spec.ground.is_some();
    }

    for light in &spec.lights {
        scene.add_light(*light);
    }
    scene.set_background(spec.background);
    scene.set_fog(spec.fog);
    scene.set_tone_mapping(spec.tone_mapping);
}

/// A fixed, non-empty cycle of modes with one of them active.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeCycle {
    modes: Vec<AppearanceMode>,
    active: usize,
}

impl Default for ModeCycle {
    /// Metallic gold, then light toon, dark toon and soft.
    fn default() -> Self {
        Self {
            modes: vec![
                AppearanceMode::metallic(GOLD),
                AppearanceMode::ToonLight,
                AppearanceMode::ToonDark,
                AppearanceMode::Soft,
            ],
            active: 0,
        }
    }
}

impl ModeCycle {
    /// Returns `None` for an empty list.
    pub fn new(modes: Vec<AppearanceMode>) -> Option<Self> {
        if modes.is_empty() {
            None
        } else {
            Some(Self { modes, active: 0 })
        }
    }

    /// Metallic only, clicking through rose gold, gold, steel and graphite.
    /// Starts on gold.
    pub fn metal_palette() -> Self {
        Self {
            modes: [ROSE_GOLD, GOLD, STEEL, GRAPHITE]
                .into_iter()
                .map(AppearanceMode::metallic)
                .collect(),
            active: 1,
        }
    }

    /// Makes the mode at `index`, wrapped around the cycle, the active one.
    pub fn starting_at(mut self, index: usize) -> Self {
        self.active = index % self.modes.len();
        self
    }

    pub fn modes(&self) -> &[AppearanceMode] {
        &self.modes
    }

    // A cycle is never empty, see `new`.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &AppearanceMode {
        &self.modes[self.active]
    }

    /// Steps to the next mode, wrapping around after the last one.
    pub fn advance(&mut self) -> &AppearanceMode {
        self.active = (self.active + 1) % self.modes.len();
        self.active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;
    use lustre_mesh::Mesh;

    fn scene() -> Scene {
        let mut scene = Scene::new(Color::BLACK);
        let mesh = scene.add_mesh(Mesh::plane(1.0, 1.0));
        for role in [
            NodeRole::Base,
            NodeRole::Shell(ShellRole::Outer),
            NodeRole::Shell(ShellRole::Inner),
            NodeRole::Ground,
        ] {
            scene.add_node(Node::new(role, mesh));
        }
        scene
    }

    fn node(scene: &Scene, role: NodeRole) -> &Node {
        scene.nodes().iter().find(|n| n.role == role).unwrap()
    }

    #[test]
    fn cycle_wraps_around() {
        let mut cycle = ModeCycle::default();
        assert_eq!(0, cycle.index());
        for n in 1..=9 {
            cycle.advance();
            assert_eq!(n % cycle.len(), cycle.index());
        }
    }

    #[test]
    fn empty_cycle_is_rejected() {
        assert_eq!(None, ModeCycle::new(Vec::new()));
        let single = ModeCycle::new(vec![AppearanceMode::Soft]).unwrap();
        let mut cycle = single.clone();
        cycle.advance();
        assert_eq!(single, cycle);
    }

    #[test]
    fn start_index_wraps() {
        let cycle = ModeCycle::default().starting_at(6);
        assert_eq!(2, cycle.index());
        assert_eq!(&AppearanceMode::ToonDark, cycle.active());
    }

    #[test]
    fn metal_palette_starts_on_gold() {
        let mut cycle = ModeCycle::metal_palette();
        assert_eq!(&AppearanceMode::metallic(GOLD), cycle.active());
        assert_eq!(&AppearanceMode::metallic(STEEL), cycle.advance());
        assert_eq!(&AppearanceMode::metallic(GRAPHITE), cycle.advance());
        assert_eq!(&AppearanceMode::metallic(ROSE_GOLD), cycle.advance());
    }

    #[test]
    fn apply_sets_materials_and_visibility() {
        let mut scene = scene();
        let spec = AppearanceMode::metallic(GOLD).spec();
        apply_mode(&mut scene, &spec);

        assert_eq!(spec.base, node(&scene, NodeRole::Base).material);
        let outer = node(&scene, NodeRole::Shell(ShellRole::Outer));
        assert!(outer.visible);
        assert_eq!(spec.outer, Some(outer.material));
        assert!(!node(&scene, NodeRole::Shell(ShellRole::Inner)).visible);
        assert_eq!(spec.background, scene.background());
        assert_eq!(3, scene.lights().count());
    }

    #[test]
    fn switching_leaves_nothing_behind() {
        let mut scene = scene();
        let modes = ModeCycle::default();
        // Every ordered pair of modes, including a mode after itself.
        for from in modes.modes() {
            for to in modes.modes() {
                apply_mode(&mut scene, &from.spec());
                let spec = to.spec();
                apply_mode(&mut scene, &spec);

                let lights: Vec<Light> = scene.lights().map(|(_, l)| *l).collect();
                assert_eq!(spec.lights, lights, "{} -> {}", from.name(), to.name());
                assert_eq!(spec.base, node(&scene, NodeRole::Base).material);
                for role in [ShellRole::Outer, ShellRole::Inner] {
                    let shell = node(&scene, NodeRole::Shell(role));
                    assert_eq!(spec.shell(role).is_some(), shell.visible);
                    if let Some(material) = spec.shell(role) {
                        assert_eq!(*material, shell.material);
                    }
                }
                assert_eq!(spec.ground.is_some(), node(&scene, NodeRole::Ground).visible);
                assert_eq!(spec.fog, scene.fog());
                assert_eq!(spec.tone_mapping, scene.tone_mapping());
            }
        }
    }

    #[test]
    fn toon_modes_use_back_face_ink() {
        for mode in [AppearanceMode::ToonLight, AppearanceMode::ToonDark] {
            let spec = mode.spec();
            let outer = spec.outer.unwrap();
            assert_eq!(Side::Back, outer.side());
            assert!(!outer.is_transparent());
        }
    }
}
