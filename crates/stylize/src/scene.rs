//! The retained scene the renderer draws every frame.
//!
//! The scene only describes what to draw: meshes, the nodes placing them,
//! materials, lights and background. Every mutation bumps [`Scene::revision`]
//! so a renderer can tell when its uploaded copy is out of date.

use cgmath::{Matrix4, SquareMatrix};
use lustre_mesh::{Mesh, ShellRole};

use crate::{Color, Fog, Light, Material, ToneMapping};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(u64);

/// What a node stands for, which is how appearance modes find it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Base,
    Shell(ShellRole),
    Ground,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub role: NodeRole,
    pub mesh: MeshId,
    pub transform: Matrix4<f32>,
    pub material: Material,
    pub visible: bool,
    /// Nodes are drawn in ascending order, opaque nodes before transparent ones.
    pub render_order: i32,
}

impl Node {
    pub fn new(role: NodeRole, mesh: MeshId) -> Self {
        Self {
            role,
            mesh,
            transform: Matrix4::identity(),
            material: Material::default(),
            visible: true,
            render_order: 0,
        }
    }
}

#[derive(Debug)]
pub struct Scene {
    meshes: Vec<Mesh>,
    nodes: Vec<Node>,
    lights: Vec<(LightId, Light)>,
    next_light: u64,
    background: Color,
    fog: Option<Fog>,
    tone_mapping: ToneMapping,
    revision: u64,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            meshes: Vec::new(),
            nodes: Vec::new(),
            lights: Vec::new(),
            next_light: 0,
            background,
            fog: None,
            tone_mapping: ToneMapping::None,
            revision: 0,
        }
    }

    /// Increases whenever anything in the scene changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.touch();
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.0]
    }

    /// Iterates every mesh along with its id, in insertion order.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().enumerate().map(|(i, m)| (MeshId(i), m))
    }

    pub fn add_node(&mut self, node: Node) {
        self.touch();
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Visible nodes in the order they should be drawn.
    pub fn draw_order(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes.iter().filter(|n| n.visible).collect();
        // Stable, so equal keys keep insertion order.
        nodes.sort_by_key(|n| (n.material.is_transparent(), n.render_order));
        nodes
    }

    /// Mutable access to every node with `role`.
    pub fn nodes_with_role(&mut self, role: NodeRole) -> impl Iterator<Item = &mut Node> {
        self.touch();
        self.nodes.iter_mut().filter(move |n| n.role == role)
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.touch();
        let id = LightId(self.next_light);
        self.next_light += 1;
        self.lights.push((id, light));
        id
    }

    pub fn remove_light(&mut self, id: LightId) -> Option<Light> {
        let index = self.lights.iter().position(|(l, _)| *l == id)?;
        self.touch();
        Some(self.lights.remove(index).1)
    }

    /// Removes every light. Safe to call on a scene without lights.
    pub fn clear_lights(&mut self) {
        self.touch();
        self.lights.clear();
    }

    pub fn lights(&self) -> impl Iterator<Item = (LightId, &Light)> {
        self.lights.iter().map(|(id, l)| (*id, l))
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.touch();
        self.background = background;
    }

    pub fn fog(&self) -> Option<Fog> {
        self.fog
    }

    pub fn set_fog(&mut self, fog: Option<Fog>) {
        self.touch();
        self.fog = fog;
    }

    pub fn tone_mapping(&self) -> ToneMapping {
        self.tone_mapping
    }

    pub fn set_tone_mapping(&mut self, tone_mapping: ToneMapping) {
        self.touch();
        self.tone_mapping = tone_mapping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Blend;

    fn light() -> Light {
        Light::Ambient {
            color: Color::WHITE,
            intensity: 1.0,
        }
    }

    #[test]
    fn lights_are_removed_by_id() {
        let mut scene = Scene::new(Color::BLACK);
        let a = scene.add_light(light());
        let b = scene.add_light(light());
        assert_ne!(a, b);
        assert!(scene.remove_light(a).is_some());
        assert!(scene.remove_light(a).is_none());
        assert_eq!(vec![b], scene.lights().map(|(id, _)| id).collect::<Vec<_>>());
        scene.clear_lights();
        scene.clear_lights();
        assert_eq!(0, scene.lights().count());
        // Ids are never reused.
        assert_ne!(b, scene.add_light(light()));
    }

    #[test]
    fn mutations_bump_revision() {
        let mut scene = Scene::new(Color::BLACK);
        let r0 = scene.revision();
        scene.set_background(Color::WHITE);
        let r1 = scene.revision();
        assert!(r1 > r0);
        scene.add_light(light());
        assert!(scene.revision() > r1);
    }

    #[test]
    fn transparent_nodes_draw_last() {
        let mut scene = Scene::new(Color::BLACK);
        let mesh = scene.add_mesh(Mesh::plane(1.0, 1.0));

        let mut glow = Node::new(NodeRole::Shell(ShellRole::Outer), mesh);
        glow.material = Material::glow(Color::WHITE, 0.25, Blend::Alpha);
        glow.render_order = -5;
        scene.add_node(glow);

        let mut hidden = Node::new(NodeRole::Ground, mesh);
        hidden.visible = false;
        scene.add_node(hidden);

        let mut base = Node::new(NodeRole::Base, mesh);
        base.render_order = 1;
        scene.add_node(base);

        let roles: Vec<_> = scene.draw_order().iter().map(|n| n.role).collect();
        assert_eq!(
            vec![NodeRole::Base, NodeRole::Shell(ShellRole::Outer)],
            roles
        );
    }
}
