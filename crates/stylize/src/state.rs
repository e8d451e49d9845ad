//! Everything the viewer knows between frames, and how input changes it.

use cgmath::{Matrix4, Vector3};
use lustre_mesh::{build_shell, Aabb, Mesh, ShellRole};

use crate::{
    apply_mode, Camera, DragOrbit, LoadError, ModeCycle, Node, NodeRole, OrbitDriver, OrbitKind,
    PointerFollow, Scene, ViewerConfig,
};

/// With the drag orbit, a press and release further apart than this is a
/// drag, not a click.
const CLICK_SLOP: f32 = 4.0;

const ORBIT_RADIUS: f32 = 4.0;

#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(LoadError),
}

#[derive(Debug)]
pub enum ViewerEvent {
    /// Pointer position in physical pixels.
    PointerMoved { x: f32, y: f32 },
    /// The primary button went down or up.
    PointerButton { pressed: bool },
    Scroll { delta: f32 },
    Resized { width: u32, height: u32 },
    ModelLoaded(Result<Mesh, LoadError>),
    /// About to draw; advance anything animated.
    Frame,
}

#[derive(Debug, Default)]
struct Pointer {
    position: Option<(f32, f32)>,
    pressed_at: Option<(f32, f32)>,
}

impl Pointer {
    /// Records a new position and returns the movement since the last one.
    fn moved_to(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let delta = self.position.map(|(px, py)| (x - px, y - py));
        self.position = Some((x, y));
        delta
    }

    fn press(&mut self) {
        self.pressed_at = Some(self.position.unwrap_or_default());
    }

    /// Returns whether the release completes a click. Without a `slop` any
    /// release after a press is a click, however far the pointer travelled.
    fn release(&mut self, slop: Option<f32>) -> bool {
        let Some((px, py)) = self.pressed_at.take() else {
            return false;
        };
        let (x, y) = self.position.unwrap_or_default();
        slop.map_or(true, |slop| (x - px).hypot(y - py) < slop)
    }
}

#[derive(Debug)]
pub struct ViewerState {
    config: ViewerConfig,
    load: LoadState,
    scene: Scene,
    modes: ModeCycle,
    orbit: OrbitDriver,
    camera: Camera,
    pointer: Pointer,
    viewport: (u32, u32),
}

impl ViewerState {
    pub fn new(config: ViewerConfig, width: u32, height: u32) -> Self {
        let mut camera = Camera::new(config.fov_degrees, 1.0);
        camera.resize(width, height, config.fov_degrees);

        let modes = config.cycle.clone();
        let scene = Scene::new(modes.active().spec().background);

        let mut state = Self {
            orbit: Self::orbit_for(config.orbit, &camera),
            config,
            load: LoadState::Loading,
            scene,
            modes,
            camera,
            pointer: Pointer::default(),
            viewport: (width, height),
        };
        state.orbit.resized(height);
        state
    }

    fn orbit_for(kind: OrbitKind, camera: &Camera) -> OrbitDriver {
        match kind {
            OrbitKind::PointerFollow => {
                OrbitDriver::PointerFollow(PointerFollow::new(ORBIT_RADIUS, camera.target))
            }
            OrbitKind::Drag => OrbitDriver::Drag(DragOrbit::new(camera.eye, camera.target)),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.load, LoadState::Ready)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn modes(&self) -> &ModeCycle {
        &self.modes
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn orbit(&self) -> &OrbitDriver {
        &self.orbit
    }

    pub fn handle(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::PointerMoved { x, y } => {
                if let Some((dx, dy)) = self.pointer.moved_to(x, y) {
                    self.orbit.pointer_moved(dx, dy);
                }
            }
            ViewerEvent::PointerButton { pressed } => {
                self.orbit.button(pressed);
                if pressed {
                    self.pointer.press();
                } else if self.pointer.release(self.click_slop()) {
                    self.click();
                }
            }
            ViewerEvent::Scroll { delta } => self.orbit.scroll(delta),
            ViewerEvent::Resized { width, height } => {
                if width == 0 || height == 0 {
                    return;
                }
                self.viewport = (width, height);
                self.camera.resize(width, height, self.config.fov_degrees);
                self.orbit.resized(height);
            }
            ViewerEvent::ModelLoaded(result) => self.model_loaded(result),
            ViewerEvent::Frame => {
                if self.is_ready() {
                    self.orbit.update_camera(&mut self.camera);
                }
            }
        }
    }

    // Pointer-follow orbits on every movement, so only dragging needs to be
    // told apart from clicking.
    fn click_slop(&self) -> Option<f32> {
        match self.orbit {
            OrbitDriver::Drag(_) => Some(CLICK_SLOP),
            OrbitDriver::PointerFollow(_) => None,
        }
    }

    fn click(&mut self) {
        if !self.is_ready() {
            log::debug!("ignoring click, model is not loaded");
            return;
        }
        let spec = self.modes.advance().spec();
        log::info!(
            "switching to mode {} ({})",
            self.modes.index(),
            self.modes.active().name()
        );
        apply_mode(&mut self.scene, &spec);
    }

    fn model_loaded(&mut self, result: Result<Mesh, LoadError>) {
        if !matches!(self.load, LoadState::Loading) {
            log::warn!("ignoring model delivered after loading finished");
            return;
        }
        match result.and_then(|mesh| self.install(mesh)) {
            Ok(()) => {
                log::info!("model ready, starting in mode {}", self.modes.active().name());
                self.load = LoadState::Ready;
            }
            Err(err) => {
                log::error!("could not load {}: {err}", self.config.model_path.display());
                self.scene.set_background(self.config.error_color);
                self.load = LoadState::Failed(err);
            }
        }
    }

    /// Places the model, its shells and the ground in the scene and applies
    /// the initial mode.
    fn install(&mut self, mesh: Mesh) -> Result<(), LoadError> {
        let mesh = if self.config.weld { mesh.weld() } else { mesh };
        let bounds = mesh.bounds().ok_or(LoadError::Empty)?;

        // Centered on the origin at model scale, then raised as a group.
        let scale = self.config.model_scale;
        let transform = Matrix4::from_translation(Vector3::new(0.0, self.config.lift, 0.0))
            * Matrix4::from_scale(scale)
            * Matrix4::from_translation(-bounds.center());

        let shells: Vec<(ShellRole, Mesh)> = [
            (ShellRole::Outer, self.config.shells.outer),
            (ShellRole::Inner, self.config.shells.inner),
        ]
        .into_iter()
        .filter_map(|(role, offset)| offset.map(|offset| (role, build_shell(&mesh, offset))))
        .collect();

        log::info!(
            "loaded model with {} vertices and {} shells",
            mesh.vertex_count(),
            shells.len()
        );

        let base = self.scene.add_mesh(mesh);
        let mut node = Node::new(NodeRole::Base, base);
        node.transform = transform;
        self.scene.add_node(node);

        for (role, shell) in shells {
            let id = self.scene.add_mesh(shell);
            let mut node = Node::new(NodeRole::Shell(role), id);
            node.transform = transform;
            node.render_order = 1;
            self.scene.add_node(node);
        }

        if let Some(ground) = self.config.ground {
            let id = self.scene.add_mesh(Mesh::plane(ground.size, ground.size));
            let mut node = Node::new(NodeRole::Ground, id);
            node.transform = Matrix4::from_translation(Vector3::new(0.0, ground.height, 0.0));
            node.render_order = -1;
            self.scene.add_node(node);
        }

        apply_mode(&mut self.scene, &self.modes.active().spec());

        self.camera.frame(&Aabb {
            min: bounds.min * scale,
            max: bounds.max * scale,
        });
        if let OrbitDriver::Drag(_) = self.orbit {
            // Drag orbits pick up from wherever the camera was placed.
            self.orbit = Self::orbit_for(OrbitKind::Drag, &self.camera);
            self.orbit.resized(self.viewport.1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lustre_mesh::TriangleMesh;

    fn ready_state_with(config: ViewerConfig) -> ViewerState {
        let mut state = ViewerState::new(config, 800, 600);
        state.handle(ViewerEvent::ModelLoaded(Ok(Mesh::plane(2.0, 2.0))));
        assert!(state.is_ready());
        state
    }

    fn ready_state() -> ViewerState {
        ready_state_with(ViewerConfig::default())
    }

    #[test]
    fn drag_is_not_a_click() {
        let mut state = ready_state_with(ViewerConfig {
            orbit: OrbitKind::Drag,
            ..ViewerConfig::default()
        });
        state.handle(ViewerEvent::PointerMoved { x: 10.0, y: 10.0 });
        state.handle(ViewerEvent::PointerButton { pressed: true });
        state.handle(ViewerEvent::PointerMoved { x: 60.0, y: 10.0 });
        state.handle(ViewerEvent::PointerButton { pressed: false });
        assert_eq!(0, state.modes().index());

        state.handle(ViewerEvent::PointerButton { pressed: true });
        state.handle(ViewerEvent::PointerMoved { x: 62.0, y: 11.0 });
        state.handle(ViewerEvent::PointerButton { pressed: false });
        assert_eq!(1, state.modes().index());
    }

    #[test]
    fn pointer_follow_clicks_ignore_travel() {
        let mut state = ready_state();
        state.handle(ViewerEvent::PointerMoved { x: 100.0, y: 100.0 });
        state.handle(ViewerEvent::PointerButton { pressed: true });
        state.handle(ViewerEvent::PointerMoved { x: 110.0, y: 100.0 });
        state.handle(ViewerEvent::PointerButton { pressed: false });
        assert_eq!(1, state.modes().index());
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut state = ready_state();
        state.handle(ViewerEvent::PointerButton { pressed: false });
        assert_eq!(0, state.modes().index());
    }

    #[test]
    fn install_builds_every_node() {
        let state = ready_state();
        let roles: Vec<NodeRole> = state.scene().nodes().iter().map(|n| n.role).collect();
        assert_eq!(
            vec![
                NodeRole::Base,
                NodeRole::Shell(ShellRole::Outer),
                NodeRole::Ground
            ],
            roles
        );
        let shell = &state.scene().nodes()[1];
        assert_eq!(state.scene().nodes()[0].transform, shell.transform);
        assert_eq!(1, shell.render_order);
        // Plane welds down to its four corners.
        assert_eq!(2, state.scene().mesh(state.scene().nodes()[0].mesh).triangle_count());
    }

    #[test]
    fn second_load_is_ignored() {
        let mut state = ready_state();
        let nodes = state.scene().nodes().len();
        state.handle(ViewerEvent::ModelLoaded(Ok(Mesh::plane(1.0, 1.0))));
        assert_eq!(nodes, state.scene().nodes().len());
    }
}
