//! Camera orbits driven by the pointer.
//!
//! Two drivers exist and a viewer uses one of them:
//!
//!  * [`PointerFollow`] turns every pointer movement, pressed or not, directly
//!    into yaw and pitch. There is no smoothing.
//!  * [`DragOrbit`] only rotates while the primary button is held, and eases
//!    into the requested rotation over several frames.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::{InnerSpace, Point3, Vector3};

use crate::Camera;

/// Lowest pitch the camera may reach: a little above looking straight up
/// from below.
pub const PITCH_MIN: f32 = -PI / 2.5;
/// Highest pitch: looking straight down.
pub const PITCH_MAX: f32 = FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub target: Point3<f32>,
}

#[derive(Debug, Clone)]
pub struct PointerFollow {
    state: OrbitState,
    /// Radians per pixel of pointer travel.
    pub sensitivity: f32,
    /// Added to the height of the eye after the spherical conversion.
    pub vertical_offset: f32,
}

impl PointerFollow {
    pub fn new(radius: f32, target: Point3<f32>) -> Self {
        Self {
            state: OrbitState {
                yaw: 0.0,
                pitch: 0.0,
                radius,
                target,
            },
            sensitivity: 0.003,
            vertical_offset: 1.0,
        }
    }

    pub fn state(&self) -> &OrbitState {
        &self.state
    }

    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        self.state.yaw -= dx * self.sensitivity;
        self.state.pitch = (self.state.pitch - dy * self.sensitivity).clamp(PITCH_MIN, PITCH_MAX);
    }

    /// The eye position for the current angles.
    ///
    /// The sphere is centered on the origin rather than on the target; the
    /// vertical offset lifts it to roughly the target's height.
    pub fn eye(&self) -> Point3<f32> {
        let OrbitState {
            yaw, pitch, radius, ..
        } = self.state;
        Point3::new(
            radius * yaw.sin() * pitch.cos(),
            radius * pitch.sin() + self.vertical_offset,
            radius * yaw.cos() * pitch.cos(),
        )
    }

    pub fn update_camera(&self, camera: &mut Camera) {
        camera.eye = self.eye();
        camera.target = self.state.target;
    }
}

/// Damped orbit around a target, rotated by dragging.
///
/// Angles are kept in spherical form: `theta` is the azimuth around +y
/// measured from +z, `phi` the polar angle measured down from +y.
#[derive(Debug, Clone)]
pub struct DragOrbit {
    pub target: Point3<f32>,
    radius: f32,
    theta: f32,
    phi: f32,
    delta_theta: f32,
    delta_phi: f32,
    dolly: f32,
    dragging: bool,
    viewport_height: f32,

    /// Fraction of the pending rotation applied per frame.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub enable_zoom: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
}

// Keeps phi off the poles where the view matrix degenerates.
const POLE_EPSILON: f32 = 1e-6;

impl DragOrbit {
    /// Starts orbiting `target` from wherever `eye` currently is.
    pub fn new(eye: Point3<f32>, target: Point3<f32>) -> Self {
        let offset = eye - target;
        let radius = offset.magnitude();
        let (theta, phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, FRAC_PI_2)
        };
        Self {
            target,
            radius,
            theta,
            phi,
            delta_theta: 0.0,
            delta_phi: 0.0,
            dolly: 1.0,
            dragging: false,
            viewport_height: 1.0,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            enable_zoom: false,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            // Same range the pointer-follow pitch is held to.
            min_polar: FRAC_PI_2 - PITCH_MAX,
            max_polar: FRAC_PI_2 - PITCH_MIN,
        }
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    /// Dragging across the full height of the viewport turns a full circle.
    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        if !self.dragging {
            return;
        }
        self.delta_theta -= TAU * dx / self.viewport_height * self.rotate_speed;
        self.delta_phi -= TAU * dy / self.viewport_height * self.rotate_speed;
    }

    /// Positive deltas move the camera closer.
    pub fn scroll(&mut self, delta: f32) {
        if !self.enable_zoom || delta == 0.0 {
            return;
        }
        self.dolly *= 0.95f32.powf(delta);
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Elevation angle in the same convention as [`OrbitState::pitch`].
    pub fn pitch(&self) -> f32 {
        FRAC_PI_2 - self.phi
    }

    pub fn state(&self) -> OrbitState {
        OrbitState {
            yaw: self.theta,
            pitch: self.pitch(),
            radius: self.radius,
            target: self.target,
        }
    }

    /// Advances one frame and returns the new eye position.
    pub fn update(&mut self) -> Point3<f32> {
        self.theta += self.delta_theta * self.damping_factor;
        self.phi += self.delta_phi * self.damping_factor;
        self.delta_theta *= 1.0 - self.damping_factor;
        self.delta_phi *= 1.0 - self.damping_factor;

        self.phi = self
            .phi
            .clamp(self.min_polar, self.max_polar)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.radius = (self.radius * self.dolly).clamp(self.min_distance, self.max_distance);
        self.dolly = 1.0;

        let offset = Vector3::new(
            self.radius * self.phi.sin() * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * self.phi.sin() * self.theta.cos(),
        );
        self.target + offset
    }

    pub fn update_camera(&mut self, camera: &mut Camera) {
        camera.eye = self.update();
        camera.target = self.target;
    }
}

/// Which driver a viewer is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrbitKind {
    #[default]
    PointerFollow,
    Drag,
}

#[derive(Debug, Clone)]
pub enum OrbitDriver {
    PointerFollow(PointerFollow),
    Drag(DragOrbit),
}

impl OrbitDriver {
    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        match self {
            OrbitDriver::PointerFollow(p) => p.pointer_moved(dx, dy),
            OrbitDriver::Drag(d) => d.pointer_moved(dx, dy),
        }
    }

    pub fn button(&mut self, pressed: bool) {
        if let OrbitDriver::Drag(d) = self {
            d.set_dragging(pressed);
        }
    }

    pub fn scroll(&mut self, delta: f32) {
        if let OrbitDriver::Drag(d) = self {
            d.scroll(delta);
        }
    }

    pub fn resized(&mut self, height: u32) {
        if let OrbitDriver::Drag(d) = self {
            d.set_viewport_height(height);
        }
    }

    pub fn update_camera(&mut self, camera: &mut Camera) {
        match self {
            OrbitDriver::PointerFollow(p) => p.update_camera(camera),
            OrbitDriver::Drag(d) => d.update_camera(camera),
        }
    }

    pub fn state(&self) -> OrbitState {
        match self {
            OrbitDriver::PointerFollow(p) => *p.state(),
            OrbitDriver::Drag(d) => d.state(),
        }
    }
}
