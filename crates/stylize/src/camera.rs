use cgmath::{InnerSpace, Matrix4, Point3, Vector3};
use lustre_mesh::Aabb;

#[derive(Debug, Clone)]
pub struct Camera {
    // Where the camera is located.
    pub eye: Point3<f32>,
    // Where the camera is pointing.
    pub target: Point3<f32>,
    // The orientation of the camera.
    pub up: Vector3<f32>,
    // The aspect ratio of the scene (width:height).
    pub aspect: f32,
    // The vertical field of view, in degrees.
    pub fovy: f32,
    // Near and far clipping planes.
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(fovy: f32, aspect: f32) -> Self {
        Self {
            eye: Point3::new(0.0, 2.0, 6.0),
            target: Point3::new(0.0, 0.5, 0.0),
            // Use 'y' as the vertical axis.
            up: Vector3::unit_y(),
            aspect,
            fovy,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    /// Builds the view projection matrix in OpenGL clip space conventions.
    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(self.eye, self.target, self.up);
        let proj = cgmath::perspective(cgmath::Deg(self.fovy), self.aspect, self.znear, self.zfar);
        proj * view
    }

    /// Adapts the projection to a new viewport.
    ///
    /// Portrait viewports get a 10% wider field of view than `base_fovy` so
    /// the model still fits horizontally.
    pub fn resize(&mut self, width: u32, height: u32, base_fovy: f32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.fovy = if self.aspect < 1.0 {
            base_fovy * 1.1
        } else {
            base_fovy
        };
    }

    /// Backs the camera off along +z far enough to see a model of `bounds`.
    pub fn frame(&mut self, bounds: &Aabb) {
        self.eye = Point3::new(0.0, 2.0, bounds.size().magnitude() * 0.8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn portrait_widens_fov() {
        let mut camera = Camera::new(60.0, 1.0);
        camera.resize(1920, 1080, 60.0);
        assert_float_eq!(camera.aspect, 16.0 / 9.0, abs <= 1e-6);
        assert_eq!(60.0, camera.fovy);

        camera.resize(1080, 1920, 60.0);
        assert_float_eq!(camera.aspect, 9.0 / 16.0, abs <= 1e-6);
        assert_float_eq!(camera.fovy, 66.0, abs <= 1e-4);
    }

    #[test]
    fn zero_sized_viewport_is_ignored() {
        let mut camera = Camera::new(60.0, 1.5);
        camera.resize(0, 600, 60.0);
        assert_eq!(1.5, camera.aspect);
    }

    #[test]
    fn frame_keeps_target() {
        let mut camera = Camera::new(60.0, 1.0);
        let target = camera.target;
        camera.frame(&Aabb {
            min: Vector3::new(-3.0, 0.0, 0.0),
            max: Vector3::new(3.0, 8.0, 0.0),
        });
        assert_eq!(Point3::new(0.0, 2.0, 8.0), camera.eye);
        assert_eq!(target, camera.target);
    }
}
