//! Free perspective camera
//!
//! Unlike an orbit camera the position is set directly: the frame updater
//! moves it along its orbit and the trackball controls rotate, zoom and pan
//! it. Orientation always comes from the last [`PerspectiveCamera::look_at`].

use cgmath::*;

use super::camera_utils::{CameraUniform, OPENGL_TO_WGPU_MATRIX};

#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub position: Vector3<f32>,
    pub up: Vector3<f32>,
    /// Point the camera faces.
    pub target: Vector3<f32>,
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_deg: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            position: Vector3::zero(),
            up: Vector3::unit_y(),
            target: -Vector3::unit_z(),
            fovy: Deg(fov_deg),
            aspect,
            znear,
            zfar,
        }
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    /// Orients the camera towards `target`.
    pub fn look_at(&mut self, target: Vector3<f32>) {
        self.target = target;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(self.target),
            self.up,
        )
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::new(self.position, self.view_projection_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_screen_center() {
        let mut camera = PerspectiveCamera::new(75.0, 1.5, 1.0, 10000.0);
        camera.set_position(Vector3::new(0.0, 60.0, 50.0));
        camera.look_at(Vector3::zero());

        let clip = camera.view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn uniform_carries_eye_position() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 1.0, 100.0);
        camera.set_position(Vector3::new(30.0, 40.0, 120.0));
        assert_eq!(camera.uniform().view_position, [30.0, 40.0, 120.0, 1.0]);
    }
}
