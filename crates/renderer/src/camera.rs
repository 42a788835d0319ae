//! First-person camera.
//!
//! Yaw 0 looks down +Z (south on the top-down map); positive pitch looks up.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// FPS camera with configurable FOV and clipping planes.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Mouse sensitivity for look controls.
    pub sensitivity: f32,
    /// Current pitch (up/down rotation) in radians.
    pitch: f32,
    /// Current yaw (left/right rotation) in radians.
    yaw: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
            sensitivity: 0.002,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl Camera {
    /// Create a new camera at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Process mouse movement for FPS look controls.
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32) {
        self.set_yaw_pitch(
            self.yaw - delta_x * self.sensitivity,
            self.pitch - delta_y * self.sensitivity,
        );
    }

    /// Set yaw and pitch directly (in radians). Pitch is clamped short of straight up/down.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        let max_pitch = std::f32::consts::FRAC_PI_2 - 0.01;
        self.yaw = yaw.rem_euclid(std::f32::consts::TAU);
        self.pitch = pitch.clamp(-max_pitch, max_pitch);
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch)
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// View-projection with the eye at the origin and the same orientation.
    /// Hands and gun are drawn in this space so they follow the view.
    pub fn view_projection_matrix_viewmodel(&self) -> Mat4 {
        self.projection_matrix() * Mat4::look_at_rh(Vec3::ZERO, self.forward(), Vec3::Y)
    }

    /// Get current yaw in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Get current pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4], // w unused, padding
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn update(&mut self, camera: &Camera) {
        self.view_proj = camera.view_projection_matrix().to_cols_array_2d();
        let pos = camera.position;
        self.position = [pos.x, pos.y, pos.z, 1.0];
    }

    /// Uniform for the viewmodel pass (eye at origin).
    pub fn update_viewmodel(&mut self, camera: &Camera) {
        self.view_proj = camera.view_projection_matrix_viewmodel().to_cols_array_2d();
        self.position = [0.0, 0.0, 0.0, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_looks_down_positive_z() {
        let camera = Camera::new(Vec3::new(0.0, 1.7, 0.0));
        assert!((camera.forward() - Vec3::Z).length() < 1e-6);

        // A point ahead projects to the screen center.
        let clip = camera.view_projection_matrix() * Vec3::new(0.0, 1.7, 10.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse(0.0, -1.0e6);
        assert!(camera.pitch() < std::f32::consts::FRAC_PI_2);
        assert!(camera.forward().y > 0.99);
    }

    #[test]
    fn mouse_right_turns_right() {
        // Looking down +Z, the right-hand side is -X.
        let mut camera = Camera::default();
        camera.process_mouse(100.0, 0.0);
        assert!(camera.forward().x < 0.0);
    }

    #[test]
    fn viewmodel_ignores_eye_position() {
        let near = Camera::new(Vec3::ZERO);
        let far = Camera::new(Vec3::new(500.0, 20.0, 300.0));
        assert_eq!(
            near.view_projection_matrix_viewmodel(),
            far.view_projection_matrix_viewmodel()
        );
    }
}
