//! Transform component for placing models in the world.

use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Rotate around the world Y axis, in radians.
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.rotation = Quat::from_rotation_y(yaw);
        self
    }

    /// Uniform scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_translates_origin() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_scale(4.0);
        let p = t.to_matrix().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn yaw_quarter_turn_maps_z_to_x() {
        let t = Transform::default().with_yaw(std::f32::consts::FRAC_PI_2);
        let p = t.to_matrix().transform_vector3(Vec3::Z);
        assert!((p - Vec3::X).length() < 1e-5);
    }
}
