//! Math utilities and types
//!
//! Placement types shared by templates and pooled instances.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Placement of a template or instance: position, rotation and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Replace the scale, keeping position and rotation
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Same transform moved to `position` and turned to `rotation`; scale is kept
    #[must_use]
    pub fn placed(&self, position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: self.scale,
        }
    }
}

/// Math utility functions
pub mod utils {
    use super::{Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Rotation of `degrees` around the world up axis
    pub fn yaw(degrees: f32) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), deg_to_rad(degrees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_identity() {
        let transform = Transform::default();
        assert_eq!(transform.position, Vec3::zeros());
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(transform.rotation, Quat::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_placed_keeps_scale() {
        let base = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_scale(Vec3::new(2.0, 2.0, 2.0));
        let moved = base.placed(Vec3::new(-4.0, 0.0, 0.5), utils::yaw(90.0));

        assert_eq!(moved.position, Vec3::new(-4.0, 0.0, 0.5));
        assert_eq!(moved.scale, base.scale);
        assert_relative_eq!(moved.rotation, utils::yaw(90.0), epsilon = 1e-6);
    }
}
