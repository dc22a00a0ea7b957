//! Spawn parameters

use crate::foundation::collections::NodeId;
use crate::foundation::math::{Quat, Vec3};

/// Where and under which organizational node an instance is spawned
///
/// The default spawns at the origin with an identity rotation under the
/// pool's active parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    /// World position
    pub position: Vec3,
    /// Rotation
    pub rotation: Quat,
    /// Organizational parent overriding the pool's active parent
    pub parent: Option<NodeId>,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            parent: None,
        }
    }
}

impl SpawnParams {
    /// Spawn at `position`
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Spawn with `rotation` at the origin
    pub fn rotated(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Spawn under `parent` at the origin
    pub fn under(parent: NodeId) -> Self {
        Self {
            parent: Some(parent),
            ..Default::default()
        }
    }

    /// Set the position
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the rotation
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the organizational parent
    #[must_use]
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }
}
