//! Handle-first call syntax for pooling
//!
//! Lets gameplay code read `enemy.spawn_at(&mut pools, position)` and
//! `instance.recycle(&mut pools)` instead of going through the manager.

use super::manager::PoolManager;
use super::params::SpawnParams;
use super::pool::{PoolError, RecycleOutcome};
use crate::foundation::collections::{InstanceId, NodeId, PoolId, TemplateId};
use crate::foundation::math::Vec3;
use crate::scene::SceneHost;

/// Pool operations on a template handle
pub trait TemplatePoolExt {
    /// Register a pool with the manager's default prefill
    fn create_pool<H: SceneHost>(self, manager: &mut PoolManager<H>) -> Result<PoolId, PoolError>;

    /// Register a pool with an explicit spawn parent and prefill
    fn create_pool_with<H: SceneHost>(
        self,
        manager: &mut PoolManager<H>,
        spawn_parent: Option<NodeId>,
        prefill_count: usize,
    ) -> Result<PoolId, PoolError>;

    /// Spawn at the origin
    fn spawn<H: SceneHost>(self, manager: &mut PoolManager<H>) -> Option<InstanceId>;

    /// Spawn at `position`
    fn spawn_at<H: SceneHost>(self, manager: &mut PoolManager<H>, position: Vec3) -> Option<InstanceId>;

    /// Spawn with bundled parameters
    fn spawn_with<H: SceneHost>(self, manager: &mut PoolManager<H>, params: SpawnParams) -> Option<InstanceId>;

    /// Instances currently in play from this template's pool
    fn spawned_instances<H: SceneHost>(self, manager: &PoolManager<H>) -> Vec<InstanceId>;
}

impl TemplatePoolExt for TemplateId {
    fn create_pool<H: SceneHost>(self, manager: &mut PoolManager<H>) -> Result<PoolId, PoolError> {
        manager.create_pool(self)
    }

    fn create_pool_with<H: SceneHost>(
        self,
        manager: &mut PoolManager<H>,
        spawn_parent: Option<NodeId>,
        prefill_count: usize,
    ) -> Result<PoolId, PoolError> {
        manager.create_pool_with(self, spawn_parent, prefill_count)
    }

    fn spawn<H: SceneHost>(self, manager: &mut PoolManager<H>) -> Option<InstanceId> {
        manager.spawn(self)
    }

    fn spawn_at<H: SceneHost>(self, manager: &mut PoolManager<H>, position: Vec3) -> Option<InstanceId> {
        manager.spawn_at(self, position)
    }

    fn spawn_with<H: SceneHost>(self, manager: &mut PoolManager<H>, params: SpawnParams) -> Option<InstanceId> {
        manager.spawn_with(self, params)
    }

    fn spawned_instances<H: SceneHost>(self, manager: &PoolManager<H>) -> Vec<InstanceId> {
        manager.get_all_spawned_from(self)
    }
}

/// Pool operations on an instance handle
pub trait InstancePoolExt {
    /// Return the instance to its pool, or release it if untracked
    fn recycle<H: SceneHost>(self, manager: &mut PoolManager<H>) -> RecycleOutcome;

    /// Reset the instance to its template's placement
    fn reset_transform<H: SceneHost>(self, manager: &mut PoolManager<H>);

    /// Whether the instance is in play from one of the manager's pools
    fn is_pooled_in<H: SceneHost>(self, manager: &PoolManager<H>) -> bool;
}

impl InstancePoolExt for InstanceId {
    fn recycle<H: SceneHost>(self, manager: &mut PoolManager<H>) -> RecycleOutcome {
        manager.recycle(self)
    }

    fn reset_transform<H: SceneHost>(self, manager: &mut PoolManager<H>) {
        manager.reset_instance_transform(self);
    }

    fn is_pooled_in<H: SceneHost>(self, manager: &PoolManager<H>) -> bool {
        manager.is_tracked(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PoolManagerConfig;
    use crate::foundation::math::Transform;
    use crate::scene::SceneWorld;

    #[test]
    fn test_handle_syntax_round_trip() {
        let mut world = SceneWorld::new();
        let enemy = world
            .add_template("Enemy", Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
            .expect("Should add");
        let mut pools = PoolManager::new(world, PoolManagerConfig::default());

        enemy.create_pool_with(&mut pools, None, 1).expect("Should create");
        let instance = enemy.spawn_at(&mut pools, Vec3::new(2.0, 0.0, 0.0)).expect("Should spawn");
        assert!(instance.is_pooled_in(&pools));
        assert_eq!(enemy.spawned_instances(&pools), vec![instance]);

        instance.reset_transform(&mut pools);
        assert_eq!(
            pools.host().transform(instance).map(|t| t.position),
            Some(Vec3::new(0.0, 1.0, 0.0))
        );

        assert_eq!(instance.recycle(&mut pools), RecycleOutcome::Stored);
        assert!(!instance.is_pooled_in(&pools));
        assert!(enemy.spawned_instances(&pools).is_empty());
        assert_eq!(enemy.spawn(&mut pools), Some(instance));
    }
}
