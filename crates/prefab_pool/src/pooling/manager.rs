//! Template-keyed pool registry
//!
//! The [`PoolManager`] owns every [`Pool`] of an application, keyed by the
//! template each pool clones, and remembers which pool handed out each
//! instance so that recycling needs nothing but the instance handle.
//!
//! # Architecture
//!
//! ```text
//!  spawn(template) ──▶ template_to_pool ──▶ Pool::spawn ──▶ instance_to_pool
//!                        (lazy create)
//!  recycle(instance) ──▶ instance_to_pool ──▶ Pool::recycle
//!                        (untracked: release)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! let mut world = SceneWorld::new();
//! let enemy = world.add_template("Enemy", Transform::identity()).unwrap();
//! let mut pools = PoolManager::new(world, PoolManagerConfig::default());
//!
//! pools.create_pool_with(enemy, None, 3).unwrap();
//! let first = pools.spawn_at(enemy, Vec3::new(0.0, 0.0, 5.0)).unwrap();
//! pools.recycle(first);
//! assert_eq!(pools.spawn(enemy), Some(first));
//! ```

use std::collections::HashMap;

use super::params::SpawnParams;
use super::pool::{Pool, PoolError, RecycleOutcome};
use crate::core::config::PoolManagerConfig;
use crate::foundation::collections::{InstanceId, NodeId, PoolId, SecondaryMap, SlotMap, TemplateId};
use crate::foundation::math::{Quat, Vec3};
use crate::scene::SceneHost;

/// Name of the organizational node every manager files its pools under
pub const ROOT_NODE_NAME: &str = "[Pool Manager]";

/// Statistics for monitoring pool usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolManagerStats {
    /// Pools created since the manager was built
    pub pools_created: u64,
    /// Pools dropped by the maintenance pass
    pub pools_pruned: u64,
    /// Instances materialized by prefill or by spawning from an empty pool
    pub total_created: u64,
    /// Successful spawns
    pub total_spawned: u64,
    /// Instances returned to storage
    pub total_recycled: u64,
    /// Instances released because no pool could vouch for them
    pub total_released: u64,
}

/// Registry mapping templates to pools and spawned instances to their pool
pub struct PoolManager<H: SceneHost> {
    host: H,
    config: PoolManagerConfig,

    /// Organizational node owning all holder nodes
    root: NodeId,

    pools: SlotMap<PoolId, Pool>,
    template_to_pool: HashMap<TemplateId, PoolId>,
    instance_to_pool: HashMap<InstanceId, PoolId>,

    /// Holder nodes created for individual pools
    holders: SecondaryMap<PoolId, NodeId>,

    stats: PoolManagerStats,
}

impl<H: SceneHost> PoolManager<H> {
    /// Create a manager over `host`
    ///
    /// Pools declared in `config.pools` are not created until
    /// [`initialize_pools`](Self::initialize_pools) runs.
    pub fn new(mut host: H, config: PoolManagerConfig) -> Self {
        let root = host.create_node(ROOT_NODE_NAME, None);
        log::debug!(
            "Creating PoolManager (prefill {}, child nodes {}, force cleanup {})",
            config.default_prefill_quantity,
            config.create_child_for_pools,
            config.force_recycle_cleanup
        );

        Self {
            host,
            config,
            root,
            pools: SlotMap::with_key(),
            template_to_pool: HashMap::new(),
            instance_to_pool: HashMap::new(),
            holders: SecondaryMap::new(),
            stats: PoolManagerStats::default(),
        }
    }

    /// Create the pools declared in the configuration
    ///
    /// Presets naming a template the host does not know are skipped. Returns
    /// the number of pools that exist for the presets afterwards.
    pub fn initialize_pools(&mut self) -> usize {
        let presets = self.config.pools.clone();
        let mut ready = 0;

        for preset in &presets {
            let Some(template) = self.host.find_template(&preset.template) else {
                log::warn!("Skipping pool preset: unknown template '{}'", preset.template);
                continue;
            };

            match self.get_or_create_pool(template, None, preset.prefill) {
                Ok(_) => ready += 1,
                Err(err) => log::warn!("Failed to create pool for '{}': {}", preset.template, err),
            }
        }

        self.maintain_pools();
        log::info!("Initialized {}/{} configured pools", ready, presets.len());
        ready
    }

    /// Pool for `template`, created and prefilled on first use
    ///
    /// An existing pool is returned unchanged: `spawn_parent` and
    /// `prefill_count` only apply to a pool created by this call.
    pub fn get_or_create_pool(
        &mut self,
        template: TemplateId,
        spawn_parent: Option<NodeId>,
        prefill_count: usize,
    ) -> Result<PoolId, PoolError> {
        if let Some(&existing) = self.template_to_pool.get(&template) {
            if self.pools.contains_key(existing) {
                return Ok(existing);
            }
        }

        let name = self
            .host
            .template_name(template)
            .map(str::to_owned)
            .ok_or(PoolError::InvalidTemplate(template))?;

        let holder = self
            .config
            .create_child_for_pools
            .then(|| self.host.create_node(&format!("[Pool: {name}]"), Some(self.root)));
        let storage_parent = holder.unwrap_or(self.root);

        let mut pool = Pool::new(template, Some(storage_parent), spawn_parent, prefill_count);
        if let Err(err) = pool.prefill(&mut self.host) {
            pool.flush(&mut self.host, true);
            if let Some(node) = holder {
                self.host.release_node(node);
            }
            return Err(err);
        }

        self.stats.total_created += pool.created_count();
        let id = self.pools.insert(pool);
        if let Some(node) = holder {
            self.holders.insert(id, node);
        }
        self.template_to_pool.insert(template, id);
        self.stats.pools_created += 1;

        log::info!("Created pool for '{}' with prefill {}", name, prefill_count);
        Ok(id)
    }

    /// Register a pool for `template` with the default prefill
    pub fn create_pool(&mut self, template: TemplateId) -> Result<PoolId, PoolError> {
        self.get_or_create_pool(template, None, self.config.default_prefill_quantity)
    }

    /// Register a pool for `template` with an explicit spawn parent and prefill
    pub fn create_pool_with(
        &mut self,
        template: TemplateId,
        spawn_parent: Option<NodeId>,
        prefill_count: usize,
    ) -> Result<PoolId, PoolError> {
        self.get_or_create_pool(template, spawn_parent, prefill_count)
    }

    /// Spawn `template` at the origin
    pub fn spawn(&mut self, template: TemplateId) -> Option<InstanceId> {
        self.spawn_with(template, SpawnParams::default())
    }

    /// Spawn `template` at `position`
    pub fn spawn_at(&mut self, template: TemplateId, position: Vec3) -> Option<InstanceId> {
        self.spawn_with(template, SpawnParams::at(position))
    }

    /// Spawn `template` at the origin with `rotation`
    pub fn spawn_rotated(&mut self, template: TemplateId, rotation: Quat) -> Option<InstanceId> {
        self.spawn_with(template, SpawnParams::rotated(rotation))
    }

    /// Spawn `template` at the origin under `parent`
    pub fn spawn_under(&mut self, template: TemplateId, parent: NodeId) -> Option<InstanceId> {
        self.spawn_with(template, SpawnParams::under(parent))
    }

    /// Spawn `template` at `position` with `rotation`, optionally under `parent`
    pub fn spawn_placed(
        &mut self,
        template: TemplateId,
        position: Vec3,
        rotation: Quat,
        parent: Option<NodeId>,
    ) -> Option<InstanceId> {
        self.spawn_with(template, SpawnParams { position, rotation, parent })
    }

    /// Spawn `template` from its pool, creating the pool on first use
    ///
    /// Returns `None` when the template is not valid in the host; that is a
    /// no-op, not an error.
    pub fn spawn_with(&mut self, template: TemplateId, params: SpawnParams) -> Option<InstanceId> {
        if !self.host.is_template_valid(template) {
            log::warn!("Ignoring spawn of invalid template {:?}", template);
            return None;
        }

        let pool_id = match self.get_or_create_pool(template, params.parent, self.config.default_prefill_quantity) {
            Ok(id) => id,
            Err(err) => {
                log::warn!("No pool available for {:?}: {}", template, err);
                return None;
            }
        };

        let pool = self.pools.get_mut(pool_id)?;
        let created_before = pool.created_count();
        match pool.spawn_with(&mut self.host, params) {
            Ok(instance) => {
                self.stats.total_created += pool.created_count() - created_before;
                self.instance_to_pool.insert(instance, pool_id);
                self.stats.total_spawned += 1;
                Some(instance)
            }
            Err(err) => {
                log::warn!("Spawn of {:?} failed: {}", template, err);
                None
            }
        }
    }

    /// Take `instance` out of play
    ///
    /// Instances handed out by one of the pools go back to that pool.
    /// Anything else is released so that strays never leak.
    pub fn recycle(&mut self, instance: InstanceId) -> RecycleOutcome {
        let owner = self
            .instance_to_pool
            .get(&instance)
            .copied()
            .filter(|id| self.pools.contains_key(*id));

        let outcome = match owner {
            Some(pool_id) => {
                self.host.set_parent(instance, Some(self.root));
                if self.config.force_recycle_cleanup {
                    self.instance_to_pool.remove(&instance);
                }
                self.pools[pool_id].recycle(&mut self.host, instance)
            }
            None => {
                // The association may be gone while the instance still sits in storage
                for (_, pool) in &mut self.pools {
                    pool.forget_stored(instance);
                }
                log::debug!("Releasing untracked instance {:?}", instance);
                self.host.release(instance);
                RecycleOutcome::Released
            }
        };

        match outcome {
            RecycleOutcome::Stored => self.stats.total_recycled += 1,
            RecycleOutcome::Released => {
                self.instance_to_pool.remove(&instance);
                self.stats.total_released += 1;
            }
        }
        outcome
    }

    /// Instances currently in play from the pool of `template`
    pub fn get_all_spawned_from(&self, template: TemplateId) -> Vec<InstanceId> {
        self.pool_for(template)
            .map(|pool| pool.spawned().to_vec())
            .unwrap_or_default()
    }

    /// Reset `instance` to its template's placement, if a pool tracks it
    pub fn reset_instance_transform(&mut self, instance: InstanceId) {
        let Some(pool) = self.instance_to_pool.get(&instance).and_then(|id| self.pools.get(*id)) else {
            return;
        };
        pool.reset_instance_transform(&mut self.host, instance);
    }

    /// Drop every pool and association
    ///
    /// With `release_children`, every node and instance filed under the
    /// manager's root node is released as well. Instances in play elsewhere
    /// are left alone; recycling them later releases them.
    pub fn clear_pools(&mut self, release_children: bool) {
        let count = self.pools.len();

        self.pools.clear();
        self.template_to_pool.clear();
        self.instance_to_pool.clear();
        self.holders.clear();

        if release_children {
            self.host.release_children(self.root);
        }

        log::info!("Cleared {} pools (release children: {})", count, release_children);
    }

    /// Repair the registry
    ///
    /// Pools whose template is no longer valid are dropped along with their
    /// stored instances and holder node. The template index is rebuilt from
    /// the surviving pools, and associations for instances that are no
    /// longer in play are forgotten. Returns the number of pruned pools.
    pub fn maintain_pools(&mut self) -> usize {
        let stale: Vec<PoolId> = self
            .pools
            .iter()
            .filter(|(_, pool)| !self.host.is_template_valid(pool.template()))
            .map(|(id, _)| id)
            .collect();

        for &id in &stale {
            if let Some(mut pool) = self.pools.remove(id) {
                let released = pool.flush(&mut self.host, true);
                log::debug!(
                    "Pruned pool for invalid template {:?} ({} stored released, {} still in play)",
                    pool.template(),
                    released,
                    pool.spawned_count()
                );
            }
            if let Some(node) = self.holders.remove(id) {
                self.host.release_node(node);
            }
        }

        self.template_to_pool.clear();
        for (id, pool) in &self.pools {
            self.template_to_pool.entry(pool.template()).or_insert(id);
        }

        let pools = &self.pools;
        self.instance_to_pool
            .retain(|instance, id| pools.get(*id).is_some_and(|pool| pool.is_spawned(*instance)));

        self.stats.pools_pruned += stale.len() as u64;
        stale.len()
    }

    /// Per-frame hook, run after the frame's gameplay updates
    pub fn late_update(&mut self) {
        if self.config.maintain_every_frame || self.pools.len() != self.template_to_pool.len() {
            self.maintain_pools();
        }
    }

    /// Pool registered for `template`
    pub fn pool_for(&self, template: TemplateId) -> Option<&Pool> {
        self.template_to_pool
            .get(&template)
            .and_then(|id| self.pools.get(*id))
    }

    /// Id of the pool registered for `template`
    pub fn pool_id_for(&self, template: TemplateId) -> Option<PoolId> {
        self.template_to_pool
            .get(&template)
            .copied()
            .filter(|id| self.pools.contains_key(*id))
    }

    /// Pool by id
    pub fn pool(&self, id: PoolId) -> Option<&Pool> {
        self.pools.get(id)
    }

    /// All live pools
    pub fn pools(&self) -> impl Iterator<Item = (PoolId, &Pool)> {
        self.pools.iter()
    }

    /// Number of live pools
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Pool recorded as owner of `instance`
    ///
    /// With `force_recycle_cleanup` off this may still name the pool of an
    /// instance that was recycled since the last maintenance pass.
    pub fn owning_pool(&self, instance: InstanceId) -> Option<PoolId> {
        self.instance_to_pool.get(&instance).copied()
    }

    /// Whether `instance` is in play from one of the pools
    pub fn is_tracked(&self, instance: InstanceId) -> bool {
        self.instance_to_pool
            .get(&instance)
            .and_then(|id| self.pools.get(*id))
            .is_some_and(|pool| pool.is_spawned(instance))
    }

    /// Number of recorded instance→pool associations
    pub fn tracked_count(&self) -> usize {
        self.instance_to_pool.len()
    }

    /// Organizational node the manager files its pools under
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Holder node created for a pool, if any
    pub fn holder_node(&self, id: PoolId) -> Option<NodeId> {
        self.holders.get(id).copied()
    }

    /// Manager configuration
    pub fn config(&self) -> &PoolManagerConfig {
        &self.config
    }

    /// Usage statistics
    pub fn stats(&self) -> PoolManagerStats {
        self.stats
    }

    /// Scene host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable scene host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give the scene host back
    pub fn into_host(self) -> H {
        self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PoolPreset;
    use crate::foundation::math::Transform;
    use crate::scene::SceneWorld;

    fn setup(config: PoolManagerConfig) -> (PoolManager<SceneWorld>, TemplateId, TemplateId) {
        let mut world = SceneWorld::new();
        let enemy = world.add_template("Enemy", Transform::identity()).expect("Should add");
        let bullet = world.add_template("Bullet", Transform::identity()).expect("Should add");
        (PoolManager::new(world, config), enemy, bullet)
    }

    #[test]
    fn test_spawn_creates_pool_lazily() {
        let (mut manager, enemy, _) = setup(PoolManagerConfig::default());
        assert_eq!(manager.pool_count(), 0);

        let instance = manager.spawn(enemy).expect("Should spawn");
        assert_eq!(manager.pool_count(), 1);
        assert_eq!(manager.owning_pool(instance), manager.pool_id_for(enemy));
        assert!(manager.is_tracked(instance));
        assert_eq!(manager.stats().pools_created, 1);
    }

    #[test]
    fn test_lazy_pool_uses_default_prefill() {
        let (mut manager, enemy, _) = setup(PoolManagerConfig::default().with_default_prefill(4));
        manager.spawn(enemy).expect("Should spawn");

        let pool = manager.pool_for(enemy).expect("Should have pool");
        assert_eq!(pool.stored_count(), 3);
        assert_eq!(pool.spawned_count(), 1);
        assert_eq!(pool.created_count(), 4);
        assert_eq!(manager.stats().total_created, 4);
    }

    #[test]
    fn test_get_or_create_pool_keeps_existing_settings() {
        let (mut manager, enemy, _) = setup(PoolManagerConfig::default());
        let first = manager.create_pool_with(enemy, None, 2).expect("Should create");
        let parent = manager.host_mut().create_node("elsewhere", None);
        let second = manager.create_pool_with(enemy, Some(parent), 10).expect("Should reuse");

        assert_eq!(first, second);
        let pool = manager.pool(first).expect("Should have pool");
        assert_eq!(pool.prefill_count(), 2);
        assert_eq!(pool.stored_count(), 2);
        assert_eq!(pool.active_parent(), None);
    }

    #[test]
    fn test_invalid_template_spawn_is_noop() {
        let (mut manager, enemy, _) = setup(PoolManagerConfig::default());
        manager.host_mut().remove_template(enemy);

        assert_eq!(manager.spawn(enemy), None);
        assert_eq!(manager.pool_count(), 0);
        assert!(matches!(manager.create_pool(enemy), Err(PoolError::InvalidTemplate(_))));
    }

    #[test]
    fn test_holder_nodes_per_pool() {
        let (mut manager, enemy, bullet) = setup(PoolManagerConfig::default());
        let enemy_pool = manager.create_pool(enemy).expect("Should create");
        let bullet_pool = manager.create_pool(bullet).expect("Should create");

        let enemy_holder = manager.holder_node(enemy_pool).expect("Should have holder");
        let bullet_holder = manager.holder_node(bullet_pool).expect("Should have holder");
        assert_ne!(enemy_holder, bullet_holder);

        let node = manager.host().node(enemy_holder).expect("Should exist");
        assert_eq!(node.name, "[Pool: Enemy]");
        assert_eq!(node.parent, Some(manager.root()));
        assert_eq!(manager.pool(enemy_pool).and_then(Pool::storage_parent), Some(enemy_holder));
    }

    #[test]
    fn test_shared_root_without_child_nodes() {
        let (mut manager, enemy, _) = setup(PoolManagerConfig::default().with_child_for_pools(false));
        let id = manager.create_pool_with(enemy, None, 2).expect("Should create");

        assert_eq!(manager.holder_node(id), None);
        let root = manager.root();
        assert_eq!(manager.pool(id).and_then(Pool::storage_parent), Some(root));
        assert_eq!(manager.host().instances_under(root).len(), 2);
    }

    #[test]
    fn test_spawn_parent_override() {
        let (mut manager, enemy, _) = setup(PoolManagerConfig::default());
        let squad = manager.host_mut().create_node("squad", None);

        let instance = manager.spawn_under(enemy, squad).expect("Should spawn");
        assert_eq!(manager.host().parent_of(instance), Some(squad));
    }

    #[test]
    fn test_recycle_with_force_cleanup_drops_association() {
        let (mut manager, enemy, _) = setup(PoolManagerConfig::default().with_force_recycle_cleanup(true));
        let instance = manager.spawn(enemy).expect("Should spawn");

        assert_eq!(manager.recycle(instance), RecycleOutcome::Stored);
        assert_eq!(manager.owning_pool(instance), None);
        assert_eq!(manager.tracked_count(), 0);
    }

    #[test]
    fn test_recycle_without_force_cleanup_leaves_stale_until_maintenance() {
        let (mut manager, enemy, _) = setup(PoolManagerConfig::default());
        let instance = manager.spawn(enemy).expect("Should spawn");

        assert_eq!(manager.recycle(instance), RecycleOutcome::Stored);
        assert!(manager.owning_pool(instance).is_some());
        assert!(!manager.is_tracked(instance));

        manager.late_update();
        assert_eq!(manager.owning_pool(instance), None);
    }

    #[test]
    fn test_double_recycle_releases_instance() {
        for force in [false, true] {
            let (mut manager, enemy, _) = setup(PoolManagerConfig::default().with_force_recycle_cleanup(force));
            let instance = manager.spawn(enemy).expect("Should spawn");

            assert_eq!(manager.recycle(instance), RecycleOutcome::Stored);
            assert_eq!(manager.recycle(instance), RecycleOutcome::Released);
            assert!(!manager.host().is_alive(instance));
            let pool = manager.pool_for(enemy).expect("Should have pool");
            assert!(!pool.is_stored(instance));
            assert_eq!(pool.stored_count(), 0);
        }
    }

    #[test]
    fn test_recycle_after_maintenance_scrubs_storage() {
        for force in [false, true] {
            let (mut manager, enemy, _) = setup(PoolManagerConfig::default().with_force_recycle_cleanup(force));
            let instance = manager.spawn(enemy).expect("Should spawn");

            assert_eq!(manager.recycle(instance), RecycleOutcome::Stored);
            manager.late_update();
            assert_eq!(manager.owning_pool(instance), None);

            assert_eq!(manager.recycle(instance), RecycleOutcome::Released);
            assert!(!manager.host().is_alive(instance));
            let pool = manager.pool_for(enemy).expect("Should have pool");
            assert!(!pool.is_stored(instance));
            assert_eq!(pool.stored_count(), 0);

            let fresh = manager.spawn(enemy).expect("Should spawn");
            assert_ne!(fresh, instance);
            assert_eq!(manager.host().stats().instantiated, 2);
        }
    }

    #[test]
    fn test_reset_instance_transform_routes_to_pool() {
        let (mut manager, enemy, _) = setup(PoolManagerConfig::default());
        let instance = manager.spawn_at(enemy, Vec3::new(3.0, 0.0, 0.0)).expect("Should spawn");

        manager.reset_instance_transform(instance);
        assert_eq!(manager.host().transform(instance), Some(Transform::identity()));

        let stray = manager
            .host_mut()
            .instantiate(enemy, &Transform::from_position(Vec3::new(7.0, 0.0, 0.0)))
            .expect("Should instantiate");
        manager.reset_instance_transform(stray);
        assert_eq!(manager.host().transform(stray).map(|t| t.position), Some(Vec3::new(7.0, 0.0, 0.0)));
    }

    #[test]
    fn test_maintain_prunes_invalid_templates() {
        let (mut manager, enemy, bullet) = setup(PoolManagerConfig::default());
        let enemy_pool = manager.create_pool_with(enemy, None, 2).expect("Should create");
        manager.create_pool(bullet).expect("Should create");
        let in_play = manager.spawn(enemy).expect("Should spawn");
        let stored: Vec<_> = manager.pool(enemy_pool).map(|p| p.stored().to_vec()).unwrap_or_default();
        let holder = manager.holder_node(enemy_pool).expect("Should have holder");

        manager.host_mut().remove_template(enemy);
        assert_eq!(manager.maintain_pools(), 1);

        assert_eq!(manager.pool_count(), 1);
        assert!(manager.pool_for(enemy).is_none());
        assert!(manager.pool_for(bullet).is_some());
        assert!(stored.iter().all(|&i| !manager.host().is_alive(i)));
        assert!(manager.host().node(holder).is_none());
        assert_eq!(manager.stats().pools_pruned, 1);

        assert!(manager.host().is_alive(in_play));
        assert_eq!(manager.recycle(in_play), RecycleOutcome::Released);
        assert!(!manager.host().is_alive(in_play));
    }

    #[test]
    fn test_initialize_pools_from_presets() {
        let config = PoolManagerConfig::default()
            .with_pool(PoolPreset::new("Enemy", 3))
            .with_pool(PoolPreset::new("Missing", 1))
            .with_pool(PoolPreset::new("Bullet", 5));
        let (mut manager, enemy, bullet) = setup(config);

        assert_eq!(manager.initialize_pools(), 2);
        assert_eq!(manager.pool_for(enemy).map(Pool::stored_count), Some(3));
        assert_eq!(manager.pool_for(bullet).map(Pool::stored_count), Some(5));
    }

    #[test]
    fn test_clear_pools_keeps_children_when_asked() {
        let (mut manager, enemy, _) = setup(PoolManagerConfig::default());
        let id = manager.create_pool_with(enemy, None, 2).expect("Should create");
        let holder = manager.holder_node(id).expect("Should have holder");

        manager.clear_pools(false);
        assert_eq!(manager.pool_count(), 0);
        assert!(manager.host().node(holder).is_some());
        assert_eq!(manager.host().instances_under(holder).len(), 2);
    }
}
