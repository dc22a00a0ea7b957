//! Single-template pool
//!
//! A [`Pool`] splits the instances of one template into two disjoint groups:
//!
//! ```text
//!            spawn (pop, or instantiate when empty)
//!   stored ──────────────────────────────────────▶ spawned
//!     ▲                                               │
//!     └───────────────── recycle ─────────────────────┘
//! ```
//!
//! `stored` is a LIFO stack: the most recently recycled instance is handed out
//! first. Instantiation only happens when the stack is empty.

use thiserror::Error;

use super::params::SpawnParams;
use crate::foundation::collections::{InstanceId, NodeId, SecondaryMap, TemplateId};
use crate::foundation::math::{Quat, Vec3};
use crate::scene::{SceneError, SceneHost};

/// Errors that can occur while a pool materializes instances
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The pool's template is no longer valid in the host
    #[error("template {0:?} is no longer valid")]
    InvalidTemplate(TemplateId),

    /// The scene host refused an operation
    #[error("scene host error: {0}")]
    Scene(#[from] SceneError),
}

/// What happened to an instance handed to `recycle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecycleOutcome {
    /// The instance was deactivated and stored for reuse
    Stored,
    /// The instance was not known to be in play and has been released
    Released,
}

/// Reuse state for a single template
#[derive(Debug, Clone)]
pub struct Pool {
    template: TemplateId,
    prefill_count: usize,
    storage_parent: Option<NodeId>,
    active_parent: Option<NodeId>,

    /// Inactive instances, most recently stored last
    stored: Vec<InstanceId>,
    /// Instances in play, unordered
    spawned: Vec<InstanceId>,
    /// Position of each spawned instance in `spawned`
    spawned_slots: SecondaryMap<InstanceId, usize>,

    /// Instances this pool has materialized over its lifetime
    created: u64,
}

impl Pool {
    /// Create an empty pool for `template`
    ///
    /// Stored instances are filed under `storage_parent`, spawned ones under
    /// `active_parent` unless a spawn overrides it. Nothing is materialized
    /// until [`prefill`](Self::prefill) runs.
    pub fn new(
        template: TemplateId,
        storage_parent: Option<NodeId>,
        active_parent: Option<NodeId>,
        prefill_count: usize,
    ) -> Self {
        let mut pool = Self {
            template,
            prefill_count,
            storage_parent,
            active_parent,
            stored: Vec::new(),
            spawned: Vec::new(),
            spawned_slots: SecondaryMap::new(),
            created: 0,
        };
        pool.init();
        pool
    }

    /// Forget every stored and spawned instance
    ///
    /// The instances themselves are left untouched in the host.
    pub fn init(&mut self) {
        self.stored.clear();
        self.spawned.clear();
        self.spawned_slots.clear();
    }

    /// Template this pool clones
    pub fn template(&self) -> TemplateId {
        self.template
    }

    /// Instances materialized by [`prefill`](Self::prefill)
    pub fn prefill_count(&self) -> usize {
        self.prefill_count
    }

    /// Change the prefill quantity used by later calls to `prefill`
    pub fn set_prefill_count(&mut self, count: usize) {
        self.prefill_count = count;
    }

    /// Node stored instances are filed under
    pub fn storage_parent(&self) -> Option<NodeId> {
        self.storage_parent
    }

    /// Change the node stored instances are filed under
    pub fn set_storage_parent(&mut self, parent: Option<NodeId>) {
        self.storage_parent = parent;
    }

    /// Default node spawned instances are filed under
    pub fn active_parent(&self) -> Option<NodeId> {
        self.active_parent
    }

    /// Change the default node spawned instances are filed under
    pub fn set_active_parent(&mut self, parent: Option<NodeId>) {
        self.active_parent = parent;
    }

    /// Instances currently in play
    pub fn spawned(&self) -> &[InstanceId] {
        &self.spawned
    }

    /// Instances ready for reuse, the next one to be handed out last
    pub fn stored(&self) -> &[InstanceId] {
        &self.stored
    }

    /// Number of instances in play
    pub fn spawned_count(&self) -> usize {
        self.spawned.len()
    }

    /// Number of instances ready for reuse
    pub fn stored_count(&self) -> usize {
        self.stored.len()
    }

    /// Whether `instance` is in play from this pool
    pub fn is_spawned(&self, instance: InstanceId) -> bool {
        self.spawned_slots.contains_key(instance)
    }

    /// Whether `instance` is waiting in this pool
    pub fn is_stored(&self, instance: InstanceId) -> bool {
        self.stored.contains(&instance)
    }

    /// Instances this pool has created over its lifetime
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Materialize `prefill_count` instances into storage
    ///
    /// Existing stored instances are kept, so calling this again tops the
    /// pool up by another `prefill_count`.
    pub fn prefill<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Result<usize, PoolError> {
        self.fill(host, self.prefill_count)
    }

    /// Materialize `quantity` inactive instances at the template's pose and store them
    pub fn fill<H: SceneHost + ?Sized>(&mut self, host: &mut H, quantity: usize) -> Result<usize, PoolError> {
        let baseline = host
            .template_transform(self.template)
            .ok_or(PoolError::InvalidTemplate(self.template))?;

        for _ in 0..quantity {
            let instance = host.instantiate(self.template, &baseline)?;
            host.set_parent(instance, self.storage_parent);
            host.set_active(instance, false);
            self.stored.push(instance);
            self.created += 1;
        }

        log::trace!("Filled pool for {:?} with {} instances", self.template, quantity);
        Ok(quantity)
    }

    /// Hand out an instance at `position` / `rotation`
    ///
    /// Reuses the most recently stored instance when there is one, otherwise
    /// instantiates a new one. The instance is filed under `parent` when given,
    /// else under the pool's active parent.
    pub fn spawn<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        position: Vec3,
        rotation: Quat,
        parent: Option<NodeId>,
    ) -> Result<InstanceId, PoolError> {
        let instance = if let Some(reused) = self.pop_stored(host) {
            let current = host.transform(reused).unwrap_or_default();
            host.set_transform(reused, &current.placed(position, rotation));
            host.set_active(reused, true);
            reused
        } else {
            let baseline = host
                .template_transform(self.template)
                .ok_or(PoolError::InvalidTemplate(self.template))?;
            let created = host.instantiate(self.template, &baseline.placed(position, rotation))?;
            self.created += 1;
            created
        };

        host.set_parent(instance, parent.or(self.active_parent));
        self.insert_spawned(instance);

        log::trace!("Spawned {:?} from pool for {:?}", instance, self.template);
        Ok(instance)
    }

    /// Spawn at the origin with identity rotation
    pub fn spawn_default<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Result<InstanceId, PoolError> {
        self.spawn_with(host, SpawnParams::default())
    }

    /// Spawn at `position` with identity rotation
    pub fn spawn_at<H: SceneHost + ?Sized>(&mut self, host: &mut H, position: Vec3) -> Result<InstanceId, PoolError> {
        self.spawn_with(host, SpawnParams::at(position))
    }

    /// Spawn at the origin with `rotation`
    pub fn spawn_rotated<H: SceneHost + ?Sized>(&mut self, host: &mut H, rotation: Quat) -> Result<InstanceId, PoolError> {
        self.spawn_with(host, SpawnParams::rotated(rotation))
    }

    /// Spawn with bundled parameters
    pub fn spawn_with<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        params: SpawnParams,
    ) -> Result<InstanceId, PoolError> {
        self.spawn(host, params.position, params.rotation, params.parent)
    }

    /// Take `instance` out of play
    ///
    /// An instance this pool did not hand out cannot be vouched for and is
    /// released instead of stored.
    pub fn recycle<H: SceneHost + ?Sized>(&mut self, host: &mut H, instance: InstanceId) -> RecycleOutcome {
        if !self.remove_spawned(instance) || !host.is_alive(instance) {
            self.forget_stored(instance);
            host.release(instance);
            log::trace!("Released {:?}: not in play from pool for {:?}", instance, self.template);
            return RecycleOutcome::Released;
        }

        self.reset_instance_transform(host, instance);
        host.set_active(instance, false);
        host.set_parent(instance, self.storage_parent);
        self.stored.push(instance);

        log::trace!("Recycled {:?} into pool for {:?}", instance, self.template);
        RecycleOutcome::Stored
    }

    /// Empty storage, releasing the stored instances when `destroy_stored` is set
    ///
    /// Returns how many instances left storage.
    pub fn flush<H: SceneHost + ?Sized>(&mut self, host: &mut H, destroy_stored: bool) -> usize {
        let flushed = self.stored.len();
        if destroy_stored {
            for instance in self.stored.drain(..) {
                host.release(instance);
            }
        } else {
            self.stored.clear();
        }
        flushed
    }

    /// Drop `instance` from storage without touching it in the host
    ///
    /// Returns whether it was stored.
    pub fn forget_stored(&mut self, instance: InstanceId) -> bool {
        let before = self.stored.len();
        self.stored.retain(|stored| *stored != instance);
        self.stored.len() != before
    }

    /// Copy the template's current placement onto `instance` and detach it
    /// from its organizational parent
    pub fn reset_instance_transform<H: SceneHost + ?Sized>(&self, host: &mut H, instance: InstanceId) {
        if !host.is_alive(instance) {
            return;
        }
        let Some(baseline) = host.template_transform(self.template) else {
            return;
        };

        host.set_parent(instance, None);
        host.set_transform(instance, &baseline);
    }

    /// Pop the next stored instance that is still alive
    fn pop_stored<H: SceneHost + ?Sized>(&mut self, host: &H) -> Option<InstanceId> {
        while let Some(candidate) = self.stored.pop() {
            if host.is_alive(candidate) {
                return Some(candidate);
            }
            log::debug!("Dropping released instance {:?} from pool storage", candidate);
        }
        None
    }

    fn insert_spawned(&mut self, instance: InstanceId) {
        if self.spawned_slots.contains_key(instance) {
            return;
        }
        self.spawned_slots.insert(instance, self.spawned.len());
        self.spawned.push(instance);
    }

    fn remove_spawned(&mut self, instance: InstanceId) -> bool {
        let Some(slot) = self.spawned_slots.remove(instance) else {
            return false;
        };

        self.spawned.swap_remove(slot);
        if let Some(&moved) = self.spawned.get(slot) {
            self.spawned_slots.insert(moved, slot);
        }
        true
    }
}
