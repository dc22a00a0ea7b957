//! Prefab pooling
//!
//! Instances of a template are recycled instead of released, and handed out
//! again on the next spawn. [`Pool`] manages a single template;
//! [`PoolManager`] keys pools by template and remembers which pool each
//! instance came from.
//!
//! ```text
//! PoolManager
//!   ├── Pool (Enemy)   stored: [..]  spawned: {..}
//!   ├── Pool (Bullet)  stored: [..]  spawned: {..}
//!   └── instance → pool index
//! ```

mod extensions;
mod manager;
mod params;
mod pool;

#[cfg(test)]
mod tests;

pub use extensions::{InstancePoolExt, TemplatePoolExt};
pub use manager::{PoolManager, PoolManagerStats, ROOT_NODE_NAME};
pub use params::SpawnParams;
pub use pool::{Pool, PoolError, RecycleOutcome};
