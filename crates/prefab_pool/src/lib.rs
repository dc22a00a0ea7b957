//! # Prefab Pool
//!
//! Object pooling for template-instantiated scene objects. Instead of
//! releasing an instance when gameplay is done with it, the instance is
//! deactivated and kept for the next spawn of the same template.
//!
//! ## Features
//!
//! - **Per-template pools**: LIFO reuse with prefill and lazy growth
//! - **Pool registry**: spawn and recycle by handle, no bookkeeping in gameplay code
//! - **Self-healing**: strays are released and stale entries pruned each frame
//! - **Host abstraction**: runs against any scene graph implementing [`scene::SceneHost`]
//! - **Config files**: pool presets in TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prefab_pool::prelude::*;
//!
//! struct Waves {
//!     enemy: Option<TemplateId>,
//! }
//!
//! impl Application<SceneWorld> for Waves {
//!     fn initialize(&mut self, ctx: &mut PoolingContext<SceneWorld>) -> Result<(), AppError> {
//!         self.enemy = ctx.pools.host().find_template("Enemy");
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, ctx: &mut PoolingContext<SceneWorld>, _delta_time: f32) -> Result<(), AppError> {
//!         if let Some(enemy) = self.enemy {
//!             if let Some(instance) = enemy.spawn_at(&mut ctx.pools, Vec3::new(0.0, 0.0, 10.0)) {
//!                 instance.recycle(&mut ctx.pools);
//!             }
//!         }
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, ctx: &mut PoolingContext<SceneWorld>) {
//!         ctx.pools.clear_pools(true);
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::new("waves").with_template(TemplateDefinition::new("Enemy"));
//!     let world = SceneWorld::from_definitions(&config.templates)?;
//!     let mut ctx = PoolingContext::new(world, config)?;
//!     ctx.run(&mut Waves { enemy: None }, 60)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate, clippy::cast_precision_loss)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod pooling;
pub mod scene;

mod application;
mod context;

pub use application::{AppError, Application};
pub use context::{ContextError, PoolingContext};

/// Common imports for pooling users
pub mod prelude {
    pub use crate::{
        AppError, Application, ContextError, PoolingContext,
        config::{Config, ConfigError},
        core::config::{ApplicationConfig, PoolManagerConfig, PoolPreset, TemplateDefinition},
        foundation::{
            collections::{InstanceId, NodeId, PoolId, TemplateId},
            math::{Quat, Transform, Vec3},
            time::Timer,
        },
        pooling::{
            InstancePoolExt, Pool, PoolError, PoolManager, PoolManagerStats, RecycleOutcome, SpawnParams,
            TemplatePoolExt,
        },
        scene::{SceneError, SceneHost, SceneWorld},
    };
}
