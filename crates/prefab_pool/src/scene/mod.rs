//! Scene host abstraction
//!
//! The pooling layer never talks to a renderer or scene graph directly. It
//! goes through [`SceneHost`], a narrow capability interface covering the few
//! things pooling needs from the engine:
//!
//! ```text
//! PoolManager / Pool
//!        ↓
//!    SceneHost (create, activate, place, reparent, release)
//!        ↓
//! Engine scene graph  (or SceneWorld in tests and headless runs)
//! ```

mod host;
mod world;

pub use host::{SceneError, SceneHost};
pub use world::{InstanceData, NodeData, SceneStats, SceneWorld, TemplateData};
