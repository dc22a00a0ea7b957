//! Handle types and handle-keyed collections
//!
//! Every object the pooling layer talks about is addressed through a slot map
//! key: stable across removals of other entries, and never reused for a
//! different object once released.

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Handle to a template (blueprint) that instances are created from
    pub struct TemplateId;

    /// Handle to a concrete instance created from a template
    pub struct InstanceId;

    /// Handle to an organizational node used to group instances
    pub struct NodeId;

    /// Handle to a pool registered in a pool manager
    pub struct PoolId;
}
