//! Capability interface implemented by an adapter over the engine's scene

use thiserror::Error;

use crate::foundation::collections::{InstanceId, NodeId, TemplateId};
use crate::foundation::math::Transform;

/// Errors reported by a scene host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The template does not exist or has been unloaded
    #[error("template {0:?} not found")]
    TemplateNotFound(TemplateId),

    /// Two templates were registered under the same name
    #[error("template '{0}' is already registered")]
    DuplicateTemplate(String),
}

/// Everything the pooling layer needs from the engine's scene
///
/// Organizational nodes are grouping-only: an instance filed under a node is
/// not owned by it, except that releasing a node also releases whatever is
/// filed under it. Operations on an instance that is no longer alive are
/// no-ops.
pub trait SceneHost {
    /// Display name of a template, `None` when the template is invalid
    fn template_name(&self, template: TemplateId) -> Option<&str>;

    /// Current baseline placement of a template, `None` when the template is invalid
    fn template_transform(&self, template: TemplateId) -> Option<Transform>;

    /// Whether the template can still be instantiated
    fn is_template_valid(&self, template: TemplateId) -> bool {
        self.template_transform(template).is_some()
    }

    /// Look up a template by name
    fn find_template(&self, name: &str) -> Option<TemplateId>;

    /// Create a new, active, unparented instance of `template` at `transform`
    fn instantiate(&mut self, template: TemplateId, transform: &Transform) -> Result<InstanceId, SceneError>;

    /// Whether the instance exists and has not been released
    fn is_alive(&self, instance: InstanceId) -> bool;

    /// Current placement of an instance
    fn transform(&self, instance: InstanceId) -> Option<Transform>;

    /// Overwrite the placement of an instance
    fn set_transform(&mut self, instance: InstanceId, transform: &Transform);

    /// Activate or deactivate an instance
    fn set_active(&mut self, instance: InstanceId, active: bool);

    /// File an instance under an organizational node, or detach it with `None`
    fn set_parent(&mut self, instance: InstanceId, parent: Option<NodeId>);

    /// Permanently release an instance
    fn release(&mut self, instance: InstanceId);

    /// Create an organizational node
    fn create_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeId;

    /// Release a node together with every node and instance filed under it
    fn release_node(&mut self, node: NodeId);

    /// Release every node and instance filed under `node`, keeping `node` itself
    fn release_children(&mut self, node: NodeId);
}
