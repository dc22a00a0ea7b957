//! In-memory scene host
//!
//! `SceneWorld` keeps templates, instances and organizational nodes in slot
//! maps. It is the host used by the demo and the test suite, and a reference
//! for adapters over a real scene graph.

use std::collections::HashSet;

use super::host::{SceneError, SceneHost};
use crate::core::config::TemplateDefinition;
use crate::foundation::collections::{InstanceId, NodeId, SlotMap, TemplateId};
use crate::foundation::math::Transform;

/// A registered blueprint
#[derive(Debug, Clone)]
pub struct TemplateData {
    /// Unique template name
    pub name: String,
    /// Baseline placement copied into new instances
    pub transform: Transform,
}

/// A live instance
#[derive(Debug, Clone)]
pub struct InstanceData {
    /// Template the instance was created from
    pub template: TemplateId,
    /// Current placement
    pub transform: Transform,
    /// Visibility / update flag
    pub active: bool,
    /// Organizational parent
    pub parent: Option<NodeId>,
}

/// An organizational node
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Display name
    pub name: String,
    /// Parent node
    pub parent: Option<NodeId>,
}

/// Counters for monitoring instance churn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Instances created since the world was built
    pub instantiated: u64,
    /// Instances released since the world was built
    pub released: u64,
}

/// Slot-map backed scene implementing [`SceneHost`]
#[derive(Debug, Default)]
pub struct SceneWorld {
    templates: SlotMap<TemplateId, TemplateData>,
    instances: SlotMap<InstanceId, InstanceData>,
    nodes: SlotMap<NodeId, NodeData>,
    stats: SceneStats,
}

impl SceneWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a world with the given templates registered
    pub fn from_definitions(definitions: &[TemplateDefinition]) -> Result<Self, SceneError> {
        let mut world = Self::new();
        for definition in definitions {
            world.add_template(&definition.name, definition.transform)?;
        }
        Ok(world)
    }

    /// Register a template under a unique name
    pub fn add_template(&mut self, name: &str, transform: Transform) -> Result<TemplateId, SceneError> {
        if self.find_template(name).is_some() {
            return Err(SceneError::DuplicateTemplate(name.to_string()));
        }
        Ok(self.templates.insert(TemplateData {
            name: name.to_string(),
            transform,
        }))
    }

    /// Unload a template; instances already created from it stay alive
    pub fn remove_template(&mut self, template: TemplateId) -> bool {
        self.templates.remove(template).is_some()
    }

    /// Change the baseline placement of a template
    pub fn set_template_transform(&mut self, template: TemplateId, transform: Transform) -> Result<(), SceneError> {
        let data = self
            .templates
            .get_mut(template)
            .ok_or(SceneError::TemplateNotFound(template))?;
        data.transform = transform;
        Ok(())
    }

    /// Look up a live instance
    pub fn instance(&self, instance: InstanceId) -> Option<&InstanceData> {
        self.instances.get(instance)
    }

    /// Whether a live instance is active
    pub fn is_active(&self, instance: InstanceId) -> bool {
        self.instances.get(instance).is_some_and(|data| data.active)
    }

    /// Organizational parent of a live instance
    pub fn parent_of(&self, instance: InstanceId) -> Option<NodeId> {
        self.instances.get(instance).and_then(|data| data.parent)
    }

    /// Look up a live node
    pub fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node)
    }

    /// Nodes directly filed under `node`
    pub fn child_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, data)| data.parent == Some(node))
            .map(|(id, _)| id)
            .collect()
    }

    /// Instances directly filed under `node`
    pub fn instances_under(&self, node: NodeId) -> Vec<InstanceId> {
        self.instances
            .iter()
            .filter(|(_, data)| data.parent == Some(node))
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of live instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Creation / release counters
    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    /// `root` and every node below it
    fn subtree(&self, root: NodeId) -> HashSet<NodeId> {
        let mut found = HashSet::from([root]);
        let mut frontier = vec![root];

        while let Some(current) = frontier.pop() {
            for child in self.child_nodes(current) {
                if found.insert(child) {
                    frontier.push(child);
                }
            }
        }

        found
    }

    fn release_subtree(&mut self, root: NodeId, keep_root: bool) {
        if !self.nodes.contains_key(root) {
            return;
        }

        let doomed = self.subtree(root);
        let before = self.instances.len();
        self.instances
            .retain(|_, data| !data.parent.is_some_and(|parent| doomed.contains(&parent)));
        self.stats.released += (before - self.instances.len()) as u64;

        self.nodes.retain(|id, _| !doomed.contains(&id) || (keep_root && id == root));
    }
}

impl SceneHost for SceneWorld {
    fn template_name(&self, template: TemplateId) -> Option<&str> {
        self.templates.get(template).map(|data| data.name.as_str())
    }

    fn template_transform(&self, template: TemplateId) -> Option<Transform> {
        self.templates.get(template).map(|data| data.transform)
    }

    fn find_template(&self, name: &str) -> Option<TemplateId> {
        self.templates
            .iter()
            .find(|(_, data)| data.name == name)
            .map(|(id, _)| id)
    }

    fn instantiate(&mut self, template: TemplateId, transform: &Transform) -> Result<InstanceId, SceneError> {
        if !self.templates.contains_key(template) {
            return Err(SceneError::TemplateNotFound(template));
        }

        self.stats.instantiated += 1;
        Ok(self.instances.insert(InstanceData {
            template,
            transform: *transform,
            active: true,
            parent: None,
        }))
    }

    fn is_alive(&self, instance: InstanceId) -> bool {
        self.instances.contains_key(instance)
    }

    fn transform(&self, instance: InstanceId) -> Option<Transform> {
        self.instances.get(instance).map(|data| data.transform)
    }

    fn set_transform(&mut self, instance: InstanceId, transform: &Transform) {
        if let Some(data) = self.instances.get_mut(instance) {
            data.transform = *transform;
        }
    }

    fn set_active(&mut self, instance: InstanceId, active: bool) {
        if let Some(data) = self.instances.get_mut(instance) {
            data.active = active;
        }
    }

    fn set_parent(&mut self, instance: InstanceId, parent: Option<NodeId>) {
        let parent = parent.filter(|node| self.nodes.contains_key(*node));
        if let Some(data) = self.instances.get_mut(instance) {
            data.parent = parent;
        }
    }

    fn release(&mut self, instance: InstanceId) {
        if self.instances.remove(instance).is_some() {
            self.stats.released += 1;
        }
    }

    fn create_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let parent = parent.filter(|node| self.nodes.contains_key(*node));
        self.nodes.insert(NodeData {
            name: name.to_string(),
            parent,
        })
    }

    fn release_node(&mut self, node: NodeId) {
        self.release_subtree(node, false);
    }

    fn release_children(&mut self, node: NodeId) {
        self.release_subtree(node, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_duplicate_template_rejected() {
        let mut world = SceneWorld::new();
        world.add_template("Enemy", Transform::identity()).expect("Should add");
        let result = world.add_template("Enemy", Transform::identity());
        assert_eq!(result, Err(SceneError::DuplicateTemplate("Enemy".to_string())));
    }

    #[test]
    fn test_instantiate_copies_transform() {
        let mut world = SceneWorld::new();
        let template = world.add_template("Crate", Transform::identity()).expect("Should add");
        let at = Transform::from_position(Vec3::new(1.0, 0.0, -2.0));

        let instance = world.instantiate(template, &at).expect("Should instantiate");
        assert!(world.is_alive(instance));
        assert!(world.is_active(instance));
        assert_eq!(world.transform(instance), Some(at));
        assert_eq!(world.stats().instantiated, 1);
    }

    #[test]
    fn test_instantiate_removed_template_fails() {
        let mut world = SceneWorld::new();
        let template = world.add_template("Ghost", Transform::identity()).expect("Should add");
        assert!(world.remove_template(template));

        let result = world.instantiate(template, &Transform::identity());
        assert_eq!(result, Err(SceneError::TemplateNotFound(template)));
        assert!(!world.is_template_valid(template));
    }

    #[test]
    fn test_release_node_takes_subtree() {
        let mut world = SceneWorld::new();
        let template = world.add_template("Rock", Transform::identity()).expect("Should add");
        let root = world.create_node("root", None);
        let holder = world.create_node("holder", Some(root));
        let outside = world.create_node("outside", None);

        let under_holder = world.instantiate(template, &Transform::identity()).expect("Should instantiate");
        world.set_parent(under_holder, Some(holder));
        let under_root = world.instantiate(template, &Transform::identity()).expect("Should instantiate");
        world.set_parent(under_root, Some(root));
        let loose = world.instantiate(template, &Transform::identity()).expect("Should instantiate");
        world.set_parent(loose, Some(outside));

        world.release_children(root);
        assert!(world.node(root).is_some());
        assert!(world.node(holder).is_none());
        assert!(!world.is_alive(under_holder));
        assert!(!world.is_alive(under_root));
        assert!(world.is_alive(loose));
        assert_eq!(world.stats().released, 2);

        world.release_node(outside);
        assert!(world.node(outside).is_none());
        assert!(!world.is_alive(loose));
    }

    #[test]
    fn test_operations_on_released_instance_are_ignored() {
        let mut world = SceneWorld::new();
        let template = world.add_template("Spark", Transform::identity()).expect("Should add");
        let instance = world.instantiate(template, &Transform::identity()).expect("Should instantiate");

        world.release(instance);
        world.release(instance);
        world.set_active(instance, true);
        world.set_transform(instance, &Transform::from_position(Vec3::new(1.0, 1.0, 1.0)));

        assert!(!world.is_alive(instance));
        assert_eq!(world.transform(instance), None);
        assert_eq!(world.stats().released, 1);
    }
}
