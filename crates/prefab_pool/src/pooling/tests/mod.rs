//! Behavioural tests for the pooling layer against the in-memory scene host


use crate::core::config::PoolManagerConfig;
use crate::foundation::collections::TemplateId;
use crate::foundation::math::Transform;
use crate::pooling::PoolManager;
use crate::scene::SceneWorld;

/// Manager over a fresh world holding a single `Enemy` template
fn manager_with_enemy(config: PoolManagerConfig) -> (PoolManager<SceneWorld>, TemplateId) {
    let mut world = SceneWorld::new();
    let enemy = world
        .add_template("Enemy", Transform::identity())
        .expect("Should add template");
    (PoolManager::new(world, config), enemy)
}
