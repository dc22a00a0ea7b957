//! Application trait and lifecycle management

use crate::context::{ContextError, PoolingContext};
use crate::scene::SceneHost;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive gameplay on top of a [`PoolingContext`].
pub trait Application<H: SceneHost> {
    /// Initialize the application
    ///
    /// Called once before the first frame. Use this to register pools and
    /// spawn the initial population.
    fn initialize(&mut self, ctx: &mut PoolingContext<H>) -> Result<(), AppError> {
        let _ = ctx;
        Ok(())
    }

    /// Update the application
    ///
    /// Called every frame, before the pool manager's maintenance pass.
    ///
    /// # Arguments
    /// * `ctx` - Mutable reference to the pooling context
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, ctx: &mut PoolingContext<H>, delta_time: f32) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called once after the last frame.
    fn cleanup(&mut self, ctx: &mut PoolingContext<H>);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Context error propagated to application level
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
