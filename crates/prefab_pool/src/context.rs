//! Pooling context and headless frame loop
//!
//! [`PoolingContext`] owns the single [`PoolManager`] of a running
//! application together with its frame timer and configuration. Gameplay
//! code receives it in every [`Application`] callback.

use thiserror::Error;

use crate::application::Application;
use crate::core::config::ApplicationConfig;
use crate::config::ConfigError;
use crate::foundation::time::Timer;
use crate::pooling::PoolManager;
use crate::scene::{SceneError, SceneHost};

/// Errors raised while setting up or running a context
#[derive(Error, Debug)]
pub enum ContextError {
    /// Configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene host setup failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// An application callback failed
    #[error("Application error: {0}")]
    Application(String),
}

/// Runtime state shared with application callbacks
pub struct PoolingContext<H: SceneHost> {
    /// Pool registry for this application
    pub pools: PoolManager<H>,

    timer: Timer,
    config: ApplicationConfig,
    running: bool,
}

impl<H: SceneHost> PoolingContext<H> {
    /// Create a context over `host` and create the configured pools
    pub fn new(host: H, config: ApplicationConfig) -> Result<Self, ContextError> {
        config.validate()?;
        log::info!("Initializing '{}'...", config.application_name);

        let mut pools = PoolManager::new(host, config.pooling.clone());
        pools.initialize_pools();

        Ok(Self {
            pools,
            timer: Timer::new(),
            config,
            running: true,
        })
    }

    /// Run `app` for `frames` frames, or until [`stop`](Self::stop) when `frames` is zero
    pub fn run<A: Application<H>>(&mut self, app: &mut A, frames: u64) -> Result<(), ContextError> {
        app.initialize(self)
            .map_err(|e| ContextError::Application(format!("App initialization: {}", e)))?;

        log::info!("Starting frame loop...");
        self.running = true;

        while self.running && (frames == 0 || self.timer.frame_count() < frames) {
            self.step(app)?;
        }

        app.cleanup(self);

        let stats = self.pools.stats();
        log::info!(
            "Frame loop finished after {} frames: {} spawned, {} recycled, {} released",
            self.timer.frame_count(),
            stats.total_spawned,
            stats.total_recycled,
            stats.total_released
        );
        Ok(())
    }

    /// Run [`run`](Self::run) with the configured frame limit
    pub fn run_configured<A: Application<H>>(&mut self, app: &mut A) -> Result<(), ContextError> {
        let frames = self.config.frame_limit;
        self.run(app, frames)
    }

    /// Advance a single frame: update the application, then maintain pools
    pub fn step<A: Application<H>>(&mut self, app: &mut A) -> Result<(), ContextError> {
        self.timer.update();
        let delta_time = self.timer.delta_time();

        app.update(self, delta_time)
            .map_err(|e| ContextError::Application(format!("App update: {}", e)))?;

        self.pools.late_update();
        Ok(())
    }

    /// Ask the frame loop to finish after the current frame
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the frame loop is still running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frame timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Application configuration
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Tear down the context and give the scene host back
    pub fn into_host(self) -> H {
        self.pools.into_host()
    }
}
