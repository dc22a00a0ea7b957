//! Pool demo application
//!
//! Runs a headless enemy wave through the prefab pool: enemies and bullets
//! are spawned at random positions, recycled when they expire, and the pool
//! statistics are logged at the end.
//!
//! Usage: `pool_demo [config.toml|config.ron]`

use std::path::PathBuf;

use prefab_pool::foundation::logging;
use prefab_pool::prelude::*;
use rand::Rng;

/// Frames to run when the configuration does not set a limit
const DEFAULT_FRAMES: u64 = 120;

/// Frames an enemy stays in play
const ENEMY_LIFETIME: u64 = 30;

/// Frames a bullet stays in play
const BULLET_LIFETIME: u64 = 8;

struct Live {
    instance: InstanceId,
    expires_at: u64,
}

struct WaveDemo {
    enemy: Option<TemplateId>,
    bullet: Option<TemplateId>,
    live: Vec<Live>,
    frame: u64,
}

impl WaveDemo {
    fn new() -> Self {
        Self {
            enemy: None,
            bullet: None,
            live: Vec::new(),
            frame: 0,
        }
    }

    fn spawn_for(&mut self, pools: &mut PoolManager<SceneWorld>, template: TemplateId, lifetime: u64) {
        let mut rng = rand::thread_rng();
        let position = Vec3::new(rng.gen_range(-20.0..20.0), 0.0, rng.gen_range(-20.0..20.0));
        let heading = prefab_pool::foundation::math::utils::yaw(rng.gen_range(0.0..360.0));

        let params = SpawnParams::at(position).with_rotation(heading);
        if let Some(instance) = template.spawn_with(pools, params) {
            self.live.push(Live {
                instance,
                expires_at: self.frame + lifetime,
            });
        }
    }
}

impl Application<SceneWorld> for WaveDemo {
    fn initialize(&mut self, ctx: &mut PoolingContext<SceneWorld>) -> Result<(), AppError> {
        log::info!("Initializing wave demo...");

        let host = ctx.pools.host();
        self.enemy = host.find_template("Enemy");
        self.bullet = host.find_template("Bullet");

        if self.enemy.is_none() && self.bullet.is_none() {
            return Err(AppError::Config("no Enemy or Bullet template configured".to_string()));
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut PoolingContext<SceneWorld>, _delta_time: f32) -> Result<(), AppError> {
        self.frame += 1;

        let frame = self.frame;
        let (expired, alive): (Vec<Live>, Vec<Live>) =
            self.live.drain(..).partition(|live| live.expires_at <= frame);
        self.live = alive;
        for live in expired {
            live.instance.recycle(&mut ctx.pools);
        }

        if let Some(enemy) = self.enemy {
            if frame % 10 == 1 {
                for _ in 0..3 {
                    self.spawn_for(&mut ctx.pools, enemy, ENEMY_LIFETIME);
                }
            }
        }
        if let Some(bullet) = self.bullet {
            self.spawn_for(&mut ctx.pools, bullet, BULLET_LIFETIME);
        }

        if frame % 30 == 0 {
            log::debug!(
                "Frame {}: {} in play, {} pools",
                frame,
                self.live.len(),
                ctx.pools.pool_count()
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, ctx: &mut PoolingContext<SceneWorld>) {
        log::info!("Recycling {} instances still in play", self.live.len());
        for live in self.live.drain(..) {
            live.instance.recycle(&mut ctx.pools);
        }

        for (_, pool) in ctx.pools.pools() {
            let name = ctx.pools.host().template_name(pool.template()).unwrap_or("<released>");
            log::info!(
                "Pool '{}': {} stored, {} created over the run",
                name,
                pool.stored_count(),
                pool.created_count()
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let mut config = ApplicationConfig::load_or_default(config_path.as_deref())?;

    logging::init_with_level(&config.log_level);
    log::info!("Starting {}", config.application_name);

    if config.templates.is_empty() {
        config = config
            .with_template(TemplateDefinition::new("Enemy"))
            .with_template(TemplateDefinition::new("Bullet"));
    }
    if config.pooling.pools.is_empty() {
        config.pooling = config
            .pooling
            .with_pool(PoolPreset::new("Enemy", 6))
            .with_pool(PoolPreset::new("Bullet", 8));
    }

    let frames = match config.frame_limit {
        0 => DEFAULT_FRAMES,
        limit => limit,
    };

    let world = SceneWorld::from_definitions(&config.templates)?;
    let mut ctx = PoolingContext::new(world, config)?;
    let mut app = WaveDemo::new();
    ctx.run(&mut app, frames)?;

    let stats = ctx.pools.stats();
    let world = ctx.into_host();
    log::info!(
        "Demo complete: {} spawns served by {} instantiations ({} recycled, {} released)",
        stats.total_spawned,
        world.stats().instantiated,
        stats.total_recycled,
        stats.total_released
    );
    Ok(())
}
