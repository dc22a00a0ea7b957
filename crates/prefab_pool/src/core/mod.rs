//! # Core Module
//!
//! Shared configuration types used by the pooling layer and the application
//! context.

pub mod config;

pub use config::{ApplicationConfig, PoolManagerConfig, PoolPreset, TemplateDefinition};
pub use crate::config::{Config, ConfigError};
