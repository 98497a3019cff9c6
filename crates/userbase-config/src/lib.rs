//! # Userbase Config
//!
//! Configuration management for Userbase.
//! Supports layered configuration from files and environment variables,
//! including the plain `DB_DSN` / `REDIS_*` variables of older deployments.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
