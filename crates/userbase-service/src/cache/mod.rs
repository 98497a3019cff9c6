//! Caching infrastructure for the service layer.
//!
//! A cache abstraction with a Redis implementation. Entries are the JSON
//! projection of a record and expire according to the adapter's TTL.

mod cache_interface;
pub mod cache_keys;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use redis_cache::{
    create_redis_pool, RedisCacheService, RedisCacheServiceParameters, DEFAULT_TTL,
};
