//! # Userbase Service
//!
//! The user access coordinator and the cache adapter it drives.
//!
//! Reads go cache first and fall back to the durable store, populating the
//! cache on the way out. Writes go to the store first and are then copied
//! into the cache. The store is the source of truth; the cache is never the
//! only copy of a record.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod metrics;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::*;
pub use user_service::*;
