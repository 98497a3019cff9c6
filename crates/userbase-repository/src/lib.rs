//! # Userbase Repository
//!
//! Durable store adapter: the single source of truth for user records.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>
//! PostgresUserRepository
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```

pub mod pool;
pub mod postgres;
pub mod traits;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
