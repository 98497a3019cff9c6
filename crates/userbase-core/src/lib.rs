//! # Userbase Core
//!
//! Core types, traits, and error definitions for Userbase.
//! Everything the store, cache, service and transport layers agree on lives
//! here: the user record, its identity, the unified error type and the
//! per-request execution context.

pub mod context;
pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use context::*;
pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
