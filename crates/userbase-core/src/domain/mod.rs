//! Domain records shared by the store, cache and transport layers.

mod user;

pub use user::*;
