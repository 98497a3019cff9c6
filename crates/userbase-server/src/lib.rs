//! # Userbase Server Library
//!
//! Dependency wiring and startup utilities for the `userbase-server` binary.

pub mod di;
pub mod startup;
