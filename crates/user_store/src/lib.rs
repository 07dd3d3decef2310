//! User storage for the registry service
//!
//! This crate provides a storage abstraction for user records keyed by a
//! caller-supplied external identifier. It ships a SQLite implementation
//! (used by the running service) and an in-memory implementation for tests.

mod entities;
mod error;
mod sqlite;
mod store;

pub use entities::*;
pub use error::*;
pub use sqlite::*;
pub use store::*;
