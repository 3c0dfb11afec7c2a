//! Queue Replay common types, IDs, and errors.
//!
//! This crate provides foundational types shared across qr-core modules:
//! - Process and replay-run identity types
//! - Schema versioning for JSON exports
//! - Common error types with stable codes

pub mod error;
pub mod id;
pub mod schema;

pub use error::{Error, Result};
pub use id::{Pid, RunId};
pub use schema::SCHEMA_VERSION;
