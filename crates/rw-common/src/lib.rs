//! Random-walk corpus common types and errors.
//!
//! This crate provides foundational types shared across rw-core modules:
//! - Walk, walk collection, and batch types
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod output;
pub mod schema;
pub mod walk;

pub use error::{Error, Result};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
pub use walk::{Batch, TokenRole, Walk, WalkCollection};
