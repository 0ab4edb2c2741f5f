//! Repository implementations.
//!
//! - `in_memory`: process-local maps, used for development and tests
//! - `postgres`: SQLx-backed tables, selected when a database URL is configured

pub mod in_memory;
pub mod postgres;
