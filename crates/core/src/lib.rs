//! `courselib-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod course;
pub mod entity;
pub mod error;
pub mod id;
pub mod repository;

pub use course::{Course, CourseDetails};
pub use entity::Entity;
pub use error::{DomainError, DomainResult, FieldViolation, RepositoryError, ValidationErrors};
pub use id::{CourseId, UserId};
pub use repository::Repository;
