//! Infrastructure layer: storage adapters behind the repository ports.

pub mod repository;

pub use repository::in_memory::InMemoryRepository;
pub use repository::postgres::{PostgresCourseRepository, PostgresUserRepository, migrate};
