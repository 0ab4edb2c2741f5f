//! Persistence port consumed by request handlers.
//!
//! Handlers receive a repository at construction time; the storage engine
//! behind it is an infrastructure concern.

use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::RepositoryError;

/// Narrow find/list/save/delete contract for one entity type.
#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: Entity + Send + Sync + 'static,
{
    async fn find(&self, id: &E::Id) -> Result<Option<E>, RepositoryError>;

    /// All entities, ordered by identifier.
    async fn list(&self) -> Result<Vec<E>, RepositoryError>;

    /// Insert or replace the entity stored under its identifier.
    async fn save(&self, entity: E) -> Result<(), RepositoryError>;

    /// Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: &E::Id) -> Result<bool, RepositoryError>;
}
