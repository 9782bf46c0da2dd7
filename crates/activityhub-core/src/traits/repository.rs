//! Generic repository trait for aggregate persistence.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::pagination::{PageRequest, PageResponse};

/// Generic CRUD repository trait.
///
/// Each aggregate's store trait extends this with its own query methods.
/// `update` is the single persistence flush after a guarded transition.
#[async_trait]
pub trait Repository<Entity, Id>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static + serde::Serialize,
    Id: Send + Sync + 'static,
{
    /// Find an entity by its primary key. Soft-deleted rows are not returned.
    async fn find_by_id(&self, id: &Id) -> AppResult<Option<Entity>>;

    /// Find all entities with pagination.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Entity>>;

    /// Insert a new entity and return it.
    async fn create(&self, entity: &Entity) -> AppResult<Entity>;

    /// Persist an existing entity and return the stored version.
    async fn update(&self, entity: &Entity) -> AppResult<Entity>;

    /// Physically delete an entity by its primary key. Returns `true` if deleted.
    async fn delete(&self, id: &Id) -> AppResult<bool>;

    /// Count entities.
    async fn count(&self) -> AppResult<u64>;
}
