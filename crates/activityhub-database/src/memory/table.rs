//! Generic `DashMap`-backed table.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};

/// A row type that can live in a [`MemoryStore`].
pub trait MemoryRecord: Clone + fmt::Debug + serde::Serialize + Send + Sync + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Primary key.
    fn id(&self) -> Uuid;

    /// Creation time; listings are newest first.
    fn created_at(&self) -> DateTime<Utc>;

    /// Soft-deleted rows are invisible to reads.
    fn is_deleted(&self) -> bool {
        false
    }

    /// Value of the row's unique constraint, if the table has one.
    ///
    /// Unique keys are assumed immutable after insert.
    fn unique_key(&self) -> Option<String> {
        None
    }
}

/// One in-memory table. Clones share the same rows.
#[derive(Clone)]
pub struct MemoryStore<T> {
    rows: Arc<DashMap<Uuid, T>>,
    unique: Arc<DashMap<String, Uuid>>,
}

impl<T> fmt::Debug for MemoryStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("rows", &self.rows.len())
            .finish()
    }
}

impl<T: MemoryRecord> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MemoryRecord> MemoryStore<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(DashMap::new()),
            unique: Arc::new(DashMap::new()),
        }
    }

    /// Visible rows matching `pred`, newest first.
    pub fn select(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<T> = self
            .rows
            .iter()
            .filter(|r| !r.is_deleted() && pred(r.value()))
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        rows
    }

    /// One page of visible rows matching `pred`, newest first.
    pub fn page(&self, page: &PageRequest, pred: impl Fn(&T) -> bool) -> PageResponse<T> {
        PageResponse::paginate(self.select(pred), page)
    }

    /// Run `f` against a row while holding its lock.
    pub fn with_row<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut T) -> AppResult<R>,
    ) -> AppResult<R> {
        match self.rows.get_mut(&id) {
            Some(mut row) if !row.is_deleted() => f(row.value_mut()),
            _ => Err(AppError::not_found(format!("{} {id} not found", T::ENTITY))),
        }
    }

    /// Mutate every visible row matching `pred`. Returns the number touched.
    pub fn update_where(&self, pred: impl Fn(&T) -> bool, f: impl Fn(&mut T) -> bool) -> u64 {
        let mut touched = 0;
        for mut row in self.rows.iter_mut() {
            if !row.is_deleted() && pred(row.value()) && f(row.value_mut()) {
                touched += 1;
            }
        }
        touched
    }

    fn insert(&self, entity: &T) -> AppResult<T> {
        let id = entity.id();
        if self.rows.contains_key(&id) {
            return Err(AppError::conflict(format!(
                "{} {id} already exists",
                T::ENTITY
            )));
        }
        if let Some(key) = entity.unique_key() {
            match self.unique.entry(key) {
                Entry::Occupied(_) => {
                    return Err(AppError::conflict(format!("{} already exists", T::ENTITY)));
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
        }
        self.rows.insert(id, entity.clone());
        Ok(entity.clone())
    }
}

#[async_trait]
impl<T: MemoryRecord> Repository<T, Uuid> for MemoryStore<T> {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<T>> {
        Ok(self
            .rows
            .get(id)
            .filter(|r| !r.is_deleted())
            .map(|r| r.value().clone()))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<T>> {
        Ok(self.page(page, |_| true))
    }

    async fn create(&self, entity: &T) -> AppResult<T> {
        self.insert(entity)
    }

    async fn update(&self, entity: &T) -> AppResult<T> {
        match self.rows.get_mut(&entity.id()) {
            Some(mut row) => {
                *row = entity.clone();
                Ok(entity.clone())
            }
            None => Err(AppError::not_found(format!(
                "{} {} not found",
                T::ENTITY,
                entity.id()
            ))),
        }
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        match self.rows.remove(id) {
            Some((_, row)) => {
                if let Some(key) = row.unique_key() {
                    self.unique.remove(&key);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.iter().filter(|r| !r.is_deleted()).count() as u64)
    }
}
