//! Persistence seam. Handlers talk to a `Store`; backends translate entity operations to storage.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::model::{Entity, Include, Record};
use async_trait::async_trait;

/// Entity operations shared by all backends. Keys of every `Record` are column names.
///
/// Deleting a row cascades to junction rows that reference it.
#[async_trait]
pub trait Store: Send + Sync {
    /// All rows ordered by id, each with `include` embedded.
    async fn find_many(&self, entity: &'static Entity, include: Option<&'static Include>)
        -> Result<Vec<Record>, AppError>;

    /// One row by id, or `None`.
    async fn find_unique(
        &self,
        entity: &'static Entity,
        id: i64,
        include: Option<&'static Include>,
    ) -> Result<Option<Record>, AppError>;

    /// Apply a coerced field set to row `id` and return the updated row.
    /// A missing row is `AppError::NotFound`.
    async fn update(&self, entity: &'static Entity, id: i64, fields: Record) -> Result<Record, AppError>;

    /// Remove row `id` and return it. A missing row is `AppError::NotFound`.
    async fn delete(&self, entity: &'static Entity, id: i64) -> Result<Record, AppError>;

    /// Insert rows atomically after coercing each against the entity's columns.
    /// Explicit ids are kept. Returns the number inserted.
    async fn create_many(&self, entity: &'static Entity, rows: Vec<Record>) -> Result<u64, AppError>;
}
