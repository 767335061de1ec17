//! Data-store collaborator for the dog resource.
//!
//! Lookups return `Ok(None)` when no row matches and `Err` when the backend fails, so the
//! two outcomes stay distinguishable even where handlers answer both the same way.

mod memory;
mod postgres;

pub use memory::MemoryDogStore;
pub use postgres::{ensure_database_exists, ensure_dogs_table, PgDogStore, DOGS_TABLE};

use crate::error::StoreError;
use crate::model::{Dog, DogPatch, NewDog};
use async_trait::async_trait;

#[async_trait]
pub trait DogStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Dog>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Dog>, StoreError>;

    /// Insert and return the row with its store-assigned id.
    async fn create(&self, dog: NewDog) -> Result<Dog, StoreError>;

    async fn update(&self, id: i32, patch: DogPatch) -> Result<Option<Dog>, StoreError>;

    /// Delete and return the removed row.
    async fn delete(&self, id: i32) -> Result<Option<Dog>, StoreError>;
}
