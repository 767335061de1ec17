//! In-process store. Ids start at 1 and are never reused.

use super::DogStore;
use crate::error::StoreError;
use crate::model::{Dog, DogPatch, NewDog};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i32, Dog>,
    last_id: i32,
}

#[derive(Default)]
pub struct MemoryDogStore {
    inner: RwLock<Inner>,
}

impl MemoryDogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DogStore for MemoryDogStore {
    async fn find_all(&self) -> Result<Vec<Dog>, StoreError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Dog>, StoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, dog: NewDog) -> Result<Dog, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::InvalidRecord("id sequence exhausted".into()))?;
        inner.last_id = id;
        let row = Dog {
            id,
            name: dog.name,
            description: dog.description,
            breed: dog.breed,
            age: dog.age,
        };
        inner.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, patch: DogPatch) -> Result<Option<Dog>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.get_mut(&id).map(|dog| {
            patch.apply(dog);
            dog.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<Option<Dog>, StoreError> {
        Ok(self.inner.write().await.rows.remove(&id))
    }
}
