//! Shared application state for all routes.

use crate::store::DogStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DogStore>,
}

impl AppState {
    pub fn new<S: DogStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
