//! Dogs API: CRUD REST service for the dog resource.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use app::{build_app, build_state, serve, StartupError};
pub use config::{Environment, ServerConfig, StoreBackend};
pub use error::{AppError, ConfigError, StoreError};
pub use model::{Dog, DogPatch, NewDog};
pub use routes::{common_routes, dog_routes, openapi_routes};
pub use service::{RequestValidator, Validation, DOG_SCHEMA};
pub use state::AppState;
pub use store::{DogStore, MemoryDogStore, PgDogStore};
