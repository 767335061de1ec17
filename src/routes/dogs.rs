//! Dog resource routes.

use crate::handlers::{create_dog, delete_dog, get_dog, list_dogs, update_dog};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn dog_routes(state: AppState) -> Router {
    Router::new()
        .route("/dogs", get(list_dogs).post(create_dog))
        .route("/dogs/:id", get(get_dog).patch(update_dog).delete(delete_dog))
        .with_state(state)
}
