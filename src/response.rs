//! Response helpers shared by the handlers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub const DOG_CREATED_MESSAGE: &str = "Dog created successfully";
pub const DOG_NOT_FOUND_MESSAGE: &str = "unable to find dog with that id";
pub const ID_NOT_A_NUMBER_MESSAGE: &str = "id should be a number";

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}
