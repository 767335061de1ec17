//! Dog resource handlers: list, read, create, update, delete.

use crate::error::{AppError, StoreError};
use crate::extractors::JsonRecord;
use crate::model::{Dog, DogCreated, DogPatch, NewDog};
use crate::response::{created, ok, DOG_CREATED_MESSAGE, DOG_NOT_FOUND_MESSAGE, ID_NOT_A_NUMBER_MESSAGE};
use crate::service::{RequestValidator, DOG_SCHEMA};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

/// Numeric string coercion: surrounding whitespace ignored, blank is 0, `0x`/`0o`/`0b`
/// prefixes read in that radix, `Infinity` allowed. `None` stands for NaN.
fn coerce_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            if digits.is_empty() {
                return None;
            }
            return digits
                .chars()
                .try_fold(0f64, |acc, c| c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d)));
        }
    }
    let unsigned = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    if unsigned == "Infinity" {
        return Some(if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    // Rust also accepts "inf" and "nan"; numeric coercion does not.
    if unsigned.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.parse().ok()
}

/// Parse a path id. Non-numeric input is a bad request; a number that cannot be a row id
/// (fractional, out of range, infinite) yields `None`.
pub(crate) fn parse_id(raw: &str) -> Result<Option<i32>, AppError> {
    let n = coerce_number(raw).ok_or_else(|| AppError::BadRequest(ID_NOT_A_NUMBER_MESSAGE.into()))?;
    if n.fract() == 0.0 && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) {
        Ok(Some(n as i32))
    } else {
        Ok(None)
    }
}

fn not_found() -> AppError {
    AppError::NotFound(DOG_NOT_FOUND_MESSAGE.into())
}

/// Backend failures on lookups answer like a miss; they are only visible in the log.
fn found(result: Result<Option<Dog>, StoreError>, id: i32) -> Result<Dog, AppError> {
    match result {
        Ok(Some(dog)) => Ok(dog),
        Ok(None) => Err(not_found()),
        Err(e) => {
            tracing::warn!(id, error = %e, "store lookup failed; answering as not found");
            Err(not_found())
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting")),
    tag = "common"
)]
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello World!" }))
}

#[utoipa::path(
    get,
    path = "/dogs",
    responses(
        (status = 200, description = "All dogs", body = [Dog]),
        (status = 500, description = "Store failure"),
    ),
    tag = "dogs"
)]
pub async fn list_dogs(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let dogs = state.store.find_all().await?;
    Ok(ok(dogs))
}

#[utoipa::path(
    get,
    path = "/dogs/{id}",
    params(("id" = String, Path, description = "Numeric dog id")),
    responses(
        (status = 200, description = "The dog", body = Dog),
        (status = 204, description = "No dog with that id"),
        (status = 400, description = "Id is not a number"),
    ),
    tag = "dogs"
)]
pub async fn get_dog(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?.ok_or_else(not_found)?;
    let dog = found(state.store.find_by_id(id).await, id)?;
    Ok(ok(dog))
}

#[utoipa::path(
    post,
    path = "/dogs",
    request_body = NewDog,
    responses(
        (status = 201, description = "Dog created", body = DogCreated),
        (status = 400, description = "Validation errors"),
        (status = 500, description = "Store failure"),
    ),
    tag = "dogs"
)]
pub async fn create_dog(
    State(state): State<AppState>,
    JsonRecord(body): JsonRecord,
) -> Result<impl IntoResponse, AppError> {
    let record = body?;
    RequestValidator::validate(&record, DOG_SCHEMA).into_result()?;
    let new_dog = NewDog::from_record(record)?;
    let dog = state.store.create(new_dog).await?;
    tracing::info!(id = dog.id, "dog created");
    Ok(created(DogCreated {
        message: DOG_CREATED_MESSAGE.into(),
        dog,
    }))
}

/// Successful updates answer 201, not 200.
#[utoipa::path(
    patch,
    path = "/dogs/{id}",
    params(("id" = String, Path, description = "Numeric dog id")),
    request_body = DogPatch,
    responses(
        (status = 201, description = "Updated dog", body = Dog),
        (status = 204, description = "No dog with that id, or the update was rejected"),
        (status = 400, description = "Id is not a number, or body has unknown keys"),
    ),
    tag = "dogs"
)]
pub async fn update_dog(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonRecord(body): JsonRecord,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let record = body?;
    RequestValidator::validate_partial(&record, DOG_SCHEMA).into_result()?;
    let id = id.ok_or_else(not_found)?;
    let result = match DogPatch::from_record(record) {
        Ok(patch) => state.store.update(id, patch).await,
        Err(e) => Err(e),
    };
    let dog = found(result, id)?;
    Ok(created(dog))
}

#[utoipa::path(
    delete,
    path = "/dogs/{id}",
    params(("id" = String, Path, description = "Numeric dog id")),
    responses(
        (status = 200, description = "The deleted dog", body = Dog),
        (status = 204, description = "No dog with that id"),
        (status = 400, description = "Id is not a number"),
    ),
    tag = "dogs"
)]
pub async fn delete_dog(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?.ok_or_else(not_found)?;
    let dog = found(state.store.delete(id).await, id)?;
    tracing::info!(id, "dog deleted");
    Ok(ok(dog))
}
