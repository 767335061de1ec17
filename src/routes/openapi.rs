//! OpenAPI document for the dog API, served at `/openapi.json`.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Dogs API", description = "CRUD over the dog resource."),
    paths(
        crate::handlers::dogs::root,
        crate::handlers::dogs::list_dogs,
        crate::handlers::dogs::get_dog,
        crate::handlers::dogs::create_dog,
        crate::handlers::dogs::update_dog,
        crate::handlers::dogs::delete_dog,
    ),
    components(schemas(
        crate::model::Dog,
        crate::model::NewDog,
        crate::model::DogPatch,
        crate::model::DogCreated,
    )),
    tags((name = "dogs", description = "Dog resource"))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn openapi_routes() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}
