mod common;
mod dogs;
mod openapi;

pub use common::common_routes;
pub use dogs::dog_routes;
pub use openapi::{openapi_routes, ApiDoc};
