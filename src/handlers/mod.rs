//! HTTP handlers for the dog resource.

pub mod dogs;
pub use dogs::*;
