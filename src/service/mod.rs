//! Request validation for the dog resource.

mod validation;
pub use validation::{
    check_missing, check_types, check_unknown, FieldType, Record, RequestValidator, Schema,
    Validation, DOG_SCHEMA,
};
