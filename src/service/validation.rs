//! Request-body validation against a fixed field schema.

use crate::error::AppError;
use serde_json::{Map, Value};

/// Untyped request body, in the key order the client sent it.
pub type Record = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
        }
    }

    /// `null` matches no field type.
    pub fn matches(self, v: &Value) -> bool {
        match self {
            FieldType::String => v.is_string(),
            FieldType::Number => v.is_number(),
        }
    }
}

/// Ordered field name to type mapping.
pub type Schema = [(&'static str, FieldType)];

pub const DOG_SCHEMA: &Schema = &[
    ("name", FieldType::String),
    ("description", FieldType::String),
    ("breed", FieldType::String),
    ("age", FieldType::Number),
];

fn lookup(schema: &Schema, key: &str) -> Option<FieldType> {
    schema.iter().find(|(name, _)| *name == key).map(|(_, t)| *t)
}

fn type_message(key: &str, expected: FieldType) -> String {
    format!("{} should be a {}", key, expected.as_str())
}

/// Present keys the schema knows whose value has the wrong type. Unknown keys are skipped.
pub fn check_types(record: &Record, schema: &Schema) -> Vec<String> {
    record
        .iter()
        .filter_map(|(key, v)| match lookup(schema, key) {
            Some(expected) if !expected.matches(v) => Some(type_message(key, expected)),
            _ => None,
        })
        .collect()
}

/// Schema keys absent from the record. A present `null` is not absent.
pub fn check_missing(record: &Record, schema: &Schema) -> Vec<String> {
    schema
        .iter()
        .filter(|(key, _)| !record.contains_key(*key))
        .map(|(key, expected)| type_message(key, *expected))
        .collect()
}

pub fn check_unknown(record: &Record, schema: &Schema) -> Vec<String> {
    record
        .keys()
        .filter(|key| lookup(schema, key).is_none())
        .map(|key| format!("'{}' is not a valid key", key))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(Vec<String>),
}

impl Validation {
    fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Validation::Valid
        } else {
            Validation::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn errors(&self) -> &[String] {
        match self {
            Validation::Valid => &[],
            Validation::Invalid(errors) => errors,
        }
    }

    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Validation::Valid => Ok(()),
            Validation::Invalid(errors) => Err(AppError::Validation(errors)),
        }
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Full-record validation for create: type errors, then missing keys, then unknown keys.
    pub fn validate(record: &Record, schema: &Schema) -> Validation {
        let mut errors = check_types(record, schema);
        errors.extend(check_missing(record, schema));
        errors.extend(check_unknown(record, schema));
        Validation::from_errors(errors)
    }

    /// Partial validation for update. Only unknown keys are rejected; omitted fields are
    /// left unchanged and value types are not checked here.
    pub fn validate_partial(record: &Record, schema: &Schema) -> Validation {
        Validation::from_errors(check_unknown(record, schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        match v {
            Value::Object(m) => m,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn complete_record_is_valid() {
        let r = record(json!({"name": "Rex", "description": "fast", "breed": "lab", "age": 3}));
        assert_eq!(RequestValidator::validate(&r, DOG_SCHEMA), Validation::Valid);
        assert!(RequestValidator::validate_partial(&r, DOG_SCHEMA).is_valid());
    }

    #[test]
    fn fractional_age_is_still_a_number() {
        let r = record(json!({"name": "Rex", "description": "fast", "breed": "lab", "age": 3.5}));
        assert!(RequestValidator::validate(&r, DOG_SCHEMA).is_valid());
    }

    #[test]
    fn one_message_per_missing_key() {
        let r = record(json!({"name": "Rex"}));
        let v = RequestValidator::validate(&r, DOG_SCHEMA);
        assert_eq!(
            v.errors(),
            [
                "description should be a string",
                "breed should be a string",
                "age should be a number",
            ]
        );
    }

    #[test]
    fn empty_record_misses_every_key() {
        let v = RequestValidator::validate(&Record::new(), DOG_SCHEMA);
        assert_eq!(v.errors().len(), DOG_SCHEMA.len());
    }

    #[test]
    fn wrong_type_fails_create_but_not_update() {
        let r = record(json!({"name": "Rex", "description": "fast", "breed": "lab", "age": "3"}));
        assert_eq!(
            RequestValidator::validate(&r, DOG_SCHEMA).errors(),
            ["age should be a number"]
        );
        assert_eq!(RequestValidator::validate_partial(&r, DOG_SCHEMA), Validation::Valid);
    }

    #[test]
    fn null_is_present_but_wrong_type() {
        let r = record(json!({"name": null, "description": "fast", "breed": "lab", "age": 3}));
        assert_eq!(check_missing(&r, DOG_SCHEMA), Vec::<String>::new());
        assert_eq!(check_types(&r, DOG_SCHEMA), ["name should be a string"]);
    }

    #[test]
    fn unknown_keys_rejected_by_both() {
        let r = record(json!({"nickname": "Rex"}));
        assert!(RequestValidator::validate(&r, DOG_SCHEMA)
            .errors()
            .contains(&"'nickname' is not a valid key".to_string()));
        assert_eq!(
            RequestValidator::validate_partial(&r, DOG_SCHEMA).errors(),
            ["'nickname' is not a valid key"]
        );
    }

    #[test]
    fn checks_concatenate_in_order() {
        let r = record(json!({
            "color": "brown",
            "age": "old",
            "name": "Rex",
            "breed": "lab"
        }));
        assert_eq!(
            RequestValidator::validate(&r, DOG_SCHEMA).errors(),
            [
                "age should be a number",
                "description should be a string",
                "'color' is not a valid key",
            ]
        );
    }

    #[test]
    fn unknown_keys_follow_request_order() {
        let r = record(json!({"zeta": 1, "alpha": 2}));
        assert_eq!(
            check_unknown(&r, DOG_SCHEMA),
            ["'zeta' is not a valid key", "'alpha' is not a valid key"]
        );
    }

    #[test]
    fn repeated_validation_is_stable() {
        let r = record(json!({"age": true, "extra": []}));
        let first = RequestValidator::validate(&r, DOG_SCHEMA);
        let second = RequestValidator::validate(&r, DOG_SCHEMA);
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_maps_to_validation_error() {
        let r = record(json!({"nickname": "Rex"}));
        match RequestValidator::validate_partial(&r, DOG_SCHEMA).into_result() {
            Err(AppError::Validation(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
