//! Dog entity and the typed shapes handed to the store.

use crate::error::StoreError;
use crate::service::Record;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Dog {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub breed: String,
    pub age: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewDog {
    pub name: String,
    pub description: String,
    pub breed: String,
    #[serde(deserialize_with = "integral_age")]
    pub age: i32,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DogPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default, deserialize_with = "optional_integral_age")]
    pub age: Option<i32>,
}

/// Integer value of a JSON number, accepting `3.0` as well as `3`.
fn number_to_i32(n: &Number) -> Option<i32> {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).ok();
    }
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= f64::from(i32::MIN) && *f <= f64::from(i32::MAX))
        .map(|f| f as i32)
}

fn integral_age<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let n = Number::deserialize(deserializer)?;
    number_to_i32(&n).ok_or_else(|| de::Error::custom(format!("age {} is not a 32-bit integer", n)))
}

fn optional_integral_age<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    match Option::<Number>::deserialize(deserializer)? {
        Some(n) => number_to_i32(&n)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("age {} is not a 32-bit integer", n))),
        None => Ok(None),
    }
}

impl NewDog {
    pub fn from_record(record: Record) -> Result<Self, StoreError> {
        serde_json::from_value(Value::Object(record))
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))
    }
}

impl DogPatch {
    pub fn from_record(record: Record) -> Result<Self, StoreError> {
        serde_json::from_value(Value::Object(record))
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))
    }

    pub fn apply(&self, dog: &mut Dog) {
        if let Some(name) = &self.name {
            dog.name = name.clone();
        }
        if let Some(description) = &self.description {
            dog.description = description.clone();
        }
        if let Some(breed) = &self.breed {
            dog.breed = breed.clone();
        }
        if let Some(age) = self.age {
            dog.age = age;
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DogCreated {
    pub message: String,
    pub dog: Dog,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn new_dog_rejects_fractional_age() {
        let r = record(json!({"name": "Rex", "description": "fast", "breed": "lab", "age": 3.5}));
        assert!(matches!(NewDog::from_record(r), Err(StoreError::InvalidRecord(_))));
    }

    #[test]
    fn integral_float_age_is_accepted() {
        let r = record(json!({"name": "Rex", "description": "fast", "breed": "lab", "age": 3.0}));
        assert_eq!(NewDog::from_record(r).unwrap().age, 3);
        let patch = DogPatch::from_record(record(json!({"age": 4.0}))).unwrap();
        assert_eq!(patch.age, Some(4));
    }

    #[test]
    fn out_of_range_age_is_rejected() {
        let r = record(json!({"name": "Rex", "description": "fast", "breed": "lab", "age": 3_000_000_000u64}));
        assert!(NewDog::from_record(r).is_err());
        assert!(DogPatch::from_record(record(json!({"age": 1e12}))).is_err());
        assert!(DogPatch::from_record(record(json!({"age": 2.5}))).is_err());
    }

    #[test]
    fn patch_treats_null_as_unchanged() {
        let patch = DogPatch::from_record(record(json!({"name": null, "age": 7}))).unwrap();
        let mut dog = Dog {
            id: 1,
            name: "Rex".into(),
            description: "fast".into(),
            breed: "lab".into(),
            age: 3,
        };
        patch.apply(&mut dog);
        assert_eq!(dog.name, "Rex");
        assert_eq!(dog.age, 7);
    }

    #[test]
    fn patch_rejects_wrong_type() {
        let r = record(json!({"age": "3"}));
        assert!(DogPatch::from_record(r).is_err());
    }
}
