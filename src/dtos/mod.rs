//! DTOs module - Data Transfer Objects
//!
//! Creation and partial-update payloads for every entity, plus the query
//! shapes accepted by the controllers. DTO validation (`validator`) is the
//! schema layer: it runs on every decoded payload before a repository sees it.

pub mod area;
pub mod character;
pub mod query;
pub mod world;

pub use area::{CreateAreaDTO, UpdateAreaDTO};
pub use character::{CreateCharacterDTO, UpdateCharacterDTO};
pub use query::{
    FindByIdQuery, FindQuery, LocationIdQuery, OneOrMany, ParentIdQuery, ShardQuery, TagsQuery,
    TechLevelQuery, WorldIdQuery,
};
pub use world::{CreateWorldDTO, UpdateWorldDTO};

use crate::core::AppError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use validator::Validate;

lazy_static! {
    /// Accepted shape for caller supplied `_id` values
    pub static ref ID_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("ID_PATTERN is a valid regex");
}

/// Keeps `null` apart from a missing field: missing -> `None`, `null` -> `Some(None)`.
/// Used by update DTOs so an explicit `null` clears an optional field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Decodes a JSON payload into a DTO and runs its validation rules
pub fn decode<T>(payload: Value) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let dto: T = serde_json::from_value(payload)?;
    dto.validate()?;
    Ok(dto)
}
