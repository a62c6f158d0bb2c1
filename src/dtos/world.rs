//! World DTOs

use super::{ID_PATTERN, nullable};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// DTO to create a world (`_id` is generated when missing)
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorldDTO {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *ID_PATTERN))]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(range(max = 10))]
    pub tech_level: u8,
    #[validate(length(min = 1, max = 64))]
    pub shard: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// DTO for partial world updates (only the fields present are changed)
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorldDTO {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 10))]
    pub tech_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64))]
    pub shard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

