//! World entity - root of every area and character

use super::Entity;
use crate::dtos::{CreateWorldDTO, UpdateWorldDTO};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct World {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tech_level: u8,
    pub shard: String,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for World {
    const COLLECTION: &'static str = "worlds";
    type CreateDto = CreateWorldDTO;
    type UpdateDto = UpdateWorldDTO;
}
