//! Character entity

use super::{Disposition, Entity, Reference};
use crate::dtos::{CreateCharacterDTO, UpdateCharacterDTO};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub disposition: Disposition,
    pub world_id: String,
    /// Area the character currently stands in
    pub location_id: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Character {
    const COLLECTION: &'static str = "characters";
    const REFERENCES: &'static [Reference] = &[
        Reference {
            field: "worldId",
            collection: "worlds",
        },
        Reference {
            field: "locationId",
            collection: "areas",
        },
    ];
    type CreateDto = CreateCharacterDTO;
    type UpdateDto = UpdateCharacterDTO;
}
