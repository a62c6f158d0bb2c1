//! Area entity - a place inside a world, optionally nested in a parent area

use super::{Entity, Reference};
use crate::dtos::{CreateAreaDTO, UpdateAreaDTO};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Area {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub world_id: String,
    pub parent_id: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Area {
    const COLLECTION: &'static str = "areas";
    const REFERENCES: &'static [Reference] = &[
        Reference {
            field: "worldId",
            collection: "worlds",
        },
        Reference {
            field: "parentId",
            collection: "areas",
        },
    ];
    type CreateDto = CreateAreaDTO;
    type UpdateDto = UpdateAreaDTO;
}
