//! Query DTOs - payloads of the read handlers

use crate::store::{Filter, FindOptions, Projection};
use serde::{Deserialize, Serialize};

/// A single item or an array of items; arrays select the bulk variant of an operation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Payload of `find`; every part may be omitted
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct FindQuery {
    pub filter: Filter,
    pub projection: Option<Projection>,
    pub options: FindOptions,
}

/// Payload of `findById`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FindByIdQuery {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub projection: Option<Projection>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorldIdQuery {
    pub world_id: String,
    #[serde(default)]
    pub projection: Option<Projection>,
    #[serde(default)]
    pub options: FindOptions,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParentIdQuery {
    pub parent_id: String,
    #[serde(default)]
    pub projection: Option<Projection>,
    #[serde(default)]
    pub options: FindOptions,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LocationIdQuery {
    pub location_id: String,
    #[serde(default)]
    pub projection: Option<Projection>,
    #[serde(default)]
    pub options: FindOptions,
}

/// Matches documents carrying any of `tags`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TagsQuery {
    pub tags: Vec<String>,
    #[serde(default)]
    pub projection: Option<Projection>,
    #[serde(default)]
    pub options: FindOptions,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ShardQuery {
    pub shard: String,
    #[serde(default)]
    pub projection: Option<Projection>,
    #[serde(default)]
    pub options: FindOptions,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TechLevelQuery {
    pub tech_level: u8,
    #[serde(default)]
    pub projection: Option<Projection>,
    #[serde(default)]
    pub options: FindOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_or_many() {
        let one: OneOrMany<String> = serde_json::from_value(json!("w1")).unwrap();
        assert_eq!(one, OneOrMany::One("w1".to_string()));
        let many: OneOrMany<String> = serde_json::from_value(json!(["w1", "w2"])).unwrap();
        assert_eq!(many, OneOrMany::Many(vec!["w1".to_string(), "w2".to_string()]));
        let raw: OneOrMany<serde_json::Value> = serde_json::from_value(json!([{ "a": 1 }])).unwrap();
        assert!(matches!(raw, OneOrMany::Many(items) if items.len() == 1));
    }

    #[test]
    fn test_find_query_defaults() {
        let query: FindQuery = serde_json::from_value(json!({})).unwrap();
        assert!(query.filter.is_empty());
        assert!(query.projection.is_none());
        assert_eq!(query.options, FindOptions::default());

        let query: FindByIdQuery = serde_json::from_value(json!({ "_id": "w1" })).unwrap();
        assert_eq!(query.id, "w1");
    }
}
