//! Services module - Business layer between controllers and repositories
//!
//! `CrudService` is shared by all entities; the per-entity modules add the
//! entity finders on top of it.

pub mod area;
pub mod character;
pub mod crud;
pub mod world;

pub use area::AreaService;
pub use character::CharacterService;
pub use crud::CrudService;
pub use world::WorldService;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::{CreateAreaDTO, CreateWorldDTO};
    use crate::core::ErrorKind;
    use crate::repositories::{AreaRepository, WorldRepository};
    use serde_json::json;
    use crate::store::{DocumentStore, Filter, FindOptions, Sort, SortOrder};
    use std::sync::Arc;

    async fn services() -> (WorldService, AreaService) {
        let store = DocumentStore::in_memory().await.unwrap();
        (
            WorldService::new(Arc::new(WorldRepository::new(store.clone()))),
            AreaService::new(Arc::new(AreaRepository::new(store))),
        )
    }

    #[tokio::test]
    async fn test_find_defaults_to_everything() {
        let (worlds, areas) = services().await;
        worlds
            .create(&CreateWorldDTO {
                id: Some("w1".to_string()),
                name: "Test World".to_string(),
                tech_level: 5,
                shard: "s".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        for name in ["B", "A"] {
            areas
                .create(&CreateAreaDTO {
                    name: name.to_string(),
                    world_id: "w1".to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        assert_eq!(areas.find(None, None, None).await.unwrap().len(), 2);

        let sorted = areas
            .find(
                Some(&Filter::eq("worldId", "w1")),
                None,
                Some(&FindOptions::sorted(Sort::by("name", SortOrder::Ascending))),
            )
            .await
            .unwrap();
        assert_eq!(sorted[0].name, "A");

        let by_world = areas.find_by_world_id("w1", None, None).await.unwrap();
        assert_eq!(by_world.len(), 2);
        assert_eq!(worlds.find_by_shard("s", None, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (worlds, _) = services().await;
        worlds
            .create(&CreateWorldDTO {
                id: Some("w1".to_string()),
                name: "Test World".to_string(),
                shard: "s".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(worlds.delete("w1").await.unwrap());
        assert!(!worlds.delete("w1").await.unwrap());
        assert!(worlds.find_by_id("w1", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_many_decodes_each_item() {
        let (worlds, areas) = services().await;
        let created = worlds
            .create_many(vec![
                json!({ "_id": "w1", "name": "Test World", "techLevel": 5, "shard": "s" }),
                json!({ "_id": "w2", "name": "", "techLevel": 5, "shard": "s" }),
            ])
            .await;
        assert!(!created.success);
        assert_eq!(created.items.success[0].id, "w1");
        assert_eq!(created.items.fail[0].index, 1);
        assert_eq!(created.items.fail[0].error.kind, ErrorKind::Validation);

        let response = areas
            .create_many(vec![
                json!({ "_id": "a1", "name": "A1", "worldId": "nonexistent" }),
                json!("not an area"),
                json!({ "_id": "a3", "name": "A3", "worldId": "w1" }),
            ])
            .await;
        assert_eq!(response.len(), 3);
        assert_eq!(response.items.success[0].id, "a3");
        let failed: Vec<(usize, ErrorKind)> = response
            .items
            .fail
            .iter()
            .map(|f| (f.index, f.error.kind))
            .collect();
        assert_eq!(
            failed,
            vec![(0, ErrorKind::ReferenceIntegrity), (1, ErrorKind::Validation)]
        );
        assert_eq!(response.items.fail[0].item["_id"], "a1");
    }

    #[tokio::test]
    async fn test_update_many_reports_missing_ids() {
        let (worlds, _) = services().await;
        worlds
            .create_many(vec![json!({ "_id": "w1", "name": "Test World", "techLevel": 5, "shard": "s" })])
            .await;

        let response = worlds
            .update_many(vec![
                json!({ "_id": "ghost", "name": "Nobody" }),
                json!({ "name": "no id" }),
                json!({ "_id": "w1", "techLevel": 7 }),
            ])
            .await;
        assert!(!response.success);
        assert_eq!(response.items.success[0].tech_level, 7);
        let failed: Vec<(usize, ErrorKind)> = response
            .items
            .fail
            .iter()
            .map(|f| (f.index, f.error.kind))
            .collect();
        assert_eq!(failed, vec![(0, ErrorKind::NotFound), (1, ErrorKind::Validation)]);
        assert_eq!(response.items.fail[0].item, json!({ "_id": "ghost", "name": "Nobody" }));
    }
}
