//! AreaRepository - finders on the areas collection

use super::DocumentRepository;
use crate::core::AppError;
use crate::entities::Area;
use crate::store::{Filter, FindOptions, Projection};
use tracing::instrument;

pub type AreaRepository = DocumentRepository<Area>;

impl DocumentRepository<Area> {
    #[instrument(skip(self, projection, options))]
    pub async fn find_by_world_id(
        &self,
        world_id: &str,
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<Area>, AppError> {
        self.find_where(Filter::eq("worldId", world_id), projection, options)
            .await
    }

    /// Direct children of an area
    #[instrument(skip(self, projection, options))]
    pub async fn find_by_parent_id(
        &self,
        parent_id: &str,
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<Area>, AppError> {
        self.find_where(Filter::eq("parentId", parent_id), projection, options)
            .await
    }

    #[instrument(skip(self, projection, options))]
    pub async fn find_by_tags(
        &self,
        tags: &[String],
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<Area>, AppError> {
        self.find_where(Filter::is_in("tags", tags.iter().cloned()), projection, options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::dtos::{CreateAreaDTO, CreateWorldDTO, UpdateAreaDTO};
    use crate::repositories::{Create, Read, Update, WorldRepository};
    use crate::store::DocumentStore;

    async fn setup() -> (WorldRepository, AreaRepository) {
        let store = DocumentStore::in_memory().await.unwrap();
        let worlds = WorldRepository::new(store.clone());
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
        (worlds, AreaRepository::new(store))
    }

    fn area(name: &str, world_id: &str) -> CreateAreaDTO {
        CreateAreaDTO {
            name: name.to_string(),
            world_id: world_id.to_string(),
            ..Default::default()
        }
    }

    async fn count_named(areas: &AreaRepository, name: &str) -> usize {
        areas
            .find(&Filter::eq("name", name), None, &FindOptions::default())
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn test_create_with_existing_world() {
        let (_, areas) = setup().await;
        let created = areas.create(&area("A1", "w1")).await.unwrap();
        assert_eq!(created.world_id, "w1");
        assert_eq!(count_named(&areas, "A1").await, 1);
    }

    #[tokio::test]
    async fn test_create_with_missing_world_is_rejected() {
        let (_, areas) = setup().await;
        let err = areas.create(&area("A2", "nonexistent")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReferenceIntegrity);
        assert!(err.details.unwrap().contains("worldId"));
        assert_eq!(count_named(&areas, "A2").await, 0);
    }

    #[tokio::test]
    async fn test_parent_must_exist() {
        let (_, areas) = setup().await;
        let parent = areas.create(&area("City", "w1")).await.unwrap();

        let mut child = area("Harbor", "w1");
        child.parent_id = Some(parent.id.clone());
        let child = areas.create(&child).await.unwrap();

        let mut orphan = area("Orphan", "w1");
        orphan.parent_id = Some("ghost".to_string());
        let err = areas.create(&orphan).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReferenceIntegrity);

        let children = areas
            .find_by_parent_id(&parent.id, None, &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(children, vec![child]);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_document_untouched() {
        let (_, areas) = setup().await;
        let created = areas.create(&area("A1", "w1")).await.unwrap();

        let patch = UpdateAreaDTO {
            id: created.id.clone(),
            name: Some("Renamed".to_string()),
            world_id: Some("nonexistent".to_string()),
            ..Default::default()
        };
        let err = areas.update(&patch).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReferenceIntegrity);

        let stored = areas.find_by_id(&created.id, None).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_update_can_clear_and_not_self_reference() {
        let (_, areas) = setup().await;
        let parent = areas.create(&area("City", "w1")).await.unwrap();
        let mut child = area("Harbor", "w1");
        child.parent_id = Some(parent.id.clone());
        let child = areas.create(&child).await.unwrap();

        let own_parent = UpdateAreaDTO {
            id: child.id.clone(),
            parent_id: Some(Some(child.id.clone())),
            ..Default::default()
        };
        assert_eq!(
            areas.update(&own_parent).await.unwrap_err().kind,
            ErrorKind::ReferenceIntegrity
        );

        let detach = UpdateAreaDTO {
            id: child.id.clone(),
            parent_id: Some(None),
            ..Default::default()
        };
        let detached = areas.update(&detach).await.unwrap().unwrap();
        assert_eq!(detached.parent_id, None);
        assert_eq!(detached.name, "Harbor");
    }

    #[tokio::test]
    async fn test_bulk_create_keeps_valid_items() {
        let (_, areas) = setup().await;
        let response = areas
            .create_many(&[area("A1", "w1"), area("A2", "nonexistent"), area("A3", "w1")])
            .await;

        assert!(!response.success);
        assert_eq!(response.len(), 3);
        assert_eq!(response.items.success.len(), 2);
        assert_eq!(response.items.fail.len(), 1);
        assert_eq!(response.items.fail[0].index, 1);
        assert_eq!(response.items.fail[0].item["name"], "A2");
        assert_eq!(response.items.fail[0].error.kind, ErrorKind::ReferenceIntegrity);

        for created in &response.items.success {
            assert!(areas.find_by_id(&created.id, None).await.unwrap().is_some());
        }
        assert_eq!(count_named(&areas, "A2").await, 0);
    }

    #[tokio::test]
    async fn test_bulk_update_reports_missing_ids() {
        let (_, areas) = setup().await;
        let created = areas.create(&area("A1", "w1")).await.unwrap();
        let response = areas
            .update_many(&[
                UpdateAreaDTO {
                    id: "missing".to_string(),
                    ..Default::default()
                },
                UpdateAreaDTO {
                    id: created.id.clone(),
                    tags: Some(vec!["port".to_string()]),
                    ..Default::default()
                },
            ])
            .await;

        assert_eq!(response.items.success.len(), 1);
        assert_eq!(response.items.success[0].tags, vec!["port"]);
        assert_eq!(response.items.fail[0].error.kind, ErrorKind::NotFound);
        assert_eq!(response.items.fail[0].index, 0);
    }

    #[tokio::test]
    async fn test_find_by_world_id_and_tags() {
        let (worlds, areas) = setup().await;
        worlds
            .create(&CreateWorldDTO {
                id: Some("w2".to_string()),
                name: "Second".to_string(),
                shard: "s".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let mut tagged = area("Market", "w1");
        tagged.tags = vec!["trade".to_string()];
        areas.create(&tagged).await.unwrap();
        areas.create(&area("Desert", "w2")).await.unwrap();

        let in_w1 = areas.find_by_world_id("w1", None, &FindOptions::default()).await.unwrap();
        assert_eq!(in_w1.len(), 1);
        assert_eq!(in_w1[0].name, "Market");

        let trade = areas
            .find_by_tags(&["trade".to_string()], None, &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(trade.len(), 1);
    }
}
