//! CharacterRepository - finders on the characters collection

use super::DocumentRepository;
use crate::core::AppError;
use crate::entities::Character;
use crate::store::{Filter, FindOptions, Projection};
use tracing::instrument;

pub type CharacterRepository = DocumentRepository<Character>;

impl DocumentRepository<Character> {
    #[instrument(skip(self, projection, options))]
    pub async fn find_by_world_id(
        &self,
        world_id: &str,
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<Character>, AppError> {
        self.find_where(Filter::eq("worldId", world_id), projection, options)
            .await
    }

    /// Characters currently standing in the given area
    #[instrument(skip(self, projection, options))]
    pub async fn find_by_location_id(
        &self,
        location_id: &str,
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<Character>, AppError> {
        self.find_where(Filter::eq("locationId", location_id), projection, options)
            .await
    }

    #[instrument(skip(self, projection, options))]
    pub async fn find_by_tags(
        &self,
        tags: &[String],
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<Character>, AppError> {
        self.find_where(Filter::is_in("tags", tags.iter().cloned()), projection, options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::dtos::{CreateAreaDTO, CreateCharacterDTO, CreateWorldDTO, UpdateCharacterDTO};
    use crate::entities::Disposition;
    use crate::repositories::{AreaRepository, Create, Delete, Read, Update, WorldRepository};
    use crate::store::DocumentStore;

    async fn setup() -> CharacterRepository {
        let store = DocumentStore::in_memory().await.unwrap();
        WorldRepository::new(store.clone())
            .create(&CreateWorldDTO {
                id: Some("w1".to_string()),
                name: "Test World".to_string(),
                tech_level: 5,
                shard: "s".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        AreaRepository::new(store.clone())
            .create(&CreateAreaDTO {
                id: Some("tavern".to_string()),
                name: "Tavern".to_string(),
                world_id: "w1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        CharacterRepository::new(store)
    }

    fn character(name: &str, location: Option<&str>) -> CreateCharacterDTO {
        CreateCharacterDTO {
            name: name.to_string(),
            world_id: "w1".to_string(),
            location_id: location.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_location_must_exist() {
        let repo = setup().await;
        let innkeeper = repo.create(&character("Innkeeper", Some("tavern"))).await.unwrap();
        assert_eq!(innkeeper.location_id.as_deref(), Some("tavern"));
        assert_eq!(innkeeper.disposition, Disposition::Neutral);

        let err = repo.create(&character("Ghost", Some("crypt"))).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReferenceIntegrity);
        assert!(err.details.unwrap().contains("locationId"));
    }

    #[tokio::test]
    async fn test_find_by_location_and_world() {
        let repo = setup().await;
        repo.create(&character("Innkeeper", Some("tavern"))).await.unwrap();
        repo.create(&character("Wanderer", None)).await.unwrap();

        let here = repo.find_by_location_id("tavern", None, &FindOptions::default()).await.unwrap();
        assert_eq!(here.len(), 1);
        assert_eq!(here[0].name, "Innkeeper");

        let everyone = repo.find_by_world_id("w1", None, &FindOptions::default()).await.unwrap();
        assert_eq!(everyone.len(), 2);
    }

    #[tokio::test]
    async fn test_update_moves_and_clears_location() {
        let repo = setup().await;
        let wanderer = repo.create(&character("Wanderer", None)).await.unwrap();

        let moved = repo
            .update(&UpdateCharacterDTO {
                id: wanderer.id.clone(),
                location_id: Some(Some("tavern".to_string())),
                disposition: Some(Disposition::Hostile),
                ..Default::default()
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.location_id.as_deref(), Some("tavern"));
        assert_eq!(moved.disposition, Disposition::Hostile);

        let cleared = repo
            .update(&UpdateCharacterDTO {
                id: wanderer.id.clone(),
                location_id: Some(None),
                ..Default::default()
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.location_id, None);
        assert_eq!(cleared.disposition, Disposition::Hostile);
    }

    #[tokio::test]
    async fn test_delete_many_counts_removed() {
        let repo = setup().await;
        let a = repo.create(&character("A", None)).await.unwrap();
        let b = repo.create(&character("B", None)).await.unwrap();

        let ids = vec![a.id.clone(), "missing".to_string(), b.id.clone()];
        let response = repo.delete_many(&ids).await.unwrap();
        assert!(response.success);
        assert_eq!(response.count, 2);
        assert!(repo.find_by_id(&a.id, None).await.unwrap().is_none());

        let again = repo.delete_many(&ids).await.unwrap();
        assert_eq!(again.count, 0);
    }

    #[tokio::test]
    async fn test_find_by_tags() {
        let repo = setup().await;
        let mut guard = character("Guard", None);
        guard.tags = vec!["npc".to_string(), "armed".to_string()];
        repo.create(&guard).await.unwrap();
        repo.create(&character("Hero", None)).await.unwrap();

        let armed = repo
            .find_by_tags(&["armed".to_string()], None, &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(armed.len(), 1);
        assert_eq!(armed[0].name, "Guard");
    }
}
