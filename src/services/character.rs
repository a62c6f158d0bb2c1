//! Character service - finders forwarded to the CharacterRepository

use super::CrudService;
use crate::core::AppError;
use crate::entities::Character;
use crate::repositories::CharacterRepository;
use crate::store::{FindOptions, Projection};

pub type CharacterService = CrudService<Character, CharacterRepository>;

impl CrudService<Character, CharacterRepository> {
    pub async fn find_by_world_id(
        &self,
        world_id: &str,
        projection: Option<&Projection>,
        options: Option<&FindOptions>,
    ) -> Result<Vec<Character>, AppError> {
        let options = options.cloned().unwrap_or_default();
        self.repository()
            .find_by_world_id(world_id, projection, &options)
            .await
    }

    pub async fn find_by_location_id(
        &self,
        location_id: &str,
        projection: Option<&Projection>,
        options: Option<&FindOptions>,
    ) -> Result<Vec<Character>, AppError> {
        let options = options.cloned().unwrap_or_default();
        self.repository()
            .find_by_location_id(location_id, projection, &options)
            .await
    }

    pub async fn find_by_tags(
        &self,
        tags: &[String],
        projection: Option<&Projection>,
        options: Option<&FindOptions>,
    ) -> Result<Vec<Character>, AppError> {
        let options = options.cloned().unwrap_or_default();
        self.repository()
            .find_by_tags(tags, projection, &options)
            .await
    }
}
