//! World service - finders forwarded to the WorldRepository

use super::CrudService;
use crate::core::AppError;
use crate::entities::World;
use crate::repositories::WorldRepository;
use crate::store::{FindOptions, Projection};

pub type WorldService = CrudService<World, WorldRepository>;

impl CrudService<World, WorldRepository> {
    pub async fn find_by_shard(
        &self,
        shard: &str,
        projection: Option<&Projection>,
        options: Option<&FindOptions>,
    ) -> Result<Vec<World>, AppError> {
        let options = options.cloned().unwrap_or_default();
        self.repository()
            .find_by_shard(shard, projection, &options)
            .await
    }

    pub async fn find_by_tech_level(
        &self,
        tech_level: u8,
        projection: Option<&Projection>,
        options: Option<&FindOptions>,
    ) -> Result<Vec<World>, AppError> {
        let options = options.cloned().unwrap_or_default();
        self.repository()
            .find_by_tech_level(tech_level, projection, &options)
            .await
    }

    pub async fn find_by_tags(
        &self,
        tags: &[String],
        projection: Option<&Projection>,
        options: Option<&FindOptions>,
    ) -> Result<Vec<World>, AppError> {
        let options = options.cloned().unwrap_or_default();
        self.repository()
            .find_by_tags(tags, projection, &options)
            .await
    }
}
