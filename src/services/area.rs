//! Area service - finders forwarded to the AreaRepository

use super::CrudService;
use crate::core::AppError;
use crate::entities::Area;
use crate::repositories::AreaRepository;
use crate::store::{FindOptions, Projection};

pub type AreaService = CrudService<Area, AreaRepository>;

impl CrudService<Area, AreaRepository> {
    pub async fn find_by_world_id(
        &self,
        world_id: &str,
        projection: Option<&Projection>,
        options: Option<&FindOptions>,
    ) -> Result<Vec<Area>, AppError> {
        let options = options.cloned().unwrap_or_default();
        self.repository()
            .find_by_world_id(world_id, projection, &options)
            .await
    }

    pub async fn find_by_parent_id(
        &self,
        parent_id: &str,
        projection: Option<&Projection>,
        options: Option<&FindOptions>,
    ) -> Result<Vec<Area>, AppError> {
        let options = options.cloned().unwrap_or_default();
        self.repository()
            .find_by_parent_id(parent_id, projection, &options)
            .await
    }

    pub async fn find_by_tags(
        &self,
        tags: &[String],
        projection: Option<&Projection>,
        options: Option<&FindOptions>,
    ) -> Result<Vec<Area>, AppError> {
        let options = options.cloned().unwrap_or_default();
        self.repository()
            .find_by_tags(tags, projection, &options)
            .await
    }
}
