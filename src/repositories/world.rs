//! WorldRepository - finders on the worlds collection

use super::DocumentRepository;
use crate::core::AppError;
use crate::entities::World;
use crate::store::{Filter, FindOptions, Projection};
use tracing::instrument;

pub type WorldRepository = DocumentRepository<World>;

impl DocumentRepository<World> {
    #[instrument(skip(self, projection, options))]
    pub async fn find_by_shard(
        &self,
        shard: &str,
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<World>, AppError> {
        self.find_where(Filter::eq("shard", shard), projection, options)
            .await
    }

    #[instrument(skip(self, projection, options))]
    pub async fn find_by_tech_level(
        &self,
        tech_level: u8,
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<World>, AppError> {
        self.find_where(Filter::eq("techLevel", tech_level), projection, options)
            .await
    }

    /// Worlds carrying at least one of `tags`
    #[instrument(skip(self, projection, options))]
    pub async fn find_by_tags(
        &self,
        tags: &[String],
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<World>, AppError> {
        self.find_where(Filter::is_in("tags", tags.iter().cloned()), projection, options)
            .await
    }
}
