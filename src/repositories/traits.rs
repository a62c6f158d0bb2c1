//! Common repository traits
//!
//! This module defines generic interfaces for document operations. The bulk
//! variants have default implementations built on [`crate::bulk`], so every
//! repository shares the same partial-success semantics.

use crate::bulk::{self, BulkCountedResponse, BulkItemizedResponse};
use crate::core::AppError;
use crate::entities::Entity;
use crate::store::{Filter, FindOptions, Projection};
use async_trait::async_trait;
use serde::Serialize;

/// Trait for creating new entities
///
/// # Type Parameters
/// * `E` - Type of the returned entity (with `_id` assigned)
/// * `CreateDTO` - DTO for creation (`_id` optional, generated when missing)
#[async_trait]
pub trait Create<E, CreateDTO>: Send + Sync
where
    E: Entity,
    CreateDTO: Serialize + Send + Sync,
{
    /// Creates a new entity
    ///
    /// # Returns
    /// * `Ok(E)` - Created entity with `_id` and timestamps
    /// * `Err(AppError)` - Broken reference, duplicate `_id` or store error.
    ///   Nothing is written in that case.
    async fn create(&self, data: &CreateDTO) -> Result<E, AppError>;

    /// Creates every item independently, reporting the outcome per item
    async fn create_many(&self, items: &[CreateDTO]) -> BulkItemizedResponse<E> {
        bulk::itemized(items.iter().collect(), |item| self.create(item)).await
    }
}

/// Trait for reading entities
#[async_trait]
pub trait Read<E: Entity>: Send + Sync {
    /// Reads all entities matching `filter`
    ///
    /// # Arguments
    /// * `filter` - Mongo-style filter, empty matches everything
    /// * `projection` - Optional field selection; fields left out decode to their zero value
    /// * `options` - Sort / skip / limit
    async fn find(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<E>, AppError>;

    /// Reads an entity by its `_id`
    ///
    /// # Returns
    /// * `Ok(Some(E))` - Entity found
    /// * `Ok(None)` - No entity with that `_id`
    async fn find_by_id(
        &self,
        id: &str,
        projection: Option<&Projection>,
    ) -> Result<Option<E>, AppError>;
}

/// Trait for partially updating existing entities
///
/// # Type Parameters
/// * `E` - Type of the updated entity
/// * `UpdateDTO` - DTO carrying the `_id` plus the fields to change
#[async_trait]
pub trait Update<E, UpdateDTO>: Send + Sync
where
    E: Entity,
    UpdateDTO: Serialize + Send + Sync,
{
    /// Updates an existing entity
    ///
    /// # Returns
    /// * `Ok(Some(E))` - Updated entity
    /// * `Ok(None)` - No entity with that `_id`
    /// * `Err(AppError)` - Broken reference or store error; the stored entity is left untouched
    async fn update(&self, data: &UpdateDTO) -> Result<Option<E>, AppError>;

    /// Updates every item independently. A missing `_id` is a failed item.
    async fn update_many(&self, items: &[UpdateDTO]) -> BulkItemizedResponse<E> {
        bulk::itemized(items.iter().collect(), |item| async move {
            self.update(item)
                .await?
                .ok_or_else(|| AppError::not_found("Entity not found"))
        })
        .await
    }
}

/// Trait for deleting entities
#[async_trait]
pub trait Delete: Send + Sync {
    /// Deletes an entity by `_id`
    ///
    /// # Returns
    /// * `Ok(true)` - Entity removed
    /// * `Ok(false)` - Nothing to remove (already absent)
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Deletes every listed `_id`; absent ones are skipped, not errors
    async fn delete_many(&self, ids: &[String]) -> Result<BulkCountedResponse, AppError>;
}

/// Everything a [`crate::services::CrudService`] needs from its repository
pub trait CrudRepository<E: Entity>:
    Create<E, E::CreateDto> + Read<E> + Update<E, E::UpdateDto> + Delete
{
}

impl<E, R> CrudRepository<E> for R
where
    E: Entity,
    R: Create<E, E::CreateDto> + Read<E> + Update<E, E::UpdateDto> + Delete,
{
}
