//! CrudService - generic service over a CRUD repository
//!
//! Forwards every operation to the repository unchanged, filling in the
//! defaults for omitted query parts. It holds nothing but the repository
//! handle; it exists so controllers depend on a service, not on storage.

use crate::bulk::{BulkCountedResponse, BulkItemizedResponse, Decoded};
use crate::core::AppError;
use crate::entities::Entity;
use crate::repositories::CrudRepository;
use crate::store::{Filter, FindOptions, Projection};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct CrudService<E: Entity, R: CrudRepository<E>> {
    repository: Arc<R>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, R: CrudRepository<E>> Clone for CrudService<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity, R: CrudRepository<E>> CrudService<E, R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    #[instrument(skip_all, fields(collection = E::COLLECTION))]
    pub async fn create(&self, data: &E::CreateDto) -> Result<E, AppError> {
        self.repository.create(data).await
    }

    /// Decodes every raw item on its own; an item that does not decode is a
    /// failed item, the rest go to the repository's bulk create
    #[instrument(skip_all, fields(collection = E::COLLECTION, items = items.len()))]
    pub async fn create_many(&self, items: Vec<Value>) -> BulkItemizedResponse<E> {
        let decoded = Decoded::<E::CreateDto>::decode_each(items);
        let response = self.repository.create_many(&decoded.items).await;
        decoded.finish(response)
    }

    /// `filter` defaults to `{}` (everything), `options` to no sort / paging
    #[instrument(skip_all, fields(collection = E::COLLECTION))]
    pub async fn find(
        &self,
        filter: Option<&Filter>,
        projection: Option<&Projection>,
        options: Option<&FindOptions>,
    ) -> Result<Vec<E>, AppError> {
        let default_filter = Filter::default();
        let default_options = FindOptions::default();
        let filter = filter.unwrap_or(&default_filter);
        let options = options.unwrap_or(&default_options);
        debug!("Forwarding find to repository");
        self.repository.find(filter, projection, options).await
    }

    #[instrument(skip(self, projection), fields(collection = E::COLLECTION))]
    pub async fn find_by_id(
        &self,
        id: &str,
        projection: Option<&Projection>,
    ) -> Result<Option<E>, AppError> {
        self.repository.find_by_id(id, projection).await
    }

    #[instrument(skip_all, fields(collection = E::COLLECTION))]
    pub async fn update(&self, data: &E::UpdateDto) -> Result<Option<E>, AppError> {
        self.repository.update(data).await
    }

    #[instrument(skip_all, fields(collection = E::COLLECTION, items = items.len()))]
    pub async fn update_many(&self, items: Vec<Value>) -> BulkItemizedResponse<E> {
        let decoded = Decoded::<E::UpdateDto>::decode_each(items);
        let response = self.repository.update_many(&decoded.items).await;
        decoded.finish(response)
    }

    #[instrument(skip(self), fields(collection = E::COLLECTION))]
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        self.repository.delete(id).await
    }

    #[instrument(skip_all, fields(collection = E::COLLECTION, ids = ids.len()))]
    pub async fn delete_many(&self, ids: &[String]) -> Result<BulkCountedResponse, AppError> {
        self.repository.delete_many(ids).await
    }
}
