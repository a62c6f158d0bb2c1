//! DocumentRepository - generic repository over one store collection
//!
//! Holds all the logic shared by the entity repositories: `_id` assignment,
//! timestamps, reference validation, partial updates and projected reads.

use super::{Create, Delete, Read, Update};
use crate::bulk::BulkCountedResponse;
use crate::core::AppError;
use crate::entities::Entity;
use crate::store::{Collection, DocumentStore, Filter, FindOptions, Projection};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub struct DocumentRepository<E: Entity> {
    store: DocumentStore,
    collection: Collection,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> DocumentRepository<E> {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            collection: store.collection(E::COLLECTION),
            store,
            _entity: PhantomData,
        }
    }

    fn to_document<T: Serialize>(data: &T) -> Result<Map<String, Value>, AppError> {
        match serde_json::to_value(data)? {
            Value::Object(map) => Ok(map),
            other => Err(AppError::validation("Payload must be an object")
                .with_details(format!("got {}", other))),
        }
    }

    fn to_entity(document: Value) -> Result<E, AppError> {
        serde_json::from_value(document).map_err(|e| {
            AppError::internal_server_error("Stored document does not match the entity")
                .with_details(e.to_string())
        })
    }

    /// Checks every reference field present in `payload` against its target
    /// collection. Must run before the write it guards.
    async fn check_references(
        &self,
        id: &str,
        payload: &Map<String, Value>,
    ) -> Result<(), AppError> {
        for reference in E::REFERENCES {
            let target = match payload.get(reference.field) {
                None | Some(Value::Null) => continue,
                Some(Value::String(target)) => target,
                Some(other) => {
                    return Err(AppError::validation("Reference must be a string id")
                        .with_details(format!("{} = {}", reference.field, other)));
                }
            };

            // a document cannot reference itself
            let self_reference = reference.collection == E::COLLECTION && target == id;
            if self_reference || !self.store.collection(reference.collection).exists(target).await? {
                warn!(
                    field = reference.field,
                    target = %target,
                    "Reference does not resolve"
                );
                return Err(AppError::reference(reference.field, reference.collection, target));
            }
        }
        Ok(())
    }

    /// Reads with a filter on top of the caller's query; used by the entity finders
    pub(crate) async fn find_where(
        &self,
        filter: Filter,
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<E>, AppError> {
        self.find(&filter, projection, options).await
    }
}

#[async_trait]
impl<E: Entity> Create<E, E::CreateDto> for DocumentRepository<E> {
    #[instrument(skip(self, data), fields(collection = E::COLLECTION))]
    async fn create(&self, data: &E::CreateDto) -> Result<E, AppError> {
        debug!("Creating new document");
        let mut document = Self::to_document(data)?;

        let id = match document.get("_id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => Uuid::new_v4().to_string(),
        };
        document.insert("_id".to_string(), Value::String(id.clone()));

        self.check_references(&id, &document).await?;

        let now = serde_json::to_value(Utc::now())?;
        document.insert("createdAt".to_string(), now.clone());
        document.insert("updatedAt".to_string(), now);

        let document = Value::Object(document);
        self.collection.insert_one(&id, &document).await?;

        info!("Document created with id {}", id);
        Self::to_entity(document)
    }
}

#[async_trait]
impl<E: Entity> Read<E> for DocumentRepository<E> {
    #[instrument(skip_all, fields(collection = E::COLLECTION))]
    async fn find(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<E>, AppError> {
        debug!("Finding documents");
        self.collection
            .find(filter, projection, options)
            .await?
            .into_iter()
            .map(Self::to_entity)
            .collect()
    }

    #[instrument(skip(self, projection), fields(collection = E::COLLECTION))]
    async fn find_by_id(
        &self,
        id: &str,
        projection: Option<&Projection>,
    ) -> Result<Option<E>, AppError> {
        debug!("Reading document by id");
        let Some(document) = self.collection.find_one(id).await? else {
            debug!("Document not found");
            return Ok(None);
        };
        let document = match projection {
            Some(projection) => projection.apply(document)?,
            None => document,
        };
        Self::to_entity(document).map(Some)
    }
}

#[async_trait]
impl<E: Entity> Update<E, E::UpdateDto> for DocumentRepository<E> {
    #[instrument(skip(self, data), fields(collection = E::COLLECTION))]
    async fn update(&self, data: &E::UpdateDto) -> Result<Option<E>, AppError> {
        debug!("Updating document");
        let patch = Self::to_document(data)?;
        let id = match patch.get("_id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => return Err(AppError::validation("Update requires an _id")),
        };

        let Some(current) = self.collection.find_one(&id).await? else {
            debug!("Document {} not found, nothing to update", id);
            return Ok(None);
        };

        // validate before touching the stored document
        self.check_references(&id, &patch).await?;

        let Value::Object(mut document) = current else {
            return Err(AppError::internal_server_error("Stored document is not an object"));
        };
        for (field, value) in patch {
            if field != "_id" && field != "createdAt" {
                document.insert(field, value);
            }
        }
        document.insert("updatedAt".to_string(), serde_json::to_value(Utc::now())?);

        let document = Value::Object(document);
        if !self.collection.replace_one(&id, &document).await? {
            // deleted between the read and the write
            return Ok(None);
        }

        info!("Document {} updated", id);
        Self::to_entity(document).map(Some)
    }
}

#[async_trait]
impl<E: Entity> Delete for DocumentRepository<E> {
    #[instrument(skip(self), fields(collection = E::COLLECTION))]
    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        debug!("Deleting document");
        let removed = self.collection.delete_one(id).await?;
        if removed {
            info!("Document {} deleted", id);
        } else {
            debug!("Document {} already absent", id);
        }
        Ok(removed)
    }

    #[instrument(skip(self, ids), fields(collection = E::COLLECTION, requested = ids.len()))]
    async fn delete_many(&self, ids: &[String]) -> Result<BulkCountedResponse, AppError> {
        let count = self.collection.delete_many(ids).await?;
        info!("Deleted {} of {} requested documents", count, ids.len());
        Ok(BulkCountedResponse::counted(count))
    }
}
