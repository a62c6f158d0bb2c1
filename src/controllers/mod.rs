//! Controllers module - Message handlers exposed to the transport
//!
//! Every service operation is registered in the [`Dispatcher`] under a
//! pattern `"<service>.<Controller>.<method>"` (e.g.
//! `areas.AreasController.findByWorldId`). Handlers take and return plain
//! JSON; the transport only has to route a pattern and a payload here.
//!
//! Single payloads are decoded and validated here. Array payloads go to the
//! service's bulk entry points, which decode each element on its own.

pub mod area;
pub mod character;
pub mod world;

use crate::core::AppError;
use crate::dtos::{FindByIdQuery, FindQuery, OneOrMany, decode};
use crate::entities::Entity;
use crate::repositories::CrudRepository;
use crate::services::CrudService;
use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

pub type HandlerResult = Result<Value, AppError>;

type Handler = Arc<dyn Fn(Value) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Error relayed across the transport boundary. The original error is kept
/// as-is next to the name of the service that raised it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RpcError {
    pub message: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
    pub original_error: AppError,
}

impl RpcError {
    pub fn new(service: impl Into<String>, error: AppError) -> Self {
        Self {
            message: error.message.clone(),
            service: service.into(),
            timestamp: Utc::now(),
            original_error: error,
        }
    }
}

/// Routes message patterns to their handlers
#[derive(Default, Clone)]
pub struct Dispatcher {
    handlers: HashMap<String, Handler>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts registering the handlers of one controller
    pub fn controller(
        &mut self,
        service: &'static str,
        controller: &'static str,
    ) -> ControllerScope<'_> {
        ControllerScope {
            dispatcher: self,
            service,
            controller,
        }
    }

    /// Registered patterns, sorted
    pub fn patterns(&self) -> Vec<&str> {
        let mut patterns: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        patterns.sort_unstable();
        patterns
    }

    #[instrument(skip(self, payload))]
    pub async fn dispatch(&self, pattern: &str, payload: Value) -> Result<Value, RpcError> {
        let service = pattern.split('.').next().unwrap_or_default();
        let Some(handler) = self.handlers.get(pattern) else {
            warn!("No handler registered");
            return Err(RpcError::new(
                service,
                AppError::not_found("Unknown message pattern").with_details(pattern.to_string()),
            ));
        };

        debug!("Dispatching message");
        handler(payload).await.map_err(|err| {
            match err.kind {
                crate::core::ErrorKind::System | crate::core::ErrorKind::Unavailable => {
                    error!(error = %err, "Handler failed")
                }
                _ => debug!(error = %err, "Handler rejected the request"),
            }
            RpcError::new(service, err)
        })
    }
}

/// Registration handle for the methods of one controller
pub struct ControllerScope<'a> {
    dispatcher: &'a mut Dispatcher,
    service: &'static str,
    controller: &'static str,
}

impl ControllerScope<'_> {
    pub fn handle<F, Fut>(&mut self, method: &str, handler: F) -> &mut Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let pattern = format!("{}.{}.{}", self.service, self.controller, method);
        let handler: Handler = Arc::new(move |payload| handler(payload).boxed());
        self.dispatcher.handlers.insert(pattern, handler);
        self
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> HandlerResult {
    serde_json::to_value(value).map_err(|e| {
        AppError::internal_server_error("Unable to encode response").with_details(e.to_string())
    })
}

/// Decodes a query payload; `null` or a missing body means "all defaults"
pub(crate) fn query<T: DeserializeOwned + Default>(payload: Value) -> Result<T, AppError> {
    match payload {
        Value::Null => Ok(T::default()),
        payload => Ok(serde_json::from_value(payload)?),
    }
}

/// Registers `find`, `findById`, `create`, `update` and `delete` for one entity
pub fn register_crud<E, R>(scope: &mut ControllerScope<'_>, service: Arc<CrudService<E, R>>)
where
    E: Entity,
    R: CrudRepository<E> + 'static,
{
    let svc = service.clone();
    scope.handle("find", move |payload| {
        let service = svc.clone();
        async move {
            let q: FindQuery = query(payload)?;
            let found = service
                .find(Some(&q.filter), q.projection.as_ref(), Some(&q.options))
                .await?;
            to_json(&found)
        }
    });

    let svc = service.clone();
    scope.handle("findById", move |payload| {
        let service = svc.clone();
        async move {
            let q: FindByIdQuery = serde_json::from_value(payload)?;
            to_json(&service.find_by_id(&q.id, q.projection.as_ref()).await?)
        }
    });

    let svc = service.clone();
    scope.handle("create", move |payload| {
        let service = svc.clone();
        async move {
            match serde_json::from_value::<OneOrMany<Value>>(payload)? {
                OneOrMany::One(raw) => {
                    let dto: E::CreateDto = decode(raw)?;
                    to_json(&service.create(&dto).await?)
                }
                OneOrMany::Many(items) => to_json(&service.create_many(items).await),
            }
        }
    });

    let svc = service.clone();
    scope.handle("update", move |payload| {
        let service = svc.clone();
        async move {
            match serde_json::from_value::<OneOrMany<Value>>(payload)? {
                OneOrMany::One(raw) => {
                    let dto: E::UpdateDto = decode(raw)?;
                    to_json(&service.update(&dto).await?)
                }
                OneOrMany::Many(items) => to_json(&service.update_many(items).await),
            }
        }
    });

    let svc = service;
    scope.handle("delete", move |payload| {
        let service = svc.clone();
        async move {
            match serde_json::from_value::<OneOrMany<String>>(payload)? {
                // `true` when removed, `null` when there was nothing to remove
                OneOrMany::One(id) => match service.delete(&id).await? {
                    true => Ok(Value::Bool(true)),
                    false => Ok(Value::Null),
                },
                OneOrMany::Many(ids) => to_json(&service.delete_many(&ids).await?),
            }
        }
    });
}
