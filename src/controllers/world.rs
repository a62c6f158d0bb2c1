//! WorldsController - handlers of the `worlds` service

use super::{Dispatcher, register_crud, to_json};
use crate::dtos::{ShardQuery, TagsQuery, TechLevelQuery};
use crate::services::WorldService;
use std::sync::Arc;

pub const SERVICE: &str = "worlds";
pub const CONTROLLER: &str = "WorldsController";

pub fn register(dispatcher: &mut Dispatcher, service: Arc<WorldService>) {
    let mut scope = dispatcher.controller(SERVICE, CONTROLLER);
    register_crud(&mut scope, service.clone());

    let svc = service.clone();
    scope.handle("findByShard", move |payload| {
        let service = svc.clone();
        async move {
            let q: ShardQuery = serde_json::from_value(payload)?;
            to_json(
                &service
                    .find_by_shard(&q.shard, q.projection.as_ref(), Some(&q.options))
                    .await?,
            )
        }
    });

    let svc = service.clone();
    scope.handle("findByTechLevel", move |payload| {
        let service = svc.clone();
        async move {
            let q: TechLevelQuery = serde_json::from_value(payload)?;
            to_json(
                &service
                    .find_by_tech_level(q.tech_level, q.projection.as_ref(), Some(&q.options))
                    .await?,
            )
        }
    });

    let svc = service;
    scope.handle("findByTags", move |payload| {
        let service = svc.clone();
        async move {
            let q: TagsQuery = serde_json::from_value(payload)?;
            to_json(
                &service
                    .find_by_tags(&q.tags, q.projection.as_ref(), Some(&q.options))
                    .await?,
            )
        }
    });
}
