//! CharactersController - handlers of the `characters` service

use super::{Dispatcher, register_crud, to_json};
use crate::dtos::{LocationIdQuery, TagsQuery, WorldIdQuery};
use crate::services::CharacterService;
use std::sync::Arc;

pub const SERVICE: &str = "characters";
pub const CONTROLLER: &str = "CharactersController";

pub fn register(dispatcher: &mut Dispatcher, service: Arc<CharacterService>) {
    let mut scope = dispatcher.controller(SERVICE, CONTROLLER);
    register_crud(&mut scope, service.clone());

    let svc = service.clone();
    scope.handle("findByWorldId", move |payload| {
        let service = svc.clone();
        async move {
            let q: WorldIdQuery = serde_json::from_value(payload)?;
            to_json(
                &service
                    .find_by_world_id(&q.world_id, q.projection.as_ref(), Some(&q.options))
                    .await?,
            )
        }
    });

    let svc = service.clone();
    scope.handle("findByLocationId", move |payload| {
        let service = svc.clone();
        async move {
            let q: LocationIdQuery = serde_json::from_value(payload)?;
            to_json(
                &service
                    .find_by_location_id(&q.location_id, q.projection.as_ref(), Some(&q.options))
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
