//! Application state - the message dispatcher
//!
//! Repositories, services and controllers are wired here explicitly, once,
//! at startup.

use crate::controllers::{self, Dispatcher};
use crate::repositories::{AreaRepository, CharacterRepository, WorldRepository};
use crate::services::{AreaService, CharacterService, WorldService};
use crate::store::DocumentStore;
use std::sync::Arc;

/// State shared by every route
pub struct AppState {
    /// Every registered `"<service>.<Controller>.<method>"` handler
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Builds all repositories on the given store and registers their controllers
    pub fn new(store: DocumentStore) -> Self {
        let worlds = WorldService::new(Arc::new(WorldRepository::new(store.clone())));
        let areas = AreaService::new(Arc::new(AreaRepository::new(store.clone())));
        let characters = CharacterService::new(Arc::new(CharacterRepository::new(store)));

        let mut dispatcher = Dispatcher::new();
        controllers::world::register(&mut dispatcher, Arc::new(worlds));
        controllers::area::register(&mut dispatcher, Arc::new(areas));
        controllers::character::register(&mut dispatcher, Arc::new(characters));

        Self { dispatcher }
    }
}
