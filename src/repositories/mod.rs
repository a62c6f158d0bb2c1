//! Repositories module - Data access for every entity
//!
//! All repositories share one generic implementation, [`DocumentRepository`],
//! parametrised by the entity type. The per-entity modules only add the
//! finders scoped to that entity's fields.

pub mod area;
pub mod character;
pub mod document;
pub mod traits;
pub mod world;

pub use traits::{Create, CrudRepository, Delete, Read, Update};

pub use area::AreaRepository;
pub use character::CharacterRepository;
pub use document::DocumentRepository;
pub use world::WorldRepository;
