//! Entities module - Domain documents persisted in the store
//!
//! Every entity is a JSON document with a string `_id`. All fields carry
//! `#[serde(default)]`, so a projected read that leaves fields out still
//! decodes, with the missing fields at their zero value.

pub mod area;
pub mod character;
pub mod enums;
pub mod world;

pub use area::Area;
pub use character::Character;
pub use enums::Disposition;
pub use world::World;

use serde::{Serialize, de::DeserializeOwned};
use validator::Validate;

/// A field whose value must be the `_id` of a document in another collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub collection: &'static str,
}

/// A document type stored in its own collection
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the documents live in
    const COLLECTION: &'static str;

    /// Reference fields checked before every create and update
    const REFERENCES: &'static [Reference] = &[];

    /// Creation payload (`_id` optional)
    type CreateDto: Serialize + DeserializeOwned + Validate + Send + Sync + 'static;

    /// Partial update payload (`_id` required)
    type UpdateDto: Serialize + DeserializeOwned + Validate + Send + Sync + 'static;
}
