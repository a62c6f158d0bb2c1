//! Enumerations used by the entities

use serde::{Deserialize, Serialize};

/// How a character behaves towards the players
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Disposition {
    Friendly,
    #[default]
    Neutral,
    Hostile,
}
