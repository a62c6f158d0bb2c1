//! Core module - Infrastructure shared by every layer
//!
//! - Configuration
//! - Error handling
//! - Application state

pub mod config;
pub mod error;
pub mod state;

pub use config::Config;
pub use error::{AppError, ErrorKind};
pub use state::AppState;
