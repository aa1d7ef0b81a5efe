//! Client-side state for the Vitta budgeting API: a typed REST client, one
//! service per resource and in-memory stores that keep each collection in sync
//! with the server.

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

pub use api::ApiClient;
pub use config::Settings;
pub use error::{ApiError, StoreError, ValidationError};
pub use services::state::AppState;
