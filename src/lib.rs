//! Patrol Desk
//!
//! Records server for a roleplay police database. Officers list, create and
//! edit patrol units and move them through a status workflow in which every
//! status other than `available` needs a stated reason.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
