//! Repository layer: store traits and their implementations

pub mod memory;
pub mod officers;
pub mod patrols;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

#[cfg(test)]
use mockall::automock;

use crate::{
    error::AppResult,
    models::{
        officer::{Officer, Role},
        patrol::{NewPatrolUnit, PatrolUnit, PatrolUnitPatch},
    },
};

pub use memory::MemoryStore;

/// Read/write access to the `patrol_units` collection
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PatrolStore: Send + Sync {
    /// Active (not soft-deleted) units, newest first
    async fn list_active(&self) -> AppResult<Vec<PatrolUnit>>;

    /// Direct lookup, including soft-deleted units
    async fn get_by_id(&self, id: i32) -> AppResult<Option<PatrolUnit>>;

    async fn insert(&self, unit: NewPatrolUnit) -> AppResult<PatrolUnit>;

    /// Apply a partial update and return the record as stored
    async fn update_fields(&self, id: i32, patch: PatrolUnitPatch) -> AppResult<PatrolUnit>;

    async fn soft_delete(&self, id: i32) -> AppResult<()>;
}

/// Read-only officer lookup used to offer crew assignments
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OfficerDirectory: Send + Sync {
    /// Officers whose role is in `roles`, ordered by name. An empty filter lists everyone.
    async fn list_officers(&self, roles: &[Role]) -> AppResult<Vec<Officer>>;
}

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}
