//! In-process store, used when `database.backend = "memory"` and by tests

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{OfficerDirectory, PatrolStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        officer::{Officer, Role},
        patrol::{NewPatrolUnit, PatrolUnit, PatrolUnitPatch},
    },
};

#[derive(Default)]
struct MemoryState {
    units: BTreeMap<i32, PatrolUnit>,
    officers: Vec<Officer>,
    next_id: i32,
}

/// Cheaply cloneable handle; clones share the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_officers(officers: Vec<Officer>) -> Self {
        let state = MemoryState {
            officers,
            ..MemoryState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

#[async_trait]
impl PatrolStore for MemoryStore {
    async fn list_active(&self) -> AppResult<Vec<PatrolUnit>> {
        let state = self.state.read().await;
        Ok(state
            .units
            .values()
            .rev()
            .filter(|unit| unit.is_active)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<PatrolUnit>> {
        Ok(self.state.read().await.units.get(&id).cloned())
    }

    async fn insert(&self, unit: NewPatrolUnit) -> AppResult<PatrolUnit> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = state.next_id;
        let stored = PatrolUnit {
            id,
            unit_name: unit.unit_name,
            status: unit.status,
            status_reason: unit.status_reason,
            location_name: unit.location_name,
            latitude: unit.latitude,
            longitude: unit.longitude,
            officer_1: unit.officer_1,
            officer_2: unit.officer_2,
            vehicle_number: unit.vehicle_number,
            created_at: unit.created_at,
            updated_at: unit.created_at,
            is_active: true,
        };
        state.units.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_fields(&self, id: i32, patch: PatrolUnitPatch) -> AppResult<PatrolUnit> {
        let mut state = self.state.write().await;
        let unit = state
            .units
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Patrol unit {} not found", id)))?;
        unit.apply(&patch);
        Ok(unit.clone())
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.state.write().await;
        let unit = state
            .units
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Patrol unit {} not found", id)))?;
        unit.is_active = false;
        unit.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[async_trait]
impl OfficerDirectory for MemoryStore {
    async fn list_officers(&self, roles: &[Role]) -> AppResult<Vec<Officer>> {
        let state = self.state.read().await;
        let mut officers: Vec<Officer> = state
            .officers
            .iter()
            .filter(|officer| roles.is_empty() || roles.contains(&officer.role))
            .cloned()
            .collect();
        officers.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(officers)
    }
}
