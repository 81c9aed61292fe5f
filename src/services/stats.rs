//! Patrol statistics service

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::patrol::{PatrolStats, PatrolStatus, StatusCount},
    repository::PatrolStore,
};

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn PatrolStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn PatrolStore>) -> Self {
        Self { store }
    }

    /// Active unit count, broken down by status. Every status is listed, even at zero.
    pub async fn patrol_stats(&self) -> AppResult<PatrolStats> {
        let units = self.store.list_active().await?;
        let by_status = PatrolStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: units.iter().filter(|u| u.status == *status).count() as i64,
            })
            .collect();

        Ok(PatrolStats {
            active_units: units.len() as i64,
            by_status,
        })
    }
}
