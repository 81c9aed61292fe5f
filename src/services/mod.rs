//! Business logic services

pub mod officers;
pub mod patrols;
pub mod stats;

use std::sync::Arc;

use crate::{
    config::PatrolConfig,
    repository::{OfficerDirectory, PatrolStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub patrols: patrols::PatrolsService,
    pub officers: officers::OfficersService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services over the given store and officer directory
    pub fn new(
        store: Arc<dyn PatrolStore>,
        directory: Arc<dyn OfficerDirectory>,
        patrol_config: PatrolConfig,
    ) -> Self {
        Self {
            patrols: patrols::PatrolsService::new(
                store.clone(),
                directory.clone(),
                patrol_config.creation_policy,
            ),
            officers: officers::OfficersService::new(directory),
            stats: stats::StatsService::new(store),
        }
    }
}
