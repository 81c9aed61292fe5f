//! Patrol unit service
//!
//! Stateless counterpart of the session board: every call re-reads the unit
//! from the store, checks it with the workflow rules, then writes.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;

use crate::{
    config::CreationPolicy,
    error::{AppError, AppResult},
    models::{
        officer::{Actor, Officer},
        patrol::{CreatePatrolUnit, PatrolStatus, PatrolUnit, PatrolUnitView, UpdatePatrolUnit},
    },
    repository::{OfficerDirectory, PatrolStore},
    workflow::{self, StatusChange, TransitionPlan},
};

#[derive(Clone)]
pub struct PatrolsService {
    store: Arc<dyn PatrolStore>,
    directory: Arc<dyn OfficerDirectory>,
    policy: CreationPolicy,
}

impl PatrolsService {
    pub fn new(
        store: Arc<dyn PatrolStore>,
        directory: Arc<dyn OfficerDirectory>,
        policy: CreationPolicy,
    ) -> Self {
        Self {
            store,
            directory,
            policy,
        }
    }

    /// Active units with their crew's names and badges
    pub async fn list_units(&self) -> AppResult<Vec<PatrolUnitView>> {
        let units = self.store.list_active().await?;
        let officers: HashMap<i32, Officer> = self
            .directory
            .list_officers(&[])
            .await?
            .into_iter()
            .map(|officer| (officer.id, officer))
            .collect();

        Ok(units
            .into_iter()
            .map(|unit| {
                let crew_1 = unit.officer_1.and_then(|id| officers.get(&id));
                let crew_2 = unit.officer_2.and_then(|id| officers.get(&id));
                PatrolUnitView {
                    officer_1_name: crew_1.map(|o| o.full_name.clone()),
                    officer_1_badge: crew_1.map(|o| o.badge_number.clone()),
                    officer_2_name: crew_2.map(|o| o.full_name.clone()),
                    officer_2_badge: crew_2.map(|o| o.badge_number.clone()),
                    unit,
                }
            })
            .collect())
    }

    /// Direct lookup, including soft-deleted units
    pub async fn get_unit(&self, id: i32) -> AppResult<PatrolUnit> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Patrol unit {} not found", id)))
    }

    pub async fn create_unit(&self, request: CreatePatrolUnit, actor: &Actor) -> AppResult<PatrolUnit> {
        let new_unit = workflow::prepare_new_unit(request, actor, self.policy, Utc::now())?;
        let created = self.store.insert(new_unit).await?;
        tracing::info!(
            "Patrol unit {} ({}) created by officer {}",
            created.id, created.unit_name, actor.officer_id
        );
        Ok(created)
    }

    pub async fn update_unit(
        &self,
        id: i32,
        update: UpdatePatrolUnit,
        actor: &Actor,
    ) -> AppResult<PatrolUnit> {
        let unit = self.get_unit(id).await?;
        let patch = workflow::prepare_update(&unit, update, actor, Utc::now())?;
        self.store.update_fields(id, patch).await
    }

    /// First step of a status change. Applies `available` at once; otherwise
    /// reports that a reason must be confirmed.
    pub async fn request_status_change(
        &self,
        id: i32,
        status: PatrolStatus,
        actor: &Actor,
    ) -> AppResult<StatusChange> {
        let unit = self.get_unit(id).await?;
        match workflow::propose_transition(actor, &unit, status)? {
            TransitionPlan::Apply(commit) => {
                let confirmed = self.store.update_fields(id, commit.into_patch(Utc::now())).await?;
                tracing::info!(
                    "Patrol unit {} set to {} by officer {}",
                    id, status, actor.officer_id
                );
                Ok(StatusChange::Applied(confirmed))
            }
            TransitionPlan::NeedsReason(pending) => Ok(StatusChange::ReasonRequired(pending)),
        }
    }

    /// Second step: commit `status` with `reason`.
    ///
    /// Authorization is checked again against the current record. Confirming
    /// `available` ignores the reason.
    pub async fn confirm_status_change(
        &self,
        id: i32,
        status: PatrolStatus,
        reason: &str,
        actor: &Actor,
    ) -> AppResult<PatrolUnit> {
        let unit = self.get_unit(id).await?;
        let commit = match workflow::propose_transition(actor, &unit, status)? {
            TransitionPlan::Apply(commit) => commit,
            TransitionPlan::NeedsReason(pending) => pending.confirm(reason)?,
        };

        let confirmed = self.store.update_fields(id, commit.into_patch(Utc::now())).await?;
        tracing::info!(
            "Patrol unit {} set to {} by officer {}",
            id, status, actor.officer_id
        );
        Ok(confirmed)
    }

    pub async fn soft_delete_unit(&self, id: i32, actor: &Actor) -> AppResult<()> {
        let unit = self.get_unit(id).await?;
        workflow::ensure_active(&unit)?;
        workflow::authorize(actor, &unit)?;
        self.store.soft_delete(id).await?;
        tracing::info!("Patrol unit {} deactivated by officer {}", id, actor.officer_id);
        Ok(())
    }
}
