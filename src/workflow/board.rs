//! Session-held patrol board
//!
//! A [`PatrolBoard`] keeps the caller's view of the active units plus at most
//! one open reason prompt. Permission checks run against that view before any
//! store call is made, and the view only changes after the store has confirmed
//! a write, using the record the store returned.

use std::sync::Arc;

use chrono::Utc;

use super::{
    authorize, prepare_new_unit, prepare_update, propose_transition, PendingTransition,
    StatusChange, TransitionPlan,
};
use crate::{
    config::CreationPolicy,
    error::{AppError, AppResult},
    models::{
        officer::Actor,
        patrol::{CreatePatrolUnit, PatrolStatus, PatrolUnit, UpdatePatrolUnit},
    },
    repository::PatrolStore,
};

pub struct PatrolBoard {
    store: Arc<dyn PatrolStore>,
    policy: CreationPolicy,
    units: Vec<PatrolUnit>,
    pending: Option<PendingTransition>,
}

impl PatrolBoard {
    /// An empty board. Call [`PatrolBoard::refresh`] to load the listing.
    pub fn new(store: Arc<dyn PatrolStore>, policy: CreationPolicy) -> Self {
        Self {
            store,
            policy,
            units: Vec::new(),
            pending: None,
        }
    }

    /// Reload the active listing. On failure the previous listing is kept.
    pub async fn refresh(&mut self) -> AppResult<()> {
        self.units = self.store.list_active().await?;
        if let Some(pending) = self.pending {
            if self.unit(pending.unit_id).is_none() {
                self.pending = None;
            }
        }
        Ok(())
    }

    pub fn units(&self) -> &[PatrolUnit] {
        &self.units
    }

    pub fn unit(&self, id: i32) -> Option<&PatrolUnit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// The status change waiting for a reason, if any
    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    /// Change a unit's status, or open a reason prompt when the status needs one.
    ///
    /// A successful request replaces any prompt that was already open.
    pub async fn request_status_change(
        &mut self,
        unit_id: i32,
        status: PatrolStatus,
        actor: &Actor,
    ) -> AppResult<StatusChange> {
        let plan = propose_transition(actor, self.listed(unit_id)?, status)?;

        match plan {
            TransitionPlan::Apply(commit) => {
                let confirmed = self
                    .store
                    .update_fields(unit_id, commit.into_patch(Utc::now()))
                    .await?;
                self.pending = None;
                self.replace(confirmed.clone());
                tracing::info!("Patrol unit {} set to {}", unit_id, status);
                Ok(StatusChange::Applied(confirmed))
            }
            TransitionPlan::NeedsReason(pending) => {
                self.pending = Some(pending);
                tracing::debug!("Patrol unit {} awaiting a reason for {}", unit_id, status);
                Ok(StatusChange::ReasonRequired(pending))
            }
        }
    }

    /// Commit the open prompt with `reason`.
    ///
    /// The prompt stays open when validation or the store call fails, so the
    /// caller can correct the reason or retry.
    pub async fn confirm_transition(&mut self, reason: &str, actor: &Actor) -> AppResult<PatrolUnit> {
        let pending = self
            .pending
            .ok_or_else(|| AppError::Validation("No status change is awaiting a reason".to_string()))?;

        authorize(actor, self.listed(pending.unit_id)?)?;
        let commit = pending.confirm(reason)?;

        let confirmed = self
            .store
            .update_fields(pending.unit_id, commit.into_patch(Utc::now()))
            .await?;
        self.pending = None;
        self.replace(confirmed.clone());
        tracing::info!("Patrol unit {} set to {} with reason", pending.unit_id, pending.status);
        Ok(confirmed)
    }

    /// Discard the open prompt without touching any unit
    pub fn cancel_transition(&mut self) -> Option<PendingTransition> {
        self.pending.take()
    }

    pub async fn create_unit(&mut self, request: CreatePatrolUnit, actor: &Actor) -> AppResult<PatrolUnit> {
        let new_unit = prepare_new_unit(request, actor, self.policy, Utc::now())?;
        let created = self.store.insert(new_unit).await?;
        // Listing is newest first
        self.units.insert(0, created.clone());
        Ok(created)
    }

    pub async fn update_unit(
        &mut self,
        unit_id: i32,
        update: UpdatePatrolUnit,
        actor: &Actor,
    ) -> AppResult<PatrolUnit> {
        let patch = prepare_update(self.listed(unit_id)?, update, actor, Utc::now())?;
        let confirmed = self.store.update_fields(unit_id, patch).await?;
        self.replace(confirmed.clone());
        Ok(confirmed)
    }

    pub async fn soft_delete_unit(&mut self, unit_id: i32, actor: &Actor) -> AppResult<()> {
        authorize(actor, self.listed(unit_id)?)?;
        self.store.soft_delete(unit_id).await?;
        self.units.retain(|unit| unit.id != unit_id);
        if self.pending.is_some_and(|p| p.unit_id == unit_id) {
            self.pending = None;
        }
        Ok(())
    }

    fn listed(&self, unit_id: i32) -> AppResult<&PatrolUnit> {
        self.unit(unit_id)
            .ok_or_else(|| AppError::NotFound(format!("Patrol unit {} not found", unit_id)))
    }

    fn replace(&mut self, confirmed: PatrolUnit) {
        if let Some(slot) = self.units.iter_mut().find(|unit| unit.id == confirmed.id) {
            *slot = confirmed;
        }
    }
}
