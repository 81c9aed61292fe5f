//! Status transitions: propose first, confirm with a reason when the target status needs one

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::permission::{authorize, ensure_active};
use crate::{
    error::{AppError, AppResult},
    models::{
        officer::Actor,
        patrol::{PatrolStatus, PatrolUnit, PatrolUnitPatch},
    },
};

/// A validated status change, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCommit {
    pub status: PatrolStatus,
    pub reason: Option<String>,
}

impl StatusCommit {
    pub fn into_patch(self, now: DateTime<Utc>) -> PatrolUnitPatch {
        PatrolUnitPatch {
            status: Some(self.status),
            status_reason: Some(self.reason),
            ..PatrolUnitPatch::touch(now)
        }
    }
}

/// A status change waiting for its reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PendingTransition {
    pub unit_id: i32,
    pub status: PatrolStatus,
}

impl PendingTransition {
    pub fn confirm(&self, reason: &str) -> AppResult<StatusCommit> {
        let reason = validate_reason(Some(reason))?;
        Ok(StatusCommit {
            status: self.status,
            reason: Some(reason),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPlan {
    Apply(StatusCommit),
    NeedsReason(PendingTransition),
}

/// Outcome of a status change request
#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    Applied(PatrolUnit),
    ReasonRequired(PendingTransition),
}

/// Decide what a status change needs. No side effects.
///
/// Every status may follow every other; only the reason requirement differs.
pub fn propose_transition(
    actor: &Actor,
    unit: &PatrolUnit,
    status: PatrolStatus,
) -> AppResult<TransitionPlan> {
    ensure_active(unit)?;
    authorize(actor, unit)?;

    if status.requires_reason() {
        Ok(TransitionPlan::NeedsReason(PendingTransition {
            unit_id: unit.id,
            status,
        }))
    } else {
        Ok(TransitionPlan::Apply(StatusCommit { status, reason: None }))
    }
}

/// Trimmed, non-empty reason
pub fn validate_reason(reason: Option<&str>) -> AppResult<String> {
    match reason.map(str::trim) {
        Some(reason) if !reason.is_empty() => Ok(reason.to_string()),
        _ => Err(AppError::reason_required()),
    }
}
