//! Patrol unit workflow: permissions, status transitions and the rules for
//! creating and editing units.
//!
//! Everything here except [`board`] is pure. Both the HTTP services and the
//! session-held [`PatrolBoard`] run their mutations through these functions so
//! the rules are enforced identically on both paths.

pub mod board;
pub mod permission;
pub mod transition;

use chrono::{DateTime, Utc};

pub use board::PatrolBoard;
pub use permission::{authorize, can_manage, ensure_active};
pub use transition::{
    propose_transition, validate_reason, PendingTransition, StatusChange, StatusCommit,
    TransitionPlan,
};

use crate::{
    config::CreationPolicy,
    error::{AppError, AppResult},
    models::{
        officer::Actor,
        patrol::{CreatePatrolUnit, NewPatrolUnit, PatrolUnit, PatrolUnitPatch, UpdatePatrolUnit},
    },
};

/// Apply creation policy and field rules to a create request
pub fn prepare_new_unit(
    request: CreatePatrolUnit,
    actor: &Actor,
    policy: CreationPolicy,
    now: DateTime<Utc>,
) -> AppResult<NewPatrolUnit> {
    if policy == CreationPolicy::Strict && !actor.is_privileged() {
        return Err(AppError::Authorization(
            "Only admins and moderators create patrol units".to_string(),
        ));
    }

    let unit_name = required_name(&request.unit_name)?;
    let status = request.status.unwrap_or_default();
    let status_reason = if status.requires_reason() {
        Some(validate_reason(request.status_reason.as_deref())?)
    } else {
        None
    };

    let officer_1 = if actor.is_privileged() {
        request.officer_1
    } else {
        Some(actor.officer_id)
    };
    check_crew(officer_1, request.officer_2)?;

    Ok(NewPatrolUnit {
        unit_name,
        status,
        status_reason,
        location_name: non_blank(request.location_name),
        latitude: request.latitude,
        longitude: request.longitude,
        officer_1,
        officer_2: request.officer_2,
        vehicle_number: non_blank(request.vehicle_number),
        created_at: now,
    })
}

/// Check an edit against `unit` and turn it into a store patch. Never touches status.
pub fn prepare_update(
    unit: &PatrolUnit,
    mut update: UpdatePatrolUnit,
    actor: &Actor,
    now: DateTime<Utc>,
) -> AppResult<PatrolUnitPatch> {
    ensure_active(unit)?;
    authorize(actor, unit)?;

    if update.changes_crew() && !actor.is_privileged() {
        return Err(AppError::Authorization(
            "Only admins and moderators reassign crew".to_string(),
        ));
    }
    if let Some(ref name) = update.unit_name {
        required_name(name)?;
    }
    check_crew(
        update.officer_1.unwrap_or(unit.officer_1),
        update.officer_2.unwrap_or(unit.officer_2),
    )?;

    update.location_name = update.location_name.map(non_blank);
    update.vehicle_number = update.vehicle_number.map(non_blank);
    Ok(PatrolUnitPatch::from_update(update, now))
}

fn required_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Unit name is required".to_string()));
    }
    Ok(name.to_string())
}

fn check_crew(officer_1: Option<i32>, officer_2: Option<i32>) -> AppResult<()> {
    match (officer_1, officer_2) {
        (Some(a), Some(b)) if a == b => Err(AppError::Validation(
            "An officer cannot fill both crew slots".to_string(),
        )),
        _ => Ok(()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
