//! Who may mutate a patrol unit

use crate::{
    error::{AppError, AppResult},
    models::{officer::Actor, patrol::PatrolUnit},
};

/// Admins and moderators manage every unit; other officers only the units they crew.
pub fn can_manage(actor: &Actor, unit: &PatrolUnit) -> bool {
    actor.is_privileged() || unit.is_assigned(actor.officer_id)
}

pub fn authorize(actor: &Actor, unit: &PatrolUnit) -> AppResult<()> {
    if can_manage(actor, unit) {
        Ok(())
    } else {
        Err(AppError::Authorization(format!(
            "Officer {} is not assigned to patrol unit {}",
            actor.officer_id, unit.id
        )))
    }
}

/// Soft-deleted units behave as if they did not exist for every mutation
pub fn ensure_active(unit: &PatrolUnit) -> AppResult<()> {
    if unit.is_active {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Patrol unit {} not found", unit.id)))
    }
}
