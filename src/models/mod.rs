//! Data models for Patrol Desk

pub mod officer;
pub mod patrol;

// Re-export commonly used types
pub use officer::{Actor, Officer, OfficerClaims, Role};
pub use patrol::{PatrolStatus, PatrolUnit, PatrolUnitView};
