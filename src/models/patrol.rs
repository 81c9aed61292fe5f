//! Patrol unit model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Duty status of a patrol unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PatrolStatus {
    #[default]
    Available,
    Busy,
    OnScene,
    Unavailable,
}

impl PatrolStatus {
    pub const ALL: [PatrolStatus; 4] = [
        PatrolStatus::Available,
        PatrolStatus::Busy,
        PatrolStatus::OnScene,
        PatrolStatus::Unavailable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatrolStatus::Available => "available",
            PatrolStatus::Busy => "busy",
            PatrolStatus::OnScene => "on_scene",
            PatrolStatus::Unavailable => "unavailable",
        }
    }

    /// Whether entering this status needs a free-text justification
    pub fn requires_reason(&self) -> bool {
        !matches!(self, PatrolStatus::Available)
    }
}

impl std::fmt::Display for PatrolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PatrolStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(PatrolStatus::Available),
            "busy" => Ok(PatrolStatus::Busy),
            "on_scene" => Ok(PatrolStatus::OnScene),
            "unavailable" => Ok(PatrolStatus::Unavailable),
            _ => Err(AppError::Validation(format!("Invalid patrol status: {}", s))),
        }
    }
}

// SQLx conversion for PatrolStatus
impl sqlx::Type<Postgres> for PatrolStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for PatrolStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: AppError| e.to_string().into())
    }
}

impl Encode<'_, Postgres> for PatrolStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Patrol unit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PatrolUnit {
    pub id: i32,
    /// Callsign
    pub unit_name: String,
    pub status: PatrolStatus,
    /// Set only while the status requires a reason
    pub status_reason: Option<String>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub officer_1: Option<i32>,
    pub officer_2: Option<i32>,
    pub vehicle_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete flag
    pub is_active: bool,
}

impl PatrolUnit {
    pub fn is_assigned(&self, officer_id: i32) -> bool {
        self.officer_1 == Some(officer_id) || self.officer_2 == Some(officer_id)
    }

    /// Apply a confirmed patch in place (used by the in-memory store)
    pub fn apply(&mut self, patch: &PatrolUnitPatch) {
        if let Some(ref name) = patch.unit_name {
            self.unit_name = name.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(ref reason) = patch.status_reason {
            self.status_reason = reason.clone();
        }
        if let Some(ref location) = patch.location_name {
            self.location_name = location.clone();
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if let Some(officer) = patch.officer_1 {
            self.officer_1 = officer;
        }
        if let Some(officer) = patch.officer_2 {
            self.officer_2 = officer;
        }
        if let Some(ref vehicle) = patch.vehicle_number {
            self.vehicle_number = vehicle.clone();
        }
        self.updated_at = patch.updated_at;
    }
}

/// Listing row: a unit joined with its crew's display data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatrolUnitView {
    #[serde(flatten)]
    pub unit: PatrolUnit,
    pub officer_1_name: Option<String>,
    pub officer_1_badge: Option<String>,
    pub officer_2_name: Option<String>,
    pub officer_2_badge: Option<String>,
}

/// Create patrol unit request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreatePatrolUnit {
    #[validate(length(min = 1, max = 64, message = "Unit name must be 1-64 characters"))]
    pub unit_name: String,
    /// Defaults to `available`
    pub status: Option<PatrolStatus>,
    pub status_reason: Option<String>,
    pub location_name: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub longitude: Option<f64>,
    pub officer_1: Option<i32>,
    pub officer_2: Option<i32>,
    pub vehicle_number: Option<String>,
}

/// Validated insert payload, after creation policy has been applied
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatrolUnit {
    pub unit_name: String,
    pub status: PatrolStatus,
    pub status_reason: Option<String>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub officer_1: Option<i32>,
    pub officer_2: Option<i32>,
    pub vehicle_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Update patrol unit request. Status changes go through the status endpoints.
///
/// Nullable fields distinguish "absent" (keep) from `null` (clear).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePatrolUnit {
    #[validate(length(min = 1, max = 64, message = "Unit name must be 1-64 characters"))]
    pub unit_name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub location_name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<f64>)]
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub latitude: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<f64>)]
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub longitude: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub officer_1: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub officer_2: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub vehicle_number: Option<Option<String>>,
}

impl UpdatePatrolUnit {
    pub fn changes_crew(&self) -> bool {
        self.officer_1.is_some() || self.officer_2.is_some()
    }
}

/// Partial update sent to the store. `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolUnitPatch {
    pub unit_name: Option<String>,
    pub status: Option<PatrolStatus>,
    pub status_reason: Option<Option<String>>,
    pub location_name: Option<Option<String>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub officer_1: Option<Option<i32>>,
    pub officer_2: Option<Option<i32>>,
    pub vehicle_number: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}

impl PatrolUnitPatch {
    /// A patch touching nothing but the timestamp
    pub fn touch(updated_at: DateTime<Utc>) -> Self {
        Self {
            unit_name: None,
            status: None,
            status_reason: None,
            location_name: None,
            latitude: None,
            longitude: None,
            officer_1: None,
            officer_2: None,
            vehicle_number: None,
            updated_at,
        }
    }

    pub fn from_update(update: UpdatePatrolUnit, updated_at: DateTime<Utc>) -> Self {
        Self {
            unit_name: update.unit_name.map(|name| name.trim().to_string()),
            location_name: update.location_name,
            latitude: update.latitude,
            longitude: update.longitude,
            officer_1: update.officer_1,
            officer_2: update.officer_2,
            vehicle_number: update.vehicle_number,
            ..Self::touch(updated_at)
        }
    }
}

/// Count of active units per status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatrolStats {
    pub active_units: i64,
    pub by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusCount {
    pub status: PatrolStatus,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_requiring_statuses() {
        assert!(!PatrolStatus::Available.requires_reason());
        assert!(PatrolStatus::Busy.requires_reason());
        assert!(PatrolStatus::OnScene.requires_reason());
        assert!(PatrolStatus::Unavailable.requires_reason());
    }

    #[test]
    fn test_status_parse_rejects_unknown_values() {
        assert_eq!("on_scene".parse::<PatrolStatus>().unwrap(), PatrolStatus::OnScene);
        // Legacy values of the old dashboard are not statuses
        assert!("offline".parse::<PatrolStatus>().is_err());
        assert!("emergency".parse::<PatrolStatus>().is_err());
        assert!("Busy".parse::<PatrolStatus>().is_err());
    }

    #[test]
    fn test_status_serde_is_snake_case() {
        let json = serde_json::to_string(&PatrolStatus::OnScene).unwrap();
        assert_eq!(json, "\"on_scene\"");
        assert!(serde_json::from_str::<PatrolStatus>("\"offline\"").is_err());
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let update: UpdatePatrolUnit =
            serde_json::from_str(r#"{"officer_2": null, "vehicle_number": "P001"}"#).unwrap();
        assert_eq!(update.officer_1, None);
        assert_eq!(update.officer_2, Some(None));
        assert_eq!(update.vehicle_number, Some(Some("P001".to_string())));
        assert!(update.changes_crew());
    }

    #[test]
    fn test_update_checks_coordinate_ranges() {
        let update = UpdatePatrolUnit {
            latitude: Some(Some(500.0)),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdatePatrolUnit {
            longitude: Some(Some(-181.0)),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdatePatrolUnit {
            latitude: Some(None),
            longitude: Some(Some(37.61)),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_apply_patch_keeps_untouched_fields() {
        let now = Utc::now();
        let mut unit = PatrolUnit {
            id: 1,
            unit_name: "Alpha-1".into(),
            status: PatrolStatus::Busy,
            status_reason: Some("Traffic stop".into()),
            location_name: Some("Downtown".into()),
            latitude: None,
            longitude: None,
            officer_1: Some(3),
            officer_2: None,
            vehicle_number: Some("P001".into()),
            created_at: now,
            updated_at: now,
            is_active: true,
        };
        let later = now + chrono::Duration::seconds(5);
        let patch = PatrolUnitPatch {
            location_name: Some(None),
            ..PatrolUnitPatch::touch(later)
        };
        unit.apply(&patch);
        assert_eq!(unit.location_name, None);
        assert_eq!(unit.status, PatrolStatus::Busy);
        assert_eq!(unit.status_reason.as_deref(), Some("Traffic stop"));
        assert_eq!(unit.updated_at, later);
    }
}
