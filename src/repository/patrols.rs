//! Patrol unit storage on PostgreSQL

use async_trait::async_trait;

use super::{PatrolStore, Repository};
use crate::{
    error::{AppError, AppResult},
    models::patrol::{NewPatrolUnit, PatrolUnit, PatrolUnitPatch},
};

#[async_trait]
impl PatrolStore for Repository {
    async fn list_active(&self) -> AppResult<Vec<PatrolUnit>> {
        let rows = sqlx::query_as::<_, PatrolUnit>(
            "SELECT * FROM patrol_units WHERE is_active = TRUE ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<PatrolUnit>> {
        let row = sqlx::query_as::<_, PatrolUnit>("SELECT * FROM patrol_units WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, unit: NewPatrolUnit) -> AppResult<PatrolUnit> {
        let row = sqlx::query_as::<_, PatrolUnit>(
            r#"
            INSERT INTO patrol_units (
                unit_name, status, status_reason, location_name, latitude, longitude,
                officer_1, officer_2, vehicle_number, created_at, updated_at, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10, TRUE)
            RETURNING *
            "#,
        )
        .bind(&unit.unit_name)
        .bind(unit.status)
        .bind(&unit.status_reason)
        .bind(&unit.location_name)
        .bind(unit.latitude)
        .bind(unit.longitude)
        .bind(unit.officer_1)
        .bind(unit.officer_2)
        .bind(&unit.vehicle_number)
        .bind(unit.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_fields(&self, id: i32, patch: PatrolUnitPatch) -> AppResult<PatrolUnit> {
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(patch.unit_name, "unit_name");
        add_field!(patch.status, "status");
        add_field!(patch.status_reason, "status_reason");
        add_field!(patch.location_name, "location_name");
        add_field!(patch.latitude, "latitude");
        add_field!(patch.longitude, "longitude");
        add_field!(patch.officer_1, "officer_1");
        add_field!(patch.officer_2, "officer_2");
        add_field!(patch.vehicle_number, "vehicle_number");

        let query = format!(
            "UPDATE patrol_units SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, PatrolUnit>(&query).bind(patch.updated_at);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(patch.unit_name);
        bind_field!(patch.status);
        bind_field!(patch.status_reason);
        bind_field!(patch.location_name);
        bind_field!(patch.latitude);
        bind_field!(patch.longitude);
        bind_field!(patch.officer_1);
        bind_field!(patch.officer_2);
        bind_field!(patch.vehicle_number);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Patrol unit {} not found", id)))
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE patrol_units SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Patrol unit {} not found", id)));
        }
        Ok(())
    }
}
