//! Officer directory on PostgreSQL

use async_trait::async_trait;

use super::{OfficerDirectory, Repository};
use crate::{
    error::AppResult,
    models::officer::{Officer, Role},
};

#[async_trait]
impl OfficerDirectory for Repository {
    async fn list_officers(&self, roles: &[Role]) -> AppResult<Vec<Officer>> {
        if roles.is_empty() {
            let rows = sqlx::query_as::<_, Officer>(
                "SELECT id, full_name, badge_number, role FROM officers ORDER BY full_name",
            )
            .fetch_all(&self.pool)
            .await?;
            return Ok(rows);
        }

        let roles: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();
        let rows = sqlx::query_as::<_, Officer>(
            r#"
            SELECT id, full_name, badge_number, role
            FROM officers
            WHERE role = ANY($1)
            ORDER BY full_name
            "#,
        )
        .bind(&roles)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
