use crate::domain::{
    models::license::{License, STATUS_ACTIVE},
    ports::LicenseRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashMap;

const COLUMNS: &str =
    "id, software_id, assigned_to, status, assigned_date, last_used, created_at, updated_at";

pub struct SqliteLicenseRepo {
    pool: SqlitePool,
}

impl SqliteLicenseRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LicenseRepository for SqliteLicenseRepo {
    async fn create(&self, license: &License) -> Result<License, AppError> {
        sqlx::query_as::<_, License>(&format!(
            "INSERT INTO licenses (id, software_id, assigned_to, status, assigned_date, \
             last_used, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&license.id)
        .bind(&license.software_id)
        .bind(&license.assigned_to)
        .bind(&license.status)
        .bind(license.assigned_date)
        .bind(license.last_used)
        .bind(license.created_at)
        .bind(license.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count_active_by_software(&self, software_id: &str) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM licenses WHERE software_id = ? AND status = ?")
                .bind(software_id)
                .bind(STATUS_ACTIVE)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
        Ok(count)
    }

    async fn active_counts(&self) -> Result<HashMap<String, i64>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT software_id, COUNT(*) FROM licenses WHERE status = ? GROUP BY software_id",
        )
        .bind(STATUS_ACTIVE)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows.into_iter().collect())
    }
}
