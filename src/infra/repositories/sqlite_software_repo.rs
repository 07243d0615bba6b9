use crate::domain::{models::software::Software, ports::SoftwareRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::error;

const COLUMNS: &str = "id, name, vendor, description, license_type, total_licenses, \
                       cost_per_license, renewal_date, created_at, updated_at";

pub struct SqliteSoftwareRepo {
    pool: SqlitePool,
}

impl SqliteSoftwareRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SoftwareRepository for SqliteSoftwareRepo {
    async fn create(&self, software: &Software) -> Result<Software, AppError> {
        sqlx::query_as::<_, Software>(&format!(
            "INSERT INTO software (id, name, vendor, description, license_type, total_licenses, \
             cost_per_license, renewal_date, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&software.id)
        .bind(&software.name)
        .bind(&software.vendor)
        .bind(&software.description)
        .bind(&software.license_type)
        .bind(software.total_licenses)
        .bind(software.cost_per_license)
        .bind(software.renewal_date)
        .bind(software.created_at)
        .bind(software.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Software>, AppError> {
        sqlx::query_as::<_, Software>(&format!("SELECT {COLUMNS} FROM software WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_name_and_vendor(
        &self,
        name: &str,
        vendor: &str,
    ) -> Result<Option<Software>, AppError> {
        sqlx::query_as::<_, Software>(&format!(
            "SELECT {COLUMNS} FROM software WHERE name = ? AND vendor = ?"
        ))
        .bind(name)
        .bind(vendor)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Software>, AppError> {
        sqlx::query_as::<_, Software>(&format!("SELECT {COLUMNS} FROM software ORDER BY created_at ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn search(&self, query: &str) -> Result<Vec<Software>, AppError> {
        // SQLite LIKE is case-insensitive for ASCII.
        let pattern = format!("%{}%", query);
        sqlx::query_as::<_, Software>(&format!(
            "SELECT {COLUMNS} FROM software \
             WHERE name LIKE ? OR vendor LIKE ? OR description LIKE ? \
             ORDER BY created_at ASC"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, software: &Software) -> Result<Software, AppError> {
        sqlx::query_as::<_, Software>(&format!(
            "UPDATE software SET name = ?, vendor = ?, description = ?, license_type = ?, \
             total_licenses = ?, cost_per_license = ?, renewal_date = ?, updated_at = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(&software.name)
        .bind(&software.vendor)
        .bind(&software.description)
        .bind(&software.license_type)
        .bind(software.total_licenses)
        .bind(software.cost_per_license)
        .bind(software.renewal_date)
        .bind(Utc::now())
        .bind(&software.id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM licenses WHERE software_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM software WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(|e| {
            error!("SQLite software deletion failed: {:?}", e);
            AppError::Database(e)
        })?;
        Ok(())
    }
}
