use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_ACTIVE: &str = "active";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct License {
    pub id: String,
    pub software_id: String,
    pub assigned_to: Option<String>,
    pub status: String,
    pub assigned_date: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl License {
    pub fn new(
        software_id: String,
        assigned_to: Option<String>,
        status: &str,
        assigned_date: Option<DateTime<Utc>>,
        last_used: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            software_id,
            assigned_to,
            status: status.to_string(),
            assigned_date: assigned_date.unwrap_or(now),
            last_used,
            created_at: now,
            updated_at: now,
        }
    }
}
