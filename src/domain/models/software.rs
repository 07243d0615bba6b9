use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Software {
    pub id: String,
    pub name: String,
    pub vendor: String,
    pub description: String,
    pub license_type: String,
    pub total_licenses: i64,
    pub cost_per_license: f64,
    pub renewal_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Software {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        vendor: &str,
        description: &str,
        license_type: &str,
        total_licenses: i64,
        cost_per_license: f64,
        renewal_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            vendor: vendor.to_string(),
            description: description.to_string(),
            license_type: license_type.to_string(),
            total_licenses,
            cost_per_license,
            renewal_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A software record joined with its active-license count. All reporting
/// fields are derived on read and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SoftwareUsage {
    #[serde(flatten)]
    pub software: Software,
    pub used_licenses: i64,
}

impl SoftwareUsage {
    pub fn new(software: Software, used_licenses: i64) -> Self {
        Self { software, used_licenses }
    }

    pub fn usage_percentage(&self) -> f64 {
        if self.software.total_licenses == 0 {
            return 0.0;
        }
        (self.used_licenses as f64 / self.software.total_licenses as f64) * 100.0
    }

    pub fn total_cost(&self) -> f64 {
        self.software.total_licenses as f64 * self.software.cost_per_license
    }

    /// Negative once the renewal date has passed.
    pub fn days_until_renewal(&self, today: NaiveDate) -> i64 {
        (self.software.renewal_date - today).num_days()
    }
}
