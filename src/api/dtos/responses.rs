use crate::domain::models::software::{Software, SoftwareUsage};
use crate::domain::models::user::User;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct SoftwareBody {
    pub id: String,
    pub name: String,
    pub vendor: String,
    pub description: String,
    pub license_type: String,
    pub total_licenses: i64,
    pub cost_per_license: f64,
    pub renewal_date: String,
}

impl From<&Software> for SoftwareBody {
    fn from(s: &Software) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            vendor: s.vendor.clone(),
            description: s.description.clone(),
            license_type: s.license_type.clone(),
            total_licenses: s.total_licenses,
            cost_per_license: s.cost_per_license,
            renewal_date: s.renewal_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A software record with its derived reporting fields, evaluated
/// against a fixed `today`.
#[derive(Serialize)]
pub struct SoftwareDetail {
    #[serde(flatten)]
    pub base: SoftwareBody,
    pub used_licenses: i64,
    pub usage_percentage: f64,
    pub total_cost: f64,
    pub days_until_renewal: i64,
}

impl SoftwareDetail {
    pub fn new(usage: &SoftwareUsage, today: NaiveDate) -> Self {
        Self {
            base: SoftwareBody::from(&usage.software),
            used_licenses: usage.used_licenses,
            usage_percentage: usage.usage_percentage(),
            total_cost: usage.total_cost(),
            days_until_renewal: usage.days_until_renewal(today),
        }
    }
}

/// User fields safe to expose (never the password hash).
#[derive(Serialize)]
pub struct UserBody {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for UserBody {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            email: u.email.clone(),
            role: u.role.clone(),
            created_at: u.created_at,
            last_login: u.last_login,
        }
    }
}
