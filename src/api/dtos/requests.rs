use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// All fields optional so that a missing field yields a 400 with a
/// domain message instead of a body-rejection.
#[derive(Deserialize)]
pub struct CreateSoftwareRequest {
    pub name: Option<String>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub license_type: Option<String>,
    pub total_licenses: Option<i64>,
    pub cost_per_license: Option<f64>,
    pub renewal_date: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSoftwareRequest {
    pub name: Option<String>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub license_type: Option<String>,
    pub total_licenses: Option<i64>,
    pub cost_per_license: Option<f64>,
    pub renewal_date: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct InventoryQuery {
    pub filter: Option<String>,
    pub page: Option<usize>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

#[derive(Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}
