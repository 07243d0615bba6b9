use crate::api::dtos::requests::{CreateSoftwareRequest, SearchQuery, UpdateSoftwareRequest};
use crate::api::dtos::responses::{SoftwareBody, SoftwareDetail};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::software::{Software, SoftwareUsage};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

fn parse_renewal_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid renewal_date (expected YYYY-MM-DD)".into()))
}

pub async fn create_software(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<CreateSoftwareRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let (Some(name), Some(vendor), Some(license_type), Some(total_licenses), Some(cost_per_license), Some(renewal_date)) = (
        payload.name,
        payload.vendor,
        payload.license_type,
        payload.total_licenses,
        payload.cost_per_license,
        payload.renewal_date,
    ) else {
        return Err(AppError::Validation("Missing required fields".into()));
    };

    if total_licenses < 0 {
        return Err(AppError::Validation("total_licenses must be non-negative".into()));
    }
    if cost_per_license < 0.0 {
        return Err(AppError::Validation("cost_per_license must be non-negative".into()));
    }

    let renewal_date = parse_renewal_date(&renewal_date)?;

    if state
        .software_repo
        .find_by_name_and_vendor(&name, &vendor)
        .await?
        .is_some()
    {
        return Err(AppError::Validation("Software already exists".into()));
    }

    let software = Software::new(
        &name,
        &vendor,
        payload.description.as_deref().unwrap_or(""),
        &license_type,
        total_licenses,
        cost_per_license,
        renewal_date,
    );
    let created = state.software_repo.create(&software).await?;

    info!("Added software: {} ({})", created.name, created.id);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Software added successfully",
            "software": SoftwareBody::from(&created)
        })),
    ))
}

pub async fn update_software(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(software_id): Path<String>,
    Json(payload): Json<UpdateSoftwareRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let mut software = state
        .software_repo
        .find_by_id(&software_id)
        .await?
        .ok_or(AppError::NotFound("Software not found".into()))?;

    if let Some(name) = payload.name {
        if let Some(existing) = state
            .software_repo
            .find_by_name_and_vendor(&name, &software.vendor)
            .await?
        {
            if existing.id != software_id {
                return Err(AppError::Validation("Software already exists".into()));
            }
        }
        software.name = name;
    }

    if let Some(vendor) = payload.vendor {
        if let Some(existing) = state
            .software_repo
            .find_by_name_and_vendor(&software.name, &vendor)
            .await?
        {
            if existing.id != software_id {
                return Err(AppError::Validation("Software already exists".into()));
            }
        }
        software.vendor = vendor;
    }

    if let Some(description) = payload.description {
        software.description = description;
    }
    if let Some(license_type) = payload.license_type {
        software.license_type = license_type;
    }
    if let Some(total_licenses) = payload.total_licenses {
        if total_licenses < 0 {
            return Err(AppError::Validation("total_licenses must be non-negative".into()));
        }
        software.total_licenses = total_licenses;
    }
    if let Some(cost_per_license) = payload.cost_per_license {
        if cost_per_license < 0.0 {
            return Err(AppError::Validation("cost_per_license must be non-negative".into()));
        }
        software.cost_per_license = cost_per_license;
    }
    if let Some(renewal_date) = payload.renewal_date {
        software.renewal_date = parse_renewal_date(&renewal_date)?;
    }

    let updated = state.software_repo.update(&software).await?;

    info!("Updated software: {}", updated.id);

    Ok(Json(serde_json::json!({
        "message": "Software updated successfully",
        "software": SoftwareBody::from(&updated)
    })))
}

pub async fn delete_software(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(software_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let software = state
        .software_repo
        .find_by_id(&software_id)
        .await?
        .ok_or(AppError::NotFound("Software not found".into()))?;

    let active_licenses = state
        .license_repo
        .count_active_by_software(&software.id)
        .await?;
    if active_licenses > 0 {
        return Err(AppError::Validation(format!(
            "Cannot delete software with {} active licenses",
            active_licenses
        )));
    }

    state.software_repo.delete(&software.id).await?;

    info!("Deleted software {}", software_id);

    Ok(Json(serde_json::json!({ "message": "Software deleted successfully" })))
}

pub async fn search_software(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let q = query.q.unwrap_or_default();
    let q = q.trim();
    if q.is_empty() {
        return Err(AppError::Validation("Search query is required".into()));
    }

    let matches = state.software_repo.search(q).await?;
    let counts = state.license_repo.active_counts().await?;

    let today = Utc::now().date_naive();
    let results: Vec<SoftwareDetail> = matches
        .into_iter()
        .map(|s| {
            let used = counts.get(&s.id).copied().unwrap_or(0);
            SoftwareDetail::new(&SoftwareUsage::new(s, used), today)
        })
        .collect();

    Ok(Json(serde_json::json!({ "results": results })))
}
