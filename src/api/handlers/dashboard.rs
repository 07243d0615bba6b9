use crate::api::dtos::requests::{InventoryQuery, ReportQuery};
use crate::api::dtos::responses::SoftwareDetail;
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::load_snapshot;
use crate::domain::models::software::SoftwareUsage;
use crate::domain::services::stats::{
    expiring_within_window, filter_inventory, report_summary, top_by_usage, top_by_used_seats,
    underutilized, DashboardStats, InventoryFilter, InventoryView,
};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::error;

fn details(items: &[SoftwareUsage], today: NaiveDate) -> Vec<SoftwareDetail> {
    items.iter().map(|s| SoftwareDetail::new(s, today)).collect()
}

/// The dashboard always renders: a failed snapshot fetch degrades to an
/// empty inventory instead of an error page.
async fn snapshot_or_empty(state: &AppState) -> Vec<SoftwareUsage> {
    match load_snapshot(state).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Error loading inventory snapshot: {:?}", e);
            Vec::new()
        }
    }
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = snapshot_or_empty(&state).await;
    let today = Utc::now().date_naive();

    let total_licenses: i64 = snapshot.iter().map(|s| s.software.total_licenses).sum();
    let used_licenses: i64 = snapshot.iter().map(|s| s.used_licenses).sum();
    let utilization = if total_licenses > 0 {
        used_licenses as f64 / total_licenses as f64 * 100.0
    } else {
        0.0
    };

    let top_software = top_by_used_seats(&snapshot);

    Ok(Json(serde_json::json!({
        "stats": {
            "total_software": snapshot.len(),
            "total_licenses": total_licenses,
            "used_licenses": used_licenses,
            "utilization": (utilization * 100.0).round() / 100.0
        },
        "top_software": details(&top_software, today)
    })))
}

pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = match load_snapshot(&state).await {
        Ok(snapshot) => DashboardStats::compute(&snapshot, Utc::now().date_naive()),
        Err(e) => {
            error!("Error getting dashboard stats: {:?}", e);
            DashboardStats::default()
        }
    };

    Ok(Json(stats))
}

pub async fn inventory(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<InventoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load_snapshot(&state).await?;
    let today = Utc::now().date_naive();

    let filter = InventoryFilter::parse(query.filter.as_deref().unwrap_or("all"));
    let page = query.page.unwrap_or(1);

    match filter_inventory(&snapshot, filter, page, today) {
        InventoryView::Page(p) => Ok(Json(serde_json::json!({
            "filter": filter.as_str(),
            "software_list": details(&p.items, today),
            "page": p.page,
            "per_page": p.per_page,
            "total": p.total,
            "pages": p.pages,
            "has_next": p.has_next,
            "has_prev": p.has_prev
        }))),
        InventoryView::Sections(s) => Ok(Json(serde_json::json!({
            "filter": filter.as_str(),
            "active_software": details(&s.active, today),
            "expiring_software": details(&s.expiring, today),
            "expired_software": details(&s.expired, today),
            "total": s.total
        }))),
    }
}

pub async fn reports(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load_snapshot(&state).await?;
    let today = Utc::now().date_naive();

    let summary = report_summary(&snapshot);
    let expiring = expiring_within_window(&snapshot, today);
    let under = underutilized(&snapshot);
    let top = top_by_usage(&snapshot);

    Ok(Json(serde_json::json!({
        "report_type": query.report_type.as_deref().unwrap_or("general"),
        "total_software": summary.total_software,
        "total_cost": summary.total_cost,
        "total_licenses": summary.total_licenses,
        "used_licenses": summary.used_licenses,
        "avg_usage": summary.avg_usage,
        "software_list": details(&snapshot, today),
        "expiring_soon": details(&expiring, today),
        "underutilized": details(&under, today),
        "top_software": details(&top, today)
    })))
}
