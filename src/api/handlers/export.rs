use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::load_snapshot;
use crate::domain::services::report::{render_report, REPORT_FILENAME};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::header, response::IntoResponse};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn export_report(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load_snapshot(&state).await?;
    let csv = render_report(&snapshot, Utc::now().date_naive())?;

    info!("Exported inventory report ({} rows)", snapshot.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILENAME),
            ),
        ],
        csv,
    ))
}
