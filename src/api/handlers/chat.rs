use crate::api::dtos::requests::ChatRequest;
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::load_snapshot;
use crate::domain::models::software::SoftwareUsage;
use crate::domain::services::stats::{HIGH_USAGE_THRESHOLD, UNDERUTILIZED_THRESHOLD};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

pub async fn ai_chat(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let message = payload.message.unwrap_or_default();
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("Message is required".into()));
    }

    let snapshot = load_snapshot(&state).await?;
    let today = Utc::now().date_naive();

    let system_prompt = build_system_prompt(&snapshot, today);

    let response = state.chat_service.complete(&system_prompt, message).await?;

    Ok(Json(serde_json::json!({ "response": response })))
}

/// Embeds the current fleet state so the assistant can give data-driven
/// answers without any retrieval round trip.
fn build_system_prompt(snapshot: &[SoftwareUsage], today: NaiveDate) -> String {
    let total_licenses: i64 = snapshot.iter().map(|s| s.software.total_licenses).sum();
    let used_licenses: i64 = snapshot.iter().map(|s| s.used_licenses).sum();
    let expiring_soon = snapshot
        .iter()
        .filter(|s| {
            let days = s.days_until_renewal(today);
            days <= 30 && days > 0
        })
        .count();
    let expired = snapshot
        .iter()
        .filter(|s| s.days_until_renewal(today) <= 0)
        .count();
    let high_usage = snapshot
        .iter()
        .filter(|s| s.usage_percentage() >= HIGH_USAGE_THRESHOLD)
        .count();
    let low_usage = snapshot
        .iter()
        .filter(|s| s.usage_percentage() < UNDERUTILIZED_THRESHOLD)
        .count();

    let mut details = String::new();
    for s in snapshot {
        details.push_str(&format!(
            "- {} ({}): {}/{} licenses used ({:.1}%), ${:.2}/license, total ${:.2}, renews in {} days\n",
            s.software.name,
            s.software.vendor,
            s.used_licenses,
            s.software.total_licenses,
            s.usage_percentage(),
            s.software.cost_per_license,
            s.total_cost(),
            s.days_until_renewal(today),
        ));
    }

    format!(
        "You are SAMurAI, an AI assistant for Software Asset Management.\n\
         Here is the current state of the software assets:\n\n\
         Overview:\n\
         - Total Software: {}\n\
         - Total Licenses: {}\n\
         - Used Licenses: {}\n\
         - Licenses Expiring in 30 days: {}\n\
         - Expired Licenses: {}\n\
         - High Usage Software (>80%): {}\n\
         - Low Usage Software (<30%): {}\n\n\
         Software Details:\n{}\n\
         Provide specific, data-driven insights and recommendations based on this information.\n\
         When discussing costs, always format them as currency with $ symbol and commas.\n\
         When discussing percentages, always include the % symbol and use one decimal place.\n\
         Be concise but informative in your responses.",
        snapshot.len(),
        total_licenses,
        used_licenses,
        expiring_soon,
        expired,
        high_usage,
        low_usage,
        details,
    )
}
