pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod export;
pub mod health;
pub mod software;
pub mod user;

use crate::domain::models::software::SoftwareUsage;
use crate::error::AppError;
use crate::state::AppState;

/// One consistent inventory snapshot: every software record joined with
/// its active-license count. All aggregation runs over this in memory.
pub(crate) async fn load_snapshot(state: &AppState) -> Result<Vec<SoftwareUsage>, AppError> {
    let software = state.software_repo.list().await?;
    let counts = state.license_repo.active_counts().await?;

    Ok(software
        .into_iter()
        .map(|s| {
            let used = counts.get(&s.id).copied().unwrap_or(0);
            SoftwareUsage::new(s, used)
        })
        .collect())
}
