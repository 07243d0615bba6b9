use crate::api::handlers::{auth, chat, dashboard, export, health, software, user};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))

        // User management
        .route("/api/users", get(user::list_users).post(user::create_user))
        .route("/api/users/{user_id}", put(user::update_user).delete(user::delete_user))

        // Software catalog
        .route("/api/software", post(software::create_software))
        .route("/api/software/{software_id}", put(software::update_software).delete(software::delete_software))
        .route("/api/software/search", get(software::search_software))

        // Dashboard & reporting
        .route("/api/dashboard", get(dashboard::dashboard))
        .route("/api/dashboard/stats", get(dashboard::dashboard_stats))
        .route("/api/inventory", get(dashboard::inventory))
        .route("/api/reports", get(dashboard::reports))
        .route("/api/export-report", get(export::export_report))

        // Assistant
        .route("/api/ai-chat", post(chat::ai_chat))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
