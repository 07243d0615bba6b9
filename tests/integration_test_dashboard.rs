mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{AuthHeaders, TestApp};
use serde_json::Value;
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str, auth: &AuthHeaders) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, format!("access_token={}", auth.access_token))
        .body(Body::empty())
        .unwrap()
}

/// Three items with known numbers:
///   Photoshop  50 seats, 45 used (90%), $200/seat, renews in 90 days
///   Slack     100 seats, 20 used (20%), $10/seat,  renews in 10 days
///   Legacy     10 seats,  0 used (0%),  $5000/seat, expired 5 days ago
async fn seed_fleet(app: &TestApp) {
    let today = Utc::now().date_naive();
    let photoshop = app
        .add_software("Photoshop", "Adobe", "subscription", 50, 200.0, today + Duration::days(90))
        .await;
    let slack = app
        .add_software("Slack", "Salesforce", "subscription", 100, 10.0, today + Duration::days(10))
        .await;
    app.add_software("Legacy Suite", "Oldcorp", "perpetual", 10, 5000.0, today - Duration::days(5))
        .await;

    app.add_active_licenses(&photoshop.id, 45).await;
    app.add_active_licenses(&slack.id, 20).await;
}

#[tokio::test]
async fn test_dashboard_stats_aggregation() {
    let app = TestApp::new().await;
    app.create_user("bob", "bob@example.com", "secret123", "user")
        .await;
    seed_fleet(&app).await;
    let auth = app.login("bob", "secret123").await;

    let res = app
        .router
        .clone()
        .oneshot(get("/api/dashboard/stats", &auth))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["total_software"], 3);
    assert_eq!(body["total_licenses"], 160);
    assert_eq!(body["active_licenses"], 65);
    // 50*200 + 100*10 + 10*5000
    assert_eq!(body["total_cost"], 61000.0);
    assert_eq!(body["expiring_soon"], 1);
    assert_eq!(body["expired"], 1);
    // only the two items under 30% count: Slack 80 unused * $10, Legacy 10 * $5000
    assert_eq!(body["potential_savings"], 50800.0);

    assert_eq!(body["license_types"]["subscription"], 2);
    assert_eq!(body["license_types"]["perpetual"], 1);
    assert_eq!(body["vendor_distribution"]["Adobe"], 1);

    assert_eq!(body["usage_categories"]["high"], 1);
    assert_eq!(body["usage_categories"]["medium"], 0);
    assert_eq!(body["usage_categories"]["low"], 2);

    // Photoshop $10,000 medium, Slack $1,000 low, Legacy $50,000 medium
    assert_eq!(body["cost_categories"]["high"], 0);
    assert_eq!(body["cost_categories"]["medium"], 2);
    assert_eq!(body["cost_categories"]["low"], 1);
}

#[tokio::test]
async fn test_dashboard_overview_ranks_by_used_seats() {
    let app = TestApp::new().await;
    app.create_user("bob", "bob@example.com", "secret123", "user")
        .await;
    seed_fleet(&app).await;
    let auth = app.login("bob", "secret123").await;

    let res = app
        .router
        .clone()
        .oneshot(get("/api/dashboard", &auth))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["stats"]["total_software"], 3);
    assert_eq!(body["stats"]["used_licenses"], 65);
    // 65/160
    assert_eq!(body["stats"]["utilization"], 40.63);

    let top = body["top_software"].as_array().unwrap();
    // Photoshop has 45 seats used vs Slack's 20: raw seats, not percentage
    assert_eq!(top[0]["name"], "Photoshop");
    assert_eq!(top[1]["name"], "Slack");
}

#[tokio::test]
async fn test_inventory_all_view_has_sections() {
    let app = TestApp::new().await;
    app.create_user("bob", "bob@example.com", "secret123", "user")
        .await;
    seed_fleet(&app).await;
    let auth = app.login("bob", "secret123").await;

    let res = app
        .router
        .clone()
        .oneshot(get("/api/inventory", &auth))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["filter"], "all");
    assert_eq!(body["total"], 3);
    let active = body["active_software"].as_array().unwrap();
    let expiring = body["expiring_software"].as_array().unwrap();
    let expired = body["expired_software"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["name"], "Photoshop");
    assert_eq!(expiring.len(), 1);
    assert_eq!(expiring[0]["name"], "Slack");
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0]["name"], "Legacy Suite");
}

#[tokio::test]
async fn test_inventory_filtered_view_is_paginated() {
    let app = TestApp::new().await;
    app.create_user("bob", "bob@example.com", "secret123", "user")
        .await;
    seed_fleet(&app).await;
    let auth = app.login("bob", "secret123").await;

    let res = app
        .router
        .clone()
        .oneshot(get("/api/inventory?filter=expired", &auth))
        .await
        .unwrap();
    let body = parse_body(res).await;

    assert_eq!(body["filter"], "expired");
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 12);
    assert_eq!(body["pages"], 1);
    let list = body["software_list"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Legacy Suite");
    assert!(list[0]["days_until_renewal"].as_i64().unwrap() < 0);

    // an unknown filter value falls back to the sectioned view
    let res = app
        .router
        .clone()
        .oneshot(get("/api/inventory?filter=bogus", &auth))
        .await
        .unwrap();
    let body = parse_body(res).await;
    assert_eq!(body["filter"], "all");
}

#[tokio::test]
async fn test_reports_lists_and_summary() {
    let app = TestApp::new().await;
    app.create_user("bob", "bob@example.com", "secret123", "user")
        .await;
    seed_fleet(&app).await;
    let auth = app.login("bob", "secret123").await;

    let res = app
        .router
        .clone()
        .oneshot(get("/api/reports?type=cost", &auth))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["report_type"], "cost");
    assert_eq!(body["total_software"], 3);
    assert_eq!(body["total_cost"], 61000.0);
    // mean of 90%, 20%, 0%
    let avg = body["avg_usage"].as_f64().unwrap();
    assert!((avg - 36.666).abs() < 0.01);

    // the reports expiring list has no lower bound: the expired item is in it
    let expiring: Vec<&str> = body["expiring_soon"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert!(expiring.contains(&"Slack"));
    assert!(expiring.contains(&"Legacy Suite"));

    let under: Vec<&str> = body["underutilized"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(under, vec!["Slack", "Legacy Suite"]);

    // top by usage percentage puts Photoshop first
    let top = body["top_software"].as_array().unwrap();
    assert_eq!(top[0]["name"], "Photoshop");
}

#[tokio::test]
async fn test_empty_inventory_degrades_gracefully() {
    let app = TestApp::new().await;
    app.create_user("bob", "bob@example.com", "secret123", "user")
        .await;
    let auth = app.login("bob", "secret123").await;

    let res = app
        .router
        .clone()
        .oneshot(get("/api/dashboard/stats", &auth))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["total_software"], 0);
    assert_eq!(body["utilization"], 0.0);
    assert_eq!(body["potential_savings"], 0.0);
}
