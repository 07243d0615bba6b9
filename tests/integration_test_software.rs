mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn authed(method: &str, uri: &str, auth: &AuthHeaders, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, format!("access_token={}", auth.access_token))
        .header("X-CSRF-Token", &auth.csrf_token)
        .header("Content-Type", "application/json");

    match body {
        Some(v) => builder.body(Body::from(v.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn admin_session(app: &TestApp) -> AuthHeaders {
    app.create_user("admin", "admin@example.com", "secret123", "admin")
        .await;
    app.login("admin", "secret123").await
}

#[tokio::test]
async fn test_create_update_delete_software() {
    let app = TestApp::new().await;
    let auth = admin_session(&app).await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/software",
            &auth,
            Some(json!({
                "name": "Photoshop",
                "vendor": "Adobe",
                "description": "Image editing",
                "license_type": "subscription",
                "total_licenses": 50,
                "cost_per_license": 239.88,
                "renewal_date": "2027-01-31"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["message"], "Software added successfully");
    assert_eq!(body["software"]["renewal_date"], "2027-01-31");
    let id = body["software"]["id"].as_str().unwrap().to_string();

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/software/{}", id),
            &auth,
            Some(json!({"total_licenses": 75, "cost_per_license": 199.99})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["software"]["total_licenses"], 75);
    assert_eq!(body["software"]["cost_per_license"], 199.99);
    // untouched fields survive a partial update
    assert_eq!(body["software"]["name"], "Photoshop");

    let res = app
        .router
        .clone()
        .oneshot(authed("DELETE", &format!("/api/software/{}", id), &auth, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        parse_body(res).await["message"],
        "Software deleted successfully"
    );
}

#[tokio::test]
async fn test_create_software_requires_all_fields() {
    let app = TestApp::new().await;
    let auth = admin_session(&app).await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/software",
            &auth,
            Some(json!({"name": "Incomplete", "vendor": "NoOne"})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["error"], "Missing required fields");
}

#[tokio::test]
async fn test_create_software_rejects_bad_date() {
    let app = TestApp::new().await;
    let auth = admin_session(&app).await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/software",
            &auth,
            Some(json!({
                "name": "X",
                "vendor": "Y",
                "license_type": "perpetual",
                "total_licenses": 1,
                "cost_per_license": 1.0,
                "renewal_date": "31/01/2027"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        parse_body(res).await["error"],
        "Invalid renewal_date (expected YYYY-MM-DD)"
    );
}

#[tokio::test]
async fn test_duplicate_software_rejected() {
    let app = TestApp::new().await;
    let auth = admin_session(&app).await;
    app.add_software(
        "Slack",
        "Salesforce",
        "subscription",
        100,
        8.75,
        chrono::NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
    )
    .await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/software",
            &auth,
            Some(json!({
                "name": "Slack",
                "vendor": "Salesforce",
                "license_type": "subscription",
                "total_licenses": 10,
                "cost_per_license": 8.75,
                "renewal_date": "2027-03-01"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["error"], "Software already exists");
}

#[tokio::test]
async fn test_rename_onto_existing_pair_rejected() {
    let app = TestApp::new().await;
    let auth = admin_session(&app).await;
    let renewal = chrono::NaiveDate::from_ymd_opt(2027, 3, 1).unwrap();
    app.add_software("Slack", "Salesforce", "subscription", 100, 8.75, renewal)
        .await;
    let other = app
        .add_software("Tableau", "Salesforce", "subscription", 20, 70.0, renewal)
        .await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/software/{}", other.id),
            &auth,
            Some(json!({"name": "Slack"})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["error"], "Software already exists");
}

#[tokio::test]
async fn test_delete_software_with_active_licenses_is_blocked() {
    let app = TestApp::new().await;
    let auth = admin_session(&app).await;
    let software = app
        .add_software(
            "Jira",
            "Atlassian",
            "subscription",
            25,
            7.75,
            chrono::NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
        )
        .await;
    app.add_active_licenses(&software.id, 1).await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "DELETE",
            &format!("/api/software/{}", software.id),
            &auth,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        parse_body(res).await["error"],
        "Cannot delete software with 1 active licenses"
    );
}

#[tokio::test]
async fn test_non_admin_cannot_modify_catalog() {
    let app = TestApp::new().await;
    app.create_user("bob", "bob@example.com", "secret123", "user")
        .await;
    let auth = app.login("bob", "secret123").await;

    let res = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/software",
            &auth,
            Some(json!({
                "name": "X",
                "vendor": "Y",
                "license_type": "perpetual",
                "total_licenses": 1,
                "cost_per_license": 1.0,
                "renewal_date": "2027-01-01"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_search_matches_name_vendor_and_description() {
    let app = TestApp::new().await;
    app.create_user("bob", "bob@example.com", "secret123", "user")
        .await;
    let renewal = chrono::NaiveDate::from_ymd_opt(2027, 3, 1).unwrap();
    let slack = app
        .add_software("Slack", "Salesforce", "subscription", 100, 8.75, renewal)
        .await;
    app.add_software("Confluence", "Atlassian", "subscription", 40, 6.05, renewal)
        .await;
    app.add_active_licenses(&slack.id, 60).await;

    let auth = app.login("bob", "secret123").await;

    let res = app
        .router
        .clone()
        .oneshot(authed("GET", "/api/software/search?q=slack", &auth, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Slack");
    assert_eq!(results[0]["used_licenses"], 60);
    assert_eq!(results[0]["usage_percentage"], 60.0);

    // vendor match
    let res = app
        .router
        .clone()
        .oneshot(authed("GET", "/api/software/search?q=atlassian", &auth, None))
        .await
        .unwrap();
    let body = parse_body(res).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    // empty query is a validation error
    let res = app
        .router
        .clone()
        .oneshot(authed("GET", "/api/software/search?q=", &auth, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["error"], "Search query is required");
}
