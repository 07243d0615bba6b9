use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{NaiveDate, Utc};
use rand::rngs::OsRng;
use samurai_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{license::License, software::Software, user::User},
    domain::ports::ChatService,
    domain::services::auth_service::AuthService,
    error::AppError,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo, sqlite_license_repo::SqliteLicenseRepo,
        sqlite_software_repo::SqliteSoftwareRepo, sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct MockChatService;

#[async_trait]
impl ChatService for MockChatService {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_message: &str,
    ) -> Result<String, AppError> {
        Ok("Mock assistant response.".to_string())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            openai_api_key: "test-key".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
        };

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            software_repo: Arc::new(SqliteSoftwareRepo::new(pool.clone())),
            license_repo: Arc::new(SqliteLicenseRepo::new(pool.clone())),
            auth_repo,
            auth_service,
            chat_service: Arc::new(MockChatService),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Inserts a user directly, bypassing the registration endpoint.
    #[allow(dead_code)]
    pub async fn create_user(&self, username: &str, email: &str, password: &str, role: &str) -> User {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();

        let user = User::new(username, email, hash, role);
        self.state.user_repo.create(&user).await.unwrap()
    }

    #[allow(dead_code)]
    pub async fn add_software(
        &self,
        name: &str,
        vendor: &str,
        license_type: &str,
        total_licenses: i64,
        cost_per_license: f64,
        renewal_date: NaiveDate,
    ) -> Software {
        let software = Software::new(name, vendor, "", license_type, total_licenses, cost_per_license, renewal_date);
        self.state.software_repo.create(&software).await.unwrap()
    }

    #[allow(dead_code)]
    pub async fn add_active_licenses(&self, software_id: &str, count: i64) {
        for _ in 0..count {
            let license = License::new(
                software_id.to_string(),
                None,
                "active",
                Some(Utc::now()),
                None,
            );
            self.state.license_repo.create(&license).await.unwrap();
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "username": username,
            "password": password
        });

        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies
            .iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..]
            .find(';')
            .unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start + end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"]
            .as_str()
            .expect("No csrf_token in body")
            .to_string();

        AuthHeaders {
            access_token,
            csrf_token,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
