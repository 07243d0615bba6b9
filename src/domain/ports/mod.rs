use crate::domain::models::{
    auth::RefreshTokenRecord, license::License, software::Software, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// All users, newest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn count_by_role(&self, role: &str) -> Result<i64, AppError>;
    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
pub trait SoftwareRepository: Send + Sync {
    async fn create(&self, software: &Software) -> Result<Software, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Software>, AppError>;
    async fn find_by_name_and_vendor(
        &self,
        name: &str,
        vendor: &str,
    ) -> Result<Option<Software>, AppError>;
    async fn list(&self) -> Result<Vec<Software>, AppError>;
    /// Case-insensitive substring match on name, vendor and description.
    async fn search(&self, query: &str) -> Result<Vec<Software>, AppError>;
    async fn update(&self, software: &Software) -> Result<Software, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait LicenseRepository: Send + Sync {
    async fn create(&self, license: &License) -> Result<License, AppError>;
    async fn count_active_by_software(&self, software_id: &str) -> Result<i64, AppError>;
    /// software_id -> active license count, for every software with at
    /// least one active license.
    async fn active_counts(&self) -> Result<HashMap<String, i64>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str)
        -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ChatService: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_message: &str)
        -> Result<String, AppError>;
}
