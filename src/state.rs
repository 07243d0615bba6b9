use crate::config::Config;
use crate::domain::ports::{
    AuthRepository, ChatService, LicenseRepository, SoftwareRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub software_repo: Arc<dyn SoftwareRepository>,
    pub license_repo: Arc<dyn LicenseRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
    pub chat_service: Arc<dyn ChatService>,
}
