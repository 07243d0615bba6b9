pub mod auth_service;
pub mod report;
pub mod stats;
