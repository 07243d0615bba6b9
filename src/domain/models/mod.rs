pub mod auth;
pub mod license;
pub mod software;
pub mod user;
