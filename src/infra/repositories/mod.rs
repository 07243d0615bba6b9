pub mod sqlite_auth_repo;
pub mod sqlite_license_repo;
pub mod sqlite_software_repo;
pub mod sqlite_user_repo;
