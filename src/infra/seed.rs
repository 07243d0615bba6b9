//! First-run database seeding: admin account, demo users, a sample
//! software fleet and randomized license assignments. Skipped entirely
//! when the admin account already exists.

use crate::domain::models::{
    license::{License, STATUS_ACTIVE},
    software::Software,
    user::User,
};
use crate::error::AppError;
use crate::state::AppState;
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

pub async fn seed_if_empty(state: &AppState) -> Result<(), AppError> {
    if state.user_repo.find_by_username("admin").await?.is_some() {
        return Ok(());
    }

    info!("Empty database detected, seeding demo data...");

    let admin = User::new("admin", "admin@samurai.com", hash_password("Admin@123")?, "admin");
    state.user_repo.create(&admin).await?;

    let demo_users = [
        ("john.doe", "john.doe@company.com"),
        ("jane.smith", "jane.smith@company.com"),
        ("bob.wilson", "bob.wilson@company.com"),
        ("alice.brown", "alice.brown@company.com"),
    ];

    let mut users = vec![admin];
    for (username, email) in demo_users {
        let user = User::new(username, email, hash_password("User@123")?, "user");
        users.push(state.user_repo.create(&user).await?);
    }

    let mut rng = rand::thread_rng();
    let now = Utc::now();

    for software in sample_fleet() {
        let created = state.software_repo.create(&software).await?;

        // Assign 60-90% of each item's seats.
        let seats = (created.total_licenses as f64 * rng.gen_range(0.6..0.9)) as i64;
        for _ in 0..seats {
            let user = users.choose(&mut rng);
            let license = License::new(
                created.id.clone(),
                user.map(|u| u.id.clone()),
                STATUS_ACTIVE,
                Some(now - Duration::days(rng.gen_range(1..=180))),
                Some(now - Duration::days(rng.gen_range(0..=30))),
            );
            state.license_repo.create(&license).await?;
        }
    }

    info!("Admin user and sample data created successfully");
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string())
}

fn sample_fleet() -> Vec<Software> {
    let today = Utc::now().date_naive();
    let entries: [(&str, &str, &str, &str, i64, f64, i64); 35] = [
        // High-value enterprise platforms
        ("SAP HANA Enterprise", "SAP", "In-Memory Database Platform", "Per Core", 48, 12000.0, 45),
        ("Oracle Cloud Infrastructure", "Oracle", "Enterprise Cloud Platform", "Per User", 2000, 200.0, 15),
        ("Microsoft Azure AD Premium P2", "Microsoft", "Advanced Identity Protection", "Per User", 1500, 18.0, 90),
        // Security
        ("CrowdStrike Falcon Enterprise", "CrowdStrike", "Endpoint Protection Platform", "Per Endpoint", 3000, 85.0, 10),
        ("Palo Alto Prisma Cloud", "Palo Alto Networks", "Cloud Security Platform", "Per Workload", 500, 150.0, 25),
        // Development tools
        ("JetBrains All Products Pack", "JetBrains", "Complete Development Suite", "Per User", 200, 649.0, 5),
        ("GitHub Enterprise", "GitHub", "Enterprise Code Repository", "Per User", 1000, 21.0, 180),
        // Analytics and BI
        ("Snowflake Enterprise", "Snowflake", "Data Warehouse Platform", "Per Credit", 5000, 23.0, 8),
        ("Databricks Unity Catalog", "Databricks", "Data Lakehouse Platform", "Per DBU", 10000, 15.0, 12),
        // Collaboration
        ("Miro Enterprise", "Miro", "Visual Collaboration Platform", "Per User", 800, 16.0, 60),
        ("Notion Enterprise", "Notion", "Workspace and Wiki Platform", "Per User", 1200, 8.0, 150),
        // Infrastructure management
        ("HashiCorp Enterprise Suite", "HashiCorp", "Infrastructure Automation Suite", "Per Node", 300, 200.0, 18),
        ("Kubernetes Enterprise Support", "VMware", "Container Orchestration Support", "Per Cluster", 50, 2000.0, 30),
        // Design and creative
        ("Figma Enterprise", "Figma", "Design Collaboration Platform", "Per Editor", 150, 45.0, 75),
        ("AutoCAD Collection", "Autodesk", "Complete CAD Suite", "Per User", 100, 3295.0, 40),
        // Compliance and identity
        ("Qualys Enterprise", "Qualys", "Vulnerability Management Platform", "Per Asset", 2500, 35.0, 15),
        ("SailPoint IdentityNow", "SailPoint", "Identity Governance Platform", "Per Identity", 3000, 25.0, 20),
        // Customer support
        ("Zendesk Enterprise Suite", "Zendesk", "Customer Service Platform", "Per Agent", 200, 199.0, 95),
        ("ServiceNow IT Service Management", "ServiceNow", "ITSM Platform", "Per Fulfiller", 150, 180.0, 110),
        // Recently added
        ("Zoom Enterprise Plus", "Zoom", "Advanced Enterprise Video Conferencing", "Per Host", 800, 35.0, 300),
        ("Microsoft Power BI Pro", "Microsoft", "Professional Business Intelligence Tool", "Per User", 500, 10.0, 250),
        ("AWS EC2 Reserved Instances", "Amazon", "Reserved EC2 Compute Instances", "Per Instance", 100, 500.0, 400),
        ("GitLab Ultimate", "GitLab", "Complete DevOps Platform", "Per User", 300, 99.0, 280),
        // Expiring soon
        ("Cisco Webex Enterprise", "Cisco", "Enterprise Collaboration Platform", "Per User", 1000, 25.0, 15),
        ("Symantec Endpoint Protection", "Broadcom", "Enterprise Security Solution", "Per Device", 2000, 45.0, 20),
        ("Citrix Virtual Apps", "Citrix", "Application Virtualization", "Per User", 500, 300.0, 25),
        ("New Relic Pro", "New Relic", "Application Performance Monitoring", "Per Host", 150, 75.0, 10),
        // Expired
        ("Oracle WebLogic Server", "Oracle", "Enterprise Application Server", "Per Core", 32, 4500.0, -15),
        ("IBM Db2", "IBM", "Enterprise Database", "Per Core", 16, 7800.0, -30),
        ("SolarWinds NPM", "SolarWinds", "Network Performance Monitor", "Per Device", 100, 150.0, -5),
        ("Trend Micro Deep Security", "Trend Micro", "Server Security Platform", "Per Server", 50, 250.0, -8),
        // Actively used
        ("Atlassian Confluence", "Atlassian", "Team Collaboration Software", "Per User", 1000, 5.0, 180),
        ("Datadog Enterprise", "Datadog", "Infrastructure Monitoring", "Per Host", 200, 35.0, 150),
        ("PagerDuty Enterprise", "PagerDuty", "Incident Management Platform", "Per User", 300, 39.0, 200),
        ("Okta Enterprise", "Okta", "Identity Management", "Per User", 1500, 25.0, 220),
    ];

    entries
        .into_iter()
        .map(|(name, vendor, description, license_type, total, cost, offset)| {
            Software::new(
                name,
                vendor,
                description,
                license_type,
                total,
                cost,
                today + Duration::days(offset),
            )
        })
        .collect()
}
