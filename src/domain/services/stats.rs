//! Fleet aggregation over an in-memory software snapshot. Pure functions:
//! callers pass a consistent snapshot (one query result) and a fixed
//! `today`; nothing here touches storage.

use crate::domain::models::software::SoftwareUsage;
use crate::domain::models::user::User;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const EXPIRY_WINDOW_DAYS: i64 = 30;
pub const UNDERUTILIZED_THRESHOLD: f64 = 30.0;
pub const HIGH_USAGE_THRESHOLD: f64 = 80.0;
pub const HIGH_COST_THRESHOLD: f64 = 100_000.0;
pub const MEDIUM_COST_THRESHOLD: f64 = 10_000.0;

pub const INVENTORY_PAGE_SIZE: usize = 12;
pub const INVENTORY_SECTION_SIZE: usize = 8;
pub const TOP_BY_USAGE_LIMIT: usize = 3;
pub const TOP_BY_SEATS_LIMIT: usize = 5;
pub const USER_PAGE_SIZE: usize = 10;

#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Fixed-shape dashboard statistics. `Default` is the degraded form the
/// dashboard falls back to when the snapshot cannot be loaded; it is
/// indistinguishable from the stats of an empty inventory.
#[derive(Debug, Default, Clone, Serialize)]
pub struct DashboardStats {
    pub total_software: usize,
    pub total_licenses: i64,
    pub active_licenses: i64,
    pub total_cost: f64,
    pub utilization: f64,
    pub expiring_soon: usize,
    pub expired: usize,
    pub avg_cost_per_license: f64,
    pub potential_savings: f64,
    pub license_types: BTreeMap<String, usize>,
    pub vendor_distribution: BTreeMap<String, usize>,
    pub usage_categories: CategoryCounts,
    pub cost_categories: CategoryCounts,
}

impl DashboardStats {
    pub fn compute(snapshot: &[SoftwareUsage], today: NaiveDate) -> Self {
        let thirty_days = today + Duration::days(EXPIRY_WINDOW_DAYS);

        let total_software = snapshot.len();
        let total_licenses: i64 = snapshot.iter().map(|s| s.software.total_licenses).sum();
        let active_licenses: i64 = snapshot.iter().map(|s| s.used_licenses).sum();
        let total_cost: f64 = snapshot.iter().map(|s| s.total_cost()).sum();

        let utilization = if total_licenses > 0 {
            active_licenses as f64 / total_licenses as f64 * 100.0
        } else {
            0.0
        };

        let expiring_soon = snapshot
            .iter()
            .filter(|s| s.software.renewal_date <= thirty_days && s.software.renewal_date > today)
            .count();
        let expired = snapshot
            .iter()
            .filter(|s| s.software.renewal_date <= today)
            .count();

        let avg_cost_per_license = if total_licenses > 0 {
            total_cost / total_licenses as f64
        } else {
            0.0
        };

        let potential_savings: f64 = snapshot
            .iter()
            .filter(|s| s.usage_percentage() < UNDERUTILIZED_THRESHOLD)
            .map(|s| (s.software.total_licenses - s.used_licenses) as f64 * s.software.cost_per_license)
            .sum();

        let mut license_types: BTreeMap<String, usize> = BTreeMap::new();
        let mut vendor_distribution: BTreeMap<String, usize> = BTreeMap::new();
        for s in snapshot {
            *license_types.entry(s.software.license_type.clone()).or_insert(0) += 1;
            *vendor_distribution.entry(s.software.vendor.clone()).or_insert(0) += 1;
        }

        let mut usage_categories = CategoryCounts::default();
        for s in snapshot {
            let pct = s.usage_percentage();
            if pct >= HIGH_USAGE_THRESHOLD {
                usage_categories.high += 1;
            } else if pct >= UNDERUTILIZED_THRESHOLD {
                usage_categories.medium += 1;
            } else {
                usage_categories.low += 1;
            }
        }

        let mut cost_categories = CategoryCounts::default();
        for s in snapshot {
            let cost = s.total_cost();
            if cost >= HIGH_COST_THRESHOLD {
                cost_categories.high += 1;
            } else if cost >= MEDIUM_COST_THRESHOLD {
                cost_categories.medium += 1;
            } else {
                cost_categories.low += 1;
            }
        }

        Self {
            total_software,
            total_licenses,
            active_licenses,
            total_cost,
            utilization,
            expiring_soon,
            expired,
            avg_cost_per_license,
            potential_savings,
            license_types,
            vendor_distribution,
            usage_categories,
            cost_categories,
        }
    }
}

fn desc_f64(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Top 3 by usage percentage, descending. Ties keep snapshot order
/// (stable sort, no secondary key).
pub fn top_by_usage(snapshot: &[SoftwareUsage]) -> Vec<SoftwareUsage> {
    let mut items = snapshot.to_vec();
    items.sort_by(|a, b| desc_f64(a.usage_percentage(), b.usage_percentage()));
    items.truncate(TOP_BY_USAGE_LIMIT);
    items
}

/// Top 5 by raw used-seat count, descending. A different key than
/// [`top_by_usage`]; the dashboard's "top movers" view.
pub fn top_by_used_seats(snapshot: &[SoftwareUsage]) -> Vec<SoftwareUsage> {
    let mut items = snapshot.to_vec();
    items.sort_by(|a, b| b.used_licenses.cmp(&a.used_licenses));
    items.truncate(TOP_BY_SEATS_LIMIT);
    items
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFilter {
    Active,
    Expiring,
    Expired,
    All,
}

impl InventoryFilter {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "expiring" => Self::Expiring,
            "expired" => Self::Expired,
            _ => Self::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expiring => "expiring",
            Self::Expired => "expired",
            Self::All => "all",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InventoryPage {
    pub items: Vec<SoftwareUsage>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// The "all" view: three independently sorted and truncated category
/// slices, not a merged list. Pagination does not apply here.
#[derive(Debug, Serialize)]
pub struct InventorySections {
    pub active: Vec<SoftwareUsage>,
    pub expiring: Vec<SoftwareUsage>,
    pub expired: Vec<SoftwareUsage>,
    pub total: usize,
}

#[derive(Debug)]
pub enum InventoryView {
    Page(InventoryPage),
    Sections(InventorySections),
}

fn active_items(snapshot: &[SoftwareUsage]) -> Vec<SoftwareUsage> {
    let mut items: Vec<SoftwareUsage> = snapshot
        .iter()
        .filter(|s| s.usage_percentage() > 70.0)
        .cloned()
        .collect();
    items.sort_by(|a, b| desc_f64(a.usage_percentage(), b.usage_percentage()));
    items
}

fn expiring_items(snapshot: &[SoftwareUsage], today: NaiveDate) -> Vec<SoftwareUsage> {
    let thirty_days = today + Duration::days(EXPIRY_WINDOW_DAYS);
    let mut items: Vec<SoftwareUsage> = snapshot
        .iter()
        .filter(|s| s.software.renewal_date <= thirty_days && s.software.renewal_date > today)
        .cloned()
        .collect();
    items.sort_by(|a, b| a.software.renewal_date.cmp(&b.software.renewal_date));
    items
}

fn expired_items(snapshot: &[SoftwareUsage], today: NaiveDate) -> Vec<SoftwareUsage> {
    let mut items: Vec<SoftwareUsage> = snapshot
        .iter()
        .filter(|s| s.software.renewal_date <= today)
        .cloned()
        .collect();
    items.sort_by(|a, b| b.software.renewal_date.cmp(&a.software.renewal_date));
    items
}

fn paginate(items: Vec<SoftwareUsage>, page: usize) -> InventoryPage {
    let page = page.max(1);
    let total = items.len();
    let per_page = INVENTORY_PAGE_SIZE;
    let start = (page - 1) * per_page;
    let end = start + per_page;

    let page_items = if start < total {
        items.into_iter().skip(start).take(per_page).collect()
    } else {
        Vec::new()
    };

    InventoryPage {
        items: page_items,
        total,
        page,
        per_page,
        pages: total.div_ceil(per_page).max(1),
        has_next: end < total,
        has_prev: page > 1,
    }
}

pub fn filter_inventory(
    snapshot: &[SoftwareUsage],
    filter: InventoryFilter,
    page: usize,
    today: NaiveDate,
) -> InventoryView {
    match filter {
        InventoryFilter::Active => InventoryView::Page(paginate(active_items(snapshot), page)),
        InventoryFilter::Expiring => {
            InventoryView::Page(paginate(expiring_items(snapshot, today), page))
        }
        InventoryFilter::Expired => {
            InventoryView::Page(paginate(expired_items(snapshot, today), page))
        }
        InventoryFilter::All => {
            let mut active = active_items(snapshot);
            active.truncate(INVENTORY_SECTION_SIZE);
            let mut expiring = expiring_items(snapshot, today);
            expiring.truncate(INVENTORY_SECTION_SIZE);
            let mut expired = expired_items(snapshot, today);
            expired.truncate(INVENTORY_SECTION_SIZE);

            InventoryView::Sections(InventorySections {
                active,
                expiring,
                expired,
                total: snapshot.len(),
            })
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ReportSummary {
    pub total_software: usize,
    pub total_cost: f64,
    pub total_licenses: i64,
    pub used_licenses: i64,
    pub avg_usage: f64,
}

pub fn report_summary(snapshot: &[SoftwareUsage]) -> ReportSummary {
    let avg_usage = if snapshot.is_empty() {
        0.0
    } else {
        snapshot.iter().map(|s| s.usage_percentage()).sum::<f64>() / snapshot.len() as f64
    };

    ReportSummary {
        total_software: snapshot.len(),
        total_cost: snapshot.iter().map(|s| s.total_cost()).sum(),
        total_licenses: snapshot.iter().map(|s| s.software.total_licenses).sum(),
        used_licenses: snapshot.iter().map(|s| s.used_licenses).sum(),
        avg_usage,
    }
}

/// Everything renewing within the window, expired items included. The
/// reports view uses no lower bound, unlike the dashboard counter.
pub fn expiring_within_window(snapshot: &[SoftwareUsage], today: NaiveDate) -> Vec<SoftwareUsage> {
    let thirty_days = today + Duration::days(EXPIRY_WINDOW_DAYS);
    snapshot
        .iter()
        .filter(|s| s.software.renewal_date <= thirty_days)
        .cloned()
        .collect()
}

pub fn underutilized(snapshot: &[SoftwareUsage]) -> Vec<SoftwareUsage> {
    snapshot
        .iter()
        .filter(|s| s.usage_percentage() < UNDERUTILIZED_THRESHOLD)
        .cloned()
        .collect()
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct UserStats {
    pub total_users: usize,
    pub admin_users: usize,
    pub active_users: usize,
    pub new_users: usize,
}

/// Account-level statistics for the user management view. "Active" means
/// a login within the last 24 hours; "new" means created this calendar
/// month.
pub fn user_stats(users: &[User], now: DateTime<Utc>) -> UserStats {
    let yesterday = now - Duration::days(1);
    let first_of_month = now
        .date_naive()
        .with_day(1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(now);

    UserStats {
        total_users: users.len(),
        admin_users: users.iter().filter(|u| u.is_admin()).count(),
        active_users: users
            .iter()
            .filter(|u| u.last_login.is_some_and(|t| t >= yesterday))
            .count(),
        new_users: users.iter().filter(|u| u.created_at >= first_of_month).count(),
    }
}
