//! CSV report rendering for the inventory export.

use crate::domain::models::software::SoftwareUsage;
use crate::error::AppError;
use chrono::NaiveDate;
use csv::WriterBuilder;

pub const REPORT_FILENAME: &str = "SAMurAI_Report.csv";

const HEADERS: [&str; 9] = [
    "Software Name",
    "Vendor",
    "Total Licenses",
    "Used Licenses",
    "Usage %",
    "Cost Per License",
    "Total Cost",
    "Renewal Date",
    "Days Until Renewal",
];

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `$1,234.56` — dollar prefix, comma grouping, always two decimals.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    match fixed.split_once('.') {
        Some((int_part, frac)) => format!("${}.{}", group_thousands(int_part), frac),
        None => format!("${}.00", group_thousands(&fixed)),
    }
}

/// `80.0%` — always one decimal.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn render_report(snapshot: &[SoftwareUsage], today: NaiveDate) -> Result<Vec<u8>, AppError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(HEADERS)
        .map_err(|e| AppError::InternalWithMsg(format!("CSV write error: {}", e)))?;

    for item in snapshot {
        writer
            .write_record([
                item.software.name.clone(),
                item.software.vendor.clone(),
                item.software.total_licenses.to_string(),
                item.used_licenses.to_string(),
                format_percentage(item.usage_percentage()),
                format_currency(item.software.cost_per_license),
                format_currency(item.total_cost()),
                item.software.renewal_date.format("%Y-%m-%d").to_string(),
                item.days_until_renewal(today).to_string(),
            ])
            .map_err(|e| AppError::InternalWithMsg(format!("CSV write error: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::InternalWithMsg(format!("CSV into inner error: {}", e)))
}
