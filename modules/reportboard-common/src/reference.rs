//! The reference dataset shipped with the dashboard. Used when no records
//! snapshot is configured, and as the fixture for scenario tests.

use crate::types::Report;

const REFERENCE: &[(&str, &str, &str, &str, &str)] = &[
    ("001", "Physical Abuse", "Central District", "2025-05-16T10:23:00", "Pending"),
    ("002", "Verbal Abuse", "East Ward", "2025-05-16T08:45:00", "Assigned"),
    ("003", "Economic Abuse", "South Zone", "2025-05-15T16:30:00", "In Progress"),
    ("004", "Rape", "North Sector", "2025-05-15T14:12:00", "Under Review"),
    ("005", "Negligence", "West End", "2025-05-15T11:05:00", "Completed"),
    ("006", "Physical Abuse", "Downtown", "2025-05-14T19:45:00", "Pending"),
    ("007", "Verbal Abuse", "Riverside", "2025-05-14T15:20:00", "In Progress"),
    ("008", "Rape", "Uptown", "2025-05-14T09:30:00", "Completed"),
];

pub fn reference_reports() -> Vec<Report> {
    REFERENCE
        .iter()
        .map(|&(id, category, location, timestamp, status)| {
            Report::new(id, category, location, timestamp, status)
        })
        .collect()
}
