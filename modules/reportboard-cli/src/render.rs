//! Text and JSON rendering of a dashboard view.

use std::fmt::Write;

use chrono::NaiveDateTime;
use tracing::error;

use reportboard_common::{Report, Status};
use reportboard_pipeline::{DashboardView, DistributionEntry, ViewSink};

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Writes every published view to stdout.
pub struct StdoutSink {
    pub format: OutputFormat,
}

impl ViewSink for StdoutSink {
    fn render(&self, view: &DashboardView) {
        match self.format {
            OutputFormat::Text => print!("{}", render_text(view)),
            OutputFormat::Json => match serde_json::to_string_pretty(view) {
                Ok(json) => println!("{json}"),
                Err(e) => error!(error = %e, "Failed to serialize dashboard view"),
            },
        }
    }
}

// --- Date / time ---

/// `May 16, 2025`
pub fn format_date(report: &Report) -> String {
    report
        .parsed_timestamp()
        .map(|ts| ts.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "invalid date".to_string())
}

/// `10:23 AM`
pub fn format_time(report: &Report) -> String {
    report
        .parsed_timestamp()
        .map(|ts| ts.format("%I:%M %p").to_string())
        .unwrap_or_else(|| "invalid date".to_string())
}

fn format_instant(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

// --- Sections ---

fn bar(share: f64) -> String {
    "#".repeat((share * BAR_WIDTH as f64).round() as usize)
}

fn render_distribution<T: std::fmt::Display>(
    out: &mut String,
    title: &str,
    entries: &[DistributionEntry<T>],
) {
    let _ = writeln!(out, "{title}");
    if entries.is_empty() {
        let _ = writeln!(out, "  (no data)");
    }
    for entry in entries {
        let _ = writeln!(
            out,
            "  {:<18} {:>4}  {:>3.0}%  {}",
            entry.tag.to_string(),
            entry.count,
            entry.share * 100.0,
            bar(entry.share)
        );
    }
    let _ = writeln!(out);
}

fn render_table(out: &mut String, view: &DashboardView) {
    let _ = writeln!(
        out,
        "Recent Reports (showing {} of {} total reports)",
        view.shown, view.total
    );
    if view.reports.is_empty() {
        let _ = writeln!(out, "  No reports found. Try adjusting your search or filters.");
        return;
    }
    let _ = writeln!(
        out,
        "  {:<6} {:<16} {:<18} {:<14} {:<9} {}",
        "ID", "Category", "Location", "Date", "Time", "Status"
    );
    for report in &view.reports {
        let _ = writeln!(
            out,
            "  {:<6} {:<16} {:<18} {:<14} {:<9} {} [{}]",
            report.id,
            report.category,
            report.location,
            format_date(report),
            format_time(report),
            report.status,
            Status::badge_color_for(&report.status)
        );
    }
}

pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();
    let criteria = &view.criteria;

    let _ = writeln!(out, "Incident Reports Dashboard ({})", format_instant(view.evaluated_at));
    let _ = writeln!(
        out,
        "Filters: search={:?} category={} window={}",
        criteria.search_term, criteria.category, criteria.time_window
    );
    let _ = writeln!(out);

    let cards = &view.summary;
    let _ = writeln!(out, "  Total Reports   {:>5}", cards.total);
    let _ = writeln!(out, "  Pending Cases   {:>5}", cards.pending);
    let _ = writeln!(out, "  In Progress     {:>5}", cards.in_progress);
    let _ = writeln!(out, "  Resolved Cases  {:>5}", cards.resolved);
    let _ = writeln!(out);

    let agg = &view.aggregates;
    render_distribution(&mut out, "Incidents by Category", &agg.by_category);
    render_distribution(&mut out, "Case Status Distribution", &agg.by_status);
    render_distribution(&mut out, "Incidents by Location", &agg.by_location);
    render_table(&mut out, view);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use reportboard_pipeline::{CriteriaUpdate, Dashboard, FilterCriteria, FixedClock, RecordStore};
    use std::sync::Arc;

    fn reference_dashboard() -> Dashboard {
        let now = NaiveDate::from_ymd_opt(2025, 5, 16)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Dashboard::new(RecordStore::reference(), FilterCriteria::default())
            .with_clock(Arc::new(FixedClock(now)))
    }

    #[test]
    fn test_format_date_and_time() {
        let report = Report::new("001", "Rape", "Uptown", "2025-05-16T10:23:00", "Pending");
        assert_eq!(format_date(&report), "May 16, 2025");
        assert_eq!(format_time(&report), "10:23 AM");

        let evening = Report::new("002", "Rape", "Uptown", "2025-05-04T19:05:00", "Pending");
        assert_eq!(format_date(&evening), "May 4, 2025");
        assert_eq!(format_time(&evening), "07:05 PM");
    }

    #[test]
    fn test_format_malformed_timestamp() {
        let report = Report::new("x", "Rape", "Uptown", "someday", "Pending");
        assert_eq!(format_date(&report), "invalid date");
        assert_eq!(format_time(&report), "invalid date");
    }

    #[test]
    fn test_render_text_sections() {
        let text = render_text(&reference_dashboard().view());
        assert!(text.contains("Total Reports       8"));
        assert!(text.contains("Incidents by Category"));
        assert!(text.contains("Case Status Distribution"));
        assert!(text.contains("Incidents by Location"));
        assert!(text.contains("showing 8 of 8 total reports"));
        assert!(text.contains("[yellow]"));
    }

    #[test]
    fn test_render_text_empty_result() {
        let mut dashboard = reference_dashboard();
        let view = dashboard.update(CriteriaUpdate::new().search("nothing matches this"));
        let text = render_text(&view);
        assert!(text.contains("No reports found"));
        assert!(text.contains("(no data)"));
    }

    #[test]
    fn test_bar_scales_with_share() {
        assert_eq!(bar(0.0), "");
        assert_eq!(bar(1.0).len(), BAR_WIDTH);
        assert_eq!(bar(0.5).len(), BAR_WIDTH / 2);
    }
}
