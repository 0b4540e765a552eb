//! Filter engine.
//!
//! Three predicates applied conjunctively: search, category, time window.
//! The result keeps the relative order of the input. "now" is an explicit
//! argument, so the same inputs at a different instant may give a
//! different result for the time-bounded windows.

use chrono::NaiveDateTime;

use reportboard_common::Report;

use crate::criteria::{CategoryFilter, FilterCriteria};

/// Criteria with the per-call work (lower-casing, cutoff) done once.
struct Predicate {
    needle: Option<String>,
    category: CategoryFilter,
    cutoff: Option<NaiveDateTime>,
}

impl Predicate {
    fn new(criteria: &FilterCriteria, now: NaiveDateTime) -> Self {
        Self {
            needle: (!criteria.search_term.is_empty())
                .then(|| criteria.search_term.to_lowercase()),
            category: criteria.category,
            cutoff: criteria.time_window.cutoff(now),
        }
    }

    fn matches(&self, report: &Report) -> bool {
        self.matches_search(report) && self.category.matches(report) && self.matches_window(report)
    }

    fn matches_search(&self, report: &Report) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        [&report.category, &report.location, &report.id]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle.as_str()))
    }

    // A timestamp that doesn't parse fails every bounded window.
    fn matches_window(&self, report: &Report) -> bool {
        match self.cutoff {
            None => true,
            Some(cutoff) => report
                .parsed_timestamp()
                .is_some_and(|ts| ts >= cutoff),
        }
    }
}

/// Return the records that pass every active predicate, in input order.
pub fn filter_reports<'a>(
    records: &'a [Report],
    criteria: &FilterCriteria,
    now: NaiveDateTime,
) -> Vec<&'a Report> {
    let predicate = Predicate::new(criteria, now);
    records.iter().filter(|r| predicate.matches(r)).collect()
}
