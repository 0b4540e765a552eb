use serde::Serialize;

use reportboard_common::{Report, Status};

/// Header cards. Computed over the whole store, not the filtered subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCards {
    pub total: usize,
    pub pending: usize,
    /// In Progress + Under Review.
    pub in_progress: usize,
    /// Completed.
    pub resolved: usize,
}

pub fn summarize<'a>(records: impl IntoIterator<Item = &'a Report>) -> SummaryCards {
    records
        .into_iter()
        .fold(SummaryCards::default(), |mut cards, report| {
            cards.total += 1;
            match report.status_tag() {
                Some(Status::Pending) => cards.pending += 1,
                Some(Status::InProgress | Status::UnderReview) => cards.in_progress += 1,
                Some(Status::Completed) => cards.resolved += 1,
                Some(Status::Assigned) | None => {}
            }
            cards
        })
}
