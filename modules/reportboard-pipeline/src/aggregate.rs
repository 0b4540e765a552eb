//! Aggregator: category, status and location distributions.
//!
//! Category and status cover the whole taxonomy in declared order, zero
//! counts included. Location is a ranking: zero counts are dropped and the
//! rest sorted by count descending, ties kept in declared order.
//!
//! Labels outside a taxonomy are not counted in that distribution. They are
//! tallied in `Unrecognized` so every record stays accounted for.

use serde::Serialize;

use reportboard_common::{Category, Location, Report, Status};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionEntry<T> {
    #[serde(rename = "name")]
    pub tag: T,
    pub count: usize,
    /// Fraction of the distribution's counted total; 0.0 when nothing counted.
    pub share: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Unrecognized {
    pub category: usize,
    pub status: usize,
    pub location: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub by_category: Vec<DistributionEntry<Category>>,
    pub by_status: Vec<DistributionEntry<Status>>,
    pub by_location: Vec<DistributionEntry<Location>>,
    /// Records in the aggregated sequence.
    pub total: usize,
    pub unrecognized: Unrecognized,
}

impl Aggregates {
    pub fn category_count(&self, category: Category) -> usize {
        count_of(&self.by_category, category)
    }

    pub fn status_count(&self, status: Status) -> usize {
        count_of(&self.by_status, status)
    }

    /// Zero for locations absent from the ranking.
    pub fn location_count(&self, location: Location) -> usize {
        count_of(&self.by_location, location)
    }
}

fn count_of<T: PartialEq>(entries: &[DistributionEntry<T>], tag: T) -> usize {
    entries
        .iter()
        .find(|e| e.tag == tag)
        .map_or(0, |e| e.count)
}

/// Tally `tags` over `domain`, in domain order. Returns the counts and the
/// number of `None`s.
fn tally<T: Copy + PartialEq>(
    domain: &[T],
    tags: impl Iterator<Item = Option<T>>,
) -> (Vec<DistributionEntry<T>>, usize) {
    let mut counts = vec![0usize; domain.len()];
    let mut missing = 0;

    for tag in tags {
        match tag.and_then(|t| domain.iter().position(|d| *d == t)) {
            Some(idx) => counts[idx] += 1,
            None => missing += 1,
        }
    }

    let counted: usize = counts.iter().sum();
    let entries = domain
        .iter()
        .zip(counts)
        .map(|(&tag, count)| DistributionEntry {
            tag,
            count,
            share: if counted == 0 {
                0.0
            } else {
                count as f64 / counted as f64
            },
        })
        .collect();

    (entries, missing)
}

pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a Report>) -> Aggregates {
    let records: Vec<&Report> = records.into_iter().collect();

    let (by_category, unknown_category) =
        tally(&Category::ALL, records.iter().map(|r| r.category_tag()));
    let (by_status, unknown_status) = tally(&Status::ALL, records.iter().map(|r| r.status_tag()));
    let (mut by_location, unknown_location) =
        tally(&Location::ALL, records.iter().map(|r| r.location_tag()));

    by_location.retain(|e| e.count > 0);
    // Stable: equal counts stay in declared order.
    by_location.sort_by(|a, b| b.count.cmp(&a.count));

    Aggregates {
        by_category,
        by_status,
        by_location,
        total: records.len(),
        unrecognized: Unrecognized {
            category: unknown_category,
            status: unknown_status,
            location: unknown_location,
        },
    }
}
