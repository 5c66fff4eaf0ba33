//! Pure filter → sort → paginate transforms behind the board reducer.
//!
//! All three are total: empty inputs and empty results are valid. None of
//! them mutates its input.

use std::cmp::Ordering;

use crate::model::JobPosting;

use super::model::{SortDirection, SortField};

/// Keep postings whose department equals `department` exactly.
///
/// An empty `department` means "all departments" and keeps every posting in
/// its original order.
#[must_use]
pub fn filter_by_department<'a>(records: &'a [JobPosting], department: &str) -> Vec<&'a JobPosting> {
    records
        .iter()
        .filter(|p| department.is_empty() || p.functional_area == department)
        .collect()
}

/// Return a sorted copy of `records`.
///
/// The sort is stable, so postings with equal keys keep their input order.
/// Postings whose date does not parse sort after every dated posting in both
/// directions.
#[must_use]
pub fn sort_postings<'a>(
    records: &[&'a JobPosting],
    field: SortField,
    direction: SortDirection,
) -> Vec<&'a JobPosting> {
    let mut sorted = records.to_vec();
    match field {
        SortField::Name => {
            sorted.sort_by(|a, b| direction.apply(a.name.cmp(&b.name)));
        }
        SortField::OpenDate => {
            // Parse once per posting rather than once per comparison.
            let mut keyed: Vec<_> = sorted
                .into_iter()
                .map(|p| (p.open_date_value(), p))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| match (a, b) {
                (Some(a), Some(b)) => direction.apply(a.cmp(b)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
            sorted = keyed.into_iter().map(|(_, p)| p).collect();
        }
    }
    sorted
}

/// The first `min(reveal_count, records.len())` records.
#[must_use]
pub fn paginate<T>(records: &[T], reveal_count: usize) -> &[T] {
    &records[..reveal_count.min(records.len())]
}
