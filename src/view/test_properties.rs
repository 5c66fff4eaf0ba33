//! Property-based tests for board reducer invariants.
//!
//! Uses `proptest` to verify that arbitrary sequences of board messages keep
//! the derived views consistent: displayed rows are always a prefix of the
//! filtered-then-sorted records, filters only admit matching departments, and
//! pagination resets happen exactly when they should.

use proptest::prelude::*;

use super::model::{
    BoardModel, BoardMsg, DEPARTMENT_OPTIONS, DEFAULT_PAGE_SIZE, SortDirection, SortField,
};
use super::pipeline::{filter_by_department, paginate, sort_postings};
use super::update::update;
use crate::core::errors::FetchFailure;
use crate::model::JobPosting;

// ──────────────────── strategies ────────────────────

fn arb_department() -> impl Strategy<Value = String> {
    (0..DEPARTMENT_OPTIONS.len()).prop_map(|i| DEPARTMENT_OPTIONS[i].value.to_owned())
}

fn arb_date() -> impl Strategy<Value = String> {
    prop_oneof![
        (2019i32..2026, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| format!("{y}-{m}-{d}")),
        (2019i32..2026, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| format!("{y}-{m:02}-{d:02}")),
        Just(String::new()),
        Just("not a date".to_owned()),
    ]
}

fn arb_posting() -> impl Strategy<Value = JobPosting> {
    ("[A-Z][a-z]{0,6}", arb_department(), arb_date(), 0u32..10).prop_map(
        |(name, dept, date, open)| {
            JobPosting::new(name, dept)
                .with_open_date(date)
                .with_open_positions(open)
        },
    )
}

fn arb_records() -> impl Strategy<Value = Vec<JobPosting>> {
    prop::collection::vec(arb_posting(), 0..40)
}

fn arb_sort() -> impl Strategy<Value = (SortField, SortDirection)> {
    (
        prop_oneof![Just(SortField::Name), Just(SortField::OpenDate)],
        prop_oneof![Just(SortDirection::Ascending), Just(SortDirection::Descending)],
    )
}

fn arb_msg() -> impl Strategy<Value = BoardMsg> {
    prop_oneof![
        arb_department().prop_map(BoardMsg::DepartmentChanged),
        arb_sort().prop_map(|(field, direction)| BoardMsg::SortChanged { field, direction }),
        Just(BoardMsg::ShowMore),
        Just(BoardMsg::ShowMore),
        arb_records().prop_map(BoardMsg::DataLoaded),
        Just(BoardMsg::DataLoadFailed(FetchFailure::new("prop", "down"))),
    ]
}

fn expected_view(model: &BoardModel) -> Vec<JobPosting> {
    let filtered = filter_by_department(model.all_records(), model.selected_department());
    sort_postings(&filtered, model.sort_field(), model.sort_direction())
        .into_iter()
        .cloned()
        .collect()
}

// ──────────────────── properties ────────────────────

proptest! {
    #[test]
    fn filter_admits_only_matching_departments(
        records in arb_records(),
        dept in arb_department(),
    ) {
        let filtered = filter_by_department(&records, &dept);
        if dept.is_empty() {
            prop_assert_eq!(filtered.len(), records.len());
        } else {
            prop_assert!(filtered.iter().all(|p| p.functional_area == dept));
            let expected = records.iter().filter(|p| p.functional_area == dept).count();
            prop_assert_eq!(filtered.len(), expected);
        }
    }

    #[test]
    fn sort_is_idempotent(records in arb_records(), (field, direction) in arb_sort()) {
        let refs: Vec<&JobPosting> = records.iter().collect();
        let once = sort_postings(&refs, field, direction);
        let twice = sort_postings(&once, field, direction);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn sort_is_a_permutation(records in arb_records(), (field, direction) in arb_sort()) {
        let refs: Vec<&JobPosting> = records.iter().collect();
        let sorted = sort_postings(&refs, field, direction);
        prop_assert_eq!(sorted.len(), refs.len());
        for p in &refs {
            let want = refs.iter().filter(|q| *q == p).count();
            let got = sorted.iter().filter(|q| *q == p).count();
            prop_assert_eq!(want, got);
        }
    }

    #[test]
    fn undated_postings_trail_dated_ones(records in arb_records(), (_, direction) in arb_sort()) {
        let refs: Vec<&JobPosting> = records.iter().collect();
        let sorted = sort_postings(&refs, SortField::OpenDate, direction);
        let first_undated = sorted.iter().position(|p| p.open_date_value().is_none());
        if let Some(idx) = first_undated {
            prop_assert!(sorted[idx..].iter().all(|p| p.open_date_value().is_none()));
        }
    }

    #[test]
    fn paginate_length_is_min(len in 0usize..50, n in 0usize..60) {
        let items: Vec<usize> = (0..len).collect();
        prop_assert_eq!(paginate(&items, n).len(), n.min(len));
    }

    #[test]
    fn displayed_is_always_prefix_of_filtered_view(
        msgs in prop::collection::vec(arb_msg(), 0..30),
    ) {
        let mut model = BoardModel::default();
        for msg in msgs {
            update(&mut model, msg);
            let expected = expected_view(&model);
            prop_assert_eq!(model.filtered_records(), expected.as_slice());
            let shown = model.reveal_count().min(expected.len());
            prop_assert_eq!(model.displayed_records(), &expected[..shown]);
            prop_assert_eq!(
                model.show_more_button_visible(),
                model.reveal_count() < model.filtered_records().len()
            );
        }
    }

    #[test]
    fn filter_and_sort_changes_reset_reveal_count(
        msgs in prop::collection::vec(arb_msg(), 0..30),
    ) {
        let mut model = BoardModel::default();
        for msg in msgs {
            let before = model.reveal_count();
            let resets = matches!(msg, BoardMsg::DepartmentChanged(_) | BoardMsg::SortChanged { .. });
            let grows = matches!(msg, BoardMsg::ShowMore);
            update(&mut model, msg);
            if resets {
                prop_assert_eq!(model.reveal_count(), DEFAULT_PAGE_SIZE);
            } else if grows {
                prop_assert_eq!(model.reveal_count(), before + DEFAULT_PAGE_SIZE);
            } else {
                prop_assert_eq!(model.reveal_count(), before);
            }
            prop_assert_eq!(model.reveal_count() % DEFAULT_PAGE_SIZE, 0);
        }
    }

    #[test]
    fn failed_loads_never_touch_records(
        records in arb_records(),
        failures in 1usize..5,
    ) {
        let mut model = BoardModel::default();
        model.on_data_loaded(records.clone());
        for _ in 0..failures {
            model.on_data_load_error(FetchFailure::new("prop", "down"));
        }
        prop_assert_eq!(model.all_records(), records.as_slice());
        prop_assert_eq!(model.load_failures(), failures as u64);
    }
}
