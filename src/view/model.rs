//! Elm-style state model for the job postings board.
//!
//! All view state lives in [`BoardModel`]. User and data events arrive as
//! [`BoardMsg`] values; side-effects are represented as [`BoardCmd`] values
//! returned from [`super::update::update`].
//!
//! The model is deterministic and performs no I/O. Derived views
//! (`filtered`, `displayed`) are only ever written by
//! [`BoardModel::recompute`], which every mutating transition calls last.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::errors::FetchFailure;
use crate::model::JobPosting;

use super::pipeline::{filter_by_department, paginate, sort_postings};
use super::update::update;

/// Rows revealed initially and added by each "show more".
pub const DEFAULT_PAGE_SIZE: usize = 5;

// ──────────────────── sort keys ────────────────────

/// Column the board is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    /// Job title, lexicographic.
    #[default]
    Name,
    /// Posting date, calendar order.
    OpenDate,
}

impl SortField {
    /// Backend field name, as carried by table header sort events.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::OpenDate => "Open_Date__c",
        }
    }

    /// Human-readable label for status display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "title",
            Self::OpenDate => "posting date",
        }
    }

    /// Resolve a header field name (or a short alias) to a sort key.
    #[must_use]
    pub fn from_field_name(name: &str) -> Option<Self> {
        match name.trim() {
            "Name" | "name" | "title" => Some(Self::Name),
            "Open_Date__c" | "open_date" | "open-date" | "date" => Some(Self::OpenDate),
            _ => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smaller first.
    #[default]
    Ascending,
    /// Larger first.
    Descending,
}

impl SortDirection {
    /// Short wire form (`asc` / `desc`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Parse `asc`/`desc` (case-insensitive, long forms accepted).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    /// Orient an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

// ──────────────────── departments ────────────────────

/// One entry of the department picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DepartmentOption {
    pub label: &'static str,
    /// Filter value; empty means all departments.
    pub value: &'static str,
}

/// Department picker entries. Labels and values are kept exactly as the
/// backend picklist spells them, mismatches included.
pub const DEPARTMENT_OPTIONS: [DepartmentOption; 7] = [
    DepartmentOption {
        label: "All Departments",
        value: "",
    },
    DepartmentOption {
        label: "Information technology",
        value: "Information technology",
    },
    DepartmentOption {
        label: "Finance",
        value: "Finance",
    },
    DepartmentOption {
        label: "Human Resources",
        value: "Human Resources",
    },
    DepartmentOption {
        label: "Miscellaneous",
        value: "Miscellaneous",
    },
    DepartmentOption {
        label: "Retail Operation",
        value: "Retail Operations",
    },
    DepartmentOption {
        label: "Warehouseing",
        value: "Warehouseing",
    },
];

/// Whether `value` is one of the picker values.
#[must_use]
pub fn is_known_department(value: &str) -> bool {
    DEPARTMENT_OPTIONS.iter().any(|o| o.value == value)
}

// ──────────────────── defaults ────────────────────

/// Initial filter/sort/pagination state applied at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDefaults {
    pub department: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// Reveal step; clamped to at least 1.
    pub page_size: usize,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            department: String::new(),
            sort_field: SortField::Name,
            sort_direction: SortDirection::Ascending,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// ──────────────────── model ────────────────────

/// Complete view state of the postings board.
#[derive(Debug, Clone)]
pub struct BoardModel {
    pub(super) all_records: Vec<JobPosting>,
    pub(super) selected_department: String,
    pub(super) sort_field: SortField,
    pub(super) sort_direction: SortDirection,
    pub(super) reveal_count: usize,
    pub(super) page_size: usize,
    /// Filtered then sorted; derived.
    filtered: Vec<JobPosting>,
    /// Prefix of `filtered`; derived.
    displayed: Vec<JobPosting>,
    pub(super) last_error: Option<FetchFailure>,
    pub(super) loads: u64,
    pub(super) load_failures: u64,
}

impl Default for BoardModel {
    fn default() -> Self {
        Self::new(ViewDefaults::default())
    }
}

impl BoardModel {
    /// Create an empty board with the given initial view state.
    #[must_use]
    pub fn new(defaults: ViewDefaults) -> Self {
        let page_size = defaults.page_size.max(1);
        Self {
            all_records: Vec::new(),
            selected_department: defaults.department,
            sort_field: defaults.sort_field,
            sort_direction: defaults.sort_direction,
            reveal_count: page_size,
            page_size,
            filtered: Vec::new(),
            displayed: Vec::new(),
            last_error: None,
            loads: 0,
            load_failures: 0,
        }
    }

    /// Re-run filter → sort → paginate over `all_records`.
    pub fn recompute(&mut self) {
        let filtered = filter_by_department(&self.all_records, &self.selected_department);
        let sorted = sort_postings(&filtered, self.sort_field, self.sort_direction);
        self.filtered = sorted.into_iter().cloned().collect();
        self.displayed = paginate(&self.filtered, self.reveal_count).to_vec();
    }

    pub(super) fn reset_reveal(&mut self) {
        self.reveal_count = self.page_size;
    }

    // ── event entry points ──

    /// Select a department (empty for all); resets pagination.
    pub fn on_department_change(&mut self, department: impl Into<String>) -> BoardCmd {
        update(self, BoardMsg::DepartmentChanged(department.into()))
    }

    /// Change the sort key and direction; resets pagination.
    pub fn on_sort_change(&mut self, field: SortField, direction: SortDirection) -> BoardCmd {
        update(self, BoardMsg::SortChanged { field, direction })
    }

    /// Reveal one more page of rows.
    pub fn on_show_more(&mut self) -> BoardCmd {
        update(self, BoardMsg::ShowMore)
    }

    /// Replace the record set with a fresh fetch result.
    pub fn on_data_loaded(&mut self, records: Vec<JobPosting>) -> BoardCmd {
        update(self, BoardMsg::DataLoaded(records))
    }

    /// Record a failed fetch; the record set is left as it was.
    pub fn on_data_load_error(&mut self, error: FetchFailure) -> BoardCmd {
        update(self, BoardMsg::DataLoadFailed(error))
    }

    // ── rendering contract ──

    /// Rows to render, in order.
    #[must_use]
    pub fn displayed_records(&self) -> &[JobPosting] {
        &self.displayed
    }

    /// Every posting passing the department filter, sorted.
    #[must_use]
    pub fn filtered_records(&self) -> &[JobPosting] {
        &self.filtered
    }

    /// The raw record set from the last successful fetch.
    #[must_use]
    pub fn all_records(&self) -> &[JobPosting] {
        &self.all_records
    }

    /// Department picker entries.
    #[must_use]
    pub fn department_options(&self) -> &'static [DepartmentOption] {
        &DEPARTMENT_OPTIONS
    }

    /// True while filtered rows remain hidden.
    #[must_use]
    pub fn show_more_button_visible(&self) -> bool {
        self.reveal_count < self.filtered.len()
    }

    #[must_use]
    pub fn selected_department(&self) -> &str {
        &self.selected_department
    }

    #[must_use]
    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    #[must_use]
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    #[must_use]
    pub fn reveal_count(&self) -> usize {
        self.reveal_count
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Most recent fetch failure, cleared by the next successful load.
    #[must_use]
    pub fn last_error(&self) -> Option<&FetchFailure> {
        self.last_error.as_ref()
    }

    /// Successful loads since construction.
    #[must_use]
    pub fn loads(&self) -> u64 {
        self.loads
    }

    /// Failed loads since construction.
    #[must_use]
    pub fn load_failures(&self) -> u64 {
        self.load_failures
    }
}

// ──────────────────── messages ────────────────────

/// Events that drive the board state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardMsg {
    /// A department was picked (empty string = all).
    DepartmentChanged(String),
    /// A sortable header was clicked.
    SortChanged {
        field: SortField,
        direction: SortDirection,
    },
    /// The "show more" button was pressed.
    ShowMore,
    /// The data source delivered records.
    DataLoaded(Vec<JobPosting>),
    /// The data source reported an error.
    DataLoadFailed(FetchFailure),
}

// ──────────────────── commands ────────────────────

/// Side-effects returned by the update function for the runtime to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardCmd {
    /// No side-effect.
    None,
    /// Surface a fetch failure to the operator (log/display).
    ReportFetchFailure(FetchFailure),
}
