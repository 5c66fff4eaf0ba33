//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use job_posting_board::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{FetchFailure, JpbError, Result};

// Data
pub use crate::model::JobPosting;
pub use crate::source::{JsonFileSource, PostingSource, StaticSource, fetch_msg, load_into};

// View
pub use crate::view::columns::{COLUMNS, ColumnKind, ColumnSpec};
pub use crate::view::{
    BoardCmd, BoardModel, BoardMsg, BoardSession, DEPARTMENT_OPTIONS, DepartmentOption,
    SortDirection, SortField, ViewDefaults, update,
};

// Logging
pub use crate::logger::jsonl::{JsonlConfig, JsonlWriter};
