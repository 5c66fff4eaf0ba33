#![forbid(unsafe_code)]

//! Job Posting Board (jpb): a filterable, sortable, incrementally revealed
//! view over a list of open job postings.
//!
//! The board is a pure reducer:
//! 1. **Model** ([`view::BoardModel`]) holds every fetched record plus the
//!    current department filter, sort key, and reveal count
//! 2. **Messages** ([`view::BoardMsg`]) describe user and data events
//! 3. **[`view::update`]** applies a message and recomputes the displayed list
//!
//! Data arrives through a [`source::PostingSource`]; a
//! [`view::BoardSession`] ties a source, a model, and the activity log
//! together.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use job_posting_board::prelude::*;
//!
//! let source = JsonFileSource::new("postings.json");
//! let mut session = BoardSession::new(source, ViewDefaults::default(), JsonlWriter::disabled());
//! session.load();
//! session.change_department("Finance");
//! for posting in session.model().displayed_records() {
//!     println!("{}", posting.name);
//! }
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod model;
pub mod source;
pub mod view;
