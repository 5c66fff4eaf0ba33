//! Typed adapter boundary for the postings data source.
//!
//! The board never talks to a backend directly. A [`PostingSource`] performs
//! one parameterless read and returns either the full record set or a
//! [`FetchFailure`]; [`load_into`] turns that result into the matching board
//! message.

#![allow(missing_docs)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::errors::FetchFailure;
use crate::model::JobPosting;
use crate::view::model::{BoardCmd, BoardModel, BoardMsg};
use crate::view::update::update;

/// Inbound data-source contract: one complete result per call.
pub trait PostingSource {
    /// Fetch every active posting.
    fn fetch_postings(&self) -> Result<Vec<JobPosting>, FetchFailure>;

    /// Short description used in logs and error messages.
    fn describe(&self) -> String;
}

/// Reads a JSON array of posting records from a file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PostingSource for JsonFileSource {
    fn fetch_postings(&self) -> Result<Vec<JobPosting>, FetchFailure> {
        let raw = fs::read_to_string(&self.path).map_err(|error| {
            let details = match error.kind() {
                ErrorKind::NotFound => "file not found".to_owned(),
                _ => error.to_string(),
            };
            FetchFailure::new(self.describe(), details)
        })?;
        serde_json::from_str(&raw)
            .map_err(|error| FetchFailure::new(self.describe(), format!("malformed JSON: {error}")))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory source; either always succeeds with a fixed record set or
/// always fails.
#[derive(Debug, Clone)]
pub struct StaticSource {
    result: Result<Vec<JobPosting>, String>,
}

impl StaticSource {
    #[must_use]
    pub fn new(records: Vec<JobPosting>) -> Self {
        Self {
            result: Ok(records),
        }
    }

    #[must_use]
    pub fn failing(details: impl Into<String>) -> Self {
        Self {
            result: Err(details.into()),
        }
    }
}

impl PostingSource for StaticSource {
    fn fetch_postings(&self) -> Result<Vec<JobPosting>, FetchFailure> {
        self.result
            .clone()
            .map_err(|details| FetchFailure::new(self.describe(), details))
    }

    fn describe(&self) -> String {
        "static".to_owned()
    }
}

/// Fetch once from `source` and wrap the outcome as a board message.
pub fn fetch_msg<S: PostingSource + ?Sized>(source: &S) -> BoardMsg {
    match source.fetch_postings() {
        Ok(records) => BoardMsg::DataLoaded(records),
        Err(failure) => BoardMsg::DataLoadFailed(failure),
    }
}

/// Fetch once from `source` and deliver the result to the board.
pub fn load_into<S: PostingSource + ?Sized>(source: &S, model: &mut BoardModel) -> BoardCmd {
    update(model, fetch_msg(source))
}
