//! Runtime glue between the board reducer, its data source, and the
//! activity log.
//!
//! A [`BoardSession`] owns one [`BoardModel`]. Every event goes through
//! [`BoardSession::dispatch`], which runs the pure update, records the event
//! in the JSONL log, and executes the returned [`BoardCmd`].

#![allow(missing_docs)]

use crate::core::errors::FetchFailure;
use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};
use crate::source::{PostingSource, fetch_msg};

use super::model::{BoardCmd, BoardModel, BoardMsg, SortDirection, SortField, ViewDefaults};
use super::update::update;

/// A live board bound to a data source.
pub struct BoardSession<S: PostingSource> {
    model: BoardModel,
    source: S,
    log: JsonlWriter,
}

impl<S: PostingSource> BoardSession<S> {
    /// Create a session with the given initial view; nothing is fetched yet.
    pub fn new(source: S, defaults: ViewDefaults, log: JsonlWriter) -> Self {
        let mut session = Self {
            model: BoardModel::new(defaults),
            source,
            log,
        };
        let mut entry = session.view_entry(EventType::SessionStart, Severity::Info);
        entry.details = Some(session.source.describe());
        session.log.write_entry(&entry);
        session
    }

    /// Fetch from the source and deliver the result.
    ///
    /// Returns the failure when the fetch failed; the board keeps its
    /// previous records in that case.
    pub fn load(&mut self) -> Option<FetchFailure> {
        let msg = fetch_msg(&self.source);
        self.dispatch(msg)
    }

    pub fn change_department(&mut self, department: impl Into<String>) {
        self.dispatch(BoardMsg::DepartmentChanged(department.into()));
    }

    pub fn change_sort(&mut self, field: SortField, direction: SortDirection) {
        self.dispatch(BoardMsg::SortChanged { field, direction });
    }

    pub fn show_more(&mut self) {
        self.dispatch(BoardMsg::ShowMore);
    }

    /// Apply one message, log it, and run the resulting command.
    pub fn dispatch(&mut self, msg: BoardMsg) -> Option<FetchFailure> {
        let event = match &msg {
            BoardMsg::DepartmentChanged(_) => EventType::DepartmentChange,
            BoardMsg::SortChanged { .. } => EventType::SortChange,
            BoardMsg::ShowMore => EventType::ShowMore,
            BoardMsg::DataLoaded(_) => EventType::DataLoaded,
            BoardMsg::DataLoadFailed(_) => EventType::FetchFailure,
        };
        let cmd = update(&mut self.model, msg);
        match cmd {
            BoardCmd::None => {
                let mut entry = self.view_entry(event, Severity::Info);
                if event == EventType::DataLoaded {
                    entry.record_count = Some(self.model.all_records().len());
                }
                self.log.write_entry(&entry);
                None
            }
            BoardCmd::ReportFetchFailure(failure) => {
                let mut entry = self.view_entry(EventType::FetchFailure, Severity::Warning);
                entry.error_code = Some("JPB-2001".to_owned());
                entry.error_message = Some(failure.to_string());
                entry.record_count = Some(self.model.all_records().len());
                self.log.write_entry(&entry);
                Some(failure)
            }
        }
    }

    #[must_use]
    pub fn model(&self) -> &BoardModel {
        &self.model
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Flush the activity log.
    pub fn flush(&mut self) {
        self.log.flush();
    }

    fn view_entry(&self, event: EventType, severity: Severity) -> LogEntry {
        let mut entry = LogEntry::new(event, severity);
        entry.department = Some(self.model.selected_department().to_owned());
        entry.sort_field = Some(self.model.sort_field().field_name().to_owned());
        entry.sort_direction = Some(self.model.sort_direction().as_str().to_owned());
        entry.reveal_count = Some(self.model.reveal_count());
        entry
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::logger::jsonl::JsonlConfig;
    use crate::model::JobPosting;
    use crate::source::StaticSource;

    fn read_events(path: &Path) -> Vec<serde_json::Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn finance(count: usize) -> Vec<JobPosting> {
        (0..count)
            .map(|i| JobPosting::new(format!("Analyst {i:02}"), "Finance"))
            .collect()
    }

    #[test]
    fn load_then_interact_logs_each_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut session = BoardSession::new(
            StaticSource::new(finance(12)),
            ViewDefaults::default(),
            JsonlWriter::open(JsonlConfig::new(&path)),
        );
        assert!(session.load().is_none());
        session.show_more();
        session.change_department("Finance");
        session.change_sort(SortField::OpenDate, SortDirection::Descending);
        session.flush();

        assert_eq!(session.model().displayed_records().len(), 5);
        let events = read_events(&path);
        let kinds: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
        assert_eq!(
            kinds,
            vec![
                "session_start",
                "data_loaded",
                "show_more",
                "department_change",
                "sort_change"
            ]
        );
        assert_eq!(events[0]["details"], "static");
        assert_eq!(events[1]["record_count"], 12);
        assert_eq!(events[2]["reveal_count"], 10);
        assert_eq!(events[3]["department"], "Finance");
        assert_eq!(events[4]["sort_field"], "Open_Date__c");
        assert_eq!(events[4]["sort_direction"], "desc");
    }

    #[test]
    fn failed_load_is_reported_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut session = BoardSession::new(
            StaticSource::failing("connection refused"),
            ViewDefaults::default(),
            JsonlWriter::open(JsonlConfig::new(&path)),
        );
        let failure = session.load().expect("load should fail");
        assert_eq!(failure.details, "connection refused");
        assert!(session.model().displayed_records().is_empty());
        session.flush();

        let events = read_events(&path);
        let last = events.last().unwrap();
        assert_eq!(last["event"], "fetch_failure");
        assert_eq!(last["severity"], "warning");
        assert_eq!(last["error_code"], "JPB-2001");
        assert_eq!(last["record_count"], 0);
    }

    #[test]
    fn disabled_log_still_drives_the_board() {
        let mut session = BoardSession::new(
            StaticSource::new(finance(7)),
            ViewDefaults::default(),
            JsonlWriter::disabled(),
        );
        session.load();
        assert!(session.model().show_more_button_visible());
        session.show_more();
        assert!(!session.model().show_more_button_visible());
        assert_eq!(session.source().describe(), "static");
    }
}
