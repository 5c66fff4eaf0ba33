//! Static table-column declarations for the postings table.
//!
//! This is rendering configuration, not reducer state: the reducer never reads
//! it. Renderers use it for headers, cell typing, and to decide which header
//! clicks may turn into sort events.

#![allow(missing_docs)]

use serde::Serialize;

use crate::model::JobPosting;

use super::model::SortField;

/// How a column's cells are typed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    /// Text rendered as a link to the record (opens in a new tab).
    Url,
}

/// One table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub field_name: &'static str,
    pub kind: ColumnKind,
    pub sortable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_width: Option<u16>,
}

impl ColumnSpec {
    /// The sort key this column maps to, when it is sortable.
    #[must_use]
    pub fn sort_field(&self) -> Option<SortField> {
        if self.sortable {
            SortField::from_field_name(self.field_name)
        } else {
            None
        }
    }

    /// Cell text for a posting.
    #[must_use]
    pub fn cell(&self, posting: &JobPosting) -> String {
        match self.field_name {
            "Name" => posting.name.clone(),
            "Location__c" => posting.location.clone(),
            "Functional_Area__c" => posting.functional_area.clone(),
            "Number_of_Open_Position__c" => posting.open_positions.to_string(),
            "Open_Date__c" => posting
                .open_date_value()
                .map_or_else(|| posting.open_date.clone(), |d| d.to_string()),
            _ => String::new(),
        }
    }
}

/// Columns of the postings table, in display order.
pub const COLUMNS: [ColumnSpec; 5] = [
    ColumnSpec {
        label: "Job Title",
        field_name: "Name",
        kind: ColumnKind::Url,
        sortable: true,
        initial_width: Some(200),
    },
    ColumnSpec {
        label: "Location",
        field_name: "Location__c",
        kind: ColumnKind::Text,
        sortable: false,
        initial_width: None,
    },
    ColumnSpec {
        label: "Department",
        field_name: "Functional_Area__c",
        kind: ColumnKind::Text,
        sortable: false,
        initial_width: None,
    },
    ColumnSpec {
        label: "Open Positions",
        field_name: "Number_of_Open_Position__c",
        kind: ColumnKind::Number,
        sortable: false,
        initial_width: None,
    },
    ColumnSpec {
        label: "Posting Date",
        field_name: "Open_Date__c",
        kind: ColumnKind::Date,
        sortable: true,
        initial_width: None,
    },
];

/// Look up a column by its field name.
#[must_use]
pub fn column(field_name: &str) -> Option<&'static ColumnSpec> {
    COLUMNS.iter().find(|c| c.field_name == field_name)
}
