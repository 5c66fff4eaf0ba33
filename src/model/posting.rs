//! Job posting records as delivered by the backend.
//!
//! Field names on the wire follow the backend object shape (`Location__c`,
//! `Functional_Area__c`, ...). Records are read-only to this crate: the view
//! layer derives filtered/sorted/sliced copies and never mutates a posting.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// A single job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    /// Backend record id. Carried through for rendering, never used for logic.
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Job title.
    #[serde(rename = "Name", default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(rename = "Location__c", default, deserialize_with = "nullable_string")]
    pub location: String,
    /// Department category; the filter key.
    #[serde(
        rename = "Functional_Area__c",
        default,
        deserialize_with = "nullable_string"
    )]
    pub functional_area: String,
    #[serde(
        rename = "Number_of_Open_Position__c",
        default,
        deserialize_with = "lenient_count"
    )]
    pub open_positions: u32,
    /// Raw posting date as sent by the backend. Parsed on demand by
    /// [`JobPosting::open_date_value`].
    #[serde(rename = "Open_Date__c", default, deserialize_with = "nullable_string")]
    pub open_date: String,
}

impl JobPosting {
    /// Create a posting with a title and department; other fields empty.
    #[must_use]
    pub fn new(name: impl Into<String>, functional_area: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            location: String::new(),
            functional_area: functional_area.into(),
            open_positions: 0,
            open_date: String::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn with_open_positions(mut self, count: u32) -> Self {
        self.open_positions = count;
        self
    }

    #[must_use]
    pub fn with_open_date(mut self, date: impl Into<String>) -> Self {
        self.open_date = date.into();
        self
    }

    /// The posting date as a calendar date, or `None` when unparseable.
    #[must_use]
    pub fn open_date_value(&self) -> Option<NaiveDate> {
        parse_open_date(&self.open_date)
    }
}

/// Parse a posting date.
///
/// Accepts `YYYY-M-D` with or without zero padding, RFC 3339 date-times, and
/// offset-less `YYYY-MM-DDTHH:MM:SS[.fff]`. Date-times contribute only their
/// date part.
#[must_use]
pub fn parse_open_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backend number fields arrive as doubles (`3.0`) or are null; both are
/// folded into a plain count.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(n) if n.is_finite() && n > 0.0 => n.min(f64::from(u32::MAX)) as u32,
        _ => 0,
    })
}
