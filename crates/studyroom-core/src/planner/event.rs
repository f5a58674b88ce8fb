use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{enum_field, opt_str_field, opt_value, str_field, time_field, Record};
use crate::error::SchemaError;
use crate::events::Topic;
use crate::remote::Row;
use crate::storage::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Exam,
    Assignment,
    Event,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Exam => "exam",
            EventKind::Assignment => "assignment",
            EventKind::Event => "event",
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exam" => Ok(EventKind::Exam),
            "assignment" => Ok(EventKind::Assignment),
            "event" => Ok(EventKind::Event),
            other => Err(format!("unknown event type '{other}'")),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an event entered the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    #[default]
    Manual,
    Import,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::Manual => "manual",
            EventSource::Import => "import",
        }
    }
}

impl FromStr for EventSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(EventSource::Manual),
            "import" => Ok(EventSource::Import),
            other => Err(format!("unknown event source '{other}'")),
        }
    }
}

/// A dated calendar entry: exam, assignment, or plain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub source: EventSource,
}

impl Event {
    /// New manually entered event with a fresh id.
    pub fn new(title: impl Into<String>, date: DateTime<Utc>, kind: EventKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            date,
            kind,
            subject: None,
            description: None,
            source: EventSource::Manual,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Calendar date of the event in local machine time.
    pub fn local_date(&self) -> NaiveDate {
        self.date.with_timezone(&Local).date_naive()
    }
}

impl Record for Event {
    const TABLE: &'static str = "events";
    const CACHE_KEY: &'static str = keys::EVENTS;
    const TOPIC: Topic = Topic::EventsUpdated;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.date
    }

    fn to_row(&self, user_id: &str) -> Row {
        let mut row = Row::new();
        row.insert("id".into(), Value::String(self.id.clone()));
        row.insert("user_id".into(), Value::String(user_id.to_string()));
        row.insert("title".into(), Value::String(self.title.clone()));
        row.insert("date".into(), Value::String(self.date.to_rfc3339()));
        row.insert("type".into(), Value::String(self.kind.as_str().into()));
        row.insert("subject".into(), opt_value(&self.subject));
        row.insert("description".into(), opt_value(&self.description));
        row.insert("source".into(), Value::String(self.source.as_str().into()));
        row
    }

    fn from_row(row: &Row) -> Result<Self, SchemaError> {
        const T: &str = "events";
        Ok(Self {
            id: str_field(row, T, "id")?,
            title: str_field(row, T, "title")?,
            date: time_field(row, T, "date")?,
            kind: enum_field(row, T, "type")?,
            subject: opt_str_field(row, T, "subject")?,
            description: opt_str_field(row, T, "description")?,
            source: match row.get("source") {
                None | Some(Value::Null) => EventSource::Manual,
                Some(_) => enum_field(row, T, "source")?,
            },
        })
    }
}
