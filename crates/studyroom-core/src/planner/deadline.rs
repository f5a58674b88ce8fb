use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{enum_field, opt_str_field, opt_value, str_field, time_field, Record};
use crate::error::SchemaError;
use crate::events::Topic;
use crate::remote::Row;
use crate::storage::keys;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something due by a date. Kept apart from [`Event`](super::Event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub id: String,
    pub title: String,
    pub due_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl Deadline {
    pub fn new(title: impl Into<String>, due_date: DateTime<Utc>, priority: Priority) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            due_date,
            subject: None,
            priority,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now
    }
}

impl Record for Deadline {
    const TABLE: &'static str = "deadlines";
    const CACHE_KEY: &'static str = keys::DEADLINES;
    const TOPIC: Topic = Topic::DeadlinesUpdated;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.due_date
    }

    fn to_row(&self, user_id: &str) -> Row {
        let mut row = Row::new();
        row.insert("id".into(), Value::String(self.id.clone()));
        row.insert("user_id".into(), Value::String(user_id.to_string()));
        row.insert("title".into(), Value::String(self.title.clone()));
        row.insert("due_date".into(), Value::String(self.due_date.to_rfc3339()));
        row.insert("subject".into(), opt_value(&self.subject));
        row.insert("priority".into(), Value::String(self.priority.as_str().into()));
        row
    }

    fn from_row(row: &Row) -> Result<Self, SchemaError> {
        const T: &str = "deadlines";
        Ok(Self {
            id: str_field(row, T, "id")?,
            title: str_field(row, T, "title")?,
            due_date: time_field(row, T, "due_date")?,
            subject: opt_str_field(row, T, "subject")?,
            priority: enum_field(row, T, "priority")?,
        })
    }
}
