//! # Store Rules
//!
//! Column defaults, counter effects and cascades that a hosted backend
//! enforces with defaults, triggers and foreign keys. Local gateway adapters
//! apply them through these helpers so every backend behaves the same.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::query::Table;

/// Counter bumped on a parent row when a child row is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterEffect {
    pub target: Table,
    /// Column of the inserted row holding the parent id.
    pub foreign_key: &'static str,
    pub counter: &'static str,
}

/// Child rows removed together with a deleted parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cascade {
    pub child: Table,
    pub foreign_key: &'static str,
}

impl Table {
    /// Column holding the row's creation time.
    pub fn timestamp_column(&self) -> &'static str {
        match self {
            Table::TrainingData => "upload_date",
            _ => "created_at",
        }
    }

    pub fn counter_effect(&self) -> Option<CounterEffect> {
        match self {
            Table::PoemLikes => Some(CounterEffect {
                target: Table::Poems,
                foreign_key: "poem_id",
                counter: "likes_count",
            }),
            Table::PoemViews => Some(CounterEffect {
                target: Table::Poems,
                foreign_key: "poem_id",
                counter: "views_count",
            }),
            _ => None,
        }
    }

    pub fn cascades(&self) -> &'static [Cascade] {
        match self {
            Table::CustomAgents => &[
                Cascade {
                    child: Table::TrainingData,
                    foreign_key: "agent_id",
                },
                Cascade {
                    child: Table::AgentConversations,
                    foreign_key: "agent_id",
                },
            ],
            _ => &[],
        }
    }

    fn column_defaults(&self) -> &'static [(&'static str, DefaultValue)] {
        match self {
            Table::Poems => &[
                ("is_public", DefaultValue::Bool(true)),
                ("likes_count", DefaultValue::Int(0)),
                ("views_count", DefaultValue::Int(0)),
            ],
            Table::Collections => &[("is_public", DefaultValue::Bool(false))],
            Table::CustomAgents => &[("training_status", DefaultValue::Text("ready"))],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DefaultValue {
    Bool(bool),
    Int(i64),
    Text(&'static str),
}

impl From<DefaultValue> for Value {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Bool(b) => Value::Bool(b),
            DefaultValue::Int(i) => Value::from(i),
            DefaultValue::Text(s) => Value::from(s),
        }
    }
}

/// Current time in the fixed-width format every adapter stores.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Fills the id, timestamp and column defaults missing from a new row.
pub fn apply_defaults(table: Table, row: &mut Map<String, Value>) {
    row.entry("id")
        .or_insert_with(|| Value::from(Uuid::now_v7().to_string()));
    row.entry(table.timestamp_column())
        .or_insert_with(|| Value::from(now_timestamp()));
    for (column, default) in table.column_defaults() {
        row.entry(*column).or_insert_with(|| Value::from(*default));
    }
}

/// Reads the primary key of a stored row.
pub fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}
