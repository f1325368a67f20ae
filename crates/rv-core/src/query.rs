//! # Gateway Queries
//!
//! The shape of a single gateway call: a table, equality filters, an optional
//! ordering and an optional row cap. No joins, no cursors.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row as exchanged with the store.
pub type Record = Value;

/// Remote tables known to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Poems,
    PoemLikes,
    PoemViews,
    Collections,
    AncientPoets,
    PoetConversations,
    AgentConversations,
    CustomAgents,
    TrainingData,
}

impl Table {
    pub const ALL: [Table; 9] = [
        Table::Poems,
        Table::PoemLikes,
        Table::PoemViews,
        Table::Collections,
        Table::AncientPoets,
        Table::PoetConversations,
        Table::AgentConversations,
        Table::CustomAgents,
        Table::TrainingData,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Poems => "poems",
            Table::PoemLikes => "poem_likes",
            Table::PoemViews => "poem_views",
            Table::Collections => "collections",
            Table::AncientPoets => "ancient_poets",
            Table::PoetConversations => "poet_conversations",
            Table::AgentConversations => "agent_conversations",
            Table::CustomAgents => "custom_agents",
            Table::TrainingData => "training_data",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// Builder for a select or delete.
///
/// ```
/// use rv_core::query::{Direction, Query, Table};
///
/// let q = Query::table(Table::Poems)
///     .eq("is_public", true)
///     .order_by("created_at", Direction::Descending)
///     .limit(20);
/// assert_eq!(q.limit, Some(20));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub table: Table,
    /// Column projection; `None` selects every column.
    pub columns: Option<Vec<String>>,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn table(table: Table) -> Self {
        Self {
            table,
            columns: None,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some(OrderBy {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when every filter matches the record's field exactly.
    pub fn matches(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|f| record.get(&f.column).unwrap_or(&Value::Null) == &f.value)
    }

    /// Orders two records by the query's ordering column, if any.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let Some(order) = &self.order else {
            return Ordering::Equal;
        };
        let ord = compare_values(
            a.get(&order.column).unwrap_or(&Value::Null),
            b.get(&order.column).unwrap_or(&Value::Null),
        );
        match order.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }

    /// Keeps only the projected columns of a record.
    pub fn project(&self, record: Record) -> Record {
        match (&self.columns, record) {
            (Some(columns), Value::Object(mut map)) => {
                map.retain(|key, _| columns.iter().any(|c| c == key));
                Value::Object(map)
            }
            (_, record) => record,
        }
    }
}

/// Total order over JSON scalars: nulls first, then booleans, numbers,
/// timestamps (compared as instants) and strings.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        _ => a.to_string().cmp(&b.to_string()),
    }
}
