//! # rv-gateway-memory
//!
//! In-process implementation of `Gateway`. Rows live in a `DashMap` keyed by
//! table; defaults, counter effects and cascades follow `rv_core::schema`.

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;
use rv_core::error::GatewayError;
use rv_core::query::{Query, Record, Table};
use rv_core::schema::{self, row_id};
use rv_core::traits::Gateway;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: DashMap<Table, Vec<Record>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored in `table`.
    pub fn row_count(&self, table: Table) -> usize {
        self.tables.get(&table).map(|rows| rows.len()).unwrap_or(0)
    }

    /// Increments the counter on the parent row referenced by `row`.
    fn bump_counter(&self, table: Table, row: &Record) -> Result<(), GatewayError> {
        let Some(effect) = table.counter_effect() else {
            return Ok(());
        };
        let parent_id = row
            .get(effect.foreign_key)
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::Rejected {
                status: 400,
                message: format!("{table}.{} is required", effect.foreign_key),
            })?;

        let mut parents = self.tables.entry(effect.target).or_default();
        let parent = parents
            .iter_mut()
            .find(|p| row_id(p) == Some(parent_id))
            .ok_or_else(|| GatewayError::Rejected {
                status: 409,
                message: format!("{} has no row {parent_id}", effect.target),
            })?;
        let current = parent.get(effect.counter).and_then(Value::as_i64).unwrap_or(0);
        parent[effect.counter] = Value::from(current + 1);
        Ok(())
    }

    fn cascade(&self, table: Table, deleted: &HashSet<String>) {
        for cascade in table.cascades() {
            if let Some(mut children) = self.tables.get_mut(&cascade.child) {
                children.retain(|child| {
                    child
                        .get(cascade.foreign_key)
                        .and_then(Value::as_str)
                        .is_none_or(|fk| !deleted.contains(fk))
                });
            }
        }
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn insert(&self, table: Table, record: Record) -> Result<Record, GatewayError> {
        let Value::Object(mut row) = record else {
            return Err(GatewayError::Rejected {
                status: 400,
                message: format!("{table} rows must be JSON objects"),
            });
        };
        schema::apply_defaults(table, &mut row);
        let row = Value::Object(row);

        // Guard on the parent table is released before touching `table`.
        self.bump_counter(table, &row)?;
        self.tables.entry(table).or_default().push(row.clone());
        tracing::trace!(%table, "memory insert");
        Ok(row)
    }

    async fn select(&self, query: &Query) -> Result<Vec<Record>, GatewayError> {
        let mut rows: Vec<Record> = match self.tables.get(&query.table) {
            Some(rows) => rows.iter().filter(|r| query.matches(r)).cloned().collect(),
            None => Vec::new(),
        };
        rows.sort_by(|a, b| query.compare(a, b));
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows.into_iter().map(|r| query.project(r)).collect())
    }

    async fn update(&self, table: Table, id: &str, patch: Record) -> Result<Record, GatewayError> {
        let Value::Object(patch) = patch else {
            return Err(GatewayError::Rejected {
                status: 400,
                message: "patch must be a JSON object".into(),
            });
        };
        let mut rows = self.tables.entry(table).or_default();
        let row = rows
            .iter_mut()
            .find(|r| row_id(r) == Some(id))
            .ok_or_else(|| GatewayError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        if let Value::Object(fields) = &mut *row {
            for (key, value) in patch.into_iter().filter(|(k, _)| k != "id") {
                fields.insert(key, value);
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, query: &Query) -> Result<u64, GatewayError> {
        let mut deleted = HashSet::new();
        if let Some(mut rows) = self.tables.get_mut(&query.table) {
            rows.retain(|row| {
                if !query.matches(row) {
                    return true;
                }
                if let Some(id) = row_id(row) {
                    deleted.insert(id.to_string());
                }
                false
            });
        }
        self.cascade(query.table, &deleted);
        tracing::trace!(table = %query.table, count = deleted.len(), "memory delete");
        Ok(deleted.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_core::query::Direction;
    use serde_json::json;

    #[tokio::test]
    async fn insert_fills_defaults_and_select_orders() {
        let gw = MemoryGateway::new();
        let first = gw
            .insert(Table::Poems, json!({"title": "一", "created_at": "2024-01-01T00:00:00.000000Z"}))
            .await
            .unwrap();
        gw.insert(Table::Poems, json!({"title": "二", "created_at": "2024-02-01T00:00:00.000000Z"}))
            .await
            .unwrap();

        assert_eq!(first["likes_count"], 0);
        assert!(first["id"].is_string());

        let newest = gw
            .select(
                &Query::table(Table::Poems)
                    .order_by("created_at", Direction::Descending)
                    .limit(1),
            )
            .await
            .unwrap();
        assert_eq!(newest.len(), 1);
        assert_eq!(newest[0]["title"], "二");
    }

    #[tokio::test]
    async fn likes_bump_the_poem_counter() {
        let gw = MemoryGateway::new();
        let poem = gw.insert(Table::Poems, json!({"title": "t"})).await.unwrap();
        let poem_id = poem["id"].as_str().unwrap();

        gw.insert(Table::PoemLikes, json!({"poem_id": poem_id, "user_id": "a"}))
            .await
            .unwrap();
        gw.insert(Table::PoemViews, json!({"poem_id": poem_id, "user_id": "a"}))
            .await
            .unwrap();
        gw.insert(Table::PoemViews, json!({"poem_id": poem_id, "user_id": "b"}))
            .await
            .unwrap();

        let rows = gw.select(&Query::table(Table::Poems).eq("id", poem_id)).await.unwrap();
        assert_eq!(rows[0]["likes_count"], 1);
        assert_eq!(rows[0]["views_count"], 2);
    }

    #[tokio::test]
    async fn like_of_missing_poem_is_rejected() {
        let gw = MemoryGateway::new();
        let err = gw
            .insert(Table::PoemLikes, json!({"poem_id": "nope", "user_id": "a"}))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Rejected { status: 409, .. }));
        assert_eq!(gw.row_count(Table::PoemLikes), 0);
    }

    #[tokio::test]
    async fn deleting_an_agent_cascades() {
        let gw = MemoryGateway::new();
        let agent = gw.insert(Table::CustomAgents, json!({"name": "小诗"})).await.unwrap();
        let agent_id = agent["id"].as_str().unwrap().to_string();
        gw.insert(Table::TrainingData, json!({"agent_id": agent_id, "content": "x"}))
            .await
            .unwrap();
        gw.insert(Table::TrainingData, json!({"agent_id": "other", "content": "y"}))
            .await
            .unwrap();

        let removed = gw
            .delete(&Query::table(Table::CustomAgents).eq("id", agent_id.as_str()))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(gw.row_count(Table::TrainingData), 1);
        assert_eq!(agent["training_status"], "ready");
    }

    #[tokio::test]
    async fn update_merges_fields_but_keeps_id() {
        let gw = MemoryGateway::new();
        let agent = gw.insert(Table::CustomAgents, json!({"name": "a"})).await.unwrap();
        let id = agent["id"].as_str().unwrap();
        let updated = gw
            .update(Table::CustomAgents, id, json!({"training_status": "training", "id": "x"}))
            .await
            .unwrap();
        assert_eq!(updated["training_status"], "training");
        assert_eq!(updated["id"], id);

        let missing = gw.update(Table::CustomAgents, "nope", json!({})).await;
        assert!(matches!(missing, Err(GatewayError::NotFound { .. })));
    }
}
