//! # rv-gateway-sqlite
//!
//! SQLite implementation of `Gateway`. Every table is stored as JSON documents
//! in a single `records` table; filters and ordering go through
//! `json_extract`, so the relational schema never has to track the model.

use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use rv_core::error::GatewayError;
use rv_core::query::{Direction, Filter, Query, Record, Table};
use rv_core::schema::{self, row_id};
use rv_core::traits::Gateway;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    seq  INTEGER PRIMARY KEY AUTOINCREMENT,
    tbl  TEXT NOT NULL,
    id   TEXT NOT NULL,
    body TEXT NOT NULL,
    UNIQUE (tbl, id)
);
CREATE INDEX IF NOT EXISTS records_tbl ON records (tbl);
"#;

pub struct SqliteGateway {
    pool: SqlitePool,
}

fn storage(err: sqlx::Error) -> GatewayError {
    GatewayError::Storage(err.to_string())
}

fn json_path(column: &str) -> String {
    format!("$.{column}")
}

/// Appends ` AND json_extract(body, ?) <op> ?` for each filter.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filters: &[Filter]) -> Result<(), GatewayError> {
    for filter in filters {
        qb.push(" AND json_extract(body, ");
        qb.push_bind(json_path(&filter.column));
        qb.push(")");
        match &filter.value {
            Value::Null => {
                qb.push(" IS NULL");
            }
            Value::Bool(b) => {
                qb.push(" = ");
                qb.push_bind(i64::from(*b));
            }
            Value::Number(n) => {
                qb.push(" = ");
                match n.as_i64() {
                    Some(i) => qb.push_bind(i),
                    None => qb.push_bind(n.as_f64().unwrap_or_default()),
                };
            }
            Value::String(s) => {
                qb.push(" = ");
                qb.push_bind(s.clone());
            }
            other => {
                return Err(GatewayError::Rejected {
                    status: 400,
                    message: format!("cannot filter {} on a composite value {other}", filter.column),
                })
            }
        }
    }
    Ok(())
}

fn decode(body: &str) -> Result<Record, GatewayError> {
    Ok(serde_json::from_str(body)?)
}

impl SqliteGateway {
    /// Opens (creating if needed) the database at `url` and applies the schema.
    pub async fn connect(url: &str) -> Result<Self, GatewayError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(storage)?
            .create_if_missing(true);
        // Every in-memory connection would otherwise be its own database.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(storage)?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await.map_err(storage)?;
        tracing::info!(url, "sqlite gateway ready");
        Ok(Self { pool })
    }

    async fn fetch_body(
        conn: &mut SqliteConnection,
        table: Table,
        id: &str,
    ) -> Result<Option<Record>, GatewayError> {
        let row = sqlx::query("SELECT body FROM records WHERE tbl = ? AND id = ?")
            .bind(table.name())
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(storage)?;
        row.map(|r| decode(&r.get::<String, _>("body"))).transpose()
    }

    async fn write_body(
        conn: &mut SqliteConnection,
        table: Table,
        id: &str,
        body: &Record,
    ) -> Result<(), GatewayError> {
        sqlx::query("UPDATE records SET body = ? WHERE tbl = ? AND id = ?")
            .bind(serde_json::to_string(body)?)
            .bind(table.name())
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn bump_counter(
        conn: &mut SqliteConnection,
        table: Table,
        row: &Record,
    ) -> Result<(), GatewayError> {
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
        let mut parent = Self::fetch_body(conn, effect.target, parent_id)
            .await?
            .ok_or_else(|| GatewayError::Rejected {
                status: 409,
                message: format!("{} has no row {parent_id}", effect.target),
            })?;
        let current = parent.get(effect.counter).and_then(Value::as_i64).unwrap_or(0);
        parent[effect.counter] = Value::from(current + 1);
        Self::write_body(conn, effect.target, parent_id, &parent).await
    }
}

#[async_trait]
impl Gateway for SqliteGateway {
    async fn insert(&self, table: Table, record: Record) -> Result<Record, GatewayError> {
        let Value::Object(mut row) = record else {
            return Err(GatewayError::Rejected {
                status: 400,
                message: format!("{table} rows must be JSON objects"),
            });
        };
        schema::apply_defaults(table, &mut row);
        let row = Value::Object(row);
        let id = row_id(&row).unwrap_or_default().to_string();

        let mut tx = self.pool.begin().await.map_err(storage)?;
        Self::bump_counter(&mut *tx, table, &row).await?;
        sqlx::query("INSERT INTO records (tbl, id, body) VALUES (?, ?, ?)")
            .bind(table.name())
            .bind(&id)
            .bind(serde_json::to_string(&row)?)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        tx.commit().await.map_err(storage)?;

        tracing::debug!(%table, %id, "sqlite insert");
        Ok(row)
    }

    async fn select(&self, query: &Query) -> Result<Vec<Record>, GatewayError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT body FROM records WHERE tbl = ");
        qb.push_bind(query.table.name());
        push_filters(&mut qb, &query.filters)?;
        qb.push(" ORDER BY ");
        if let Some(order) = &query.order {
            qb.push("json_extract(body, ");
            qb.push_bind(json_path(&order.column));
            qb.push(match order.direction {
                Direction::Ascending => ") ASC, ",
                Direction::Descending => ") DESC, ",
            });
        }
        qb.push("seq ASC");
        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit as i64);
        }

        let rows = qb.build().fetch_all(&self.pool).await.map_err(storage)?;
        rows.iter()
            .map(|r| decode(&r.get::<String, _>("body")).map(|rec| query.project(rec)))
            .collect()
    }

    async fn update(&self, table: Table, id: &str, patch: Record) -> Result<Record, GatewayError> {
        let Value::Object(patch) = patch else {
            return Err(GatewayError::Rejected {
                status: 400,
                message: "patch must be a JSON object".into(),
            });
        };
        let mut tx = self.pool.begin().await.map_err(storage)?;
        let mut row = Self::fetch_body(&mut *tx, table, id)
            .await?
            .ok_or_else(|| GatewayError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        if let Value::Object(fields) = &mut row {
            for (key, value) in patch.into_iter().filter(|(k, _)| k != "id") {
                fields.insert(key, value);
            }
        }
        Self::write_body(&mut *tx, table, id, &row).await?;
        tx.commit().await.map_err(storage)?;
        Ok(row)
    }

    async fn delete(&self, query: &Query) -> Result<u64, GatewayError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id FROM records WHERE tbl = ");
        qb.push_bind(query.table.name());
        push_filters(&mut qb, &query.filters)?;
        let ids: HashSet<String> = qb
            .build()
            .fetch_all(&mut *tx)
            .await
            .map_err(storage)?
            .iter()
            .map(|r| r.get::<String, _>("id"))
            .collect();

        for id in &ids {
            sqlx::query("DELETE FROM records WHERE tbl = ? AND id = ?")
                .bind(query.table.name())
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
            for cascade in query.table.cascades() {
                sqlx::query("DELETE FROM records WHERE tbl = ? AND json_extract(body, ?) = ?")
                    .bind(cascade.child.name())
                    .bind(json_path(cascade.foreign_key))
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .map_err(storage)?;
            }
        }
        tx.commit().await.map_err(storage)?;

        tracing::debug!(table = %query.table, count = ids.len(), "sqlite delete");
        Ok(ids.len() as u64)
    }
}
