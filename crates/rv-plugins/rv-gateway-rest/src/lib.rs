//! # rv-gateway-rest
//!
//! `Gateway` client for a hosted PostgREST-style backend (for example a
//! Supabase project). Each call is a single HTTP request:
//!
//! * select: `GET  /rest/v1/{table}?select=*&col=eq.v&order=col.asc&limit=n`
//! * insert: `POST /rest/v1/{table}` with `Prefer: return=representation`
//! * update: `PATCH /rest/v1/{table}?id=eq.{id}`
//! * delete: `DELETE /rest/v1/{table}?col=eq.v`

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use rv_core::error::GatewayError;
use rv_core::query::{Direction, Filter, Query, Record, Table};
use rv_core::traits::Gateway;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

pub struct RestGateway {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl RestGateway {
    pub fn new(base_url: impl Into<String>, api_key: Option<SecretString>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn request(&self, method: Method, table: Table) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.endpoint(table))
            .header("Prefer", "return=representation");
        if let Some(key) = &self.api_key {
            builder = builder
                .header("apikey", key.expose_secret())
                .bearer_auth(key.expose_secret());
        }
        builder
    }

    async fn rows(response: Response) -> Result<Vec<Record>, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %message, "gateway rejected request");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<Vec<Record>>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

/// Renders one equality filter in PostgREST operator syntax.
fn filter_param(filter: &Filter) -> (String, String) {
    let value = match &filter.value {
        Value::Null => "is.null".to_string(),
        Value::String(s) => format!("eq.{s}"),
        other => format!("eq.{other}"),
    };
    (filter.column.clone(), value)
}

/// Query-string pairs for a select.
pub fn select_params(query: &Query) -> Vec<(String, String)> {
    let columns = query
        .columns
        .as_ref()
        .map(|c| c.join(","))
        .unwrap_or_else(|| "*".to_string());
    let mut params = vec![("select".to_string(), columns)];
    params.extend(query.filters.iter().map(filter_param));
    if let Some(order) = &query.order {
        let dir = match order.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        params.push(("order".to_string(), format!("{}.{dir}", order.column)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

/// Query-string pairs for a delete; only filters apply.
pub fn delete_params(query: &Query) -> Vec<(String, String)> {
    query.filters.iter().map(filter_param).collect()
}

#[async_trait]
impl Gateway for RestGateway {
    async fn insert(&self, table: Table, record: Record) -> Result<Record, GatewayError> {
        let response = self
            .request(Method::POST, table)
            .json(&record)
            .send()
            .await
            .map_err(transport)?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Decode(format!("insert into {table} returned no row")))
    }

    async fn select(&self, query: &Query) -> Result<Vec<Record>, GatewayError> {
        let response = self
            .request(Method::GET, query.table)
            .query(&select_params(query))
            .send()
            .await
            .map_err(transport)?;
        Self::rows(response).await
    }

    async fn update(&self, table: Table, id: &str, patch: Record) -> Result<Record, GatewayError> {
        let response = self
            .request(Method::PATCH, table)
            .query(&[("id", format!("eq.{id}"))])
            .json(&patch)
            .send()
            .await
            .map_err(transport)?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })
    }

    async fn delete(&self, query: &Query) -> Result<u64, GatewayError> {
        let response = self
            .request(Method::DELETE, query.table)
            .query(&delete_params(query))
            .send()
            .await
            .map_err(transport)?;
        Ok(Self::rows(response).await?.len() as u64)
    }
}
