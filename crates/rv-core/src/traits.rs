//! # Core Traits (Ports)
//!
//! Gateway adapters and the renderer's injectable sources implement these.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::GatewayError;
use crate::query::{Query, Record, Table};

/// Table-scoped access to the data store. One call, one round trip.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Stores a row and returns it with store defaults applied.
    async fn insert(&self, table: Table, record: Record) -> Result<Record, GatewayError>;

    async fn select(&self, query: &Query) -> Result<Vec<Record>, GatewayError>;

    /// Merges `patch` into the row with primary key `id`.
    async fn update(&self, table: Table, id: &str, patch: Record) -> Result<Record, GatewayError>;

    /// Deletes every row matching the query's filters; returns the count.
    async fn delete(&self, query: &Query) -> Result<u64, GatewayError>;
}

/// Typed conveniences over any [`Gateway`].
#[async_trait]
pub trait GatewayExt: Gateway {
    async fn insert_as<T, R>(&self, table: Table, record: &T) -> Result<R, GatewayError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned + Send + 'static,
    {
        let row = self.insert(table, serde_json::to_value(record)?).await?;
        Ok(serde_json::from_value(row)?)
    }

    async fn select_as<R>(&self, query: &Query) -> Result<Vec<R>, GatewayError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        self.select(query)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(GatewayError::from))
            .collect()
    }

    async fn find_by_id<R>(&self, table: Table, id: &str) -> Result<Option<R>, GatewayError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let query = Query::table(table).eq("id", id).limit(1);
        Ok(self.select_as(&query).await?.into_iter().next())
    }

    async fn delete_by_id(&self, table: Table, id: &str) -> Result<u64, GatewayError> {
        self.delete(&Query::table(table).eq("id", id)).await
    }
}

impl<G: Gateway + ?Sized> GatewayExt for G {}

/// Source of the renderer's only non-determinism.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TemplatePicker: Send + Sync {
    /// Chooses an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Splits free text into candidate keywords.
pub trait Tokenizer: Send + Sync {
    fn keywords(&self, text: &str) -> Vec<String>;
}
