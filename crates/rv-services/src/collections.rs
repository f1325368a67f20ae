use std::sync::Arc;

use rv_core::error::{require_text, AppError, Result};
use rv_core::models::{Actor, Collection, NewCollection};
use rv_core::query::{Direction, Query, Table};
use rv_core::traits::{Gateway, GatewayExt};
use uuid::Uuid;

use crate::{non_blank, Logged};

pub struct CollectionService {
    gateway: Arc<dyn Gateway>,
}

impl CollectionService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// The actor's collections, newest first.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<Collection>> {
        let query = Query::table(Table::Collections)
            .eq("user_id", actor.user_id.as_str())
            .order_by("created_at", Direction::Descending);
        self.gateway.select_as(&query).await.logged("list collections")
    }

    /// Creates a private collection.
    pub async fn create(
        &self,
        actor: &Actor,
        name: &str,
        description: Option<String>,
    ) -> Result<Collection> {
        let name = require_text("name", name)?;
        let collection = NewCollection {
            name: name.to_string(),
            description: non_blank(description),
            user_id: actor.user_id.clone(),
            is_public: false,
        };
        let created: Collection = self
            .gateway
            .insert_as(Table::Collections, &collection)
            .await
            .logged("create collection")?;
        tracing::info!(collection_id = %created.id, "collection created");
        Ok(created)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let removed = self
            .gateway
            .delete_by_id(Table::Collections, &id.to_string())
            .await
            .logged("delete collection")?;
        if removed == 0 {
            return Err(AppError::NotFound("collection".into(), id.to_string()));
        }
        Ok(())
    }
}
