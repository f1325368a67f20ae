//! Public gallery: browse published poems, like them, count views.

use std::sync::Arc;

use rv_core::error::{AppError, GatewayError, Result};
use rv_core::models::{Actor, NewPoemReaction, Poem, PoemReaction, Style};
use rv_core::query::{Direction, Query, Table};
use rv_core::traits::{Gateway, GatewayExt};
use uuid::Uuid;

use crate::Logged;

pub struct GalleryService {
    gateway: Arc<dyn Gateway>,
    limit: usize,
}

impl GalleryService {
    pub fn new(gateway: Arc<dyn Gateway>, limit: usize) -> Self {
        Self { gateway, limit }
    }

    /// Public poems, newest first, optionally narrowed to one style.
    pub async fn list(&self, style: Option<Style>) -> Result<Vec<Poem>> {
        let mut query = Query::table(Table::Poems).eq("is_public", true);
        if let Some(style) = style {
            query = query.eq("style", style.as_str());
        }
        let query = query
            .order_by("created_at", Direction::Descending)
            .limit(self.limit);
        self.gateway.select_as(&query).await.logged("list gallery")
    }

    pub async fn like(&self, actor: &Actor, poem_id: Uuid) -> Result<Poem> {
        self.react(Table::PoemLikes, actor, poem_id, "like poem").await
    }

    pub async fn view(&self, actor: &Actor, poem_id: Uuid) -> Result<Poem> {
        self.react(Table::PoemViews, actor, poem_id, "view poem").await
    }

    /// Records the reaction, then reloads the poem so the caller sees the
    /// counter the store just bumped. The store answers 409 when the poem
    /// row does not exist.
    async fn react(
        &self,
        table: Table,
        actor: &Actor,
        poem_id: Uuid,
        action: &'static str,
    ) -> Result<Poem> {
        let reaction = NewPoemReaction {
            poem_id,
            user_id: actor.user_id.clone(),
        };
        let recorded: PoemReaction = match self.gateway.insert_as(table, &reaction).await {
            Err(GatewayError::Rejected { status: 409, .. }) => {
                tracing::debug!(%poem_id, %table, "reaction to a missing poem");
                return Err(AppError::NotFound("poem".into(), poem_id.to_string()));
            }
            other => other.logged(action)?,
        };
        tracing::debug!(%poem_id, %table, reaction_id = %recorded.id, user = %recorded.user_id, "reaction recorded");

        self.gateway
            .find_by_id::<Poem>(Table::Poems, &poem_id.to_string())
            .await
            .logged("reload poem")?
            .ok_or_else(|| AppError::NotFound("poem".into(), poem_id.to_string()))
    }
}
