use std::sync::Arc;

use rv_core::error::Result;
use rv_core::models::{Actor, Poem, ProfileStats};
use rv_core::query::{Direction, Query, Table};
use rv_core::traits::{Gateway, GatewayExt};
use serde::Serialize;

use crate::Logged;

/// The actor's most recent poems and the totals computed over them.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOverview {
    pub poems: Vec<Poem>,
    pub stats: ProfileStats,
}

pub struct ProfileService {
    gateway: Arc<dyn Gateway>,
    limit: usize,
}

impl ProfileService {
    pub fn new(gateway: Arc<dyn Gateway>, limit: usize) -> Self {
        Self { gateway, limit }
    }

    /// Totals cover only the returned poems, not the actor's full history.
    pub async fn overview(&self, actor: &Actor) -> Result<ProfileOverview> {
        let query = Query::table(Table::Poems)
            .eq("author_id", actor.user_id.as_str())
            .order_by("created_at", Direction::Descending)
            .limit(self.limit);
        let poems: Vec<Poem> = self.gateway.select_as(&query).await.logged("load profile")?;
        let stats = ProfileStats {
            total_poems: poems.len(),
            total_likes: poems.iter().map(|p| p.likes_count).sum(),
            total_views: poems.iter().map(|p| p.views_count).sum(),
        };
        Ok(ProfileOverview { poems, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit;
    use serde_json::json;

    #[tokio::test]
    async fn sums_counters_over_recent_poems() {
        let gateway = testkit::memory();
        for (i, (likes, views)) in [(2, 10), (0, 3), (5, 1)].into_iter().enumerate() {
            gateway
                .insert(
                    Table::Poems,
                    json!({
                        "title": format!("p{i}"),
                        "content": "c",
                        "style": "modern",
                        "author_id": "alice",
                        "likes_count": likes,
                        "views_count": views,
                    }),
                )
                .await
                .unwrap();
        }
        gateway
            .insert(
                Table::Poems,
                json!({"title": "x", "content": "c", "style": "modern", "author_id": "bob", "likes_count": 99}),
            )
            .await
            .unwrap();

        let overview = ProfileService::new(gateway, 10)
            .overview(&Actor::new("alice"))
            .await
            .unwrap();
        assert_eq!(
            overview.stats,
            ProfileStats {
                total_poems: 3,
                total_likes: 7,
                total_views: 14,
            }
        );
    }

    #[tokio::test]
    async fn empty_profile_has_zero_totals() {
        let overview = ProfileService::new(testkit::memory(), 10)
            .overview(&Actor::new("nobody"))
            .await
            .unwrap();
        assert!(overview.poems.is_empty());
        assert_eq!(overview.stats, ProfileStats::default());
    }
}
