//! Poem creation: render a draft from the templates, then publish it.

use std::sync::Arc;

use rv_core::compose::Renderer;
use rv_core::error::{require_text, Result};
use rv_core::models::{Actor, GeneratedPoem, Mood, NewPoem, Poem, Style};
use rv_core::query::Table;
use rv_core::traits::{Gateway, GatewayExt};
use serde::Deserialize;

use crate::Logged;

/// A rendered (and possibly hand-edited) poem the caller wants to keep.
#[derive(Debug, Clone, Deserialize)]
pub struct PoemDraft {
    pub title: String,
    pub content: String,
    pub style: Style,
    pub mood: Option<Mood>,
    #[serde(default)]
    pub theme: Option<String>,
}

pub struct CreationService {
    gateway: Arc<dyn Gateway>,
    renderer: Renderer,
}

impl CreationService {
    pub fn new(gateway: Arc<dyn Gateway>, renderer: Renderer) -> Self {
        Self { gateway, renderer }
    }

    /// The theme is checked for blankness but rendered exactly as given.
    pub fn generate(&self, style: Style, mood: Mood, theme: &str) -> Result<GeneratedPoem> {
        require_text("theme", theme)?;
        Ok(self.renderer.compose_poem(style, mood, theme))
    }

    /// Same as [`generate`](Self::generate) but accepts raw labels; unknown
    /// labels render the fallback template.
    pub fn generate_from_labels(&self, style: &str, mood: &str, theme: &str) -> Result<GeneratedPoem> {
        require_text("theme", theme)?;
        Ok(self.renderer.compose_poem_from_labels(style, mood, theme))
    }

    /// Publishes the draft under the actor's name. Text is stored as
    /// received; whitespace in the content is significant.
    pub async fn save(&self, actor: &Actor, draft: PoemDraft) -> Result<Poem> {
        require_text("title", &draft.title)?;
        require_text("content", &draft.content)?;
        let poem = NewPoem {
            title: draft.title,
            content: draft.content,
            style: draft.style,
            theme: draft.theme.filter(|t| !t.trim().is_empty()),
            mood: draft.mood,
            author_id: Some(actor.user_id.clone()),
            is_public: true,
        };
        let saved: Poem = self
            .gateway
            .insert_as(Table::Poems, &poem)
            .await
            .logged("save poem")?;
        tracing::info!(poem_id = %saved.id, author = %actor.user_id, "poem saved");
        Ok(saved)
    }
}
