//! # Persona Chat
//!
//! Conversations with historical poets and custom agents. A send stores the
//! user's line, waits out the reply delay, renders a reply and stores it. The
//! two inserts are independent: if the second one fails the user's line stays
//! in the history without an answer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rv_core::compose::Renderer;
use rv_core::error::{require_text, AppError, Result};
use rv_core::models::{Actor, ConversationMessage, CustomAgent, Poet};
use rv_core::persona::{Persona, PersonaKind, PersonaRef};
use rv_core::query::{Direction, Query, Table};
use rv_core::traits::{Gateway, GatewayExt};
use serde_json::Value;

use crate::Logged;

pub struct ChatService {
    gateway: Arc<dyn Gateway>,
    renderer: Renderer,
    reply_delay: Duration,
    training_sample: usize,
    sending: AtomicBool,
}

/// Clears the sending flag when the send finishes, successfully or not.
struct SendingGuard<'a>(&'a AtomicBool);

impl<'a> SendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SendingGuard(flag))
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatService {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        renderer: Renderer,
        reply_delay: Duration,
        training_sample: usize,
    ) -> Self {
        Self {
            gateway,
            renderer,
            reply_delay,
            training_sample,
            sending: AtomicBool::new(false),
        }
    }

    /// The poet directory, ordered by name.
    pub async fn list_poets(&self) -> Result<Vec<Poet>> {
        let query = Query::table(Table::AncientPoets).order_by("name", Direction::Ascending);
        self.gateway.select_as(&query).await.logged("list poets")
    }

    pub async fn resolve(&self, persona: PersonaRef) -> Result<Persona> {
        let id = persona.id.to_string();
        let table = persona.kind.directory_table();
        let resolved = match persona.kind {
            PersonaKind::Ancient => self
                .gateway
                .find_by_id::<Poet>(table, &id)
                .await
                .logged("resolve poet")?
                .map(Persona::Ancient),
            PersonaKind::Custom => self
                .gateway
                .find_by_id::<CustomAgent>(table, &id)
                .await
                .logged("resolve agent")?
                .map(Persona::Custom),
        };
        resolved.ok_or_else(|| AppError::NotFound(persona.kind.to_string(), id))
    }

    /// Full history with the persona, oldest first.
    pub async fn conversation(&self, persona: PersonaRef) -> Result<Vec<ConversationMessage>> {
        self.gateway
            .select_as(&persona.conversation_query())
            .await
            .logged("load conversation")
    }

    /// Sends one message and returns the refreshed history.
    pub async fn send(
        &self,
        actor: &Actor,
        persona: PersonaRef,
        message: &str,
    ) -> Result<Vec<ConversationMessage>> {
        let message = require_text("message", message)?;
        let _guard = SendingGuard::acquire(&self.sending)
            .ok_or_else(|| AppError::Busy("a reply is still being written".into()))?;

        let resolved = self.resolve(persona).await?;
        let table = persona.kind.conversation_table();

        self.gateway
            .insert(table, persona.message_record(actor, message, true))
            .await
            .logged("store user message")?;

        tokio::time::sleep(self.reply_delay).await;

        if let Err(err) = self.reply(actor, &resolved, message).await {
            tracing::warn!(%persona, user = %actor.user_id, "user message stored without a reply");
            return Err(err);
        }
        self.conversation(persona).await
    }

    async fn reply(&self, actor: &Actor, persona: &Persona, message: &str) -> Result<()> {
        let text = match persona {
            Persona::Ancient(poet) => self.renderer.poet_reply(&poet.name, message),
            Persona::Custom(agent) => {
                let training = self.training_sample_for(agent).await?;
                self.renderer.agent_reply(message, &training)
            }
        };
        let name = persona.name();
        let persona = persona.to_ref();
        self.gateway
            .insert(
                persona.kind.conversation_table(),
                persona.message_record(actor, &text, false),
            )
            .await
            .logged("store reply")?;
        tracing::debug!(%persona, %name, user = %actor.user_id, "reply stored");
        Ok(())
    }

    /// Content of the agent's most recent uploads.
    async fn training_sample_for(&self, agent: &CustomAgent) -> Result<Vec<String>> {
        let query = Query::table(Table::TrainingData)
            .columns(&["content"])
            .eq("agent_id", agent.id.to_string())
            .order_by("upload_date", Direction::Descending)
            .limit(self.training_sample);
        let rows = self.gateway.select(&query).await.logged("load training data")?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row.get("content") {
                Some(Value::String(text)) => Some(text.clone()),
                _ => None,
            })
            .collect())
    }

    /// Deletes the actor's messages with the persona. Returns how many went.
    pub async fn clear(&self, actor: &Actor, persona: PersonaRef) -> Result<u64> {
        let removed = self
            .gateway
            .delete(&persona.actor_messages(actor))
            .await
            .logged("clear conversation")?;
        tracing::info!(%persona, removed, "conversation cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::ensure_poets_seeded;
    use crate::testkit;
    use rv_core::error::GatewayError;
    use rv_core::traits::MockGateway;
    use rv_gateway_memory::MemoryGateway;
    use serde_json::json;
    use uuid::Uuid;

    fn service(gateway: Arc<dyn Gateway>, delay_ms: u64) -> ChatService {
        ChatService::new(gateway, testkit::renderer(), Duration::from_millis(delay_ms), 5)
    }

    async fn poet_named(chat: &ChatService, name: &str) -> PersonaRef {
        let poet = chat
            .list_poets()
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.name == name)
            .unwrap();
        PersonaRef::new(PersonaKind::Ancient, poet.id)
    }

    async fn agent(gateway: &MemoryGateway, training: &[&str]) -> PersonaRef {
        let row = gateway
            .insert(Table::CustomAgents, json!({"user_id": "demo-user", "name": "小诗"}))
            .await
            .unwrap();
        let id: Uuid = row["id"].as_str().unwrap().parse().unwrap();
        for text in training {
            gateway
                .insert(
                    Table::TrainingData,
                    json!({"agent_id": id.to_string(), "file_name": "a.txt", "content": text}),
                )
                .await
                .unwrap();
        }
        PersonaRef::new(PersonaKind::Custom, id)
    }

    #[tokio::test]
    async fn poets_are_listed_by_name() {
        let gateway = testkit::memory();
        ensure_poets_seeded(gateway.as_ref()).await.unwrap();
        let names: Vec<String> = service(gateway, 0)
            .list_poets()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 6);
    }

    #[tokio::test]
    async fn poet_send_stores_both_lines_in_order() {
        let gateway = testkit::memory();
        ensure_poets_seeded(gateway.as_ref()).await.unwrap();
        let chat = service(gateway, 0);
        let li_bai = poet_named(&chat, "李白").await;

        let history = chat.send(&Actor::new("demo-user"), li_bai, " 明月 ").await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].is_user_message);
        assert_eq!(history[0].message, "明月");
        assert!(!history[1].is_user_message);
        assert!(history[1].message.starts_with("哈哈！明月？"));
    }

    #[tokio::test]
    async fn agent_reply_quotes_matching_training_lines() {
        let gateway = testkit::memory();
        let persona = agent(&gateway, &["春天的风很温柔\n冬天的雪很冷"]).await;
        let chat = service(gateway, 0);

        let history = chat
            .send(&Actor::new("demo-user"), persona, "春天，你喜欢吗")
            .await
            .unwrap();
        assert!(history[1].message.contains("春天的风很温柔"));
        assert!(!history[1].message.contains("冬天"));
    }

    #[tokio::test]
    async fn blank_message_never_reaches_the_gateway() {
        let mut gateway = MockGateway::new();
        gateway.expect_insert().never();
        gateway.expect_select().never();
        let chat = service(Arc::new(gateway), 0);

        let err = chat
            .send(&Actor::new("demo-user"), PersonaRef::new(PersonaKind::Ancient, Uuid::nil()), "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
    }

    #[tokio::test]
    async fn unknown_persona_is_not_found() {
        let chat = service(testkit::memory(), 0);
        let err = chat
            .send(&Actor::new("demo-user"), PersonaRef::new(PersonaKind::Custom, Uuid::nil()), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(kind, _) if kind == "custom"));
    }

    #[tokio::test]
    async fn second_send_while_pending_is_busy() {
        let gateway = testkit::memory();
        ensure_poets_seeded(gateway.as_ref()).await.unwrap();
        let chat = service(gateway, 300);
        let li_bai = poet_named(&chat, "李白").await;
        let actor = Actor::new("demo-user");

        let (first, second) = tokio::join!(chat.send(&actor, li_bai, "一"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            chat.send(&actor, li_bai, "二").await
        });
        assert_eq!(first.unwrap().len(), 2);
        assert!(matches!(second, Err(AppError::Busy(_))));

        // Flag is released once the first send completes.
        assert_eq!(chat.send(&actor, li_bai, "三").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn failed_reply_keeps_the_user_line_and_releases_the_flag() {
        let poet_id = Uuid::nil();
        let mut gateway = MockGateway::new();
        gateway.expect_select().returning(move |_| {
            Ok(vec![json!({
                "id": poet_id.to_string(),
                "name": "李白",
                "dynasty": "唐",
                "title": "诗仙",
                "bio": "",
                "style_description": "",
                "famous_works": [],
                "personality_traits": [],
            })])
        });
        let mut calls = 0;
        gateway.expect_insert().times(2).returning(move |_, record| {
            calls += 1;
            if calls == 1 {
                Ok(record)
            } else {
                Err(GatewayError::Transport("connection reset".into()))
            }
        });
        let chat = service(Arc::new(gateway), 0);
        let persona = PersonaRef::new(PersonaKind::Ancient, poet_id);

        let err = chat.send(&Actor::new("demo-user"), persona, "你好").await.unwrap_err();
        assert!(matches!(err, AppError::Gateway(GatewayError::Transport(_))));
        assert!(!chat.sending.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn clear_only_removes_the_actors_messages() {
        let gateway = testkit::memory();
        ensure_poets_seeded(gateway.as_ref()).await.unwrap();
        let chat = service(gateway.clone(), 0);
        let du_fu = poet_named(&chat, "杜甫").await;

        chat.send(&Actor::new("alice"), du_fu, "秋").await.unwrap();
        chat.send(&Actor::new("bob"), du_fu, "春").await.unwrap();

        assert_eq!(chat.clear(&Actor::new("alice"), du_fu).await.unwrap(), 2);
        let left = chat.conversation(du_fu).await.unwrap();
        assert_eq!(left.len(), 2);
        assert!(left.iter().all(|m| m.user_id == "bob"));
    }
}
