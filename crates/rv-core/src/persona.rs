//! # Personas
//!
//! A conversation partner is either a historical poet or a custom agent. The
//! variant decides the backing tables and the foreign-key column once, so call
//! sites never branch on table names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::models::{Actor, CustomAgent, Poet, UnknownLabel};
use crate::query::{Direction, Query, Record, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaKind {
    Ancient,
    Custom,
}

impl PersonaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaKind::Ancient => "ancient",
            PersonaKind::Custom => "custom",
        }
    }

    /// Table the persona itself is read from.
    pub fn directory_table(&self) -> Table {
        match self {
            PersonaKind::Ancient => Table::AncientPoets,
            PersonaKind::Custom => Table::CustomAgents,
        }
    }

    pub fn conversation_table(&self) -> Table {
        match self {
            PersonaKind::Ancient => Table::PoetConversations,
            PersonaKind::Custom => Table::AgentConversations,
        }
    }

    /// Foreign-key column in the conversation table.
    pub fn id_column(&self) -> &'static str {
        match self {
            PersonaKind::Ancient => "poet_id",
            PersonaKind::Custom => "agent_id",
        }
    }
}

impl fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonaKind {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ancient" => Ok(PersonaKind::Ancient),
            "custom" => Ok(PersonaKind::Custom),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// Unresolved reference to a persona, as received from a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonaRef {
    pub kind: PersonaKind,
    pub id: Uuid,
}

impl PersonaRef {
    pub fn new(kind: PersonaKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    /// Every message exchanged with this persona, oldest first.
    pub fn conversation_query(&self) -> Query {
        Query::table(self.kind.conversation_table())
            .eq(self.kind.id_column(), self.id.to_string())
            .order_by("created_at", Direction::Ascending)
    }

    /// The actor's messages with this persona; used for the reset.
    pub fn actor_messages(&self, actor: &Actor) -> Query {
        Query::table(self.kind.conversation_table())
            .eq(self.kind.id_column(), self.id.to_string())
            .eq("user_id", actor.user_id.as_str())
    }

    /// Insert payload for one conversation line.
    pub fn message_record(&self, actor: &Actor, message: &str, is_user_message: bool) -> Record {
        json!({
            self.kind.id_column(): self.id.to_string(),
            "user_id": actor.user_id,
            "message": message,
            "is_user_message": is_user_message,
        })
    }
}

impl fmt::Display for PersonaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// A resolved persona.
#[derive(Debug, Clone)]
pub enum Persona {
    Ancient(Poet),
    Custom(CustomAgent),
}

impl Persona {
    pub fn kind(&self) -> PersonaKind {
        match self {
            Persona::Ancient(_) => PersonaKind::Ancient,
            Persona::Custom(_) => PersonaKind::Custom,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Persona::Ancient(poet) => poet.id,
            Persona::Custom(agent) => agent.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Persona::Ancient(poet) => &poet.name,
            Persona::Custom(agent) => &agent.name,
        }
    }

    pub fn to_ref(&self) -> PersonaRef {
        PersonaRef::new(self.kind(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_has_its_own_table_and_key() {
        assert_eq!(PersonaKind::Ancient.conversation_table(), Table::PoetConversations);
        assert_eq!(PersonaKind::Custom.conversation_table(), Table::AgentConversations);
        assert_eq!(PersonaKind::Ancient.id_column(), "poet_id");
        assert_eq!(PersonaKind::Custom.id_column(), "agent_id");
    }

    #[test]
    fn message_record_carries_only_its_own_foreign_key() {
        let persona = PersonaRef::new(PersonaKind::Custom, Uuid::nil());
        let record = persona.message_record(&Actor::new("demo-user"), "你好", true);
        assert_eq!(record["agent_id"], Uuid::nil().to_string());
        assert!(record.get("poet_id").is_none());
        assert_eq!(record["is_user_message"], true);
    }

    #[test]
    fn parses_kind_labels() {
        assert_eq!("ancient".parse::<PersonaKind>().unwrap(), PersonaKind::Ancient);
        assert!("robot".parse::<PersonaKind>().is_err());
    }

    #[test]
    fn resolved_personas_expose_name_and_reference() {
        let agent = Persona::Custom(CustomAgent {
            id: Uuid::nil(),
            user_id: "demo-user".into(),
            name: "小诗".into(),
            description: None,
            personality: Some("温柔".into()),
            training_status: crate::models::TrainingStatus::Ready,
            created_at: chrono::Utc::now(),
        });
        assert_eq!(agent.name(), "小诗");
        assert_eq!(agent.to_ref(), PersonaRef::new(PersonaKind::Custom, Uuid::nil()));
    }
}
