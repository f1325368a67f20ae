//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Verse.
//! Rows are identified by UUID v7 so that ids sort in creation order.
//! `New*` structs are the insert payloads; the store fills `id`, timestamps
//! and counters the way a hosted backend applies column defaults.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Poetic form selected at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Classical,
    Modern,
    Haiku,
    Prose,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::Classical, Style::Modern, Style::Haiku, Style::Prose];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Classical => "classical",
            Style::Modern => "modern",
            Style::Haiku => "haiku",
            Style::Prose => "prose",
        }
    }
}

/// Emotional tone selected at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Peaceful,
    Joyful,
    Melancholic,
    Romantic,
    Contemplative,
    Passionate,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Peaceful,
        Mood::Joyful,
        Mood::Melancholic,
        Mood::Romantic,
        Mood::Contemplative,
        Mood::Passionate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Peaceful => "peaceful",
            Mood::Joyful => "joyful",
            Mood::Melancholic => "melancholic",
            Mood::Romantic => "romantic",
            Mood::Contemplative => "contemplative",
            Mood::Passionate => "passionate",
        }
    }
}

/// Returned when a label does not name a known enum variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown label '{0}'")]
pub struct UnknownLabel(pub String);

impl FromStr for Style {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl FromStr for Mood {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the template renderer, before it is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPoem {
    pub title: String,
    /// Lines separated by literal `\n`; whitespace is significant.
    pub content: String,
}

/// A saved poem. Only the counters change after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poem {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub style: Style,
    pub theme: Option<String>,
    pub mood: Option<Mood>,
    pub author_id: Option<String>,
    pub is_public: bool,
    pub likes_count: i64,
    pub views_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPoem {
    pub title: String,
    pub content: String,
    pub style: Style,
    pub theme: Option<String>,
    pub mood: Option<Mood>,
    pub author_id: Option<String>,
    pub is_public: bool,
}

/// A like or a view; inserting one bumps the matching counter on the poem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoemReaction {
    pub id: Uuid,
    pub poem_id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPoemReaction {
    pub poem_id: Uuid,
    pub user_id: String,
}

/// User-defined grouping of poems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCollection {
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub is_public: bool,
}

/// One line of a persona conversation. The persona foreign key lives in the
/// backing table (`poet_id` or `agent_id`) and is not carried here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub user_id: String,
    pub message: String,
    pub is_user_message: bool,
    pub created_at: DateTime<Utc>,
}

/// Historical poet. Read-only reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poet {
    pub id: Uuid,
    pub name: String,
    pub dynasty: String,
    pub title: String,
    pub bio: String,
    pub style_description: String,
    pub famous_works: Vec<String>,
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPoet {
    pub name: String,
    pub dynasty: String,
    pub title: String,
    pub bio: String,
    pub style_description: String,
    pub famous_works: Vec<String>,
    pub personality_traits: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingStatus {
    Ready,
    Training,
    Error,
}

/// User-created persona that answers from its training data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomAgent {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub personality: Option<String>,
    pub training_status: TrainingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCustomAgent {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub personality: Option<String>,
    pub training_status: TrainingStatus,
}

/// Listing view of a training file without its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingFileSummary {
    pub id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTrainingFile {
    pub agent_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub content: String,
}

/// Aggregates shown on the profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub total_poems: usize,
    pub total_likes: i64,
    pub total_views: i64,
}

/// The identity that attributes every write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
}

impl Actor {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into() }
    }
}
