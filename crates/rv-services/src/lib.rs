//! # rv-services
//!
//! One service per feature area. Each operation validates its input, issues
//! its gateway calls strictly in order, and logs a failed call once before
//! handing the error back.

use std::sync::Arc;
use std::time::Duration;

use rv_core::compose::Renderer;
use rv_core::error::{AppError, GatewayError};
use rv_core::traits::Gateway;

pub mod agents;
pub mod chat;
pub mod collections;
pub mod creation;
pub mod gallery;
pub mod profile;
pub mod seed;

pub use agents::{AgentService, NewAgentRequest};
pub use chat::ChatService;
pub use collections::CollectionService;
pub use creation::{CreationService, PoemDraft};
pub use gallery::GalleryService;
pub use profile::{ProfileOverview, ProfileService};

/// Row caps and timing shared by the services.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub gallery_limit: usize,
    pub profile_limit: usize,
    pub training_sample: usize,
    /// Pause between storing the user's message and storing the reply.
    pub reply_delay: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            gallery_limit: 20,
            profile_limit: 10,
            training_sample: 5,
            reply_delay: Duration::from_millis(800),
        }
    }
}

/// Every feature area, wired to one gateway.
#[derive(Clone)]
pub struct Services {
    pub creation: Arc<CreationService>,
    pub gallery: Arc<GalleryService>,
    pub collections: Arc<CollectionService>,
    pub profile: Arc<ProfileService>,
    pub chat: Arc<ChatService>,
    pub agents: Arc<AgentService>,
}

impl Services {
    pub fn new(gateway: Arc<dyn Gateway>, renderer: Renderer, settings: ServiceSettings) -> Self {
        Self {
            creation: Arc::new(CreationService::new(gateway.clone(), renderer.clone())),
            gallery: Arc::new(GalleryService::new(gateway.clone(), settings.gallery_limit)),
            collections: Arc::new(CollectionService::new(gateway.clone())),
            profile: Arc::new(ProfileService::new(gateway.clone(), settings.profile_limit)),
            chat: Arc::new(ChatService::new(
                gateway.clone(),
                renderer,
                settings.reply_delay,
                settings.training_sample,
            )),
            agents: Arc::new(AgentService::new(gateway)),
        }
    }
}

/// Logs a failed gateway call at the call site and converts the error.
pub(crate) trait Logged<T> {
    fn logged(self, action: &'static str) -> rv_core::Result<T>;
}

impl<T> Logged<T> for Result<T, GatewayError> {
    fn logged(self, action: &'static str) -> rv_core::Result<T> {
        self.map_err(|err| {
            tracing::error!(action, error = %err, "gateway call failed");
            AppError::from(err)
        })
    }
}

/// Empty or whitespace-only optional text becomes `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
