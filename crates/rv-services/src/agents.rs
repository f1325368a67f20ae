//! Custom agents and their training files.

use std::sync::Arc;

use rv_core::error::{require_text, AppError, Result};
use rv_core::models::{Actor, CustomAgent, NewCustomAgent, TrainingFileSummary, TrainingStatus};
use rv_core::query::{Direction, Query, Table};
use rv_core::traits::{Gateway, GatewayExt};
use rv_core::upload::UploadedFile;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{non_blank, Logged};

const SUMMARY_COLUMNS: &[&str] = &["id", "file_name", "file_type", "file_size", "upload_date"];

#[derive(Debug, Clone, Deserialize)]
pub struct NewAgentRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
}

pub struct AgentService {
    gateway: Arc<dyn Gateway>,
}

impl AgentService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// All agents, newest first.
    pub async fn list(&self) -> Result<Vec<CustomAgent>> {
        let query = Query::table(Table::CustomAgents).order_by("created_at", Direction::Descending);
        self.gateway.select_as(&query).await.logged("list agents")
    }

    pub async fn create(&self, actor: &Actor, request: NewAgentRequest) -> Result<CustomAgent> {
        let name = require_text("name", &request.name)?;
        let agent = NewCustomAgent {
            user_id: actor.user_id.clone(),
            name: name.to_string(),
            description: non_blank(request.description),
            personality: non_blank(request.personality),
            training_status: TrainingStatus::Ready,
        };
        let created: CustomAgent = self
            .gateway
            .insert_as(Table::CustomAgents, &agent)
            .await
            .logged("create agent")?;
        tracing::info!(agent_id = %created.id, owner = %actor.user_id, "agent created");
        Ok(created)
    }

    /// Removes the agent; the store drops its training files and messages.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let removed = self
            .gateway
            .delete_by_id(Table::CustomAgents, &id.to_string())
            .await
            .logged("delete agent")?;
        if removed == 0 {
            return Err(AppError::NotFound("agent".into(), id.to_string()));
        }
        tracing::info!(agent_id = %id, "agent deleted");
        Ok(())
    }

    /// Metadata of the agent's uploads, newest first. Content is not loaded.
    pub async fn training_files(&self, agent_id: Uuid) -> Result<Vec<TrainingFileSummary>> {
        let query = Query::table(Table::TrainingData)
            .columns(SUMMARY_COLUMNS)
            .eq("agent_id", agent_id.to_string())
            .order_by("upload_date", Direction::Descending);
        self.gateway
            .select_as(&query)
            .await
            .logged("list training files")
    }

    /// Stores each file in turn; stops at the first failure.
    pub async fn upload(
        &self,
        agent_id: Uuid,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<TrainingFileSummary>> {
        if files.is_empty() {
            return Err(AppError::Precondition("no files were uploaded".into()));
        }
        let exists = self
            .gateway
            .find_by_id::<Value>(Table::CustomAgents, &agent_id.to_string())
            .await
            .logged("resolve agent")?
            .is_some();
        if !exists {
            return Err(AppError::NotFound("agent".into(), agent_id.to_string()));
        }

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let record = file.into_training_file(agent_id);
            tracing::debug!(%agent_id, file = %record.file_name, size = record.file_size, "storing training file");
            let summary: TrainingFileSummary = self
                .gateway
                .insert_as(Table::TrainingData, &record)
                .await
                .logged("upload training file")?;
            stored.push(summary);
        }
        Ok(stored)
    }

    pub async fn delete_training_file(&self, id: Uuid) -> Result<()> {
        let removed = self
            .gateway
            .delete_by_id(Table::TrainingData, &id.to_string())
            .await
            .logged("delete training file")?;
        if removed == 0 {
            return Err(AppError::NotFound("training file".into(), id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit;

    fn text_file(name: &str, body: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.into(),
            content_type: Some("text/plain".into()),
            bytes: body.as_bytes().to_vec(),
        }
    }

    async fn make_agent(service: &AgentService) -> CustomAgent {
        service
            .create(
                &Actor::new("demo-user"),
                NewAgentRequest {
                    name: " 小诗 ".into(),
                    description: Some("".into()),
                    personality: Some("温柔".into()),
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_trims_and_defaults() {
        let service = AgentService::new(testkit::memory());
        let agent = make_agent(&service).await;
        assert_eq!(agent.name, "小诗");
        assert!(agent.description.is_none());
        assert_eq!(agent.personality.as_deref(), Some("温柔"));
        assert_eq!(agent.training_status, TrainingStatus::Ready);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let gateway = testkit::memory();
        let service = AgentService::new(gateway.clone());
        let err = service
            .create(
                &Actor::new("demo-user"),
                NewAgentRequest {
                    name: "  ".into(),
                    description: None,
                    personality: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
        assert_eq!(gateway.row_count(Table::CustomAgents), 0);
    }

    #[tokio::test]
    async fn upload_extracts_text_and_lists_metadata() {
        let service = AgentService::new(testkit::memory());
        let agent = make_agent(&service).await;

        let stored = service
            .upload(
                agent.id,
                vec![
                    text_file("spring.txt", "春天的风很温柔"),
                    UploadedFile {
                        file_name: "scan.pdf".into(),
                        content_type: Some("application/pdf".into()),
                        bytes: vec![0; 1536],
                    },
                ],
            )
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].file_type, "application/pdf");
        assert_eq!(stored[1].file_size, 1536);

        let listed = service.training_files(agent.id).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn upload_to_missing_agent_is_not_found() {
        let service = AgentService::new(testkit::memory());
        let err = service
            .upload(Uuid::nil(), vec![text_file("a.txt", "x")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(..)));
    }

    #[tokio::test]
    async fn deleting_an_agent_drops_its_training_files() {
        let gateway = testkit::memory();
        let service = AgentService::new(gateway.clone());
        let agent = make_agent(&service).await;
        let stored = service
            .upload(agent.id, vec![text_file("a.txt", "一"), text_file("b.md", "二")])
            .await
            .unwrap();

        service.delete_training_file(stored[0].id).await.unwrap();
        assert_eq!(gateway.row_count(Table::TrainingData), 1);

        service.delete(agent.id).await.unwrap();
        assert_eq!(gateway.row_count(Table::TrainingData), 0);
        assert!(service.list().await.unwrap().is_empty());
    }
}
