use async_trait::async_trait;
use domain_recording::service::AlertService;
use infrastructure_command::{AlertCommand, AlertKind};
use serde_json::json;

/// Posts operator alerts to a Slack-compatible incoming webhook. With no
/// webhook configured, alerts are logged and dropped.
pub struct SlackAlertService {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl SlackAlertService {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AlertService for SlackAlertService {
    async fn alert(&self, command: AlertCommand) -> anyhow::Result<()> {
        let Some(url) = &self.webhook_url else {
            tracing::info!(
                entity = %command.entity,
                entity_id = %command.entity_id,
                status = %command.status_label,
                "no webhook configured, dropping alert"
            );
            return Ok(());
        };
        let headline = match command.kind {
            AlertKind::StatusReached => "status update",
            AlertKind::PipelineError => "pipeline error",
        };
        let mut text = format!(
            "[{headline}] {} {} ({}) is now {}",
            command.entity, command.entity_id, command.modality, command.status_label,
        );
        if let Some(path) = &command.path {
            text.push_str(&format!("\npath: {path}"));
        }
        if let Some(error) = &command.error {
            text.push_str(&format!("\nerror: {error}"));
        }
        self.client
            .post(url)
            .json(&json!({ "text": text }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
