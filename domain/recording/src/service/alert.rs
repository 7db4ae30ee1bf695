use async_trait::async_trait;
use infrastructure_command::AlertCommand;

/// Operator-facing notification channel.
#[async_trait]
pub trait AlertService: Send + Sync {
    async fn alert(&self, command: AlertCommand) -> anyhow::Result<()>;
}
