use async_trait::async_trait;

use crate::model::entity::StatusLog;

#[async_trait]
pub trait StatusLogRepo: Send + Sync {
    async fn append(&self, log: StatusLog) -> anyhow::Result<()>;
}
