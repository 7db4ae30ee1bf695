use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain_recording::{model::entity::StatusLog, repository::StatusLogRepo};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::infrastructure::database::model::status_log;

pub struct StatusLogRepository {
    db: Arc<DatabaseConnection>,
}

impl StatusLogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatusLogRepo for StatusLogRepository {
    async fn append(&self, log: StatusLog) -> anyhow::Result<()> {
        status_log::ActiveModel {
            id: Set(log.id),
            entity: Set(log.entity.as_str().to_string()),
            entity_id: Set(log.entity_id),
            old_status: Set(log.old_status),
            new_status: Set(log.new_status),
            message: Set(log.message),
            trace: Set(log.trace),
            created_time: Set(Utc::now()),
        }
        .insert(self.db.as_ref())
        .await?;
        Ok(())
    }
}
