use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use domain_recording::{
    model::{entity::Recording, vo::{Payload, UpdateField}},
    repository::RecordingRepo,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::infrastructure::database::model::recording;

pub struct RecordingRepository {
    db: Arc<DatabaseConnection>,
}

impl RecordingRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordingRepo for RecordingRepository {
    async fn get_active(&self, lower: i32, upper: i32) -> anyhow::Result<Vec<Recording>> {
        recording::Entity::find()
            .filter(recording::Column::Status.gt(lower))
            .filter(recording::Column::Status.lt(upper))
            .order_by_asc(recording::Column::CreatedTime)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Recording::try_from)
            .collect()
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Recording> {
        recording::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .with_context(|| format!("no recording with id {id}"))?
            .try_into()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: i32,
        payload: Option<Payload>,
    ) -> anyhow::Result<()> {
        let mut model = recording::ActiveModel {
            id: Set(id),
            status: Set(status),
            last_modified_time: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(payload) = payload {
            match payload.field {
                UpdateField::TransferTaskId => {
                    model.transfer_task_id = Set(Some(payload.value));
                }
                UpdateField::JobId => {
                    anyhow::bail!("recordings do not carry a job id");
                }
            }
        }
        model.update(self.db.as_ref()).await?;
        Ok(())
    }
}
