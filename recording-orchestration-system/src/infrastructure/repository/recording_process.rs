use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use domain_recording::{
    model::{
        entity::{ProcessStatus, RecordingProcess},
        vo::{FragmentSpec, Payload, UpdateField},
    },
    repository::RecordingProcessRepo,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::infrastructure::database::model::recording_process;

pub struct RecordingProcessRepository {
    db: Arc<DatabaseConnection>,
}

impl RecordingProcessRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordingProcessRepo for RecordingProcessRepository {
    async fn get_active(&self, lower: i32, upper: i32) -> anyhow::Result<Vec<RecordingProcess>> {
        recording_process::Entity::find()
            .filter(recording_process::Column::Status.gt(lower))
            .filter(recording_process::Column::Status.lt(upper))
            .order_by_asc(recording_process::Column::CreatedTime)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(RecordingProcess::try_from)
            .collect()
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<RecordingProcess> {
        recording_process::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .with_context(|| format!("no recording process with id {id}"))?
            .try_into()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: i32,
        payload: Option<Payload>,
    ) -> anyhow::Result<()> {
        let mut model = recording_process::ActiveModel {
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
                    model.job_id = Set(Some(payload.value));
                }
            }
        }
        model.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn create_fragments(
        &self,
        recording_id: Uuid,
        specs: Vec<FragmentSpec>,
    ) -> anyhow::Result<()> {
        // One transaction for the whole batch: a failure part-way leaves no
        // orphaned fragment rows next to a recording still at TRANSFER_DONE.
        let txn = self.db.begin().await?;
        let now = Utc::now();
        for spec in specs {
            recording_process::ActiveModel {
                id: Set(Uuid::new_v4()),
                recording_id: Set(recording_id),
                fragment_no: Set(spec.fragment_no),
                status: Set(ProcessStatus::New as i32),
                pre_path: Set(spec.pre_path),
                post_path: Set(spec.post_path),
                transfer_task_id: Set(None),
                job_id: Set(None),
                created_time: Set(now),
                last_modified_time: Set(now),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        Ok(())
    }
}
