use anyhow::anyhow;
use domain_recording::model::entity::{ProcessStatus, RecordingProcess};
use num_traits::FromPrimitive;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recording_process")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recording_id: Uuid,
    pub fragment_no: i32,
    pub status: i32,
    pub pre_path: String,
    pub post_path: String,
    pub transfer_task_id: Option<String>,
    pub job_id: Option<String>,
    pub created_time: DateTimeUtc,
    pub last_modified_time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for RecordingProcess {
    type Error = anyhow::Error;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let Model {
            id,
            recording_id,
            fragment_no,
            status,
            pre_path,
            post_path,
            transfer_task_id,
            job_id,
            created_time: _,
            last_modified_time: _,
        } = model;

        Ok(Self {
            id,
            recording_id,
            fragment_no,
            status: ProcessStatus::from_i32(status)
                .ok_or(anyhow!("wrong recording process status {status}"))?,
            pre_path,
            post_path,
            transfer_task_id,
            job_id,
        })
    }
}
