use anyhow::anyhow;
use domain_recording::model::entity::{Modality, Recording, RecordingStatus};
use num_traits::FromPrimitive;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recording")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub modality: i32,
    pub location: String,
    pub status: i32,
    pub transfer_task_id: Option<String>,
    pub source_dir: String,
    pub dest_dir: String,
    pub created_time: DateTimeUtc,
    pub last_modified_time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Recording {
    type Error = anyhow::Error;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let Model {
            id,
            modality,
            location,
            status,
            transfer_task_id,
            source_dir,
            dest_dir,
            created_time: _,
            last_modified_time: _,
        } = model;

        Ok(Self {
            id,
            modality: Modality::from_i32(modality)
                .ok_or(anyhow!("wrong recording modality {modality}"))?,
            location,
            status: RecordingStatus::from_i32(status)
                .ok_or(anyhow!("wrong recording status {status}"))?,
            transfer_task_id,
            source_dir,
            dest_dir,
        })
    }
}
