use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use domain_recording::{
    model::{
        entity::{Modality, RecordingProcess},
        vo::ProcessingParams,
    },
    repository::ParameterRepo,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

use crate::infrastructure::database::model::processing_parameters;

pub struct ParameterRepository {
    db: Arc<DatabaseConnection>,
}

impl ParameterRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_for(
        &self,
        recording_id: Uuid,
        fragment_no: i32,
    ) -> anyhow::Result<Option<processing_parameters::Model>> {
        Ok(processing_parameters::Entity::find()
            .filter(processing_parameters::Column::RecordingId.eq(recording_id))
            .filter(processing_parameters::Column::FragmentNo.eq(fragment_no))
            .one(self.db.as_ref())
            .await?)
    }
}

#[async_trait]
impl ParameterRepo for ParameterRepository {
    async fn resolve(
        &self,
        process: &RecordingProcess,
        _modality: Modality,
    ) -> anyhow::Result<ProcessingParams> {
        let row = self
            .find_for(process.recording_id, process.fragment_no)
            .await?
            .with_context(|| {
                format!(
                    "no parameter set for fragment {} of recording {}",
                    process.fragment_no, process.recording_id
                )
            })?;
        Ok(ProcessingParams {
            preprocess_steps: serde_json::from_value(row.preprocess_steps)?,
            algorithm: row.algorithm,
        })
    }

    async fn seed_defaults(
        &self,
        recording_id: Uuid,
        fragment_no: i32,
        modality: Modality,
    ) -> anyhow::Result<()> {
        // Preingestion retries must not duplicate or overwrite an existing
        // parameter set.
        if self.find_for(recording_id, fragment_no).await?.is_some() {
            return Ok(());
        }
        let (steps, algorithm) = default_params(modality);
        let now = Utc::now();
        processing_parameters::ActiveModel {
            id: Set(Uuid::new_v4()),
            recording_id: Set(recording_id),
            fragment_no: Set(fragment_no),
            preprocess_steps: Set(json!(steps)),
            algorithm: Set(algorithm),
            created_time: Set(now),
            last_modified_time: Set(now),
        }
        .insert(self.db.as_ref())
        .await?;
        Ok(())
    }
}

fn default_params(modality: Modality) -> (Vec<&'static str>, serde_json::Value) {
    match modality {
        Modality::Electrophysiology => (
            vec!["median_subtraction", "catgt"],
            json!({"sorter": "kilosort2.5", "min_firing_rate": 0.1}),
        ),
        Modality::Imaging => (
            vec!["motion_registration"],
            json!({"method": "suite2p", "cell_diameter": 10}),
        ),
        Modality::Video => (vec![], json!({})),
    }
}
