use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{
    entity::{Modality, RecordingProcess},
    vo::ProcessingParams,
};

#[async_trait]
pub trait ParameterRepo: Send + Sync {
    /// Resolve the processing parameters for one fragment. Read-only: the
    /// handlers enrich their in-memory rows with this and persist nothing.
    async fn resolve(
        &self,
        process: &RecordingProcess,
        modality: Modality,
    ) -> anyhow::Result<ProcessingParams>;

    /// Seed the default parameter set for a fragment at preingestion time.
    async fn seed_defaults(
        &self,
        recording_id: Uuid,
        fragment_no: i32,
        modality: Modality,
    ) -> anyhow::Result<()>;
}
