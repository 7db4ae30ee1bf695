use async_trait::async_trait;

use crate::model::{
    entity::{Recording, RecordingProcess},
    vo::{FragmentSpec, ProcessingParams},
};

/// Modality-specific preingestion: register the session and detect the
/// processing fragments belonging to a recording.
#[async_trait]
pub trait PreingestService: Send + Sync {
    async fn preingest(&self, recording: &Recording) -> anyhow::Result<Vec<FragmentSpec>>;
}

/// Modality-specific registration of finished processing outputs.
#[async_trait]
pub trait ResultIngestService: Send + Sync {
    async fn ingest(
        &self,
        process: &RecordingProcess,
        params: &ProcessingParams,
    ) -> anyhow::Result<()>;
}
