use async_trait::async_trait;

use crate::model::{
    entity::{Recording, RecordingProcess},
    vo::{FieldOfView, ProbeInsertion, ProcessingParams},
};

/// Science-side element registry. Session, probe and field-of-view
/// registration and result ingestion live outside this system; the pipeline
/// only drives them.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    async fn register_session(&self, recording: &Recording) -> anyhow::Result<()>;

    /// Probe insertions known for a registered ephys session.
    async fn probe_insertions(&self, recording: &Recording)
        -> anyhow::Result<Vec<ProbeInsertion>>;

    /// Run field-of-view splitting for a registered imaging session and
    /// report the detected fields.
    async fn split_fields_of_view(
        &self,
        recording: &Recording,
    ) -> anyhow::Result<Vec<FieldOfView>>;

    /// LFP-extraction pre-step for probe generations that need it.
    async fn extract_lfp(
        &self,
        recording: &Recording,
        probe: &ProbeInsertion,
    ) -> anyhow::Result<()>;

    /// Register finished clustering/segmentation outputs.
    async fn ingest_results(
        &self,
        process: &RecordingProcess,
        params: &ProcessingParams,
    ) -> anyhow::Result<()>;
}
