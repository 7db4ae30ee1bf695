use std::sync::Arc;

use async_trait::async_trait;
use domain_cluster::service::RemoteFsService;
use domain_recording::{
    model::{entity::RecordingProcess, vo::ProcessingParams},
    service::{ResultIngestService, SessionRegistry},
};

/// Registers finished spike-sorting outputs. Missing output directories are
/// an ingestion failure, not a retry.
pub struct EphysResultIngestService {
    registry: Arc<dyn SessionRegistry>,
    remote_fs: Arc<dyn RemoteFsService>,
}

impl EphysResultIngestService {
    pub fn new(registry: Arc<dyn SessionRegistry>, remote_fs: Arc<dyn RemoteFsService>) -> Self {
        Self { registry, remote_fs }
    }
}

#[async_trait]
impl ResultIngestService for EphysResultIngestService {
    async fn ingest(
        &self,
        process: &RecordingProcess,
        params: &ProcessingParams,
    ) -> anyhow::Result<()> {
        let sorting_dir = format!("{}/spike_sorting", process.post_path);
        if !self.remote_fs.dir_exists(&sorting_dir).await? {
            anyhow::bail!("expected spike sorting output {sorting_dir} is missing");
        }
        self.registry.ingest_results(process, params).await
    }
}

/// Registers finished segmentation outputs.
pub struct ImagingResultIngestService {
    registry: Arc<dyn SessionRegistry>,
    remote_fs: Arc<dyn RemoteFsService>,
}

impl ImagingResultIngestService {
    pub fn new(registry: Arc<dyn SessionRegistry>, remote_fs: Arc<dyn RemoteFsService>) -> Self {
        Self { registry, remote_fs }
    }
}

#[async_trait]
impl ResultIngestService for ImagingResultIngestService {
    async fn ingest(
        &self,
        process: &RecordingProcess,
        params: &ProcessingParams,
    ) -> anyhow::Result<()> {
        let segmentation_dir = format!("{}/segmentation", process.post_path);
        if !self.remote_fs.dir_exists(&segmentation_dir).await? {
            anyhow::bail!("expected segmentation output {segmentation_dir} is missing");
        }
        self.registry.ingest_results(process, params).await
    }
}
