use async_trait::async_trait;
use domain_recording::{
    model::{
        entity::{Recording, RecordingProcess},
        vo::{FieldOfView, ProbeInsertion, ProcessingParams},
    },
    service::SessionRegistry,
};
use serde_json::json;

/// HTTP client for the science-side element registry service, which owns
/// session/probe/FOV registration and result ingestion.
pub struct ElementRegistryClient {
    base_url: String,
    client: reqwest::Client,
}

impl ElementRegistryClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SessionRegistry for ElementRegistryClient {
    async fn register_session(&self, recording: &Recording) -> anyhow::Result<()> {
        self.client
            .post(self.url("sessions"))
            .json(&json!({
                "recording_id": recording.id,
                "modality": recording.modality.as_str(),
                "data_dir": recording.dest_dir,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn probe_insertions(
        &self,
        recording: &Recording,
    ) -> anyhow::Result<Vec<ProbeInsertion>> {
        Ok(self
            .client
            .get(self.url(&format!("sessions/{}/probe-insertions", recording.id)))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn split_fields_of_view(
        &self,
        recording: &Recording,
    ) -> anyhow::Result<Vec<FieldOfView>> {
        Ok(self
            .client
            .post(self.url(&format!("sessions/{}/split-fov", recording.id)))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn extract_lfp(
        &self,
        recording: &Recording,
        probe: &ProbeInsertion,
    ) -> anyhow::Result<()> {
        self.client
            .post(self.url(&format!(
                "sessions/{}/probes/{}/extract-lfp",
                recording.id, probe.number
            )))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn ingest_results(
        &self,
        process: &RecordingProcess,
        params: &ProcessingParams,
    ) -> anyhow::Result<()> {
        self.client
            .post(self.url("results"))
            .json(&json!({
                "recording_id": process.recording_id,
                "process_id": process.id,
                "fragment_no": process.fragment_no,
                "results_dir": process.post_path,
                "algorithm": params.algorithm,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
