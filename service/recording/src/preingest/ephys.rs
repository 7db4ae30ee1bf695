use std::sync::Arc;

use async_trait::async_trait;
use domain_cluster::service::RemoteFsService;
use domain_recording::{
    model::{entity::Recording, vo::FragmentSpec},
    repository::ParameterRepo,
    service::{PreingestService, SessionRegistry},
};
use typed_builder::TypedBuilder;

/// Ephys preingestion: registers the session, reads the probe insertions
/// back from the element registry, seeds default sorting parameters and
/// returns one fragment per probe. Neuropixels 2.0-generation probes get the
/// LFP-extraction pre-step before sorting.
#[derive(TypedBuilder)]
pub struct EphysPreingestService {
    registry: Arc<dyn SessionRegistry>,
    remote_fs: Arc<dyn RemoteFsService>,
    params: Arc<dyn ParameterRepo>,
    /// Storage-side root the per-probe results land under.
    processed_root: String,
}

#[async_trait]
impl PreingestService for EphysPreingestService {
    async fn preingest(&self, recording: &Recording) -> anyhow::Result<Vec<FragmentSpec>> {
        self.registry.register_session(recording).await?;
        let insertions = self.registry.probe_insertions(recording).await?;
        if insertions.is_empty() {
            anyhow::bail!("no probe insertions registered for recording {}", recording.id);
        }
        let mut specs = Vec::with_capacity(insertions.len());
        for probe in &insertions {
            if !self.remote_fs.dir_exists(&probe.raw_dir).await? {
                anyhow::bail!(
                    "probe {} raw directory {} is missing",
                    probe.number,
                    probe.raw_dir
                );
            }
            if probe.generation.starts_with("2.0") {
                self.registry.extract_lfp(recording, probe).await?;
            }
            self.params
                .seed_defaults(recording.id, probe.number, recording.modality)
                .await?;
            specs.push(FragmentSpec {
                fragment_no: probe.number,
                pre_path: probe.raw_dir.clone(),
                post_path: format!(
                    "{}/{}/probe{}",
                    self.processed_root, recording.id, probe.number
                ),
            });
        }
        Ok(specs)
    }
}
