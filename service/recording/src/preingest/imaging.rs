use std::sync::Arc;

use async_trait::async_trait;
use domain_cluster::service::RemoteFsService;
use domain_recording::{
    model::{entity::Recording, vo::FragmentSpec},
    repository::ParameterRepo,
    service::{PreingestService, SessionRegistry},
};
use typed_builder::TypedBuilder;

/// Imaging preingestion: registers the session, runs the field-of-view
/// split step and returns one fragment per detected FOV with default
/// segmentation parameters seeded.
#[derive(TypedBuilder)]
pub struct ImagingPreingestService {
    registry: Arc<dyn SessionRegistry>,
    remote_fs: Arc<dyn RemoteFsService>,
    params: Arc<dyn ParameterRepo>,
    processed_root: String,
}

#[async_trait]
impl PreingestService for ImagingPreingestService {
    async fn preingest(&self, recording: &Recording) -> anyhow::Result<Vec<FragmentSpec>> {
        self.registry.register_session(recording).await?;
        let fields = self.registry.split_fields_of_view(recording).await?;
        if fields.is_empty() {
            anyhow::bail!("field-of-view split found nothing for recording {}", recording.id);
        }
        let mut specs = Vec::with_capacity(fields.len());
        for fov in &fields {
            if !self.remote_fs.dir_exists(&fov.raw_dir).await? {
                anyhow::bail!("fov {} raw directory {} is missing", fov.number, fov.raw_dir);
            }
            self.params.seed_defaults(recording.id, fov.number, recording.modality).await?;
            specs.push(FragmentSpec {
                fragment_no: fov.number,
                pre_path: fov.raw_dir.clone(),
                post_path: format!("{}/{}/fov{}", self.processed_root, recording.id, fov.number),
            });
        }
        Ok(specs)
    }
}
