use async_trait::async_trait;
use infrastructure_command::AlertCommand;
use mockall::mock;
use uuid::Uuid;

use crate::{
    model::{
        entity::{Modality, Recording, RecordingProcess, StatusLog},
        vo::{FieldOfView, FragmentSpec, Payload, ProbeInsertion, ProcessingParams},
    },
    repository::{ParameterRepo, RecordingProcessRepo, RecordingRepo, StatusLogRepo},
    service::{AlertService, PreingestService, ResultIngestService, SessionRegistry},
};

mock! {
    pub RecordingRepo {}
    #[async_trait]
    impl RecordingRepo for RecordingRepo {
        async fn get_active(&self, lower: i32, upper: i32) -> anyhow::Result<Vec<Recording>>;
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Recording>;
        async fn update_status(
            &self,
            id: Uuid,
            status: i32,
            payload: Option<Payload>,
        ) -> anyhow::Result<()>;
    }
}

mock! {
    pub RecordingProcessRepo {}
    #[async_trait]
    impl RecordingProcessRepo for RecordingProcessRepo {
        async fn get_active(
            &self,
            lower: i32,
            upper: i32,
        ) -> anyhow::Result<Vec<RecordingProcess>>;
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<RecordingProcess>;
        async fn update_status(
            &self,
            id: Uuid,
            status: i32,
            payload: Option<Payload>,
        ) -> anyhow::Result<()>;
        async fn create_fragments(
            &self,
            recording_id: Uuid,
            specs: Vec<FragmentSpec>,
        ) -> anyhow::Result<()>;
    }
}

mock! {
    pub StatusLogRepo {}
    #[async_trait]
    impl StatusLogRepo for StatusLogRepo {
        async fn append(&self, log: StatusLog) -> anyhow::Result<()>;
    }
}

mock! {
    pub ParameterRepo {}
    #[async_trait]
    impl ParameterRepo for ParameterRepo {
        async fn resolve(
            &self,
            process: &RecordingProcess,
            modality: Modality,
        ) -> anyhow::Result<ProcessingParams>;
        async fn seed_defaults(
            &self,
            recording_id: Uuid,
            fragment_no: i32,
            modality: Modality,
        ) -> anyhow::Result<()>;
    }
}

mock! {
    pub SessionRegistry {}
    #[async_trait]
    impl SessionRegistry for SessionRegistry {
        async fn register_session(&self, recording: &Recording) -> anyhow::Result<()>;
        async fn probe_insertions(
            &self,
            recording: &Recording,
        ) -> anyhow::Result<Vec<ProbeInsertion>>;
        async fn split_fields_of_view(
            &self,
            recording: &Recording,
        ) -> anyhow::Result<Vec<FieldOfView>>;
        async fn extract_lfp(
            &self,
            recording: &Recording,
            probe: &ProbeInsertion,
        ) -> anyhow::Result<()>;
        async fn ingest_results(
            &self,
            process: &RecordingProcess,
            params: &ProcessingParams,
        ) -> anyhow::Result<()>;
    }
}

mock! {
    pub PreingestService {}
    #[async_trait]
    impl PreingestService for PreingestService {
        async fn preingest(&self, recording: &Recording) -> anyhow::Result<Vec<FragmentSpec>>;
    }
}

mock! {
    pub ResultIngestService {}
    #[async_trait]
    impl ResultIngestService for ResultIngestService {
        async fn ingest(
            &self,
            process: &RecordingProcess,
            params: &ProcessingParams,
        ) -> anyhow::Result<()>;
    }
}

mock! {
    pub AlertService {}
    #[async_trait]
    impl AlertService for AlertService {
        async fn alert(&self, command: AlertCommand) -> anyhow::Result<()>;
    }
}
