use async_trait::async_trait;
use mockall::mock;

use crate::{
    model::vo::{CopyMechanism, Job, ScriptInfo, TransferRequest, TransferStatus},
    service::{BulkTransferService, JobSchedulerService, RemoteFsService},
};

mock! {
    pub JobSchedulerService {}
    #[async_trait]
    impl JobSchedulerService for JobSchedulerService {
        async fn submit_job_script(&self, script_info: ScriptInfo) -> anyhow::Result<String>;
        async fn get_job(&self, id: &str) -> anyhow::Result<Job>;
        async fn delete_job(&self, id: &str) -> anyhow::Result<()>;
    }
}

mock! {
    pub BulkTransferService {}
    #[async_trait]
    impl BulkTransferService for BulkTransferService {
        async fn request_transfer(&self, request: TransferRequest) -> anyhow::Result<String>;
        async fn poll_transfer(&self, task_id: &str) -> anyhow::Result<TransferStatus>;
    }
}

mock! {
    pub RemoteFsService {}
    #[async_trait]
    impl RemoteFsService for RemoteFsService {
        async fn copy(
            &self,
            source: &str,
            dest: &str,
            mechanism: CopyMechanism,
        ) -> anyhow::Result<()>;
        async fn create_dir(&self, path: &str) -> anyhow::Result<()>;
        async fn dir_exists(&self, path: &str) -> anyhow::Result<bool>;
        async fn remove_dir(&self, path: &str) -> anyhow::Result<()>;
    }
}
