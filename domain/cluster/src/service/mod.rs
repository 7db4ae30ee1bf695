use async_trait::async_trait;

use crate::model::vo::{CopyMechanism, Job, ScriptInfo, TransferRequest, TransferStatus};

/// Remote job scheduler, reachable locally or over an ssh proxy.
#[async_trait]
pub trait JobSchedulerService: Send + Sync {
    /// Render, stage and submit a job script, returning the scheduler job id.
    async fn submit_job_script(&self, script_info: ScriptInfo) -> anyhow::Result<String>;

    /// Query scheduler accounting for one job.
    async fn get_job(&self, id: &str) -> anyhow::Result<Job>;

    async fn delete_job(&self, id: &str) -> anyhow::Result<()>;
}

/// Bulk asynchronous data movement between storage endpoints.
#[async_trait]
pub trait BulkTransferService: Send + Sync {
    /// Submit a transfer, returning the opaque task id on acceptance.
    async fn request_transfer(&self, request: TransferRequest) -> anyhow::Result<String>;

    async fn poll_transfer(&self, task_id: &str) -> anyhow::Result<TransferStatus>;
}

/// Synchronous filesystem operations, possibly over a remote shell.
#[async_trait]
pub trait RemoteFsService: Send + Sync {
    /// Blocking point-to-point copy; completion is the return itself.
    async fn copy(&self, source: &str, dest: &str, mechanism: CopyMechanism)
        -> anyhow::Result<()>;

    async fn create_dir(&self, path: &str) -> anyhow::Result<()>;

    async fn dir_exists(&self, path: &str) -> anyhow::Result<bool>;

    async fn remove_dir(&self, path: &str) -> anyhow::Result<()>;
}
