use async_trait::async_trait;
use domain_cluster::{
    model::vo::{TransferRequest, TransferStatus},
    service::BulkTransferService,
};
use service_cluster::globus;
use tokio::process::Command;

/// Bulk transfer client over the Globus-style CLI. Submissions return an
/// opaque task id immediately; completion is found by polling `task show`.
pub struct GlobusClient {
    cli: String,
}

impl GlobusClient {
    pub fn new(cli: String) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl BulkTransferService for GlobusClient {
    async fn request_transfer(&self, request: TransferRequest) -> anyhow::Result<String> {
        let out = Command::new(&self.cli)
            .args([
                "transfer",
                "--recursive",
                "--format",
                "json",
                "--label",
                &request.label,
                &format!("{}:{}", request.source_endpoint, request.source_path),
                &format!("{}:{}", request.dest_endpoint, request.dest_path),
            ])
            .output()
            .await?;
        if !out.status.success() {
            anyhow::bail!(
                "transfer submission exited with {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr)
            );
        }
        globus::parse_submit_reply(&out.stdout)
    }

    async fn poll_transfer(&self, task_id: &str) -> anyhow::Result<TransferStatus> {
        let out = Command::new(&self.cli)
            .args(["task", "show", task_id, "--format", "json"])
            .output()
            .await?;
        if !out.status.success() {
            anyhow::bail!(
                "task show exited with {} for {task_id}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr)
            );
        }
        globus::parse_task_status(&out.stdout)
    }
}
